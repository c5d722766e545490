//! Application entry point.
//!
//! Small console front end for the wallet API: authenticates with
//! credentials from the environment, then prints the profile, balance, and
//! transaction history.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use carteira_client::app::WalletService;
use carteira_client::domain::{LoginRequest, SessionStore};
use carteira_client::infra::{ApiConfig, FileSessionStore, HttpWalletApi, NullSessionStore};

/// Application configuration
struct Config {
    api_url: String,
    email: Option<String>,
    password: Option<String>,
    request_timeout_secs: u64,
}

impl Config {
    fn from_env() -> Result<Self> {
        let api_url = env::var("WALLET_API_URL").context("WALLET_API_URL not set")?;
        let email = env::var("WALLET_EMAIL").ok().filter(|v| !v.is_empty());
        let password = env::var("WALLET_PASSWORD").ok().filter(|v| !v.is_empty());
        let request_timeout_secs = env::var("WALLET_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            api_url,
            email,
            password,
            request_timeout_secs,
        })
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!("Carteira client v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let mut api_config = ApiConfig::new(&config.api_url);
    api_config.timeout = std::time::Duration::from_secs(config.request_timeout_secs);
    let api = Arc::new(HttpWalletApi::with_config(api_config));

    let session: Arc<dyn SessionStore> = match FileSessionStore::discover() {
        Some(store) => {
            info!(path = %store.path().display(), "Session file resolved");
            Arc::new(store)
        }
        None => {
            warn!("No persistent session storage available, session will not survive exit");
            Arc::new(NullSessionStore)
        }
    };

    let service = WalletService::new(api, session);

    if !service.is_authenticated() {
        let (Some(email), Some(password)) = (config.email.clone(), config.password.clone())
        else {
            bail!(
                "No stored session and no credentials. Set WALLET_EMAIL and WALLET_PASSWORD to log in."
            );
        };

        let login = service
            .login(&LoginRequest { email, password })
            .await
            .into_result();
        match login {
            Ok(user) => info!(user = %user.name, "Logged in"),
            Err(error) => bail!("Login failed: {error}"),
        }
    }

    match service.profile().await.into_result() {
        Ok(user) => println!("Conta: {} <{}>", user.name, user.email),
        Err(error) => bail!("Profile fetch failed: {error}"),
    }

    match service.balance().await.into_result() {
        Ok(balance) => println!("Saldo: {}", balance.balance),
        Err(error) => bail!("Balance fetch failed: {error}"),
    }

    match service.history().await.into_result() {
        Ok(transactions) => {
            println!("Histórico ({} transações):", transactions.len());
            for tx in transactions {
                println!(
                    "  {} {} {} {} {}",
                    tx.created_at.format("%d/%m/%Y %H:%M"),
                    tx.transaction_type,
                    tx.amount,
                    tx.status,
                    tx.description
                );
            }
        }
        Err(error) => bail!("History fetch failed: {error}"),
    }

    Ok(())
}
