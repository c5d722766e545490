//! HTTP implementation of the wallet API contract.
//!
//! Thin request wrappers over `reqwest`: JSON in, JSON out, bearer
//! credential attached when a token is supplied. The server reports
//! failures as `{"message": string | string[]}`; the first element is used
//! when it is a list.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::domain::{
    ApiError, BalanceResponse, DepositRequest, LoginRequest, LoginResponse, MutationResponse,
    RegisterRequest, ReversalResponse, Transaction, TransferRequest, User, WalletApi,
};

/// Fallback used when the server gives no usable message.
const GENERIC_ERROR: &str = "Erro desconhecido";

/// Configuration for [`HttpWalletApi`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the wallet API, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: std::time::Duration,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: std::time::Duration::from_secs(30),
        }
    }
}

/// Wallet API client over HTTP
#[derive(Debug, Clone)]
pub struct HttpWalletApi {
    http_client: Client,
    config: ApiConfig,
}

impl HttpWalletApi {
    /// Create a client for the API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(ApiConfig::new(base_url))
    }

    #[must_use]
    pub fn with_config(config: ApiConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            config,
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let mut builder = self.http_client.request(method, url);
        if let Some(token) = token {
            builder = builder.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            );
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(path = %path, "Calling wallet API");

        let response = builder.send().await.map_err(|e| {
            error!(path = %path, error = %e, "Wallet API request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = extract_error_message(response).await;
            error!(path = %path, status = %status, message = %message, "Wallet API returned error");
            return Err(ApiError::Status {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| {
            error!(path = %path, error = %e, "Failed to parse wallet API response");
            ApiError::Parse(e.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.execute(path, self.request(Method::GET, path, token))
            .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.execute(path, self.request(Method::POST, path, token).json(body))
            .await
    }

    /// Empty-body POST, used by the reversal endpoint.
    async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.execute(path, self.request(Method::POST, path, token))
            .await
    }
}

#[async_trait]
impl WalletApi for HttpWalletApi {
    async fn register(&self, payload: &RegisterRequest) -> Result<User, ApiError> {
        self.post("/auth/register", payload, None).await
    }

    async fn login(&self, payload: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post("/auth/login", payload, None).await
    }

    async fn profile(&self, token: Option<&SecretString>) -> Result<User, ApiError> {
        self.get("/auth/profile", token).await
    }

    async fn balance(&self, token: Option<&SecretString>) -> Result<BalanceResponse, ApiError> {
        self.get("/transactions/balance", token).await
    }

    async fn history(&self, token: Option<&SecretString>) -> Result<Vec<Transaction>, ApiError> {
        self.get("/transactions/history", token).await
    }

    async fn deposit(
        &self,
        payload: &DepositRequest,
        token: Option<&SecretString>,
    ) -> Result<MutationResponse, ApiError> {
        self.post("/transactions/deposit", payload, token).await
    }

    async fn transfer(
        &self,
        payload: &TransferRequest,
        token: Option<&SecretString>,
    ) -> Result<MutationResponse, ApiError> {
        self.post("/transactions/transfer", payload, token).await
    }

    async fn reverse(
        &self,
        transaction_id: &str,
        token: Option<&SecretString>,
    ) -> Result<ReversalResponse, ApiError> {
        self.post_empty(&format!("/transactions/{}/reverse", transaction_id), token)
            .await
    }
}

/// Server error body: `message` is a string or a list of strings.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ServerMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServerMessage {
    One(String),
    Many(Vec<String>),
}

impl ServerMessage {
    fn into_first(self) -> Option<String> {
        match self {
            Self::One(message) => Some(message),
            Self::Many(messages) => messages.into_iter().next(),
        }
    }
}

async fn extract_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .and_then(ServerMessage::into_first)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| default_status_message(status))
}

fn default_status_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "Não autorizado".to_string(),
        _ => GENERIC_ERROR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let config = ApiConfig::new("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");

        let config = ApiConfig::new("https://api.example.com");
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn test_error_body_single_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": "Saldo insuficiente"}"#).unwrap();
        assert_eq!(
            body.message.unwrap().into_first().unwrap(),
            "Saldo insuficiente"
        );
    }

    #[test]
    fn test_error_body_message_list_uses_first() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message": ["CPF inválido", "Email inválido"]}"#).unwrap();
        assert_eq!(body.message.unwrap().into_first().unwrap(), "CPF inválido");
    }

    #[test]
    fn test_error_body_empty_list() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": []}"#).unwrap();
        assert!(body.message.unwrap().into_first().is_none());
    }

    #[test]
    fn test_error_body_missing_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"statusCode": 500}"#).unwrap();
        assert!(body.message.is_none());
    }
}
