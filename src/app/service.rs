//! Application service orchestrating remote calls and the session.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    ActionResult, ApiError, BalanceResponse, Cpf, DepositRequest, LoginRequest, MutationResponse,
    RegisterRequest, ReversalResponse, SessionStore, Transaction, TransferRequest, User,
    WalletApi, first_validation_message,
};

/// Wallet operations over an injected API client and session store.
///
/// Every method returns the uniform [`ActionResult`] shape: client-side
/// validation failures, transport errors, and server rejections are all
/// folded into it, and nothing propagates past this boundary. An HTTP 401
/// on any authenticated call clears the stored session before the failure
/// is reported.
pub struct WalletService {
    api: Arc<dyn WalletApi>,
    session: Arc<dyn SessionStore>,
}

impl WalletService {
    #[must_use]
    pub fn new(api: Arc<dyn WalletApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    /// The injected session store.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// The injected API client.
    #[must_use]
    pub(crate) fn api(&self) -> &Arc<dyn WalletApi> {
        &self.api
    }

    /// Cached profile from the session, if any.
    #[must_use]
    pub fn cached_user(&self) -> Option<User> {
        self.session.user()
    }

    /// Whether a bearer token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    pub(crate) fn token(&self) -> Option<SecretString> {
        self.session.token()
    }

    /// Fold an API failure into the result shape, invalidating the session
    /// when the server no longer accepts the stored token.
    pub(crate) fn fail_from<T>(&self, err: ApiError, fallback: &str) -> ActionResult<T> {
        if err.is_unauthorized() {
            warn!("Stored session rejected by the API, clearing it");
            self.session.clear();
        }
        let message = err
            .server_message()
            .map_or_else(|| fallback.to_string(), str::to_string);
        ActionResult::failure(message)
    }

    /// Create an account. The CPF is normalized to raw digits before
    /// transmission.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> ActionResult<User> {
        if let Err(errors) = request.validate() {
            return ActionResult::failure(first_validation_message(&errors));
        }

        let Ok(cpf) = request.cpf.parse::<Cpf>() else {
            return ActionResult::failure("CPF inválido");
        };
        let payload = RegisterRequest {
            cpf: cpf.as_digits().to_string(),
            ..request.clone()
        };

        match self.api.register(&payload).await {
            Ok(user) => {
                info!(user_id = %user.id, "Account registered");
                ActionResult::ok(user)
            }
            Err(err) => self.fail_from(err, "Erro ao registrar"),
        }
    }

    /// Exchange credentials for a session. On success the token and the
    /// profile are persisted to the session store.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> ActionResult<User> {
        if let Err(errors) = request.validate() {
            return ActionResult::failure(first_validation_message(&errors));
        }

        match self.api.login(request).await {
            Ok(response) => {
                self.session.set_token(&response.access_token);
                self.session.set_user(&response.user);
                info!(user_id = %response.user.id, "Session established");
                ActionResult::ok(response.user)
            }
            Err(err) => self.fail_from(err, "Erro ao fazer login"),
        }
    }

    /// Drop the stored session. Purely local; the token is not revoked
    /// server-side.
    pub fn logout(&self) -> ActionResult<()> {
        self.session.clear();
        info!("Session cleared");
        ActionResult::ok(())
    }

    /// Fetch the authenticated profile and refresh the cached copy.
    pub async fn profile(&self) -> ActionResult<User> {
        match self.api.profile(self.token().as_ref()).await {
            Ok(user) => {
                self.session.set_user(&user);
                ActionResult::ok(user)
            }
            Err(err) => self.fail_from(err, "Erro ao obter perfil"),
        }
    }

    /// Fetch the current wallet balance.
    pub async fn balance(&self) -> ActionResult<BalanceResponse> {
        match self.api.balance(self.token().as_ref()).await {
            Ok(balance) => ActionResult::ok(balance),
            Err(err) => self.fail_from(err, "Erro ao obter saldo"),
        }
    }

    /// Fetch the transaction history.
    pub async fn history(&self) -> ActionResult<Vec<Transaction>> {
        match self.api.history(self.token().as_ref()).await {
            Ok(transactions) => ActionResult::ok(transactions),
            Err(err) => self.fail_from(err, "Erro ao obter histórico"),
        }
    }

    /// Fetch the history entries a reversal may target: settled entries
    /// that are not themselves reversals.
    pub async fn reversible_history(&self) -> ActionResult<Vec<Transaction>> {
        let result = self.history().await;
        if !result.is_success() {
            return result;
        }
        let eligible = result
            .data
            .unwrap_or_default()
            .into_iter()
            .filter(Transaction::is_reversible)
            .collect();
        ActionResult::ok(eligible)
    }

    /// Credit the wallet.
    #[instrument(skip(self, request), fields(amount = %request.amount))]
    pub async fn deposit(&self, request: &DepositRequest) -> ActionResult<MutationResponse> {
        if let Err(errors) = request.validate() {
            return ActionResult::failure(first_validation_message(&errors));
        }

        match self.api.deposit(request, self.token().as_ref()).await {
            Ok(response) => {
                info!(
                    transaction_id = %response.transaction.id,
                    new_balance = %response.new_balance,
                    "Deposit accepted"
                );
                ActionResult::ok(response)
            }
            Err(err) => self.fail_from(err, "Erro ao realizar depósito"),
        }
    }

    /// Move funds to another wallet. The recipient CPF is normalized to
    /// raw digits before transmission.
    #[instrument(skip(self, request), fields(amount = %request.amount))]
    pub async fn transfer(&self, request: &TransferRequest) -> ActionResult<MutationResponse> {
        if let Err(errors) = request.validate() {
            return ActionResult::failure(first_validation_message(&errors));
        }

        let Ok(recipient) = request.recipient_cpf.parse::<Cpf>() else {
            return ActionResult::failure("CPF inválido");
        };
        let payload = TransferRequest {
            recipient_cpf: recipient.as_digits().to_string(),
            ..request.clone()
        };

        match self.api.transfer(&payload, self.token().as_ref()).await {
            Ok(response) => {
                info!(
                    transaction_id = %response.transaction.id,
                    new_balance = %response.new_balance,
                    "Transfer accepted"
                );
                ActionResult::ok(response)
            }
            Err(err) => self.fail_from(err, "Erro ao realizar transferência"),
        }
    }

    /// Ask the ledger to negate a settled transaction.
    #[instrument(skip(self))]
    pub async fn reverse(&self, transaction_id: &str) -> ActionResult<ReversalResponse> {
        if Uuid::parse_str(transaction_id).is_err() {
            return ActionResult::failure("Identificador de transação inválido");
        }

        match self
            .api
            .reverse(transaction_id, self.token().as_ref())
            .await
        {
            Ok(response) => {
                info!(
                    transaction_id = %transaction_id,
                    reversal_id = %response.reversal_transaction.id,
                    "Reversal accepted"
                );
                ActionResult::ok(response)
            }
            Err(err) => self.fail_from(err, "Erro ao reverter transação"),
        }
    }
}
