//! Domain traits defining contracts for external systems.

use async_trait::async_trait;
use secrecy::SecretString;

use super::error::ApiError;
use super::types::{
    BalanceResponse, DepositRequest, LoginRequest, LoginResponse, MutationResponse,
    RegisterRequest, ReversalResponse, Transaction, TransferRequest, User,
};

/// Remote wallet API contract.
///
/// Operations take the bearer token explicitly; when `None` is supplied the
/// request goes out unauthenticated and the server is expected to reject it.
/// Implementations map every failure (transport, non-2xx, malformed body)
/// into [`ApiError`]; nothing panics.
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// Create an account
    async fn register(&self, payload: &RegisterRequest) -> Result<User, ApiError>;

    /// Exchange credentials for a bearer token and profile
    async fn login(&self, payload: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Fetch the authenticated profile
    async fn profile(&self, token: Option<&SecretString>) -> Result<User, ApiError>;

    /// Fetch the current wallet balance
    async fn balance(&self, token: Option<&SecretString>) -> Result<BalanceResponse, ApiError>;

    /// Fetch the transaction history, newest first
    async fn history(&self, token: Option<&SecretString>) -> Result<Vec<Transaction>, ApiError>;

    /// Credit the wallet
    async fn deposit(
        &self,
        payload: &DepositRequest,
        token: Option<&SecretString>,
    ) -> Result<MutationResponse, ApiError>;

    /// Move funds to another wallet, addressed by recipient CPF
    async fn transfer(
        &self,
        payload: &TransferRequest,
        token: Option<&SecretString>,
    ) -> Result<MutationResponse, ApiError>;

    /// Ask the ledger to issue a compensating transaction
    async fn reverse(
        &self,
        transaction_id: &str,
        token: Option<&SecretString>,
    ) -> Result<ReversalResponse, ApiError>;
}

/// Persistent session storage: a bearer token plus a cached profile.
///
/// The analog of browser key-value storage. Every operation is infallible
/// from the caller's point of view: storage failures are logged and
/// swallowed, reads of absent or corrupt entries yield `None`.
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if a session exists
    fn token(&self) -> Option<SecretString>;

    /// Persist the bearer token
    fn set_token(&self, token: &SecretString);

    /// Cached profile; `None` when absent or unreadable
    fn user(&self) -> Option<User>;

    /// Cache the profile
    fn set_user(&self, user: &User);

    /// Drop both the token and the cached profile
    fn clear(&self);
}
