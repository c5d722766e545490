//! Mock implementations for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use uuid::Uuid;

use crate::domain::{
    Amount, ApiError, BalanceResponse, DepositRequest, LoginRequest, LoginResponse,
    MutationResponse, OtherParty, RegisterRequest, ReversalResponse, Transaction,
    TransactionDirection, TransactionStatus, TransactionType, TransferRequest, User, UserWallet,
    WalletApi,
};

/// Bearer token issued by [`MockWalletApi::login`]
pub const MOCK_TOKEN: &str = "mock_token";

/// Configuration for mock behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub should_fail: bool,
    pub status_code: u16,
    pub error_message: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            should_fail: false,
            status_code: 500,
            error_message: None,
        }
    }
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            status_code: 500,
            error_message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self {
            should_fail: true,
            status_code: 401,
            error_message: Some("Unauthorized".to_string()),
        }
    }
}

struct MockState {
    user: User,
    transactions: Vec<Transaction>,
    /// History fetches remaining until pending entries settle
    settle_countdown: Option<usize>,
}

/// In-memory wallet API for testing.
///
/// Keeps a single account with a running balance and a transaction list,
/// enforcing the same surface rules the real service does: bearer token
/// required on authenticated calls, insufficient funds rejected, reversal
/// only of settled non-reversal entries.
pub struct MockWalletApi {
    config: MockConfig,
    state: Mutex<MockState>,
    request_count: AtomicUsize,
}

impl MockWalletApi {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: "João Silva".to_string(),
            email: "joao@example.com".to_string(),
            cpf: "52998224725".to_string(),
            wallet: UserWallet {
                id: Uuid::new_v4().to_string(),
                balance: Amount::from_centavos(10_000),
            },
            created_at: now,
            updated_at: now,
        };
        Self {
            config,
            state: Mutex::new(MockState {
                user,
                transactions: Vec::new(),
                settle_countdown: None,
            }),
            request_count: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::with_config(MockConfig::unauthorized())
    }

    /// Mutations create `PENDING` entries that settle after `history_calls`
    /// further history fetches.
    #[must_use]
    pub fn settling(history_calls: usize) -> Self {
        let api = Self::new();
        api.state.lock().unwrap().settle_countdown = Some(history_calls);
        api
    }

    /// Number of requests that reached this mock.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Current balance (for assertions).
    pub fn current_balance(&self) -> Amount {
        self.state.lock().unwrap().user.wallet.balance
    }

    /// Stored transactions (for assertions).
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    fn record_request(&self) -> Result<(), ApiError> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if self.config.should_fail {
            return Err(ApiError::Status {
                status_code: self.config.status_code,
                message: self
                    .config
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "Mock error".to_string()),
            });
        }
        Ok(())
    }

    fn check_auth(token: Option<&SecretString>) -> Result<(), ApiError> {
        if token.is_none() {
            return Err(ApiError::Status {
                status_code: 401,
                message: "Não autorizado".to_string(),
            });
        }
        Ok(())
    }

    fn initial_status(state: &MockState) -> TransactionStatus {
        if state.settle_countdown.is_some() {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Completed
        }
    }
}

impl Default for MockWalletApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletApi for MockWalletApi {
    async fn register(&self, payload: &RegisterRequest) -> Result<User, ApiError> {
        self.record_request()?;
        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4().to_string(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            cpf: payload.cpf.clone(),
            wallet: UserWallet {
                id: Uuid::new_v4().to_string(),
                balance: Amount::from_centavos(0),
            },
            created_at: now,
            updated_at: now,
        })
    }

    async fn login(&self, _payload: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record_request()?;
        let state = self.state.lock().unwrap();
        Ok(LoginResponse {
            access_token: SecretString::from(MOCK_TOKEN),
            user: state.user.clone(),
        })
    }

    async fn profile(&self, token: Option<&SecretString>) -> Result<User, ApiError> {
        self.record_request()?;
        Self::check_auth(token)?;
        Ok(self.state.lock().unwrap().user.clone())
    }

    async fn balance(&self, token: Option<&SecretString>) -> Result<BalanceResponse, ApiError> {
        self.record_request()?;
        Self::check_auth(token)?;
        let state = self.state.lock().unwrap();
        Ok(BalanceResponse {
            balance: state.user.wallet.balance,
            wallet_id: state.user.wallet.id.clone(),
        })
    }

    async fn history(&self, token: Option<&SecretString>) -> Result<Vec<Transaction>, ApiError> {
        self.record_request()?;
        Self::check_auth(token)?;
        let mut state = self.state.lock().unwrap();

        if let Some(remaining) = state.settle_countdown {
            if remaining == 0 {
                for tx in &mut state.transactions {
                    if tx.status == TransactionStatus::Pending {
                        tx.status = TransactionStatus::Completed;
                        tx.processed_at = Some(Utc::now());
                    }
                }
            } else {
                state.settle_countdown = Some(remaining - 1);
            }
        }

        let mut transactions = state.transactions.clone();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }

    async fn deposit(
        &self,
        payload: &DepositRequest,
        token: Option<&SecretString>,
    ) -> Result<MutationResponse, ApiError> {
        self.record_request()?;
        Self::check_auth(token)?;
        let mut state = self.state.lock().unwrap();

        let previous = state.user.wallet.balance;
        let new_balance = Amount::from_centavos(previous.centavos() + payload.amount.centavos());
        state.user.wallet.balance = new_balance;

        let status = Self::initial_status(&state);
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            transaction_type: TransactionType::Deposit,
            amount: payload.amount,
            status,
            description: payload.description.clone().unwrap_or_default(),
            created_at: Utc::now(),
            processed_at: (status == TransactionStatus::Completed).then(Utc::now),
            direction: None,
            other_party: None,
        };
        state.transactions.push(transaction.clone());

        Ok(MutationResponse {
            transaction,
            new_balance,
            previous_balance: Some(previous),
        })
    }

    async fn transfer(
        &self,
        payload: &TransferRequest,
        token: Option<&SecretString>,
    ) -> Result<MutationResponse, ApiError> {
        self.record_request()?;
        Self::check_auth(token)?;
        let mut state = self.state.lock().unwrap();

        let previous = state.user.wallet.balance;
        if payload.amount > previous {
            return Err(ApiError::Status {
                status_code: 422,
                message: "Saldo insuficiente".to_string(),
            });
        }
        let new_balance = Amount::from_centavos(previous.centavos() - payload.amount.centavos());
        state.user.wallet.balance = new_balance;

        let status = Self::initial_status(&state);
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            transaction_type: TransactionType::Transfer,
            amount: payload.amount,
            status,
            description: payload.description.clone().unwrap_or_default(),
            created_at: Utc::now(),
            processed_at: (status == TransactionStatus::Completed).then(Utc::now),
            direction: Some(TransactionDirection::Sent),
            other_party: Some(OtherParty {
                id: Uuid::new_v4().to_string(),
                name: format!("CPF {}", payload.recipient_cpf),
            }),
        };
        state.transactions.push(transaction.clone());

        Ok(MutationResponse {
            transaction,
            new_balance,
            previous_balance: Some(previous),
        })
    }

    async fn reverse(
        &self,
        transaction_id: &str,
        token: Option<&SecretString>,
    ) -> Result<ReversalResponse, ApiError> {
        self.record_request()?;
        Self::check_auth(token)?;
        let mut state = self.state.lock().unwrap();

        let Some(index) = state
            .transactions
            .iter()
            .position(|tx| tx.id == transaction_id)
        else {
            return Err(ApiError::Status {
                status_code: 404,
                message: "Transação não encontrada".to_string(),
            });
        };

        if !state.transactions[index].is_reversible() {
            return Err(ApiError::Status {
                status_code: 422,
                message: "Transação não pode ser revertida".to_string(),
            });
        }

        state.transactions[index].status = TransactionStatus::Reversed;
        let reversed = state.transactions[index].clone();

        // Undo the balance effect of the reversed entry
        let balance = state.user.wallet.balance.centavos();
        let new_balance = match (reversed.transaction_type, reversed.direction) {
            (TransactionType::Deposit, _)
            | (TransactionType::Transfer, Some(TransactionDirection::Received)) => {
                Amount::from_centavos(balance.saturating_sub(reversed.amount.centavos()))
            }
            _ => Amount::from_centavos(balance + reversed.amount.centavos()),
        };
        state.user.wallet.balance = new_balance;

        let reversal = Transaction {
            id: Uuid::new_v4().to_string(),
            transaction_type: TransactionType::Reversal,
            amount: reversed.amount,
            status: TransactionStatus::Completed,
            description: format!("Estorno de {}", reversed.id),
            created_at: Utc::now(),
            processed_at: Some(Utc::now()),
            direction: None,
            other_party: None,
        };
        state.transactions.push(reversal.clone());

        Ok(ReversalResponse {
            message: "Transação revertida com sucesso".to_string(),
            reversal_transaction: reversal,
            new_balance,
        })
    }
}
