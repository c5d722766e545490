//! Domain layer containing core business types, traits, and error definitions.

pub mod cpf;
pub mod error;
pub mod money;
pub mod traits;
pub mod types;

pub use cpf::Cpf;
pub use error::{ApiError, AppError, SessionError, ValidationError};
pub use money::Amount;
pub use traits::{SessionStore, WalletApi};
pub use types::{
    ActionResult, BalanceResponse, DepositRequest, LoginRequest, LoginResponse, MutationResponse,
    OtherParty, RegisterRequest, ReversalResponse, Transaction, TransactionDirection,
    TransactionStatus, TransactionType, TransferRequest, User, UserWallet,
    first_validation_message,
};
