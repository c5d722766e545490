//! Infrastructure layer implementations.

pub mod api;
pub mod session;

pub use api::{ApiConfig, HttpWalletApi};
pub use session::{FileSessionStore, MemorySessionStore, NullSessionStore};
