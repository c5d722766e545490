//! Application layer containing the wallet service and settlement polling.

pub mod poller;
pub mod service;

pub use poller::SettlementConfig;
pub use service::WalletService;
