//! Remote wallet API adapter.

pub mod client;

pub use client::{ApiConfig, HttpWalletApi};
