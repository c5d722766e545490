//! Test utilities: in-memory fakes for the API and session contracts.

pub mod mocks;

pub use mocks::{MOCK_TOKEN, MockConfig, MockWalletApi};
