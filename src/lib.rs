//! Client library for a digital wallet HTTP API.
//!
//! The crate is split into three layers:
//! - [`domain`]: core types, CPF and monetary validation, error definitions
//! - [`app`]: the wallet service orchestrating remote calls and the session
//! - [`infra`]: adapters for the remote API and persistent session storage

pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
