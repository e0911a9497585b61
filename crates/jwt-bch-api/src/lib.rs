//! Client library for the jwt-bch auth server
//!
//! Logs in to a jwt-bch auth service (public instance at
//! `auth.fullstack.cash`), keeps the resulting session in memory, and
//! requests, validates, and pays for scoped API tokens on behalf of the
//! logged-in account.
//!
//! Session flow:
//! 1. Build a `ClientConfig` (builder, `ClientConfig::load()`, or the demo account)
//! 2. `JwtBchClient::register()` logs in and populates `UserData`
//! 3. `JwtBchClient::get_api_token()` trades the access token for an API token
//! 4. `JwtBchClient::validate_api_token()` asks the server whether it is still good
//! 5. `JwtBchClient::update_credit()` credits payments sent to `bch_addr()`

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod secret;
pub mod session;

pub use client::{ApiTokenResponse, JwtBchClient, TokenValidity};
pub use config::ClientConfig;
pub use constants::*;
pub use error::{Error, RequestError, Result};
pub use secret::Secret;
pub use session::{ApiLevel, IntoApiLevel, UserData};
