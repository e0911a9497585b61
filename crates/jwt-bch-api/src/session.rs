//! In-memory session state
//!
//! `UserData` is owned by exactly one `JwtBchClient` and lives as long as it
//! does. Nothing here is persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::API_LEVEL_ERROR;
use crate::error::{Error, Result};
use crate::secret::Secret;

/// Access tier granted by the auth server.
///
/// Higher levels carry higher rate limits on the downstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiLevel(i64);

impl ApiLevel {
    pub const fn new(level: i64) -> Self {
        Self(level)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ApiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for ApiLevel {
    fn from(level: i64) -> Self {
        Self(level)
    }
}

/// Parses any integer, negative ones included. Fractional and empty input
/// is rejected along with non-numeric input.
impl FromStr for ApiLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::Validation(API_LEVEL_ERROR.into()))
    }
}

/// Anything `JwtBchClient::get_api_token` accepts as an api level.
pub trait IntoApiLevel {
    fn into_api_level(self) -> Result<ApiLevel>;
}

impl IntoApiLevel for ApiLevel {
    fn into_api_level(self) -> Result<ApiLevel> {
        Ok(self)
    }
}

macro_rules! impl_into_api_level_for_int {
    ($($ty:ty),*) => {
        $(
            impl IntoApiLevel for $ty {
                fn into_api_level(self) -> Result<ApiLevel> {
                    i64::try_from(self)
                        .map(ApiLevel)
                        .map_err(|_| Error::Validation(API_LEVEL_ERROR.into()))
                }
            }
        )*
    };
}

impl_into_api_level_for_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl IntoApiLevel for &str {
    fn into_api_level(self) -> Result<ApiLevel> {
        self.parse()
    }
}

impl IntoApiLevel for String {
    fn into_api_level(self) -> Result<ApiLevel> {
        self.parse()
    }
}

/// The logged-in user's attributes and current tokens.
///
/// Everything except `has_registered` stays `None` until
/// `JwtBchClient::register` succeeds.
#[derive(Debug, Clone, Default)]
pub struct UserData {
    pub has_registered: bool,
    pub api_level: Option<i64>,
    /// Requests per interval allowed at `api_level`
    pub rate_limit: Option<i64>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    /// BCH address that payments for credit are sent to
    pub bch_addr: Option<String>,
    /// JWT for calls to the auth server itself
    pub access_token: Option<Secret<String>>,
    /// JWT for calls to the downstream API
    pub api_token: Option<Secret<String>>,
}

impl UserData {
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(Secret::as_str)
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_ref().map(Secret::as_str)
    }
}
