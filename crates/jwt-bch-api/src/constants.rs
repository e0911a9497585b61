//! jwt-bch auth server constants
//!
//! The demo credentials are public; they exist so the library can be tried
//! without an account. Real credentials come from `ClientConfig`.

/// Public jwt-bch auth server
pub const DEFAULT_SERVER_URL: &str = "https://auth.fullstack.cash";

/// Per-request timeout applied to every call
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Demo account login, used only when no configuration is supplied
pub const DEMO_LOGIN: &str = "demo@demo.com";

/// Demo account password
pub const DEMO_PASSWORD: &str = "demo";

/// Login endpoint (returns the access token and user record)
pub const AUTH_PATH: &str = "/auth";

/// Issues a new API token for a given API level
pub const API_TOKEN_NEW_PATH: &str = "/apitoken/new";

/// Reports whether an API token is still valid
pub const API_TOKEN_IS_VALID_PATH: &str = "/apitoken/isvalid";

/// Checks the account's BCH address for payments; the user id is appended
pub const UPDATE_CREDIT_PATH: &str = "/apitoken/update-credit";

/// Error message for api levels that are not numbers.
/// Negative numbers are accepted despite the wording.
pub const API_LEVEL_ERROR: &str = "apiLevel must be a positive integer";
