//! Session client for the jwt-bch auth server
//!
//! Every networked operation is a single request/response exchange:
//! 1. `register` POSTs the credentials to `/auth` and fills `UserData`
//! 2. `get_api_token` POSTs to `/apitoken/new` for a token at an api level
//! 3. `validate_api_token` POSTs the held API token to `/apitoken/isvalid`
//! 4. `update_credit` GETs `/apitoken/update-credit/{user_id}`
//!
//! Calls after `register` carry the access token as a Bearer header. There
//! are no internal retries; a failed call logs which operation failed and
//! hands the original error back to the caller.

use reqwest::RequestBuilder;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::constants::{API_TOKEN_IS_VALID_PATH, API_TOKEN_NEW_PATH, AUTH_PATH, UPDATE_CREDIT_PATH};
use crate::error::{Error, RequestError, Result};
use crate::secret::Secret;
use crate::session::{ApiLevel, IntoApiLevel, UserData};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTokenRequest {
    api_level: ApiLevel,
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

/// Body of a successful `/auth` call.
///
/// `token` is the access token for the auth server; `user.apiToken` is the
/// token for the downstream API.
#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthUser {
    api_level: Option<i64>,
    rate_limit: Option<i64>,
    #[serde(rename = "_id")]
    id: Option<String>,
    email: Option<String>,
    bch_addr: Option<String>,
    api_token: Option<String>,
}

/// Response from `/apitoken/new`.
///
/// Fields the server adds beyond the known ones are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTokenResponse {
    pub api_token: String,
    /// Expiration as a unix timestamp in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token_exp: Option<i64>,
    pub api_level: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response from `/apitoken/isvalid`, passed through as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidity {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_level: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single logged-in session against one auth server.
///
/// Operations that change the session take `&mut self`, so one instance
/// can't be mutated by two calls at once. Use one client per session.
pub struct JwtBchClient {
    http: reqwest::Client,
    config: ClientConfig,
    user_data: UserData,
}

impl JwtBchClient {
    /// Create an unregistered client. Fails if the config is invalid or the
    /// HTTP client can't be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        debug!(server_url = config.server_url(), login = config.login(), "created session client");

        Ok(Self {
            http,
            config,
            user_data: UserData::default(),
        })
    }

    /// Client for the public demo account.
    pub fn demo() -> Result<Self> {
        Self::new(ClientConfig::demo())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn user_data(&self) -> &UserData {
        &self.user_data
    }

    pub fn has_registered(&self) -> bool {
        self.user_data.has_registered
    }

    /// BCH address assigned to the account; `None` before `register`.
    pub fn bch_addr(&self) -> Option<&str> {
        self.user_data.bch_addr.as_deref()
    }

    /// Log in with the configured credentials and populate the session.
    ///
    /// Must succeed before the token and credit operations. On failure the
    /// session is left exactly as it was.
    pub async fn register(&mut self) -> Result<bool> {
        let url = self.url(AUTH_PATH);
        debug!(operation = "register", %url, "sending request");

        let request = self.http.post(&url).json(&LoginRequest {
            email: self.config.login(),
            password: self.config.password().as_str(),
        });

        let AuthResponse { token, user } = send_json(request)
            .await
            .map_err(failed("register", Error::Auth))?;

        self.user_data = UserData {
            has_registered: true,
            api_level: user.api_level,
            rate_limit: user.rate_limit,
            user_id: user.id,
            user_email: user.email,
            bch_addr: user.bch_addr,
            access_token: Some(Secret::new(token)),
            api_token: user.api_token.map(Secret::new),
        };

        info!(
            user_id = self.user_data.user_id.as_deref().unwrap_or_default(),
            api_level = self.user_data.api_level,
            "registered with auth server"
        );
        Ok(true)
    }

    /// Request a new API token at `api_level`.
    ///
    /// Non-numeric levels are rejected before anything is sent. On success
    /// the session's API token and level are replaced and the full response
    /// is returned.
    pub async fn get_api_token(&mut self, api_level: impl IntoApiLevel) -> Result<ApiTokenResponse> {
        let api_level = api_level.into_api_level()?;

        let url = self.url(API_TOKEN_NEW_PATH);
        debug!(operation = "get_api_token", %url, %api_level, "sending request");

        let request = self
            .authorized(self.http.post(&url), "get_api_token")
            .json(&ApiTokenRequest { api_level });

        let response: ApiTokenResponse = send_json(request)
            .await
            .map_err(failed("get_api_token", Error::TokenRequest))?;

        self.user_data.api_level = Some(response.api_level);
        self.user_data.api_token = Some(Secret::new(response.api_token.clone()));
        debug!(api_level = response.api_level, "stored new API token");

        Ok(response)
    }

    /// Ask the auth server whether the held API token is still valid, or if
    /// it has expired or been revoked.
    pub async fn validate_api_token(&self) -> Result<TokenValidity> {
        let url = self.url(API_TOKEN_IS_VALID_PATH);
        debug!(operation = "validate_api_token", %url, "sending request");

        let request = self
            .authorized(self.http.post(&url), "validate_api_token")
            .json(&ValidateRequest {
                token: self.user_data.api_token(),
            });

        send_json(request)
            .await
            .map_err(failed("validate_api_token", Error::ValidationRequest))
    }

    /// Have the server check the account's BCH address for new payments and
    /// return the resulting credit.
    pub async fn update_credit(&self) -> Result<f64> {
        let user_id = self.user_data.user_id.as_deref().unwrap_or_default();
        let url = self.url(&format!("{UPDATE_CREDIT_PATH}/{user_id}"));
        debug!(operation = "update_credit", %url, "sending request");

        let request = self.authorized(self.http.get(&url), "update_credit");

        let credit: f64 = send_json(request)
            .await
            .map_err(failed("update_credit", Error::CreditRequest))?;
        debug!(credit, "credit updated");
        Ok(credit)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.server_url())
    }

    /// Attach the access token. Without one the request goes out bare and
    /// the server rejects it.
    fn authorized(&self, request: RequestBuilder, operation: &'static str) -> RequestBuilder {
        match self.user_data.access_token() {
            Some(token) => request.bearer_auth(token),
            None => {
                warn!(operation, "no access token, call register() first");
                request
            }
        }
    }
}

/// Send a request and decode a JSON body from a 2xx response.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> std::result::Result<T, RequestError> {
    let response = request.header(ACCEPT, "application/json").send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(RequestError::Status { status, body });
    }

    Ok(response.json::<T>().await?)
}

/// Log which operation failed, then wrap the error for the caller.
fn failed(
    operation: &'static str,
    wrap: fn(RequestError) -> Error,
) -> impl FnOnce(RequestError) -> Error {
    move |e| {
        error!(operation, error = %e, "auth server request failed");
        wrap(e)
    }
}
