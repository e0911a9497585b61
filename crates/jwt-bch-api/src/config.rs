//! Client configuration and loading
//!
//! A config is either built in code (`ClientConfig::new`), loaded from a
//! TOML file with an environment overlay (`ClientConfig::load`), taken from
//! the environment alone (`ClientConfig::from_env`), or the public demo
//! account when nothing is supplied at all.
//!
//! The password is never stored in the TOML. It comes from the
//! JWT_BCH_PASSWORD env var or from a `password_file`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use zeroize::Zeroize;

use crate::constants::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS, DEMO_LOGIN, DEMO_PASSWORD};
use crate::error::{Error, Result};
use crate::secret::Secret;

/// Overrides the login from the config file
pub const LOGIN_ENV: &str = "JWT_BCH_LOGIN";

/// Account password; takes precedence over `password_file`
pub const PASSWORD_ENV: &str = "JWT_BCH_PASSWORD";

/// Overrides the auth server base URL
pub const SERVER_URL_ENV: &str = "JWT_BCH_SERVER_URL";

/// Connection settings for one session client.
///
/// Immutable once handed to `JwtBchClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    server_url: String,
    login: String,
    password: Secret<String>,
    timeout: Duration,
}

/// On-disk TOML shape
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    server_url: Option<String>,
    #[serde(default)]
    login: Option<String>,
    /// Path to a file containing the password (alternative to JWT_BCH_PASSWORD)
    #[serde(default)]
    password_file: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Config for the given account against the default server.
    ///
    /// Fails if either credential is empty.
    pub fn new(login: impl Into<String>, password: impl Into<Secret<String>>) -> Result<Self> {
        let config = Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            login: login.into(),
            password: password.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        config.check_credentials()?;
        Ok(config)
    }

    /// The public demo account on the default server.
    pub fn demo() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            login: DEMO_LOGIN.to_owned(),
            password: Secret::from(DEMO_PASSWORD),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the client at another auth server. A trailing `/` is dropped.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        self.server_url = server_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &Secret<String> {
        &self.password
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check every invariant the client relies on.
    pub fn validate(&self) -> Result<()> {
        self.check_credentials()?;

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "server_url must start with http:// or https://, got: {}",
                self.server_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than 0".into()));
        }

        Ok(())
    }

    fn check_credentials(&self) -> Result<()> {
        if self.login.is_empty() {
            return Err(Error::Config("missing login".into()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("missing password".into()));
        }
        Ok(())
    }

    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Password resolution order:
    /// 1. JWT_BCH_PASSWORD env var
    /// 2. password_file path from config
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&contents)?;

        let login = env_var(LOGIN_ENV).or(file.login).unwrap_or_default();

        let password = match env_var(PASSWORD_ENV) {
            Some(password) => password,
            None => match file.password_file {
                Some(ref password_file) => read_password_file(password_file)?,
                None => String::new(),
            },
        };

        let server_url = env_var(SERVER_URL_ENV)
            .or(file.server_url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned());

        let config = Self::new(login, password)?
            .with_server_url(server_url)
            .with_timeout(Duration::from_secs(file.timeout_secs));
        config.validate()?;
        Ok(config)
    }

    /// Build a config from the environment alone.
    ///
    /// With neither JWT_BCH_LOGIN nor JWT_BCH_PASSWORD set this is the demo
    /// account. Setting only one of them is an error.
    pub fn from_env() -> Result<Self> {
        let config = match (env_var(LOGIN_ENV), env_var(PASSWORD_ENV)) {
            (None, None) => Self::demo(),
            (login, password) => {
                Self::new(login.unwrap_or_default(), password.unwrap_or_default())?
            }
        };

        let config = match env_var(SERVER_URL_ENV) {
            Some(server_url) => config.with_server_url(server_url),
            None => config,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::demo()
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn read_password_file(path: &Path) -> Result<String> {
    let mut raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "failed to read password_file {}: {e}",
            path.display()
        ))
    })?;
    let password = raw.trim().to_owned();
    raw.zeroize();
    Ok(password)
}
