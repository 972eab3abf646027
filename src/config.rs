//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The resulting [`RelayConfig`] is passed
//! explicitly to [`crate::api::build_router`]; nothing is read from ambient
//! global state after startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::RelayError;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Route that accepts the WebSocket upgrade.
    pub ws_path: String,

    /// Local directory served as static assets.
    pub static_dir: PathBuf,

    /// URL prefix the static assets are mounted under.
    pub static_prefix: String,

    /// Accept upgrades from any origin.
    pub allow_any_origin: bool,

    /// Origins accepted when `allow_any_origin` is off. Empty means
    /// same-origin only.
    pub allowed_origins: Vec<String>,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            ws_path: "/ws".to_string(),
            static_dir: PathBuf::from("./web/static"),
            static_prefix: "/static".to_string(),
            allow_any_origin: true,
            allowed_origins: Vec::new(),
            log_format: LogFormat::Text,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to [`RelayConfig::default`] for every variable that is not
    /// set. Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if `LISTEN_ADDR` cannot be parsed
    /// as a [`SocketAddr`] or the resulting routes fail [`RelayConfig::validate`].
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| RelayError::InvalidConfig(format!("LISTEN_ADDR {raw:?}: {e}")))?,
            Err(_) => defaults.listen_addr,
        };

        let config = Self {
            listen_addr,
            ws_path: std::env::var("WS_PATH").unwrap_or(defaults.ws_path),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            static_prefix: std::env::var("STATIC_PREFIX").unwrap_or(defaults.static_prefix),
            allow_any_origin: parse_env_bool("ALLOW_ANY_ORIGIN", defaults.allow_any_origin),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            log_format: std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|v| parse_log_format(&v))
                .unwrap_or(defaults.log_format),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks that the upgrade route and the static prefix can share one
    /// router without shadowing each other.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] when a path does not start with
    /// `/`, the static prefix is `/` or ends with `/`, or the upgrade route
    /// falls under the static prefix.
    pub fn validate(&self) -> Result<(), RelayError> {
        if !self.ws_path.starts_with('/') {
            return Err(RelayError::InvalidConfig(format!(
                "WS_PATH must start with '/': {:?}",
                self.ws_path
            )));
        }
        if !self.static_prefix.starts_with('/')
            || self.static_prefix == "/"
            || self.static_prefix.ends_with('/')
        {
            return Err(RelayError::InvalidConfig(format!(
                "STATIC_PREFIX must be a non-root path without a trailing '/': {:?}",
                self.static_prefix
            )));
        }
        let nested = self
            .ws_path
            .strip_prefix(self.static_prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if nested {
            return Err(RelayError::InvalidConfig(format!(
                "WS_PATH {:?} is shadowed by STATIC_PREFIX {:?}",
                self.ws_path, self.static_prefix
            )));
        }
        Ok(())
    }
}

/// Parses an environment variable as a boolean. Returns `default` when the
/// variable is unset or not recognized by [`parse_bool`].
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// Accepts `true`/`1` and `false`/`0`, ignoring ASCII case and surrounding
/// whitespace.
fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// `text` or `json`, ignoring ASCII case.
fn parse_log_format(raw: &str) -> Option<LogFormat> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("json") {
        Some(LogFormat::Json)
    } else if raw.eq_ignore_ascii_case("text") {
        Some(LogFormat::Text)
    } else {
        None
    }
}

/// Splits a comma-separated list, dropping empty entries.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
