//! Origin policy applied before the WebSocket upgrade.

use axum::http::HeaderMap;
use axum::http::header::{HOST, ORIGIN};

use crate::error::RelayError;

/// Decides which `Origin` headers may open a channel.
///
/// Requests without an `Origin` header (non-browser clients) pass every
/// policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Accept every origin.
    AllowAny,
    /// Accept only the listed origins (case-insensitive, trailing `/`
    /// ignored).
    AllowList(Vec<String>),
    /// Accept when the origin's host matches the `Host` header.
    SameOrigin,
}

impl OriginPolicy {
    /// Builds the policy from the two configuration knobs.
    #[must_use]
    pub fn from_config(allow_any_origin: bool, allowed_origins: &[String]) -> Self {
        if allow_any_origin {
            Self::AllowAny
        } else if allowed_origins.is_empty() {
            Self::SameOrigin
        } else {
            Self::AllowList(
                allowed_origins
                    .iter()
                    .map(|o| normalize(o).to_ascii_lowercase())
                    .collect(),
            )
        }
    }

    /// Checks the request headers against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::OriginRejected`] when the origin is not allowed.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), RelayError> {
        if matches!(self, Self::AllowAny) {
            return Ok(());
        }
        let Some(raw) = headers.get(ORIGIN) else {
            return Ok(());
        };
        let origin = raw
            .to_str()
            .map_err(|_| RelayError::OriginRejected("<non-ascii origin>".to_string()))?;

        let allowed = match self {
            Self::AllowAny => true,
            Self::AllowList(list) => {
                let origin = normalize(origin);
                list.iter().any(|o| o.eq_ignore_ascii_case(origin))
            }
            Self::SameOrigin => {
                let host = headers.get(HOST).and_then(|h| h.to_str().ok());
                match (origin_host(origin), host) {
                    (Some(origin_host), Some(host)) => origin_host.eq_ignore_ascii_case(host),
                    _ => false,
                }
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(RelayError::OriginRejected(origin.to_string()))
        }
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

/// Extracts `host[:port]` from `scheme://host[:port][/...]`.
fn origin_host(origin: &str) -> Option<&str> {
    let (_, rest) = origin.split_once("://")?;
    let host = rest.split('/').next()?;
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(origin: Option<&str>, host: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(o) = origin {
            map.insert(ORIGIN, o.parse().unwrap());
        }
        if let Some(h) = host {
            map.insert(HOST, h.parse().unwrap());
        }
        map
    }

    #[test]
    fn allow_any_accepts_foreign_origin() {
        let policy = OriginPolicy::from_config(true, &[]);
        assert_eq!(policy, OriginPolicy::AllowAny);
        assert!(
            policy
                .check(&headers(Some("https://evil.example"), Some("relay.local")))
                .is_ok()
        );
    }

    #[test]
    fn same_origin_compares_host() {
        let policy = OriginPolicy::from_config(false, &[]);
        assert_eq!(policy, OriginPolicy::SameOrigin);
        assert!(
            policy
                .check(&headers(Some("http://Relay.local:8080"), Some("relay.local:8080")))
                .is_ok()
        );
        assert!(
            policy
                .check(&headers(Some("http://other.local:8080"), Some("relay.local:8080")))
                .is_err()
        );
        assert!(policy.check(&headers(Some("garbage"), Some("relay.local"))).is_err());
    }

    #[test]
    fn missing_origin_passes_every_policy() {
        let list = OriginPolicy::from_config(false, &["https://a.example".to_string()]);
        assert!(list.check(&headers(None, Some("relay.local"))).is_ok());
        assert!(
            OriginPolicy::SameOrigin
                .check(&headers(None, None))
                .is_ok()
        );
    }

    #[test]
    fn allow_list_ignores_case_and_trailing_slash() {
        let policy = OriginPolicy::from_config(false, &["https://App.example/".to_string()]);
        assert!(policy.check(&headers(Some("https://app.example"), None)).is_ok());
        let err = policy
            .check(&headers(Some("https://evil.example"), None))
            .unwrap_err();
        assert!(matches!(err, RelayError::OriginRejected(o) if o == "https://evil.example"));
    }

    #[test]
    fn origin_host_parsing() {
        assert_eq!(origin_host("http://a.example:80/path"), Some("a.example:80"));
        assert_eq!(origin_host("null"), None);
        assert_eq!(origin_host("http://"), None);
    }
}
