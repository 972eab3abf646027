//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::ws::origin::OriginPolicy;

/// Shared application state available to all handlers via Axum's
/// `State` extractor. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Origin policy applied before every upgrade.
    pub origin_policy: Arc<OriginPolicy>,
}

impl AppState {
    /// Builds the state from the relay configuration.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            origin_policy: Arc::new(OriginPolicy::from_config(
                config.allow_any_origin,
                &config.allowed_origins,
            )),
        }
    }
}
