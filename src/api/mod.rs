//! HTTP surface: router composition for the upgrade route, static assets,
//! and system endpoints.

pub mod system;

use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::ws::handler::ws_handler;

/// Builds the complete router from an explicit configuration.
///
/// - `{ws_path}` upgrades to the message loop.
/// - `{static_prefix}/*` serves files from `static_dir`.
/// - `/` redirects to `{static_prefix}/index.html`.
/// - `/health` and the OpenAPI document, see [`system::routes`].
pub fn build_router(config: &RelayConfig) -> Router {
    let index = format!("{}/index.html", config.static_prefix);

    Router::new()
        .route(&config.ws_path, get(ws_handler))
        .route(
            "/",
            get(move || {
                let index = index.clone();
                async move { Redirect::temporary(&index) }
            }),
        )
        .nest_service(&config.static_prefix, ServeDir::new(&config.static_dir))
        .merge(system::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(AppState::from_config(config))
}
