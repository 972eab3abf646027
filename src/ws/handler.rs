//! Axum WebSocket upgrade handler.

use std::net::SocketAddr;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;
use uuid::Uuid;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::error::RelayError;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// Every failed handshake (malformed upgrade headers, rejected origin, or an
/// I/O failure while switching protocols) produces exactly one warn line and
/// no channel.
pub async fn ws_handler(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            let err = RelayError::UpgradeRejected {
                status: rejection.status(),
                message: rejection.body_text(),
            };
            tracing::warn!(%peer, error = %err, "failed to upgrade to websocket");
            return err.into_response();
        }
    };

    if let Err(err) = state.origin_policy.check(&headers) {
        tracing::warn!(%peer, error = %err, "failed to upgrade to websocket");
        return err.into_response();
    }

    let connection_id = Uuid::new_v4();
    let span = tracing::info_span!("ws_connection", %connection_id, %peer);

    ws.on_failed_upgrade(move |e| {
        tracing::warn!(%connection_id, %peer, error = %e, "failed to upgrade to websocket");
    })
    .on_upgrade(move |socket| run_connection(socket).instrument(span))
}
