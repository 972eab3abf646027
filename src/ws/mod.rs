//! WebSocket layer: upgrade, origin policy, envelope, and the per-connection
//! message loop.
//!
//! The upgrade endpoint (`/ws` by default) accepts a handshake and hands the
//! socket to [`connection::run_connection`], one task per connection.
//! Connections share no state.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod origin;
