//! # webtty-gateway
//!
//! WebSocket message relay with a static asset host.
//!
//! A client upgrades at `/ws`, then sends JSON envelopes
//! `{"type": "...", "data": "..."}`. Each connection runs its own loop:
//! receive a frame, decode the envelope, dispatch on `type`. The only
//! recognized type is `echo`, which sends the inbound frame back unchanged.
//!
//! ## Architecture
//!
//! ```text
//! Clients (browser, WebSocket)
//!     │
//!     ├── Static assets (api/, tower-http ServeDir)
//!     ├── Upgrade + origin policy (ws/handler, ws/origin)
//!     │
//!     └── Message loop, one task per connection (ws/connection)
//!             └── Envelope decode + dispatch (ws/messages)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod server;
pub mod ws;
