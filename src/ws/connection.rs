//! WebSocket connection state machine.
//!
//! Handles the receive/decode/dispatch loop for a single WebSocket
//! connection. The loop owns the socket; it is dropped exactly once when the
//! loop returns, whichever path ends it.
//!
//! Read failures end the connection. Write failures are logged and the loop
//! keeps reading.

use axum::extract::ws::{CloseFrame, Message, close_code};
use futures_util::{Sink, SinkExt, Stream, StreamExt};

use super::messages::{Envelope, FrameKind, MessageKind};

/// Why a connection's read side stopped.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Peer sent a close frame with code 1000.
    #[error("websocket: close 1000 (normal)")]
    NormalClosure,

    /// Peer sent a close frame with any other code, or none.
    #[error("websocket: close {code} {reason}")]
    Closed {
        /// Close code; 1005 when the frame carried none.
        code: u16,
        /// Close reason sent by the peer.
        reason: String,
    },

    /// Stream ended without a close frame.
    #[error("websocket: connection ended without a close frame")]
    StreamEnded,

    /// Transport-level read failure.
    #[error("websocket: {0}")]
    Transport(#[from] axum::Error),
}

impl ConnectionError {
    /// Returns `true` for an intentional, normal close by the peer.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::NormalClosure)
    }

    fn from_close(frame: Option<CloseFrame>) -> Self {
        match frame {
            Some(f) if f.code == close_code::NORMAL => Self::NormalClosure,
            Some(f) => Self::Closed {
                code: f.code,
                reason: f.reason.as_str().to_string(),
            },
            None => Self::Closed {
                code: close_code::STATUS,
                reason: String::new(),
            },
        }
    }

    /// The peer started the close handshake, so a reply may still be
    /// flushed.
    fn peer_sent_close(&self) -> bool {
        matches!(self, Self::NormalClosure | Self::Closed { .. })
    }
}

/// Runs the read/dispatch loop for a single WebSocket connection.
///
/// - Reads one data frame at a time.
/// - Decodes it as an [`Envelope`] and dispatches on its type.
/// - Sends the reply, if any, logging and ignoring send failures.
///
/// Returns when the peer closes the connection or a read fails.
pub async fn run_connection<S>(mut socket: S)
where
    S: Stream<Item = Result<Message, axum::Error>> + Sink<Message, Error = axum::Error> + Unpin,
{
    tracing::debug!("ws connection opened");

    let reason = loop {
        let frame = match next_frame(&mut socket).await {
            Ok(frame) => frame,
            Err(reason) => break reason,
        };

        if let Some(reply) = handle_frame(&frame)
            && let Err(e) = socket.send(reply).await
        {
            tracing::error!(error = %e, "error sending echo message");
        }
    };

    if reason.is_normal() {
        tracing::info!("client disconnected");
    } else {
        tracing::error!(error = %reason, "error reading message");
    }

    if reason.peer_sent_close()
        && let Err(e) = socket.close().await
    {
        tracing::debug!(error = %e, "close handshake not completed");
    }

    tracing::debug!("ws connection closed");
}

/// Waits for the next text or binary frame. Ping and pong are answered by the
/// transport and skipped here.
async fn next_frame<S>(socket: &mut S) -> Result<Message, ConnectionError>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        match socket.next().await {
            Some(Ok(frame @ (Message::Text(_) | Message::Binary(_)))) => return Ok(frame),
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            Some(Ok(Message::Close(frame))) => return Err(ConnectionError::from_close(frame)),
            Some(Err(e)) => return Err(ConnectionError::Transport(e)),
            None => return Err(ConnectionError::StreamEnded),
        }
    }
}

/// Decodes one data frame and dispatches it, returning the reply to send.
///
/// Decode failures and unknown types are logged and produce no reply. An
/// echo reply is the inbound frame itself, so its bytes and frame kind are
/// preserved.
#[must_use]
pub fn handle_frame(frame: &Message) -> Option<Message> {
    let envelope = match Envelope::from_frame(frame) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "error decoding message");
            return None;
        }
    };

    match envelope.kind() {
        Some(MessageKind::Echo) => {
            tracing::info!(
                payload = %envelope.data(),
                frame = %FrameKind::of(frame),
                "received echo message"
            );
            Some(frame.clone())
        }
        None => {
            tracing::info!("unknown message type: {}", envelope.msg_type());
            None
        }
    }
}
