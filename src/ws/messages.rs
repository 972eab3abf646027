//! WebSocket message types: the envelope and its dispatch tag.

use std::fmt;

use axum::extract::ws::Message;
use serde::{Deserialize, Deserializer};

/// Application-level message carried in one text or binary frame.
///
/// ```json
/// { "type": "echo", "data": "hello" }
/// ```
///
/// Unknown fields are ignored. A missing or `null` field decodes to the
/// empty string. Keys also match in their `Type`/`TYPE` and `Data`/`DATA`
/// spellings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    #[serde(
        rename = "type",
        alias = "Type",
        alias = "TYPE",
        default,
        deserialize_with = "null_as_empty"
    )]
    msg_type: String,
    #[serde(
        alias = "Data",
        alias = "DATA",
        default,
        deserialize_with = "null_as_empty"
    )]
    data: String,
}

impl Envelope {
    /// Decodes the payload of a data frame.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the frame is a control frame or its payload
    /// is not a JSON envelope.
    pub fn from_frame(frame: &Message) -> Result<Self, DecodeError> {
        let kind = FrameKind::of(frame);
        let bytes: &[u8] = match frame {
            Message::Text(text) => text.as_str().as_bytes(),
            Message::Binary(bytes) => bytes.as_ref(),
            _ => return Err(DecodeError::ControlFrame),
        };
        serde_json::from_slice(bytes).map_err(|source| DecodeError::Json { kind, source })
    }

    /// The raw type tag.
    #[must_use]
    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    /// The opaque payload.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The recognized kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_tag(&self.msg_type)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope types the relay knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Send the inbound frame back unchanged.
    Echo,
}

impl MessageKind {
    /// Looks up a type tag. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }
}

/// WebSocket frame kind, used in log fields and decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 text frame.
    Text,
    /// Binary frame.
    Binary,
    /// Ping, pong or close.
    Control,
}

impl FrameKind {
    /// Classifies a frame.
    #[must_use]
    pub fn of(frame: &Message) -> Self {
        match frame {
            Message::Text(_) => Self::Text,
            Message::Binary(_) => Self::Binary,
            _ => Self::Control,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Binary => f.write_str("binary"),
            Self::Control => f.write_str("control"),
        }
    }
}

/// A frame that could not be decoded into an [`Envelope`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Control frames carry no envelope.
    #[error("control frame carries no envelope")]
    ControlFrame,

    /// Payload is not a JSON envelope.
    #[error("malformed {kind} frame: {source}")]
    Json {
        /// Kind of the offending frame.
        kind: FrameKind,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
