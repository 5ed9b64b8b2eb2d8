//! JSON codec for the dashboard protocol.
//!
//! Each WebSocket text frame carries exactly one JSON object.  Decoding a
//! request is done in two passes so that failures can be classified:
//!
//! ```text
//! text ──parse──> JSON object ──read "id"/"type"──> known kind? ──> Request
//!        │                          │                   │
//!        └ InvalidJson              └ MissingType       ├ UnsupportedKind
//!                                                       └ MalformedPayload
//! ```
//!
//! When the frame still carried a numeric `id`, [`ProtocolError::request_id`]
//! returns it so the receiver can answer with an error response instead of
//! leaving the caller waiting forever.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::{Request, RequestId, RequestKind, ServerMessage};

/// Errors that can occur while encoding or decoding protocol messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON, or not a JSON object.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The object has no string `"type"` field.
    #[error("message has no 'type' field")]
    MissingType { id: Option<RequestId> },

    /// The `"type"` names a request kind this side does not implement.
    #[error("unsupported request type '{kind}'")]
    UnsupportedKind { kind: String, id: Option<RequestId> },

    /// The `"type"` is known but the rest of the object does not fit it.
    #[error("malformed '{kind}' request: {reason}")]
    MalformedPayload {
        kind: RequestKind,
        id: Option<RequestId>,
        reason: String,
    },

    /// A server message did not match any known shape.
    #[error("unrecognised server message: {0}")]
    UnknownServerMessage(#[source] serde_json::Error),

    /// A message could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    /// The correlation id recovered from the offending frame, if any.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            ProtocolError::MissingType { id }
            | ProtocolError::UnsupportedKind { id, .. }
            | ProtocolError::MalformedPayload { id, .. } => *id,
            ProtocolError::InvalidJson(_)
            | ProtocolError::UnknownServerMessage(_)
            | ProtocolError::Encode(_) => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one client request from a text frame.
///
/// # Errors
///
/// Returns [`ProtocolError`] describing why the frame is not a valid request.
///
/// # Examples
///
/// ```rust
/// use econet_proto::{decode_request, Request};
///
/// let req = decode_request(r#"{"type":"reboot","id":3}"#).unwrap();
/// assert_eq!(req, Request::Reboot { id: 3 });
/// ```
pub fn decode_request(text: &str) -> Result<Request, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;
    if !value.is_object() {
        return Err(ProtocolError::InvalidJson(serde::de::Error::custom(
            "expected a JSON object",
        )));
    }

    let id = value.get("id").and_then(Value::as_u64);
    let type_name = match value.get("type").and_then(Value::as_str) {
        Some(t) => t,
        None => return Err(ProtocolError::MissingType { id }),
    };

    let kind = match RequestKind::from_wire(type_name) {
        Some(k) => k,
        None => {
            return Err(ProtocolError::UnsupportedKind {
                kind: type_name.to_string(),
                id,
            })
        }
    };

    serde_json::from_value(value).map_err(|e| ProtocolError::MalformedPayload {
        kind,
        id,
        reason: e.to_string(),
    })
}

/// Decodes one device message from a text frame.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidJson`] if the frame is not JSON, or
/// [`ProtocolError::UnknownServerMessage`] if it does not match any variant.
pub fn decode_server_message(text: &str) -> Result<ServerMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;
    serde_json::from_value(value).map_err(ProtocolError::UnknownServerMessage)
}

/// Encodes any protocol message as a compact JSON string.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode_message<T: Serialize>(msg: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(msg).map_err(ProtocolError::Encode)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
