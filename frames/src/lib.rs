//! Move-frame model and JSON codec for the realtime WS transport.
//!
//! This crate owns the wire representation shared by the relay (`alignment`)
//! and the sync engine (`client`). One text frame carries one member move:
//!
//! ```json
//! { "id": "<member-id>", "position": { "x": 5, "y": 5 } }
//! ```
//!
//! Older senders nested the member id under a `user` object and stamped the
//! frame with their session tag. [`decode`] normalizes those shapes and ignores
//! unknown fields; [`encode`] only ever writes the flat shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned by [`encode`] and [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not valid JSON.
    #[error("invalid json: {0}")]
    Json(serde_json::Error),
    /// The JSON value is not an object.
    #[error("frame is not a json object")]
    NotAnObject,
    /// A required field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A field is present but has the wrong JSON type.
    #[error("field `{0}` has the wrong type")]
    InvalidField(&'static str),
    /// The `position` object is not `{x: number, y: number}`.
    #[error("invalid position: {0}")]
    InvalidPosition(serde_json::Error),
    /// NaN and infinities have no JSON representation.
    #[error("position is not finite")]
    NonFinitePosition,
    /// Serialization failed.
    #[error("failed to encode frame: {0}")]
    Encode(serde_json::Error),
}

/// A canonical 2-D position, in the same coordinate space the renderer uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates can be written to JSON.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One member move on the wire. Symmetric: clients send and receive the same shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveFrame {
    /// Externally assigned member id.
    pub id: String,
    /// New absolute position of the member.
    pub position: Position,
}

impl MoveFrame {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self { id: id.into(), position }
    }
}

/// Encode a move frame as one JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::NonFinitePosition`] when either coordinate is NaN or
/// infinite; serde would otherwise write `null` and peers could not decode it.
pub fn encode(frame: &MoveFrame) -> Result<String, CodecError> {
    if !frame.position.is_finite() {
        return Err(CodecError::NonFinitePosition);
    }
    serde_json::to_string(frame).map_err(CodecError::Encode)
}

/// Decode one JSON text frame into a canonical move frame.
///
/// Accepts the flat `{id, position}` shape and the legacy
/// `{user: {id, ..}, position}` shape. A flat `id` wins over `user.id` when a
/// sender writes both. Extra fields such as `sid` or `room` are ignored.
///
/// # Errors
///
/// Returns a [`CodecError`] describing the first problem found; callers treat
/// every variant the same way (drop the frame).
pub fn decode(text: &str) -> Result<MoveFrame, CodecError> {
    let value: Value = serde_json::from_str(text).map_err(CodecError::Json)?;
    let Value::Object(map) = value else {
        return Err(CodecError::NotAnObject);
    };

    let id = member_id(&map)?;
    let position = map
        .get("position")
        .ok_or(CodecError::MissingField("position"))?;
    let position = Position::deserialize(position).map_err(CodecError::InvalidPosition)?;

    Ok(MoveFrame { id, position })
}

fn member_id(map: &Map<String, Value>) -> Result<String, CodecError> {
    if let Some(id) = map.get("id") {
        return id
            .as_str()
            .map(str::to_owned)
            .ok_or(CodecError::InvalidField("id"));
    }

    match map.get("user") {
        Some(Value::Object(user)) => match user.get("id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(_) => Err(CodecError::InvalidField("user.id")),
            None => Err(CodecError::MissingField("id")),
        },
        Some(_) => Err(CodecError::InvalidField("user")),
        None => Err(CodecError::MissingField("id")),
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
