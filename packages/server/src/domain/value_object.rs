//! Value objects for the broadcasting core.
//!
//! Identifiers supplied by callers are only checked for non-emptiness; any
//! other format rules belong to the collaborators that mint them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Reject empty or whitespace-only identifiers.
fn non_empty(field: &'static str, value: String) -> Result<String, ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    Ok(value)
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
                non_empty($field, value.into()).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a game scene that rooms and events are attached to.
    SceneId,
    "scene_id"
);

string_id!(
    /// Identifier of a user, as issued by the authentication layer.
    UserId,
    "user_id"
);

string_id!(
    /// Identifier of a chat room.
    ///
    /// Generated ids embed the scene id so that a room can be traced back to
    /// its scene by eye: `game_{scene_id}_{uuid}`.
    RoomId,
    "room_id"
);

string_id!(
    /// Tag describing what kind of game event happened (e.g. `entity.updated`).
    EventType,
    "event_type"
);

impl RoomId {
    /// Generate a fresh room id for the given scene.
    pub fn generate(scene_id: &SceneId) -> Self {
        Self(format!("game_{}_{}", scene_id.as_str(), Uuid::new_v4().simple()))
    }
}

impl EventType {
    /// Wrap one of the `event_types` constants.
    pub(crate) fn well_known(tag: &'static str) -> Self {
        debug_assert!(!tag.trim().is_empty());
        Self(tag.to_string())
    }
}

/// Identifier of a chat message.
///
/// Travels as the 32-digit simple form, the same text `Display` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl TryFrom<String> for MessageId {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Uuid::parse_str(&value).map(Self)
    }
}

impl From<MessageId> for String {
    fn from(value: MessageId) -> Self {
        value.0.simple().to_string()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Identifier handed out by the connection registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
