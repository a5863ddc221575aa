//! WebSocket message types: outbound user messages and inbound envelopes.
//!
//! Both directions use the same envelope shape: a top-level `type`
//! discriminator with a nested `data` payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::SessionId;

/// Messages the client sends to the agent server.
///
/// Serialized as `{"type": "user_message", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A chat turn from the user.
    UserMessage(SdkUserMessage),
}

impl ClientMessage {
    /// Builds a top-level user message for the given session.
    #[must_use]
    pub fn user(session_id: SessionId, content: impl Into<String>) -> Self {
        Self::UserMessage(SdkUserMessage {
            kind: SdkMessageKind::User,
            session_id,
            parent_tool_use_id: None,
            message: ChatMessage {
                role: Role::User,
                content: content.into(),
            },
        })
    }

    /// Returns the session id carried by this message.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        match self {
            Self::UserMessage(msg) => msg.session_id,
        }
    }

    /// Returns the chat text carried by this message.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::UserMessage(msg) => &msg.message.content,
        }
    }
}

/// SDK-level user message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkUserMessage {
    /// SDK message discriminator, always `"user"`.
    #[serde(rename = "type")]
    pub kind: SdkMessageKind,
    /// Session correlation id.
    pub session_id: SessionId,
    /// Tool use this message answers; `null` for top-level turns.
    pub parent_tool_use_id: Option<String>,
    /// The chat message itself.
    pub message: ChatMessage,
}

/// Discriminator for [`SdkUserMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdkMessageKind {
    /// A message authored by the user.
    User,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

/// Chat message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The human user.
    User,
}

/// Envelopes the agent server sends to the client.
///
/// Only the `type` field is interpreted. Anything else in the frame is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// The server accepted the connection.
    Connected,
    /// An opaque agent response; `Value::Null` when `data` is absent.
    SdkMessage(Value),
    /// The server reported an error.
    Error(Option<String>),
    /// Any other `type`, or `None` when the frame has no string `type`.
    Unknown(Option<String>),
}

impl ServerMessage {
    /// Parses one text frame.
    ///
    /// Only the top-level JSON parse can fail. Valid JSON that does not
    /// look like an envelope becomes [`ServerMessage::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if `text` is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Classifies an already-parsed JSON value.
    #[must_use]
    pub fn from_value(mut value: Value) -> Self {
        let Some(kind) = value.get("type").and_then(Value::as_str).map(str::to_owned) else {
            return Self::Unknown(None);
        };

        match kind.as_str() {
            "connected" => Self::Connected,
            "sdk_message" => {
                let data = value
                    .get_mut("data")
                    .map(Value::take)
                    .unwrap_or(Value::Null);
                Self::SdkMessage(data)
            }
            "error" => Self::Error(value.get("error").map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })),
            other => Self::Unknown(Some(other.to_owned())),
        }
    }

    /// Returns the wire `type` tag, if any.
    #[must_use]
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            Self::Connected => Some("connected"),
            Self::SdkMessage(_) => Some("sdk_message"),
            Self::Error(_) => Some("error"),
            Self::Unknown(tag) => tag.as_deref(),
        }
    }
}
