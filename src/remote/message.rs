use crate::config::ControlsConfig;
use crate::registry::Values;
use crate::schema::RemoteSchema;
use crate::value::ControlValue;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteRole {
    Host,
    Controller,
}

impl RemoteRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Controller => "controller",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteMessage {
    Hello {
        role: RemoteRole,
    },
    RequestState,
    SyncState {
        values: Values,
        schema: RemoteSchema,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<ControlsConfig>,
    },
    UpdateValue {
        key: String,
        value: ControlValue,
        source: RemoteRole,
    },
    TriggerButton {
        key: String,
    },
}

impl RemoteMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hello { .. } => "HELLO",
            Self::RequestState => "REQUEST_STATE",
            Self::SyncState { .. } => "SYNC_STATE",
            Self::UpdateValue { .. } => "UPDATE_VALUE",
            Self::TriggerButton { .. } => "TRIGGER_BUTTON",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Encode(String),
    Decode(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

pub fn encode(message: &RemoteMessage) -> Result<String, CodecError> {
    serde_json::to_string(message).map_err(|e| CodecError::Encode(e.to_string()))
}

pub fn decode(text: &str) -> Result<RemoteMessage, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::Decode(e.to_string()))
}
