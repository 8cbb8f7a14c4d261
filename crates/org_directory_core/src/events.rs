//! Queue message decoding.

use serde_json::Value;

use crate::error::RequestError;

pub const EVENT_TYPE_FIELD: &str = "eventType";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    CreateOrganization,
    CreateUser,
    UpdateOrganization,
    UpdateUser,
}

impl EventType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createOrganization" => Some(Self::CreateOrganization),
            "createUser" => Some(Self::CreateUser),
            "updateOrganization" => Some(Self::UpdateOrganization),
            "updateUser" => Some(Self::UpdateUser),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateOrganization => "createOrganization",
            Self::CreateUser => "createUser",
            Self::UpdateOrganization => "updateOrganization",
            Self::UpdateUser => "updateUser",
        }
    }
}

/// One decoded queue message. The payload still carries every field of the
/// message body; the operation's schema picks the ones it recognizes.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryEvent {
    CreateOrganization(Value),
    CreateUser(Value),
    UpdateOrganization(Value),
    UpdateUser(Value),
    /// Missing or unknown `eventType`; skipped by the consumer.
    Unrecognized(Option<String>),
}

impl DirectoryEvent {
    pub fn from_message_body(body: &str) -> Result<Self, RequestError> {
        let payload: Value = serde_json::from_str(body)
            .map_err(|error| RequestError::validation(format!("Malformed message body: {error}")))?;
        Ok(Self::from_payload(payload))
    }

    /// Non-object payloads carry no `eventType` and decode as unrecognized.
    pub fn from_payload(payload: Value) -> Self {
        let raw_event_type = payload
            .get(EVENT_TYPE_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(event_type) = raw_event_type.as_deref().and_then(EventType::parse) else {
            return Self::Unrecognized(raw_event_type);
        };

        match event_type {
            EventType::CreateOrganization => Self::CreateOrganization(payload),
            EventType::CreateUser => Self::CreateUser(payload),
            EventType::UpdateOrganization => Self::UpdateOrganization(payload),
            EventType::UpdateUser => Self::UpdateUser(payload),
        }
    }

    pub fn event_type(&self) -> Option<EventType> {
        match self {
            Self::CreateOrganization(_) => Some(EventType::CreateOrganization),
            Self::CreateUser(_) => Some(EventType::CreateUser),
            Self::UpdateOrganization(_) => Some(EventType::UpdateOrganization),
            Self::UpdateUser(_) => Some(EventType::UpdateUser),
            Self::Unrecognized(_) => None,
        }
    }
}
