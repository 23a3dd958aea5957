//! Inbound request envelope, as posted by the voice platform.
//!
//! Only the fields the skill reads are modelled; everything else in the
//! platform payload is ignored during deserialization.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    pub session: Session,
    pub request: SkillRequest,
}

impl RequestEnvelope {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    pub application: Application,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum SkillRequest {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
    #[serde(other)]
    Unsupported,
}

impl SkillRequest {
    pub fn request_type(&self) -> RequestType {
        match self {
            Self::LaunchRequest(_) => RequestType::Launch,
            Self::IntentRequest(_) => RequestType::Intent,
            Self::SessionEndedRequest(_) => RequestType::SessionEnded,
            Self::Unsupported => RequestType::Unsupported,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::LaunchRequest(request) => Some(&request.request_id),
            Self::IntentRequest(request) => Some(&request.request_id),
            Self::SessionEndedRequest(request) => Some(&request.request_id),
            Self::Unsupported => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestType {
    Launch,
    Intent,
    SessionEnded,
    Unsupported,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Launch => "LaunchRequest",
            Self::Intent => "IntentRequest",
            Self::SessionEnded => "SessionEndedRequest",
            Self::Unsupported => "Unsupported",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub request_id: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    #[serde(default)]
    pub locale: Option<String>,
    pub intent: Intent,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Value the platform resolved for `slot`, if any. A slot that is present
    /// without a value is reported the same as a missing slot.
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).and_then(|slot| slot.value.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{RequestEnvelope, RequestType, SkillRequest};

    #[test]
    fn intent_request_with_partial_slots_deserializes() {
        let envelope = RequestEnvelope::from_json(
            r#"{
                "version": "1.0",
                "session": {
                    "new": true,
                    "sessionId": "SessionId.1",
                    "application": { "applicationId": "amzn1.ask.skill.test" },
                    "attributes": {},
                    "user": { "userId": "amzn1.ask.account.1" }
                },
                "request": {
                    "type": "IntentRequest",
                    "requestId": "EdwRequestId.1",
                    "timestamp": "2017-06-01T12:00:00Z",
                    "locale": "en-US",
                    "intent": {
                        "name": "GetPriceIntent",
                        "slots": {
                            "cryptocurrency": { "name": "cryptocurrency", "value": "Ether" },
                            "fiat_currency": { "name": "fiat_currency" }
                        }
                    }
                }
            }"#,
        )
        .expect("envelope should parse");

        assert!(envelope.session.new);
        assert_eq!(envelope.session.application.application_id, "amzn1.ask.skill.test");
        assert_eq!(envelope.request.request_type(), RequestType::Intent);
        assert_eq!(envelope.request.request_id(), Some("EdwRequestId.1"));

        let SkillRequest::IntentRequest(request) = envelope.request else {
            panic!("expected intent request");
        };
        assert_eq!(request.intent.slot_value("cryptocurrency"), Some("Ether"));
        assert_eq!(request.intent.slot_value("fiat_currency"), None);
        assert_eq!(request.intent.slot_value("missing"), None);
    }

    #[test]
    fn intent_without_slots_map_has_no_values() {
        let envelope = RequestEnvelope::from_json(
            r#"{
                "session": {
                    "sessionId": "SessionId.2",
                    "application": { "applicationId": "amzn1.ask.skill.test" }
                },
                "request": {
                    "type": "IntentRequest",
                    "requestId": "EdwRequestId.2",
                    "intent": { "name": "AMAZON.HelpIntent" }
                }
            }"#,
        )
        .expect("envelope should parse");

        assert!(!envelope.session.new);
        let SkillRequest::IntentRequest(request) = envelope.request else {
            panic!("expected intent request");
        };
        assert!(request.intent.slots.is_empty());
    }

    #[test]
    fn unknown_request_types_are_unsupported() {
        let envelope = RequestEnvelope::from_json(
            r#"{
                "session": {
                    "sessionId": "SessionId.3",
                    "application": { "applicationId": "amzn1.ask.skill.test" }
                },
                "request": { "type": "Display.ElementSelected", "requestId": "EdwRequestId.3" }
            }"#,
        )
        .expect("envelope should parse");

        assert_eq!(envelope.request, SkillRequest::Unsupported);
        assert_eq!(envelope.request.request_id(), None);
    }
}
