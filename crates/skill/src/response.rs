use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

pub const RESPONSE_VERSION: &str = "1.0";

/// Attributes carried across turns. The skill keeps no state, so this is
/// always empty when sent.
pub type SessionAttributes = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    pub output_speech: OutputSpeech,
    pub card: Card,
    pub reprompt: Reprompt,
    pub should_end_session: bool,
}

impl SpeechletResponse {
    pub fn speech_text(&self) -> &str {
        self.output_speech.text()
    }

    pub fn reprompt_text(&self) -> &str {
        self.reprompt.output_speech.text()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: SessionAttributes,
    pub response: SpeechletResponse,
}

impl ResponseEnvelope {
    pub fn speech_text(&self) -> &str {
        self.response.speech_text()
    }

    pub fn should_end_session(&self) -> bool {
        self.response.should_end_session
    }
}

/// Plain-text speech with a simple card echoing `title`/`output`.
pub fn build_speechlet_response(
    title: impl Into<String>,
    output: impl Into<String>,
    reprompt_text: impl Into<String>,
    should_end_session: bool,
) -> SpeechletResponse {
    let output = output.into();
    let reprompt_text = reprompt_text.into();
    debug!(
        event_name = "skill.response.built",
        output_speech = %output,
        reprompt = %reprompt_text,
        should_end_session,
        "speechlet response built"
    );

    SpeechletResponse {
        output_speech: OutputSpeech::plain(output.clone()),
        card: Card::Simple { title: title.into(), content: output },
        reprompt: Reprompt { output_speech: OutputSpeech::plain(reprompt_text) },
        should_end_session,
    }
}

pub fn build_response(
    session_attributes: SessionAttributes,
    speechlet_response: SpeechletResponse,
) -> ResponseEnvelope {
    ResponseEnvelope {
        version: RESPONSE_VERSION.to_owned(),
        session_attributes,
        response: speechlet_response,
    }
}
