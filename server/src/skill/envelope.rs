// JSON envelopes exchanged with the voice platform. Only the fields the
// skill reads or writes are modelled; everything else is ignored.
use std::collections::HashMap;

use monostate::MustBe;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APL_INTERFACE: &str = "Alexa.Presentation.APL";

#[derive(Deserialize, Debug)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
}

#[derive(Deserialize, Debug)]
pub struct Intent {
    pub name: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<System>,
}

#[derive(Deserialize, Debug, Default)]
pub struct System {
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub supported_interfaces: HashMap<String, Value>,
}

impl RequestEnvelope {
    pub fn locale(&self) -> Option<&str> {
        self.request.locale.as_deref()
    }
    /// Whether the requesting device can render a display document.
    pub fn supports_apl(&self) -> bool {
        self.context
            .as_ref()
            .and_then(|context| context.system.as_ref())
            .and_then(|system| system.device.as_ref())
            .map_or(false, |device| {
                device.supported_interfaces.contains_key(APL_INTERFACE)
            })
    }
}

#[derive(Serialize, Debug, Default)]
pub struct ResponseEnvelope {
    pub version: MustBe!("1.0"),
    pub response: Response,
}

#[derive(Serialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: MustBe!("PlainText"),
    pub text: String,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: Default::default(),
            text: text.into(),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "Alexa.Presentation.APL.RenderDocument")]
    RenderDocument {
        token: String,
        document: Value,
        datasources: Value,
    },
}

/// Chained construction in the style of the platform SDKs.
#[derive(Default)]
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.response.output_speech = Some(OutputSpeech::plain(text));
        self
    }
    /// Keeps the session open and repeats `text` if the user stays silent.
    pub fn ask(mut self, text: impl Into<String>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::plain(text),
        });
        self.response.should_end_session = Some(false);
        self
    }
    pub fn directive(mut self, directive: Directive) -> Self {
        self.response.directives.push(directive);
        self
    }
    pub fn build(self) -> ResponseEnvelope {
        ResponseEnvelope {
            version: Default::default(),
            response: self.response,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_launch_with_apl() {
        let envelope: RequestEnvelope = serde_json::from_value(json!({
            "version": "1.0",
            "session": { "new": true },
            "context": { "System": { "device": {
                "deviceId": "x",
                "supportedInterfaces": { "Alexa.Presentation.APL": { "runtime": { "maxVersion": "1.9" } } }
            } } },
            "request": { "type": "LaunchRequest", "requestId": "r1", "locale": "de-DE", "timestamp": "now" }
        }))
        .unwrap();
        assert_eq!(envelope.request.kind, "LaunchRequest");
        assert_eq!(envelope.locale(), Some("de-DE"));
        assert!(envelope.supports_apl());
    }

    #[test]
    fn parse_minimal_intent() {
        let envelope: RequestEnvelope = serde_json::from_value(json!({
            "request": { "type": "IntentRequest", "intent": { "name": "AMAZON.HelpIntent", "slots": {} } }
        }))
        .unwrap();
        assert_eq!(envelope.request.intent.unwrap().name, "AMAZON.HelpIntent");
        assert!(envelope.context.is_none());
    }

    #[test]
    fn serialize_speech_and_reprompt() {
        let envelope = ResponseBuilder::new().speak("hi").ask("again?").build();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "version": "1.0",
                "response": {
                    "outputSpeech": { "type": "PlainText", "text": "hi" },
                    "reprompt": { "outputSpeech": { "type": "PlainText", "text": "again?" } },
                    "shouldEndSession": false
                }
            })
        );
    }

    #[test]
    fn serialize_empty_and_directive() {
        assert_eq!(
            serde_json::to_value(ResponseBuilder::new().build()).unwrap(),
            json!({ "version": "1.0", "response": {} })
        );
        let envelope = ResponseBuilder::new()
            .directive(Directive::RenderDocument {
                token: "t".into(),
                document: json!({}),
                datasources: json!({ "myData": {} }),
            })
            .build();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap()["response"]["directives"][0]["type"],
            "Alexa.Presentation.APL.RenderDocument"
        );
    }
}
