use indexmap::IndexMap;
use proto::prelude::{MacAddress, Sender, Transport, UdpTransport};

use super::envelope::{Request, RequestEnvelope, ResponseBuilder, ResponseEnvelope};
use super::locale::Locales;
use super::presentation::Presentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Skill opened by its invocation phrase: wake the PC.
    Launch,
    Help,
    Stop,
    Fallback,
    SessionEnded,
    /// Any intent without a dedicated handler.
    Reflect(String),
    Unknown(String),
}

lazy_static! {
    static ref INTENTS: IndexMap<&'static str, Trigger> = IndexMap::from([
        ("AMAZON.HelpIntent", Trigger::Help),
        ("AMAZON.CancelIntent", Trigger::Stop),
        ("AMAZON.StopIntent", Trigger::Stop),
        ("AMAZON.FallbackIntent", Trigger::Fallback),
    ]);
}

impl Trigger {
    pub fn classify(request: &Request) -> Trigger {
        let intent = request.intent.as_ref().map(|intent| intent.name.as_str());
        match (request.kind.as_str(), intent) {
            ("LaunchRequest", _) => Trigger::Launch,
            ("SessionEndedRequest", _) => Trigger::SessionEnded,
            ("IntentRequest", Some(name)) => INTENTS
                .get(name)
                .cloned()
                .unwrap_or_else(|| Trigger::Reflect(name.to_owned())),
            (kind, _) => Trigger::Unknown(kind.to_owned()),
        }
    }
}

/// Translates platform requests into at most one wake call and a spoken
/// answer.
pub struct Skill<T = UdpTransport> {
    sender: Sender<T>,
    mac: MacAddress,
    locales: Locales,
    presentation: Presentation,
}

impl<T: Transport> Skill<T> {
    pub fn new(sender: Sender<T>, mac: MacAddress, locales: Locales, presentation: Presentation) -> Self {
        Self {
            sender,
            mac,
            locales,
            presentation,
        }
    }
    pub fn sender(&self) -> &Sender<T> {
        &self.sender
    }
    pub async fn handle(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        let trigger = Trigger::classify(&envelope.request);
        let messages = self.locales.get(envelope.locale());
        log::debug!(
            "request {:?} ({:?}) as {:?}",
            envelope.request.request_id,
            envelope.request.kind,
            trigger
        );

        match trigger {
            Trigger::Launch => match self.sender.wake_mac(&self.mac, None).await {
                Ok(()) => {
                    let mut response = ResponseBuilder::new().speak(&messages.launch);
                    if envelope.supports_apl() {
                        response = response.directive(
                            self.presentation
                                .render(&messages.launch_title, &messages.launch_subtitle),
                        );
                    }
                    response.build()
                }
                Err(err) => {
                    log::error!("cannot wake {}: {}", self.mac, err);
                    error(&messages.error)
                }
            },
            Trigger::Help => ResponseBuilder::new()
                .speak(&messages.help)
                .ask(&messages.help)
                .build(),
            Trigger::Stop => ResponseBuilder::new().speak(&messages.goodbye).build(),
            Trigger::Fallback => ResponseBuilder::new()
                .speak(&messages.fallback)
                .ask(&messages.fallback_reprompt)
                .build(),
            Trigger::SessionEnded => ResponseBuilder::new().build(),
            Trigger::Reflect(intent) => ResponseBuilder::new()
                .speak(messages.reflect(&intent))
                .build(),
            Trigger::Unknown(kind) => {
                log::warn!("no handler for request type {}", kind);
                error(&messages.error)
            }
        }
    }
}

fn error(text: &str) -> ResponseEnvelope {
    ResponseBuilder::new().speak(text).ask(text).build()
}
