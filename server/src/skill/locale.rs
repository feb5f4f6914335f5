use std::io;
use std::path::Path;

use async_std::fs;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "en-US";

/// Every sentence the skill can say, for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    pub launch: String,
    pub launch_title: String,
    #[serde(default)]
    pub launch_subtitle: String,
    pub help: String,
    pub goodbye: String,
    pub fallback: String,
    pub fallback_reprompt: String,
    /// `{intent}` is replaced by the intent name.
    pub reflect: String,
    pub error: String,
}

impl Messages {
    pub fn reflect(&self, intent: &str) -> String {
        self.reflect.replace("{intent}", intent)
    }
}

lazy_static! {
    static ref BUILTIN: IndexMap<String, Messages> = {
        let mut table = IndexMap::new();
        table.insert(
            DEFAULT_LOCALE.to_owned(),
            Messages {
                launch: "Turning on PC".to_owned(),
                launch_title: "Turned on.".to_owned(),
                launch_subtitle: String::new(),
                help: "You can ask me to turn on your PC. How can I help?".to_owned(),
                goodbye: "Goodbye!".to_owned(),
                fallback: "Hmm, I'm not sure. What would you like to do?".to_owned(),
                fallback_reprompt: "I didn't catch that. What can I help you with?".to_owned(),
                reflect: "You just triggered {intent}.".to_owned(),
                error: "Sorry, I had trouble doing what you asked. Please try again.".to_owned(),
            },
        );
        table.insert(
            "de-DE".to_owned(),
            Messages {
                launch: "PC wird eingeschaltet".to_owned(),
                launch_title: "Eingeschaltet.".to_owned(),
                launch_subtitle: String::new(),
                help: "Du kannst mich bitten, deinen PC einzuschalten. Wie kann ich helfen?".to_owned(),
                goodbye: "Tschüss!".to_owned(),
                fallback: "Hmm, da bin ich mir nicht sicher. Was möchtest du tun?".to_owned(),
                fallback_reprompt: "Das habe ich nicht verstanden. Wobei kann ich helfen?".to_owned(),
                reflect: "Du hast {intent} ausgelöst.".to_owned(),
                error: "Entschuldigung, das hat nicht geklappt. Bitte versuche es noch einmal.".to_owned(),
            },
        );
        table
    };
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot read message table")]
    Io(#[from] io::Error),
    #[error("malformed message table")]
    Deserialize(#[from] serde_json::Error),
}

/// Locale code to message set. Adding a language is a data change: put it
/// in the JSON file named by the configuration.
#[derive(Debug, Clone)]
pub struct Locales {
    table: IndexMap<String, Messages>,
}

impl Default for Locales {
    fn default() -> Self {
        Self {
            table: BUILTIN.clone(),
        }
    }
}

impl Locales {
    /// Built-in table overlaid with `{ "fr-FR": { ... }, ... }` entries.
    /// Codes compare case-insensitively, so `en-us` replaces the built-in
    /// `en-US`.
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        let extra: IndexMap<String, Messages> = serde_json::from_slice(json)?;
        let mut self_ = Self::default();
        for (code, messages) in extra {
            self_.table.retain(|known, _| !known.eq_ignore_ascii_case(&code));
            self_.table.insert(code, messages);
        }
        Ok(self_)
    }
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let json = fs::read(path).await?;
        let self_ = Self::from_json(&json)?;
        log::info!(
            "loaded {} locales from {}",
            self_.table.len(),
            path.display()
        );
        Ok(self_)
    }
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
    /// Exact code, then any entry of the same language, then `en-US`.
    pub fn get(&self, locale: Option<&str>) -> &Messages {
        let exact = |wanted: &str| {
            self.table
                .iter()
                .find(|(code, _)| code.eq_ignore_ascii_case(wanted))
                .map(|(_, messages)| messages)
        };
        let found = locale.and_then(|locale| {
            let language = |code: &str| code.split(['-', '_']).next().map(str::to_ascii_lowercase);
            exact(locale).or_else(|| {
                self.table
                    .iter()
                    .find(|(code, _)| language(code.as_str()) == language(locale))
                    .map(|(_, messages)| messages)
            })
        });
        match found.or_else(|| exact(DEFAULT_LOCALE)) {
            Some(messages) => messages,
            None => &BUILTIN[DEFAULT_LOCALE],
        }
    }
}
