use std::sync::Arc;

use proto::prelude::{Transport, UdpTransport};

use crate::config::Config;
use crate::skill::prelude::*;
use crate::Error;

pub struct AppState<T = UdpTransport> {
    pub skill: Arc<Skill<T>>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            skill: self.skill.clone(),
        }
    }
}

impl<T: Transport> AppState<T> {
    pub fn new(skill: Skill<T>) -> Self {
        AppState {
            skill: Arc::new(skill),
        }
    }
}

impl AppState<UdpTransport> {
    /// Reads the message table and display document named by `config`.
    pub async fn load(config: &Config) -> Result<Self, Error> {
        let locales = match &config.messages {
            Some(path) => Locales::load(path).await?,
            None => Locales::default(),
        };
        let presentation = Presentation::load(&config.apl_document).await?;
        Ok(AppState::new(Skill::new(
            config.sender(),
            config.mac,
            locales,
            presentation,
        )))
    }
}
