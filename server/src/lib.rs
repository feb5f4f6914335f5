#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod skill;
pub mod web;

use std::io;

pub use config::Config;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration")]
    Config(#[from] config::Error),
    #[error("cannot load message table")]
    Locale(#[from] skill::locale::Error),
    #[error("cannot load display document")]
    Presentation(#[from] skill::presentation::Error),
    #[error("http server failure")]
    Io(#[from] io::Error),
}

/// Serves the skill endpoint until the listener fails.
pub async fn run(config: Config) -> Result<(), Error> {
    let state = web::prelude::AppState::load(&config).await?;
    log::info!(
        "waking {} via {} on launch requests",
        config.mac,
        config.target
    );
    log::info!("Listening on http://{}", config.listen);
    web::app(state).listen(config.listen).await?;
    Ok(())
}
