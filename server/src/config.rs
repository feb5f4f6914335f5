use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use proto::prelude::*;

pub const MAC: &str = "WOL_MAC";
pub const BROADCAST: &str = "WOL_BROADCAST";
pub const PORT: &str = "WOL_PORT";
pub const SECURE_ON: &str = "WOL_SECURE_ON";
pub const TIMEOUT_MS: &str = "WOL_TIMEOUT_MS";
pub const BURST: &str = "WOL_BURST";
pub const BURST_INTERVAL_MS: &str = "WOL_BURST_INTERVAL_MS";
pub const LISTEN: &str = "SKILL_LISTEN";
pub const MESSAGES: &str = "SKILL_MESSAGES";
pub const APL_DOCUMENT: &str = "SKILL_APL_DOCUMENT";

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_APL_DOCUMENT: &str = "./documents/APL_simple.json";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the skill needs, read once at startup and handed to the
/// request state.
#[derive(Debug, Clone)]
pub struct Config {
    pub mac: MacAddress,
    pub target: BroadcastTarget,
    pub secure_on: Option<SecureOn>,
    pub timeout: Duration,
    pub burst: Burst,
    pub listen: SocketAddr,
    pub messages: Option<PathBuf>,
    pub apl_document: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());

        let mac: MacAddress = parse(MAC, get(MAC).ok_or(Error::Missing(MAC))?)?;
        let mut target: BroadcastTarget = match get(BROADCAST) {
            Some(value) => parse(BROADCAST, value)?,
            None => BroadcastTarget::default(),
        };
        if let Some(port) = get(PORT) {
            target = target.with_port(parse(PORT, port)?);
        }
        let secure_on: Option<SecureOn> = get(SECURE_ON).map(|x| parse(SECURE_ON, x)).transpose()?;
        let timeout = match get(TIMEOUT_MS) {
            Some(ms) => send_timeout(ms)?,
            None => DEFAULT_TIMEOUT,
        };
        let count: u32 = match get(BURST) {
            Some(count) => parse(BURST, count)?,
            None => 1,
        };
        let interval = match get(BURST_INTERVAL_MS) {
            Some(ms) => Duration::from_millis(parse(BURST_INTERVAL_MS, ms)?),
            None => DEFAULT_BURST_INTERVAL,
        };
        let listen: SocketAddr = parse(LISTEN, get(LISTEN).unwrap_or_else(|| DEFAULT_LISTEN.to_owned()))?;

        Ok(Config {
            mac,
            target,
            secure_on,
            timeout,
            burst: Burst::new(count, interval),
            listen,
            messages: get(MESSAGES).map(PathBuf::from),
            apl_document: get(APL_DOCUMENT)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_APL_DOCUMENT)),
        })
    }
    pub fn sender(&self) -> Sender {
        self.sender_with(UdpTransport)
    }
    pub fn sender_with<T: Transport>(&self, transport: T) -> Sender<T> {
        Sender::with_transport(transport)
            .target(self.target)
            .timeout(self.timeout)
            .burst(self.burst)
            .secure_on(self.secure_on.clone())
    }
}

/// A send is a single local datagram write; it must be bounded and should
/// stay well under a second.
fn send_timeout(value: String) -> Result<Duration, Error> {
    let ms: u64 = parse(TIMEOUT_MS, value.clone())?;
    if ms == 0 {
        return Err(Error::Invalid {
            key: TIMEOUT_MS,
            value,
            reason: "timeout must be at least 1 ms".to_owned(),
        });
    }
    if ms >= 1000 {
        log::warn!("{}={} is unusually long for a single datagram write", TIMEOUT_MS, ms);
    }
    Ok(Duration::from_millis(ms))
}

fn parse<T>(key: &'static str, value: String) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|err: T::Err| Error::Invalid {
        key,
        reason: err.to_string(),
        value,
    })
}
