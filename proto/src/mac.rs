use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constant::MAC_LEN;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid mac address {0:?}, expected six hex pairs like AA:BB:CC:DD:EE:FF")]
    InvalidMacFormat(String),
    #[error("invalid SecureOn password {0:?}, expected four or six hex pairs")]
    InvalidSecureOn(String),
}

/// Splits `text` on its one delimiter kind (`:` or `-`) and decodes every
/// token as exactly two hex digits.
fn octets(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    let delimiter = match (text.contains(':'), text.contains('-')) {
        (true, false) => ':',
        (false, true) => '-',
        _ => return None,
    };
    text.split(delimiter)
        .map(|token| {
            if token.len() == 2 && token.bytes().all(|b| b.is_ascii_hexdigit()) {
                u8::from_str_radix(token, 16).ok()
            } else {
                None
            }
        })
        .collect()
}

/// 48-bit hardware address of the machine to wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    pub const fn new(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }
    pub fn octets(&self) -> &[u8; MAC_LEN] {
        &self.0
    }
}

/// Parses `AA:BB:CC:DD:EE:FF` or `aa-bb-cc-dd-ee-ff`.
pub fn parse_mac(text: &str) -> Result<MacAddress, ParseError> {
    text.parse()
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        octets(text)
            .and_then(|bytes| <[u8; MAC_LEN]>::try_from(bytes).ok())
            .map(MacAddress)
            .ok_or_else(|| ParseError::InvalidMacFormat(text.to_owned()))
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Password some NICs require after the repeated address blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecureOn {
    Short([u8; 4]),
    Long([u8; 6]),
}

impl SecureOn {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SecureOn::Short(x) => x,
            SecureOn::Long(x) => x,
        }
    }
}

impl FromStr for SecureOn {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidSecureOn(text.to_owned());
        let bytes = octets(text).ok_or_else(invalid)?;
        match bytes.len() {
            4 => Ok(SecureOn::Short(bytes.try_into().map_err(|_| invalid())?)),
            6 => Ok(SecureOn::Long(bytes.try_into().map_err(|_| invalid())?)),
            _ => Err(invalid()),
        }
    }
}
