use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use crate::constant::{DEFAULT_BROADCAST, DEFAULT_PORT};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid broadcast target {0:?}, expected a.b.c.d or a.b.c.d:port")]
pub struct TargetError(pub String);

/// Where the magic packet is broadcast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BroadcastTarget {
    pub addr: Ipv4Addr,
    pub port: u16,
}

impl BroadcastTarget {
    pub const fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self { addr, port }
    }
    pub fn with_port(self, port: u16) -> Self {
        Self { port, ..self }
    }
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.addr, self.port))
    }
}

impl Default for BroadcastTarget {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST, DEFAULT_PORT)
    }
}

impl From<SocketAddrV4> for BroadcastTarget {
    fn from(socket: SocketAddrV4) -> Self {
        Self::new(*socket.ip(), socket.port())
    }
}

impl FromStr for BroadcastTarget {
    type Err = TargetError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if let Ok(addr) = text.parse::<Ipv4Addr>() {
            return Ok(Self::new(addr, DEFAULT_PORT));
        }
        text.parse::<SocketAddrV4>()
            .map(Self::from)
            .map_err(|_| TargetError(text.to_owned()))
    }
}

impl fmt::Display for BroadcastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_limited_broadcast_discard_port() {
        let target = BroadcastTarget::default();
        assert_eq!(target.socket_addr(), "255.255.255.255:9".parse().unwrap());
    }

    #[test]
    fn parse_forms() {
        assert_eq!(
            "192.168.1.255".parse::<BroadcastTarget>().unwrap(),
            BroadcastTarget::new(Ipv4Addr::new(192, 168, 1, 255), 9)
        );
        assert_eq!(
            "10.0.0.255:7".parse::<BroadcastTarget>().unwrap(),
            BroadcastTarget::new(Ipv4Addr::new(10, 0, 0, 255), 7)
        );
        assert!("10.0.0.255:70000".parse::<BroadcastTarget>().is_err());
        assert!("host.lan".parse::<BroadcastTarget>().is_err());
        assert!("[::1]:9".parse::<BroadcastTarget>().is_err());
    }
}
