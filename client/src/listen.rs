use std::io;
use std::net::SocketAddr;

use async_std::net::{ToSocketAddrs, UdpSocket};
use proto::prelude::{MacAddress, MagicPacket};

/// A magic packet seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub from: SocketAddr,
    pub mac: MacAddress,
    pub len: usize,
}

/// Receives datagrams and keeps the ones that are magic packets. Useful
/// from a second machine to check that broadcasts actually arrive.
pub struct Listener {
    socket: UdpSocket,
}

impl Listener {
    pub async fn bind(addr: impl ToSocketAddrs) -> io::Result<Self> {
        Ok(Self {
            socket: UdpSocket::bind(addr).await?,
        })
    }
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
    pub async fn next(&self) -> io::Result<Sighting> {
        // larger than any magic packet, so oversized junk is seen as such
        let mut buf = [0_u8; 512];
        loop {
            let (len, from) = self.socket.recv_from(&mut buf).await?;
            match MagicPacket::decode(&buf[..len]) {
                Some(mac) => return Ok(Sighting { from, mac, len }),
                None => log::debug!("ignoring {} byte datagram from {}", len, from),
            }
        }
    }
}
