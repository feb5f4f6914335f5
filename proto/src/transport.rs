use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use async_std::net::UdpSocket;
use async_trait::async_trait;

/// A connectionless socket able to emit broadcast datagrams. Dropping it
/// releases the underlying resource.
#[async_trait]
pub trait Socket: Send + Sync {
    fn set_broadcast(&self, on: bool) -> io::Result<()>;
    async fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize>;
}

/// Opens a fresh [`Socket`] per send.
#[async_trait]
pub trait Transport: Send + Sync {
    type Socket: Socket;

    async fn open(&self) -> io::Result<Self::Socket>;
}

/// The real network: an ephemeral IPv4 UDP socket.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

#[async_trait]
impl Transport for UdpTransport {
    type Socket = UdpSocket;

    async fn open(&self) -> io::Result<UdpSocket> {
        UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await
    }
}

#[async_trait]
impl Socket for UdpSocket {
    fn set_broadcast(&self, on: bool) -> io::Result<()> {
        UdpSocket::set_broadcast(self, on)
    }
    async fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, addr).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[async_std::test]
    async fn loopback_datagram() {
        let receiver = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = receiver.local_addr().unwrap();

        let socket = UdpTransport.open().await.unwrap();
        Socket::set_broadcast(&socket, true).unwrap();
        assert!(socket.broadcast().unwrap());
        assert_eq!(Socket::send_to(&socket, b"ping", addr).await.unwrap(), 4);

        let mut buf = [0_u8; 16];
        let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");
    }
}
