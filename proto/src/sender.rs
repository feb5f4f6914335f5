//! Putting magic packets on the wire.
//!
//! Wake-on-LAN has no acknowledgment channel. Every `Ok(())` returned here
//! means the datagram was handed to the local network stack, never that the
//! target machine actually woke up; a powered-off host, a wrong subnet or a
//! NIC with WoL disabled all look exactly like success.

use std::io;
use std::time::Duration;

use async_std::future::timeout;
use async_std::task;

use crate::constant::{DEFAULT_BURST_INTERVAL, DEFAULT_TIMEOUT};
use crate::mac::{MacAddress, ParseError, SecureOn};
use crate::packet::MagicPacket;
use crate::target::BroadcastTarget;
use crate::transport::{Socket, Transport, UdpTransport};

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("cannot open udp socket")]
    Socket(#[source] io::Error),
    #[error("cannot enable broadcast on socket")]
    Broadcast(#[source] io::Error),
    #[error("datagram write failed")]
    Write(#[source] io::Error),
    #[error("datagram truncated, {sent} of {expected} bytes written")]
    ShortWrite { sent: usize, expected: usize },
    #[error("send did not complete within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum WolError {
    #[error("invalid mac address")]
    InvalidMacFormat(#[from] ParseError),
    #[error("failed to broadcast magic packet")]
    Send(#[from] SendError),
}

/// Fixed number of identical sends, to offset UDP's unreliable delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub count: u32,
    pub interval: Duration,
}

impl Burst {
    pub fn new(count: u32, interval: Duration) -> Self {
        Self {
            count: count.max(1),
            interval,
        }
    }
}

impl Default for Burst {
    fn default() -> Self {
        Self::new(1, DEFAULT_BURST_INTERVAL)
    }
}

/// Stateless sender; any number of concurrent calls may share it.
#[derive(Debug, Clone)]
pub struct Sender<T = UdpTransport> {
    transport: T,
    target: BroadcastTarget,
    timeout: Duration,
    burst: Burst,
    secure_on: Option<SecureOn>,
}

impl Sender<UdpTransport> {
    pub fn new() -> Self {
        Self::with_transport(UdpTransport)
    }
}

impl Default for Sender<UdpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Sender<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            target: BroadcastTarget::default(),
            timeout: DEFAULT_TIMEOUT,
            burst: Burst::default(),
            secure_on: None,
        }
    }
    pub fn target(mut self, target: BroadcastTarget) -> Self {
        self.target = target;
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn burst(mut self, burst: Burst) -> Self {
        self.burst = burst;
        self
    }
    pub fn secure_on(mut self, password: Option<SecureOn>) -> Self {
        self.secure_on = password;
        self
    }
    pub fn default_target(&self) -> BroadcastTarget {
        self.target
    }
    pub fn transport(&self) -> &T {
        &self.transport
    }
    pub fn packet(&self, mac: &MacAddress) -> MagicPacket {
        match &self.secure_on {
            Some(password) => MagicPacket::with_secure_on(mac, password),
            None => MagicPacket::new(mac),
        }
    }
    /// Sends `packet` once per burst slot, each on its own socket. Stops at
    /// the first failure.
    pub async fn send(&self, packet: &MagicPacket, target: BroadcastTarget) -> Result<(), SendError> {
        for attempt in 0..self.burst.count {
            if attempt > 0 {
                task::sleep(self.burst.interval).await;
            }
            self.send_once(packet, target).await?;
        }
        Ok(())
    }
    async fn send_once(&self, packet: &MagicPacket, target: BroadcastTarget) -> Result<(), SendError> {
        // socket lives inside the future, so a timeout drops it too
        let attempt = async {
            let socket = self.transport.open().await.map_err(SendError::Socket)?;
            socket.set_broadcast(true).map_err(SendError::Broadcast)?;
            let sent = socket
                .send_to(packet.as_bytes(), target.socket_addr())
                .await
                .map_err(SendError::Write)?;
            if sent != packet.len() {
                return Err(SendError::ShortWrite {
                    sent,
                    expected: packet.len(),
                });
            }
            Ok(())
        };
        let result = match timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(SendError::Timeout(self.timeout)),
        };
        match &result {
            Ok(()) => log::debug!("sent {} byte magic packet to {}", packet.len(), target),
            Err(err) => log::warn!("magic packet to {} not sent: {}", target, err),
        }
        result
    }
    /// Parses `mac_text`, builds the packet and broadcasts it to `target`, or
    /// to the sender's configured target.
    pub async fn wake(&self, mac_text: &str, target: Option<BroadcastTarget>) -> Result<(), WolError> {
        let mac: MacAddress = mac_text.parse()?;
        self.wake_mac(&mac, target).await
    }
    pub async fn wake_mac(&self, mac: &MacAddress, target: Option<BroadcastTarget>) -> Result<(), WolError> {
        let target = target.unwrap_or(self.target);
        log::info!("waking {} via {}", mac, target);
        self.send(&self.packet(mac), target).await?;
        Ok(())
    }
}

/// Broadcasts `packet` once over a real UDP socket.
pub async fn send(packet: &MagicPacket, target: BroadcastTarget) -> Result<(), SendError> {
    Sender::new().send(packet, target).await
}

/// Parse, build and send in one step with default timeout and a single send.
pub async fn wake(mac_text: &str, target: Option<BroadcastTarget>) -> Result<(), WolError> {
    Sender::new().wake(mac_text, target).await
}

/// Blocking form of [`wake`] for synchronous callers.
pub fn wake_blocking(mac_text: &str, target: Option<BroadcastTarget>) -> Result<(), WolError> {
    task::block_on(wake(mac_text, target))
}

#[cfg(test)]
mod test {
    use std::error::Error as _;
    use std::net::Ipv4Addr;

    use super::*;
    use crate::mock::{Fault, MockTransport};
    use crate::packet::build_packet;

    const MAC: &str = "AA:BB:CC:DD:EE:FF";

    fn mac() -> MacAddress {
        MAC.parse().unwrap()
    }

    #[async_std::test]
    async fn send_records_destination_flag_and_payload() {
        let transport = MockTransport::new();
        let target = BroadcastTarget::new(Ipv4Addr::new(192, 168, 0, 255), 7);
        let sender = Sender::with_transport(transport.clone());

        sender.send(&build_packet(&mac()), target).await.unwrap();

        let sent = transport.datagrams();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination, target.socket_addr());
        assert!(sent[0].broadcast);
        assert_eq!(sent[0].payload, build_packet(&mac()).as_bytes());
        assert_eq!(transport.opened(), 1);
        assert_eq!(transport.released(), 1);
    }

    #[async_std::test]
    async fn wake_uses_default_target() {
        let transport = MockTransport::new();
        let sender = Sender::with_transport(transport.clone());

        sender.wake("aa-bb-cc-dd-ee-ff", None).await.unwrap();

        let sent = transport.datagrams();
        assert_eq!(sent[0].destination, "255.255.255.255:9".parse().unwrap());
        assert_eq!(sent[0].payload.len(), 102);
    }

    #[async_std::test]
    async fn wake_twice_is_identical() {
        let transport = MockTransport::new();
        let sender = Sender::with_transport(transport.clone());

        sender.wake(MAC, None).await.unwrap();
        sender.wake(MAC, None).await.unwrap();

        let sent = transport.datagrams();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(transport.opened(), 2);
        assert_eq!(transport.released(), 2);
    }

    #[async_std::test]
    async fn invalid_mac_never_touches_network() {
        let transport = MockTransport::new();
        let sender = Sender::with_transport(transport.clone());

        let err = sender.wake("AA:BB:CC", None).await.unwrap_err();
        assert!(matches!(
            err,
            WolError::InvalidMacFormat(ParseError::InvalidMacFormat(ref text)) if text == "AA:BB:CC"
        ));
        assert_eq!(transport.opened(), 0);
    }

    #[test]
    fn blocking_wake_reports_bad_input() {
        let err = wake_blocking("AA:BB:CC:DD:EE:GG", None).unwrap_err();
        assert!(matches!(err, WolError::InvalidMacFormat(_)));
        let source = err.source().expect("parse error kept as source");
        assert!(source.to_string().contains("AA:BB:CC:DD:EE:GG"));
    }

    #[async_std::test]
    async fn write_failure_releases_socket() {
        let transport = MockTransport::failing(Fault::Write);
        let sender = Sender::with_transport(transport.clone());

        let err = sender.wake(MAC, None).await.unwrap_err();
        match err {
            WolError::Send(SendError::Write(ref io)) => {
                assert_eq!(io.kind(), io::ErrorKind::AddrNotAvailable)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.source().is_some());
        assert_eq!(transport.opened(), 1);
        assert_eq!(transport.released(), 1);
        assert!(transport.datagrams().is_empty());
    }

    #[async_std::test]
    async fn broadcast_refused_releases_socket() {
        let transport = MockTransport::failing(Fault::Broadcast);
        let sender = Sender::with_transport(transport.clone());

        let err = sender.send(&build_packet(&mac()), Default::default()).await;
        assert!(matches!(err, Err(SendError::Broadcast(_))));
        assert_eq!(transport.opened(), 1);
        assert_eq!(transport.released(), 1);
    }

    #[async_std::test]
    async fn open_failure_is_send_error() {
        let transport = MockTransport::failing(Fault::Open);
        let sender = Sender::with_transport(transport.clone());

        let err = sender.send(&build_packet(&mac()), Default::default()).await;
        assert!(matches!(err, Err(SendError::Socket(_))));
        assert_eq!(transport.opened(), 0);
        assert_eq!(transport.released(), 0);
    }

    #[async_std::test]
    async fn short_write_is_send_error() {
        let transport = MockTransport::failing(Fault::Truncate(50));
        let sender = Sender::with_transport(transport.clone());

        let err = sender.send(&build_packet(&mac()), Default::default()).await;
        assert!(matches!(
            err,
            Err(SendError::ShortWrite {
                sent: 50,
                expected: 102
            })
        ));
        assert_eq!(transport.released(), 1);
    }

    #[async_std::test]
    async fn hung_write_times_out_and_releases() {
        let transport = MockTransport::failing(Fault::Hang);
        let sender = Sender::with_transport(transport.clone()).timeout(Duration::from_millis(50));

        let err = sender.wake(MAC, None).await.unwrap_err();
        assert!(matches!(err, WolError::Send(SendError::Timeout(_))));
        assert_eq!(transport.opened(), 1);
        assert_eq!(transport.released(), 1);
    }

    #[async_std::test]
    async fn burst_sends_count_datagrams() {
        let transport = MockTransport::new();
        let sender = Sender::with_transport(transport.clone())
            .burst(Burst::new(3, Duration::from_millis(1)));

        sender.wake(MAC, None).await.unwrap();

        let sent = transport.datagrams();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|d| d == &sent[0]));
        assert_eq!(transport.released(), 3);
    }

    #[async_std::test]
    async fn burst_stops_at_first_failure() {
        let transport = MockTransport::failing(Fault::Write);
        let sender = Sender::with_transport(transport.clone())
            .burst(Burst::new(3, Duration::from_millis(1)));

        assert!(sender.wake(MAC, None).await.is_err());
        assert_eq!(transport.opened(), 1);
    }

    #[test]
    fn burst_count_is_at_least_one() {
        assert_eq!(Burst::new(0, Duration::ZERO).count, 1);
    }

    #[async_std::test]
    async fn secure_on_travels_with_packet() {
        let transport = MockTransport::new();
        let sender =
            Sender::with_transport(transport.clone()).secure_on(Some(SecureOn::Short([1, 2, 3, 4])));

        sender.wake(MAC, None).await.unwrap();

        let payload = &transport.datagrams()[0].payload;
        assert_eq!(payload.len(), 106);
        assert_eq!(&payload[102..], &[1, 2, 3, 4]);
    }

    #[async_std::test]
    async fn explicit_target_overrides_default() {
        let transport = MockTransport::new();
        let sender = Sender::with_transport(transport.clone())
            .target(BroadcastTarget::new(Ipv4Addr::new(10, 0, 0, 255), 9));

        let other = BroadcastTarget::new(Ipv4Addr::new(172, 16, 0, 255), 7);
        sender.wake(MAC, Some(other)).await.unwrap();

        assert_eq!(transport.datagrams()[0].destination, other.socket_addr());
    }
}
