use crate::constant::{MAC_LEN, MAC_REPEAT, PACKET_LEN, SYNC_STREAM};
use crate::mac::{MacAddress, SecureOn};

/// Payload of a Wake-on-LAN datagram: six `0xFF` followed by the target
/// address sixteen times, optionally trailed by a SecureOn password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicPacket {
    packet: Vec<u8>,
}

impl MagicPacket {
    pub fn new(mac_address: &MacAddress) -> MagicPacket {
        log::debug!("construct MagicPacket of {}", mac_address);
        let mut packet = Vec::with_capacity(PACKET_LEN);

        packet.extend_from_slice(&SYNC_STREAM);
        (0..MAC_REPEAT).for_each(|_| packet.extend_from_slice(mac_address.octets()));

        MagicPacket { packet }
    }
    pub fn with_secure_on(mac_address: &MacAddress, password: &SecureOn) -> MagicPacket {
        let mut self_ = Self::new(mac_address);
        self_.packet.extend_from_slice(password.as_bytes());
        self_
    }
    /// Recovers the target address from a received payload, or `None` if
    /// the bytes are not a magic packet. A trailing 4 or 6 byte password is
    /// tolerated.
    pub fn decode(payload: &[u8]) -> Option<MacAddress> {
        if payload.len() < PACKET_LEN || !matches!(payload.len() - PACKET_LEN, 0 | 4 | 6) {
            return None;
        }
        let (head, body) = payload[..PACKET_LEN].split_at(MAC_LEN);
        if head != SYNC_STREAM {
            return None;
        }
        let mac: [u8; MAC_LEN] = body[..MAC_LEN].try_into().ok()?;
        body.chunks(MAC_LEN)
            .all(|block| block == mac)
            .then(|| MacAddress::new(mac))
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.packet
    }
    pub fn len(&self) -> usize {
        self.packet.len()
    }
    pub fn is_empty(&self) -> bool {
        self.packet.is_empty()
    }
}

impl AsRef<[u8]> for MagicPacket {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Pure: no socket is touched.
pub fn build_packet(mac_address: &MacAddress) -> MagicPacket {
    MagicPacket::new(mac_address)
}
