//! Wake-on-LAN magic packets: parsing the target address, building the
//! 102 byte payload and broadcasting it over UDP.

pub mod constant;
pub mod mac;
pub mod mock;
pub mod packet;
pub mod sender;
pub mod target;
pub mod transport;

pub mod prelude {
    pub use super::constant::*;
    pub use super::mac::{parse_mac, MacAddress, ParseError, SecureOn};
    pub use super::packet::{build_packet, MagicPacket};
    pub use super::sender::{send, wake, wake_blocking, Burst, SendError, Sender, WolError};
    pub use super::target::{BroadcastTarget, TargetError};
    pub use super::transport::{Socket, Transport, UdpTransport};
}
