use std::net::Ipv4Addr;
use std::time::Duration;

pub const MAC_LEN: usize = 6;
pub const SYNC_STREAM: [u8; MAC_LEN] = [0xFF; MAC_LEN];
pub const MAC_REPEAT: usize = 16;
pub const PACKET_LEN: usize = MAC_LEN * (MAC_REPEAT + 1);

pub const DEFAULT_BROADCAST: Ipv4Addr = Ipv4Addr::BROADCAST;
/// Discard port; most NICs also accept [`ECHO_PORT`].
pub const DEFAULT_PORT: u16 = 9;
pub const ECHO_PORT: u16 = 7;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_BURST_INTERVAL: Duration = Duration::from_millis(100);
