mod listen;

use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use proto::prelude::*;

use listen::Listener;

#[derive(Parser, Debug)]
#[command(name = "wol", version, about = "Send Wake-on-LAN magic packets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Broadcast a magic packet. Success only means the packet left this
    /// machine; WoL has no way to confirm the target woke.
    Wake(WakeArgs),
    /// Print the magic packet for an address as hex
    Packet {
        mac: String,
        #[arg(long)]
        secure_on: Option<SecureOn>,
    },
    /// Report magic packets arriving on a UDP port
    Listen {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Stop after this many packets
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct WakeArgs {
    /// Target address, AA:BB:CC:DD:EE:FF or aa-bb-cc-dd-ee-ff
    #[arg(env = "WOL_MAC")]
    mac: String,
    /// Broadcast address, optionally with :port
    #[arg(short, long, env = "WOL_BROADCAST", default_value = "255.255.255.255")]
    broadcast: BroadcastTarget,
    /// Overrides the port given with --broadcast
    #[arg(short, long, env = "WOL_PORT")]
    port: Option<u16>,
    /// Number of identical packets to send
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,
    /// Pause between packets of a burst, in milliseconds
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,
    /// Give up on a single send after this many milliseconds
    #[arg(long, default_value_t = 500)]
    timeout_ms: u64,
    /// SecureOn password, four or six hex pairs
    #[arg(long, env = "WOL_SECURE_ON")]
    secure_on: Option<SecureOn>,
}

impl WakeArgs {
    fn sender(&self) -> Sender {
        let target = match self.port {
            Some(port) => self.broadcast.with_port(port),
            None => self.broadcast,
        };
        Sender::new()
            .target(target)
            .timeout(Duration::from_millis(self.timeout_ms))
            .burst(Burst::new(self.count, Duration::from_millis(self.interval_ms)))
            .secure_on(self.secure_on.clone())
    }
}

fn exit_code(err: &WolError) -> u8 {
    match err {
        WolError::InvalidMacFormat(_) => 2,
        WolError::Send(_) => 1,
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .chunks(6)
        .map(|block| {
            block
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_std::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Wake(args) => {
            let sender = args.sender();
            match sender.wake(&args.mac, None).await {
                Ok(()) => {
                    log::info!(
                        "magic packet for {} sent to {}",
                        args.mac,
                        sender.default_target()
                    );
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    log::error!("{}", err);
                    if let Some(source) = std::error::Error::source(&err) {
                        log::error!("caused by: {}", source);
                    }
                    ExitCode::from(exit_code(&err))
                }
            }
        }
        Command::Packet { mac, secure_on } => {
            let mac: MacAddress = match mac.parse() {
                Ok(mac) => mac,
                Err(err) => {
                    log::error!("{}", err);
                    return ExitCode::from(2);
                }
            };
            let packet = match secure_on {
                Some(password) => MagicPacket::with_secure_on(&mac, &password),
                None => build_packet(&mac),
            };
            println!("{}", hex(packet.as_bytes()));
            ExitCode::SUCCESS
        }
        Command::Listen { port, count } => {
            let listener = match Listener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
                Ok(listener) => listener,
                Err(err) => {
                    log::error!("cannot listen on port {}: {}", port, err);
                    return ExitCode::from(1);
                }
            };
            log::info!("listening for magic packets on port {}", port);
            let mut seen = 0;
            while count.map_or(true, |count| seen < count) {
                match listener.next().await {
                    Ok(sighting) => {
                        seen += 1;
                        println!(
                            "{} from {} ({} bytes)",
                            sighting.mac, sighting.from, sighting.len
                        );
                    }
                    Err(err) => {
                        log::error!("receive failed: {}", err);
                        return ExitCode::from(1);
                    }
                }
            }
            ExitCode::SUCCESS
        }
    }
}
