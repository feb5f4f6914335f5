// Recording transport for tests: nothing leaves the process.
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures_lite::future;

use crate::transport::{Socket, Transport};

/// Where a [`MockTransport`] should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Open,
    Broadcast,
    Write,
    /// Report only this many bytes written.
    Truncate(usize),
    /// Never finish the write.
    Hang,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub destination: SocketAddr,
    pub broadcast: bool,
    pub payload: Vec<u8>,
}

#[derive(Debug, Default)]
struct Record {
    opened: usize,
    released: usize,
    datagrams: Vec<Datagram>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    fault: Option<Fault>,
    record: Arc<Mutex<Record>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn failing(fault: Fault) -> Self {
        Self {
            fault: Some(fault),
            ..Default::default()
        }
    }
    fn record(&self) -> MutexGuard<'_, Record> {
        lock(&self.record)
    }
    pub fn datagrams(&self) -> Vec<Datagram> {
        self.record().datagrams.clone()
    }
    pub fn opened(&self) -> usize {
        self.record().opened
    }
    pub fn released(&self) -> usize {
        self.record().released
    }
}

fn lock(record: &Mutex<Record>) -> MutexGuard<'_, Record> {
    record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Transport for MockTransport {
    type Socket = MockSocket;

    async fn open(&self) -> io::Result<MockSocket> {
        if self.fault == Some(Fault::Open) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.record().opened += 1;
        Ok(MockSocket {
            fault: self.fault,
            broadcast: AtomicBool::new(false),
            record: self.record.clone(),
        })
    }
}

pub struct MockSocket {
    fault: Option<Fault>,
    broadcast: AtomicBool,
    record: Arc<Mutex<Record>>,
}

#[async_trait]
impl Socket for MockSocket {
    fn set_broadcast(&self, on: bool) -> io::Result<()> {
        if self.fault == Some(Fault::Broadcast) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.broadcast.store(on, Ordering::SeqCst);
        Ok(())
    }
    async fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        match self.fault {
            Some(Fault::Write) => Err(io::Error::from(io::ErrorKind::AddrNotAvailable)),
            Some(Fault::Hang) => future::pending().await,
            Some(Fault::Truncate(n)) => Ok(n.min(buf.len())),
            _ => {
                lock(&self.record).datagrams.push(Datagram {
                    destination: addr,
                    broadcast: self.broadcast.load(Ordering::SeqCst),
                    payload: buf.to_vec(),
                });
                Ok(buf.len())
            }
        }
    }
}

impl Drop for MockSocket {
    fn drop(&mut self) {
        lock(&self.record).released += 1;
    }
}
