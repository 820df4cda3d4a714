use std::fmt::{self, Display, Formatter};
use std::io;
use std::time::Duration;

pub mod udp_channel;
pub mod memory_channel;

pub use self::udp_channel::UdpChannel;
pub use self::memory_channel::MemoryChannel;

#[derive(Debug)]
pub enum RecvError {
    /// nothing arrived within the timeout
    Timeout,
    Io(io::Error),
}

impl Display for RecvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecvError::Timeout => write!(f, "receive timed out"),
            RecvError::Io(e) => write!(f, "receive failed: {}", e),
        }
    }
}

impl std::error::Error for RecvError {}

impl From<io::Error> for RecvError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => RecvError::Timeout,
            _ => RecvError::Io(e),
        }
    }
}

/// Datagram pipe between the two endpoints of a transfer
pub trait DatagramChannel {
    fn send_datagram(&mut self, datagram: &[u8]) -> io::Result<()>;

    /// `None` blocks until a datagram arrives, a zero timeout polls without blocking
    fn recv_datagram(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, RecvError>;
}

impl<C: DatagramChannel + ?Sized> DatagramChannel for &mut C {
    fn send_datagram(&mut self, datagram: &[u8]) -> io::Result<()> {
        (**self).send_datagram(datagram)
    }

    fn recv_datagram(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, RecvError> {
        (**self).recv_datagram(timeout)
    }
}
