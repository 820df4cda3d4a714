use std::io;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use crate::channel::{DatagramChannel, RecvError};

/// One end of an in-memory datagram pipe, used to run both engines in one process
pub struct MemoryChannel {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl MemoryChannel {

    /// two connected endpoints, what one sends the other receives
    pub fn pair() -> (MemoryChannel, MemoryChannel) {
        let (a_tx, b_rx) = channel();
        let (b_tx, a_rx) = channel();
        (
            MemoryChannel { tx: a_tx, rx: a_rx },
            MemoryChannel { tx: b_tx, rx: b_rx },
        )
    }
}

fn disconnected() -> io::Error {
    io::Error::new(io::ErrorKind::ConnectionAborted, "peer endpoint dropped")
}

impl DatagramChannel for MemoryChannel {

    fn send_datagram(&mut self, datagram: &[u8]) -> io::Result<()> {
        self.tx.send(datagram.to_vec()).map_err(|_| disconnected())
    }

    fn recv_datagram(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, RecvError> {
        match timeout {
            None => self.rx.recv().map_err(|_| RecvError::Io(disconnected())),
            Some(timeout) if timeout == Duration::from_secs(0) => match self.rx.try_recv() {
                Ok(datagram) => Ok(datagram),
                Err(TryRecvError::Empty) => Err(RecvError::Timeout),
                Err(TryRecvError::Disconnected) => Err(RecvError::Io(disconnected())),
            },
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(datagram) => Ok(datagram),
                Err(RecvTimeoutError::Timeout) => Err(RecvError::Timeout),
                Err(RecvTimeoutError::Disconnected) => Err(RecvError::Io(disconnected())),
            },
        }
    }
}
