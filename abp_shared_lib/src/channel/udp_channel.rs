use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;
use crate::channel::{DatagramChannel, RecvError};
use crate::constants::MAX_DATAGRAM_SIZE;

/// [`DatagramChannel`] over a blocking UdpSocket
///
/// A client knows its peer up front. A server learns it from the first
/// datagram and ignores datagrams from any other source afterwards.
pub struct UdpChannel {
    socket: UdpSocket,
    peer: Option<SocketAddr>,
    read_timeout: Option<Duration>,
    nonblocking: bool,
    /// reused by every receive, only the received bytes are copied out
    recv_buf: Vec<u8>,
}

impl UdpChannel {

    pub fn connect(socket: UdpSocket, peer: SocketAddr) -> io::Result<UdpChannel> {
        socket.set_read_timeout(None)?;
        Ok(UdpChannel {
            socket,
            peer: Some(peer),
            read_timeout: None,
            nonblocking: false,
            recv_buf: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    pub fn listen(socket: UdpSocket) -> io::Result<UdpChannel> {
        socket.set_read_timeout(None)?;
        Ok(UdpChannel {
            socket,
            peer: None,
            read_timeout: None,
            nonblocking: false,
            recv_buf: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// socket options are only touched when the timeout changes
    fn configure(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        let nonblocking = timeout.map(|t| t == Duration::from_secs(0)).unwrap_or(false);
        if nonblocking != self.nonblocking {
            self.socket.set_nonblocking(nonblocking)?;
            self.nonblocking = nonblocking;
        }
        if !nonblocking && timeout != self.read_timeout {
            self.socket.set_read_timeout(timeout)?;
            self.read_timeout = timeout;
        }
        Ok(())
    }
}

impl DatagramChannel for UdpChannel {

    fn send_datagram(&mut self, datagram: &[u8]) -> io::Result<()> {
        let peer = self.peer
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "peer address unknown"))?;
        self.socket.send_to(datagram, peer)?;
        Ok(())
    }

    fn recv_datagram(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, RecvError> {
        self.configure(timeout)?;
        loop {
            let (size, src) = self.socket.recv_from(&mut self.recv_buf)?;
            match self.peer {
                None => {
                    log::info!("accepted transfer from {}", src);
                    self.peer = Some(src);
                }
                Some(peer) if peer != src => {
                    log::debug!("ignored datagram from unknown peer {}", src);
                    continue;
                }
                Some(_) => {}
            }
            return Ok(self.recv_buf[..size].to_vec());
        }
    }
}
