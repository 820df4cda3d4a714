use std::io::{ErrorKind, Read};
use rand::Rng;
use rand::rngs::StdRng;
use abp_shared_lib::channel::{DatagramChannel, RecvError};
use abp_shared_lib::error::{ErrorType, Result};
use abp_shared_lib::helper::sha256_helper::TransferDigest;
use abp_shared_lib::helper::transfer_helper::read_chunk;
use abp_shared_lib::impairment::{FrameKind, SimulatedOutcome, Simulator};
use abp_shared_lib::packet::Packet;
use abp_shared_lib::sequence_bit::SequenceBit;
use abp_shared_lib::times::POLL;
use abp_shared_lib::{log_packet_received, log_packet_sent, log_state_change, log_transfer_finished};
use crate::client_state::{ClientReport, ClientStateType};
use crate::config::ClientConfig;

/// Sending side of a transfer.
///
/// Stop and wait: one chunk is in flight until an acknowledgment with the
/// chunk's sequence bit and checksum arrives. Every data frame passes the
/// impairment simulator before it reaches the channel.
pub struct Client<C: DatagramChannel, R: Rng = StdRng> {
    channel: C,
    simulator: Simulator<R>,
    config: ClientConfig,
    state: ClientStateType,
    /// bit of the last chunk the server acknowledged
    last_confirmed: SequenceBit,
    report: ClientReport,
}

enum AckOutcome {
    Received(Packet),
    Malformed,
    TimedOut,
}

impl<C: DatagramChannel, R: Rng> Client<C, R> {

    pub fn new(channel: C, simulator: Simulator<R>, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Client {
            channel,
            simulator,
            config,
            state: ClientStateType::Idle,
            last_confirmed: SequenceBit::Zero,
            report: ClientReport::default(),
        })
    }

    pub fn state(&self) -> ClientStateType {
        self.state
    }

    pub fn last_confirmed(&self) -> SequenceBit {
        self.last_confirmed
    }

    /// the name frame is neither impaired nor acknowledged
    pub fn send_name(&mut self, file_name: &str) -> Result<()> {
        let frame = Packet::name(file_name, self.config.chunk_size)?;
        self.channel.send_datagram(&frame.encode())?;
        log::info!("requested destination file {}", file_name);
        log_packet_sent!(frame);
        Ok(())
    }

    /// name frame followed by the content of `source`
    pub fn transfer<S: Read>(&mut self, file_name: &str, source: S) -> Result<ClientReport> {
        self.send_name(file_name)?;
        self.send_file(source)
    }

    /// sends `source` chunk by chunk and finishes with the sentinel
    pub fn send_file<S: Read>(&mut self, mut source: S) -> Result<ClientReport> {
        let mut chunk = vec![0u8; self.config.chunk_size];
        let mut digest = TransferDigest::new();
        loop {
            self.set_state(ClientStateType::ReadNextChunk);
            let size = read_chunk(&mut source, &mut chunk)?;
            if size == 0 {
                break;
            }
            digest.update(&chunk[..size]);
            self.deliver_chunk(&chunk[..size])?;
            self.report.bytes += size as u64;
            self.report.chunks += 1;
        }
        self.send_sentinel()?;
        self.report.digest = digest.finish();
        log_transfer_finished!("client", self.report.bytes, self.report.digest);
        log::info!(
            "{} chunks, {} retransmissions, {} timeouts",
            self.report.chunks,
            self.report.retransmissions,
            self.report.timeouts
        );
        Ok(self.report.clone())
    }

    /// returns once the chunk is acknowledged, the same frame is resent until then
    fn deliver_chunk(&mut self, data: &[u8]) -> Result<()> {
        let frame = Packet::data(self.last_confirmed.toggled(), data, self.config.chunk_size)?;
        let mut attempts: u32 = 0;
        loop {
            if attempts > 0 {
                if let Some(max) = self.config.max_retransmissions {
                    if attempts > max {
                        self.set_state(ClientStateType::Aborted);
                        log::error!("giving up on {} after {} attempts", frame, attempts);
                        return Err(ErrorType::TransferAborted { attempts });
                    }
                }
                self.report.retransmissions += 1;
            }
            attempts += 1;
            self.report.transmissions += 1;

            self.set_state(ClientStateType::AwaitClearAck);
            self.drain_stale_acks()?;

            self.set_state(ClientStateType::Sending);
            match self.simulator.maybe_impair(&frame, FrameKind::Data) {
                SimulatedOutcome::Drop => {
                    self.report.simulated_drops += 1;
                    self.set_state(ClientStateType::Retransmit);
                    continue;
                }
                SimulatedOutcome::Deliver(delivery) => {
                    let buf = delivery.frame.encode();
                    for _ in 0..delivery.copies() {
                        self.channel.send_datagram(&buf)?;
                    }
                    log_packet_sent!(delivery.frame, delivery.copies());
                }
            }

            self.set_state(ClientStateType::AwaitAck);
            let outcome = self.await_ack()?;

            self.set_state(ClientStateType::Validate);
            match outcome {
                AckOutcome::Received(ack) if ack.sequence() == frame.sequence() && ack.checksum() == frame.checksum() => {
                    self.set_state(ClientStateType::Advance);
                    self.last_confirmed = self.last_confirmed.toggled();
                    return Ok(());
                }
                AckOutcome::Received(ack) => {
                    self.report.rejected_acks += 1;
                    log::debug!("wrong ack {}, resending", ack);
                }
                AckOutcome::Malformed => {
                    self.report.rejected_acks += 1;
                    log::debug!("malformed ack, resending");
                }
                AckOutcome::TimedOut => {
                    self.report.timeouts += 1;
                    log::debug!("no ack within {:?}, resending", self.config.ack_timeout);
                }
            }
            self.set_state(ClientStateType::Retransmit);
        }
    }

    fn await_ack(&mut self) -> Result<AckOutcome> {
        match self.channel.recv_datagram(Some(self.config.ack_timeout)) {
            Ok(buf) => match Packet::decode(&buf, self.config.chunk_size) {
                Some(ack) => {
                    log_packet_received!(ack);
                    Ok(AckOutcome::Received(ack))
                }
                None => Ok(AckOutcome::Malformed),
            },
            Err(RecvError::Timeout) => Ok(AckOutcome::TimedOut),
            Err(RecvError::Io(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                log::warn!("server unreachable: {}", e);
                Ok(AckOutcome::TimedOut)
            }
            Err(RecvError::Io(e)) => Err(e.into()),
        }
    }

    /// duplicated acknowledgments of the previous chunk may still be queued
    fn drain_stale_acks(&mut self) -> Result<()> {
        for _ in 0..self.config.max_stale_ack_drain {
            match self.channel.recv_datagram(Some(POLL)) {
                Ok(buf) => {
                    self.report.stale_acks_drained += 1;
                    log::trace!("discarded stale datagram ({} bytes)", buf.len());
                }
                Err(RecvError::Timeout) => break,
                Err(RecvError::Io(e)) if e.kind() == ErrorKind::ConnectionRefused => break,
                Err(RecvError::Io(e)) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// the sentinel is sent once and not acknowledged
    fn send_sentinel(&mut self) -> Result<()> {
        self.set_state(ClientStateType::SendSentinelAndExit);
        let frame = Packet::sentinel(self.last_confirmed.toggled(), self.config.chunk_size)?;
        self.channel.send_datagram(&frame.encode())?;
        log_packet_sent!(frame);
        self.set_state(ClientStateType::Finished);
        Ok(())
    }

    fn set_state(&mut self, state: ClientStateType) {
        log_state_change!(self.state, state);
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use log::LevelFilter;
    use test_case::test_case;
    use abp_shared_lib::channel::{DatagramChannel, MemoryChannel};
    use abp_shared_lib::error::ErrorType;
    use abp_shared_lib::helper::sha256_helper::sha256_from_bytes;
    use abp_shared_lib::impairment::{ImpairmentConfig, ImpairmentProfile, Simulator};
    use abp_shared_lib::packet::Packet;
    use abp_shared_lib::sequence_bit::SequenceBit;
    use crate::client::Client;
    use crate::client_state::ClientStateType;
    use crate::config::ClientConfig;

    const CHUNK: usize = 10;
    const PEER_TIMEOUT: Duration = Duration::from_secs(5);

    fn config() -> ClientConfig {
        ClientConfig {
            ack_timeout: Duration::from_millis(200),
            ..ClientConfig::default()
        }
    }

    fn ack_for(frame: &Packet) -> Packet {
        Packet::ack(frame.sequence_bit().unwrap(), frame.checksum(), CHUNK).unwrap()
    }

    /// reads the name frame, then answers every data frame with `respond`
    /// until the sentinel arrives; returns all data frames and the sentinel
    fn spawn_peer<F>(mut channel: MemoryChannel, mut respond: F) -> JoinHandle<(String, Vec<Packet>)>
    where
        F: FnMut(usize, &Packet) -> Option<Packet> + Send + 'static,
    {
        thread::spawn(move || {
            let name = Packet::decode(&channel.recv_datagram(None).unwrap(), CHUNK)
                .unwrap()
                .file_name()
                .unwrap();
            let mut frames = Vec::new();
            while let Ok(buf) = channel.recv_datagram(Some(PEER_TIMEOUT)) {
                let frame = Packet::decode(&buf, CHUNK).unwrap();
                if frame.is_sentinel() {
                    frames.push(frame);
                    break;
                }
                if let Some(ack) = respond(frames.len(), &frame) {
                    channel.send_datagram(&ack.encode()).unwrap();
                }
                frames.push(frame);
            }
            (name, frames)
        })
    }

    #[test_case(b"", 0; "empty file")]
    #[test_case(b"0123456789", 1; "exactly one chunk")]
    #[test_case(b"hello world, abp!", 2; "partial last chunk")]
    #[test_case(b"0123456789abcdefghij01234", 3; "twenty five bytes")]
    fn cooperative_peer(content: &[u8], chunks: u64) {
        let _ = env_logger::builder().filter_level(LevelFilter::Debug).is_test(true).try_init();
        let (client_end, peer_end) = MemoryChannel::pair();
        let peer = spawn_peer(peer_end, |_, frame| Some(ack_for(frame)));
        let mut client = Client::new(client_end, Simulator::transparent(), config()).unwrap();

        let report = client.transfer("out.txt", content).unwrap();
        let (name, frames) = peer.join().unwrap();

        assert_eq!(name, "out.txt");
        assert_eq!(report.chunks, chunks);
        assert_eq!(report.bytes, content.len() as u64);
        assert_eq!(report.retransmissions, 0);
        assert_eq!(report.digest, sha256_from_bytes(content));
        assert_eq!(client.state(), ClientStateType::Finished);

        // data frames alternate starting with bit 1, then the sentinel
        assert_eq!(frames.len() as u64, chunks + 1);
        let mut expected = SequenceBit::One;
        for (frame, data) in frames.iter().zip(content.chunks(CHUNK)) {
            assert_eq!(frame.sequence_bit(), Some(expected));
            assert_eq!(&frame.payload()[..data.len()], data);
            assert!(frame.has_valid_checksum());
            expected = expected.toggled();
        }
        assert!(frames.last().unwrap().is_sentinel());
    }

    #[test]
    fn retransmits_the_same_frame_after_timeout() {
        let (client_end, peer_end) = MemoryChannel::pair();
        let peer = spawn_peer(peer_end, |index, frame| if index == 0 { None } else { Some(ack_for(frame)) });
        let mut client = Client::new(client_end, Simulator::transparent(), config()).unwrap();

        let report = client.transfer("out.txt", &b"0123456789abc"[..]).unwrap();
        let (_, frames) = peer.join().unwrap();

        assert_eq!(report.timeouts, 1);
        assert_eq!(report.retransmissions, 1);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[2].sequence_bit(), Some(SequenceBit::Zero));
        assert_eq!(frames.len(), 4);
    }

    #[test]
    fn wrong_ack_triggers_retransmission() {
        let (client_end, peer_end) = MemoryChannel::pair();
        let peer = spawn_peer(peer_end, |index, frame| {
            let ack = ack_for(frame);
            match index {
                0 => Some(Packet::ack(SequenceBit::Zero, frame.checksum(), CHUNK).unwrap()),
                1 => Some(ack.with_checksum(!frame.checksum())),
                _ => Some(ack),
            }
        });
        let mut client = Client::new(client_end, Simulator::transparent(), config()).unwrap();

        let report = client.transfer("out.txt", &b"0123456789"[..]).unwrap();
        let (_, frames) = peer.join().unwrap();

        assert_eq!(report.rejected_acks, 2);
        assert_eq!(report.retransmissions, 2);
        assert_eq!(frames.len(), 4);
        assert!(frames[..3].iter().all(|frame| *frame == frames[0]));
        assert_eq!(client.last_confirmed(), SequenceBit::One);
    }

    #[test]
    fn aborts_after_max_retransmissions() {
        let (client_end, _silent_peer) = MemoryChannel::pair();
        let config = ClientConfig {
            ack_timeout: Duration::from_millis(10),
            max_retransmissions: Some(3),
            ..ClientConfig::default()
        };
        let mut client = Client::new(client_end, Simulator::transparent(), config).unwrap();

        let result = client.send_file(&b"0123456789"[..]);

        assert!(matches!(result, Err(ErrorType::TransferAborted { attempts: 4 })));
        assert_eq!(client.state(), ClientStateType::Aborted);
    }

    #[test]
    fn simulated_drops_count_towards_the_limit() {
        let (client_end, _silent_peer) = MemoryChannel::pair();
        let impairment = ImpairmentConfig {
            data: ImpairmentProfile { drop: 1.0, ..ImpairmentProfile::none() },
            ack: ImpairmentProfile::none(),
        };
        let config = ClientConfig { max_retransmissions: Some(5), ..config() };
        let mut client = Client::new(client_end, Simulator::seeded(impairment, 1).unwrap(), config).unwrap();

        let result = client.send_file(&b"x"[..]);

        assert!(matches!(result, Err(ErrorType::TransferAborted { attempts: 6 })));
    }

    #[test]
    fn dropped_frames_are_resent_without_waiting() {
        let (client_end, peer_end) = MemoryChannel::pair();
        let peer = spawn_peer(peer_end, |_, frame| Some(ack_for(frame)));
        let impairment = ImpairmentConfig {
            data: ImpairmentProfile { drop: 1.0, drop_after_drop: Some(0.0), ..ImpairmentProfile::none() },
            ack: ImpairmentProfile::none(),
        };
        let mut client = Client::new(client_end, Simulator::seeded(impairment, 1).unwrap(), config()).unwrap();

        let report = client.transfer("out.txt", &b"0123456789abcdefghij"[..]).unwrap();
        let (_, frames) = peer.join().unwrap();

        assert_eq!(report.simulated_drops, 2);
        assert_eq!(report.timeouts, 0);
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn stale_acks_are_drained_before_sending() {
        let (client_end, mut peer_end) = MemoryChannel::pair();
        // leftovers that would otherwise be read as the answer to the first chunk
        peer_end.send_datagram(&Packet::ack(SequenceBit::Zero, 0, CHUNK).unwrap().encode()).unwrap();
        peer_end.send_datagram(&Packet::ack(SequenceBit::Zero, 0, CHUNK).unwrap().encode()).unwrap();
        let peer = spawn_peer(peer_end, |_, frame| Some(ack_for(frame)));
        let mut client = Client::new(client_end, Simulator::transparent(), config()).unwrap();

        let report = client.transfer("out.txt", &b"0123456789"[..]).unwrap();
        peer.join().unwrap();

        assert_eq!(report.stale_acks_drained, 2);
        assert_eq!(report.rejected_acks, 0);
        assert_eq!(report.retransmissions, 0);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let (client_end, _peer_end) = MemoryChannel::pair();
        let config = ClientConfig { chunk_size: 4, ..ClientConfig::default() };
        assert!(matches!(
            Client::new(client_end, Simulator::transparent(), config),
            Err(ErrorType::InvalidChunkSize(4))
        ));
    }
}
