use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use rand::Rng;
use rand::rngs::StdRng;
use abp_shared_lib::channel::{DatagramChannel, RecvError};
use abp_shared_lib::error::Result;
use abp_shared_lib::impairment::{FrameKind, SimulatedOutcome, Simulator};
use abp_shared_lib::packet::Packet;
use abp_shared_lib::sequence_bit::SequenceBit;
use abp_shared_lib::{log_packet_received, log_packet_sent, log_state_change, log_transfer_finished};
use crate::config::{ServerConfig, FILE_WRITER_BUFFER_SIZE};
use crate::file_io::writer::ChunkWriter;
use crate::file_sandbox::FileSandbox;
use crate::server_state::{ServerReport, ServerStateType, Verdict};

/// Receiving side of a transfer.
///
/// A data frame is accepted if its checksum matches the payload and it
/// carries the opposite bit of the last accepted chunk. Accepted chunks are
/// written once and acknowledged through the impairment simulator.
pub struct Server<C: DatagramChannel, R: Rng = StdRng> {
    channel: C,
    simulator: Simulator<R>,
    config: ServerConfig,
    state: ServerStateType,
    /// bit of the last chunk that was written, the first chunk carries `One`
    last_accepted: SequenceBit,
    last_ack: Option<Packet>,
    report: ServerReport,
}

impl<C: DatagramChannel, R: Rng> Server<C, R> {

    pub fn new(channel: C, simulator: Simulator<R>, config: ServerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Server {
            channel,
            simulator,
            config,
            state: ServerStateType::AwaitNameFrame,
            last_accepted: SequenceBit::Zero,
            last_ack: None,
            report: ServerReport::default(),
        })
    }

    pub fn state(&self) -> ServerStateType {
        self.state
    }

    pub fn last_accepted(&self) -> SequenceBit {
        self.last_accepted
    }

    /// blocks until the first frame arrives and reads it as the destination file name
    pub fn await_name_frame(&mut self) -> Result<String> {
        self.set_state(ServerStateType::AwaitNameFrame);
        let frame = self.receive_frame()?;
        let name = frame.file_name()?;
        log::info!("receiving {}", name);
        self.set_state(ServerStateType::Initialized);
        Ok(name)
    }

    /// receives chunks into `sink` until the sentinel arrives
    pub fn receive_into<W: Write>(&mut self, sink: W) -> Result<ServerReport> {
        let mut writer = ChunkWriter::new(sink);
        self.set_state(ServerStateType::ReceiveLoop);
        loop {
            let frame = self.receive_frame()?;
            if self.handle_frame(&frame, &mut writer)? == Verdict::Terminate {
                break;
            }
        }
        self.report.bytes = writer.bytes_written();
        let (_, digest) = writer.finish()?;
        self.report.digest = digest;
        self.set_state(ServerStateType::Terminated);
        log_transfer_finished!("server", self.report.bytes, self.report.digest);
        log::info!(
            "{} chunks, {} duplicates, {} corrupted",
            self.report.accepted,
            self.report.duplicates,
            self.report.corrupted
        );
        Ok(self.report.clone())
    }

    /// name frame, then the file itself inside `sandbox`
    pub fn receive_file(&mut self, sandbox: &FileSandbox) -> Result<(PathBuf, ServerReport)> {
        let name = self.await_name_frame()?;
        let (path, file) = sandbox.create_file(&name)?;
        log::debug!("writing to {}", path.display());
        let report = self.receive_into(BufWriter::with_capacity(FILE_WRITER_BUFFER_SIZE, file))?;
        Ok((path, report))
    }

    /// validates one frame, writes and acknowledges it if it is the next chunk
    pub fn handle_frame<W: Write>(&mut self, frame: &Packet, writer: &mut ChunkWriter<W>) -> Result<Verdict> {
        if frame.is_sentinel() {
            log::debug!("end of transfer");
            return Ok(Verdict::Terminate);
        }
        let expected = self.last_accepted.toggled();
        match frame.sequence_bit() {
            Some(bit) if frame.has_valid_checksum() && bit == expected => {
                writer.write_chunk(frame.payload())?;
                self.last_accepted = bit;
                self.report.accepted += 1;
                let ack = Packet::ack(bit, frame.checksum(), self.config.chunk_size)?;
                self.send_ack(&ack);
                self.last_ack = Some(ack);
                Ok(Verdict::Accept)
            }
            Some(_) if frame.has_valid_checksum() => {
                self.report.duplicates += 1;
                log::debug!("duplicate {}", frame);
                if self.config.reack_duplicates {
                    if let Some(ack) = self.last_ack.clone() {
                        self.send_ack(&ack);
                    }
                }
                Ok(Verdict::RejectDuplicate)
            }
            _ => {
                self.report.corrupted += 1;
                log::debug!("corrupted {}", frame);
                Ok(Verdict::RejectCorrupt)
            }
        }
    }

    /// a lost acknowledgment is recovered by the client's retransmission
    fn send_ack(&mut self, ack: &Packet) {
        match self.simulator.maybe_impair(ack, FrameKind::Ack) {
            SimulatedOutcome::Drop => {
                self.report.simulated_ack_drops += 1;
            }
            SimulatedOutcome::Deliver(delivery) => {
                let buf = delivery.frame.encode();
                for _ in 0..delivery.copies() {
                    if let Err(e) = self.channel.send_datagram(&buf) {
                        log::warn!("failed to send ack: {}", e);
                        return;
                    }
                    self.report.acks_sent += 1;
                }
                log_packet_sent!(delivery.frame, delivery.copies());
            }
        }
    }

    /// blocks until a datagram of at least one frame arrives
    fn receive_frame(&mut self) -> Result<Packet> {
        loop {
            let buf = match self.channel.recv_datagram(None) {
                Ok(buf) => buf,
                Err(RecvError::Timeout) => continue,
                Err(RecvError::Io(e)) if e.kind() == ErrorKind::ConnectionRefused => continue,
                Err(RecvError::Io(e)) => return Err(e.into()),
            };
            match Packet::decode(&buf, self.config.chunk_size) {
                Some(frame) => {
                    log_packet_received!(frame);
                    return Ok(frame);
                }
                None => {
                    self.report.malformed += 1;
                    log::debug!("ignored datagram of {} bytes", buf.len());
                }
            }
        }
    }

    fn set_state(&mut self, state: ServerStateType) {
        log_state_change!(self.state, state);
        self.state = state;
    }
}
