use abp_shared_lib::field_types::Digest;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ServerStateType {
    AwaitNameFrame,
    Initialized,
    ReceiveLoop,
    Terminated,
}

/// What the server did with a single frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// written and acknowledged
    Accept,
    /// checksum or sequence field invalid, dropped without acknowledgment
    RejectCorrupt,
    /// already written, the last acknowledgment may be repeated
    RejectDuplicate,
    /// end of transfer
    Terminate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerReport {
    pub bytes: u64,
    pub accepted: u64,
    pub duplicates: u64,
    pub corrupted: u64,
    /// datagrams shorter than a frame
    pub malformed: u64,
    /// copies that reached the channel
    pub acks_sent: u64,
    pub simulated_ack_drops: u64,
    /// sha256 of the bytes written
    pub digest: Digest,
}
