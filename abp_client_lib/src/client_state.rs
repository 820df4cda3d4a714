use abp_shared_lib::field_types::Digest;

/// States of the sending side of the alternating bit protocol
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClientStateType {
    Idle,
    ReadNextChunk,
    /// discarding acknowledgments left over from the previous chunk
    AwaitClearAck,
    Sending,
    AwaitAck,
    Validate,
    Advance,
    Retransmit,
    SendSentinelAndExit,
    Finished,
    /// retransmission limit reached
    Aborted,
}

/// Counters of a finished transfer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientReport {
    pub bytes: u64,
    pub chunks: u64,
    /// send attempts, simulated drops included
    pub transmissions: u64,
    pub retransmissions: u64,
    pub simulated_drops: u64,
    pub timeouts: u64,
    /// acknowledgments that did not match the chunk in flight
    pub rejected_acks: u64,
    pub stale_acks_drained: u64,
    /// sha256 of the bytes read from the source
    pub digest: Digest,
}
