use std::time::Duration;
use abp_shared_lib::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RETRANSMISSIONS, MAX_STALE_ACK_DRAIN};
use abp_shared_lib::error::{ErrorType, Result};
use abp_shared_lib::field_types::ChunkSize;
use abp_shared_lib::packet::Packet;
use abp_shared_lib::times::ACK_TIMEOUT;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// must match the server
    pub chunk_size: ChunkSize,
    /// how long to wait for the acknowledgment of a data frame
    pub ack_timeout: Duration,
    /// None retries forever
    pub max_retransmissions: Option<u32>,
    /// non-blocking receives used to clear stale acknowledgments before each send
    pub max_stale_ack_drain: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            ack_timeout: ACK_TIMEOUT,
            max_retransmissions: Some(DEFAULT_MAX_RETRANSMISSIONS),
            max_stale_ack_drain: MAX_STALE_ACK_DRAIN,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ack_timeout == Duration::from_secs(0) {
            return Err(ErrorType::InvalidAckTimeout(self.ack_timeout));
        }
        Packet::validate_chunk_size(self.chunk_size)
    }
}
