/// number of payload bytes carried by every frame
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// size of the sequence field followed by the checksum field
pub const ABP_PACKET_HEADER_SIZE: usize = 4 + 2;

/// payload that marks the end of a transfer
pub const SENTINEL_PAYLOAD: &[u8] = b"***End***";

/// payload carried by every acknowledgment
pub const ACK_PAYLOAD: &[u8] = b"ACK";

/// 2^16 bytes - 8 byte UDP header, - 20 byte IP header
pub const MAX_DATAGRAM_SIZE: usize = 2usize.pow(16) - 8 - 20;

/// retransmissions allowed per chunk before the sender gives up
pub const DEFAULT_MAX_RETRANSMISSIONS: u32 = 100;

/// non-blocking receive attempts used to clear stale acknowledgments before a send
pub const MAX_STALE_ACK_DRAIN: usize = 16;
