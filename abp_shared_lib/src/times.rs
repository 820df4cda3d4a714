use std::time::Duration;

/// how long the sender waits for an acknowledgment before retransmitting
pub const ACK_TIMEOUT: Duration = Duration::from_micros(1_000_500);

/// zero timeout, turns a receive into a non-blocking poll
pub const POLL: Duration = Duration::from_secs(0);
