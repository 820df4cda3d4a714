/// packet of type abp_shared_lib::packet::Packet
#[macro_export]
macro_rules! log_packet_sent {
    ($packet:expr) => {
        log::debug!("sent: {}", $packet);
    };
    ($packet:expr, $copies:expr) => {
        if $copies > 1 {
            log::debug!("sent {} copies: {}", $copies, $packet);
        } else {
            log::debug!("sent: {}", $packet);
        }
    };
}

/// packet of type abp_shared_lib::packet::Packet
#[macro_export]
macro_rules! log_packet_received {
    ($packet:expr) => {
        log::debug!("received: {}", $packet);
    };
}

/// # Arguments
/// * `kind` - of type abp_shared_lib::impairment::FrameKind
/// * `decision` - of type abp_shared_lib::impairment::ImpairmentDecision
#[macro_export]
macro_rules! log_impairment {
    ($kind:expr, $decision:expr) => {
        if $decision.drop {
            log::debug!("simulated loss of {:?} frame", $kind);
        } else if $decision.corrupt_sequence || $decision.corrupt_checksum || $decision.duplicate {
            log::debug!("simulated impairment of {:?} frame: {:?}", $kind, $decision);
        }
    };
}

/// logs a state transition at trace level
#[macro_export]
macro_rules! log_state_change {
    ($from:expr, $to:expr) => {
        log::trace!("state {:?} -> {:?}", $from, $to);
    };
}

/// # Arguments
/// * `role` - "client" or "server"
/// * `digest` - of type abp_shared_lib::field_types::Digest
#[macro_export]
macro_rules! log_transfer_finished {
    ($role:expr, $bytes:expr, $digest:expr) => {
        log::info!(
            "{} finished transfer of {} bytes, sha256 {}",
            $role,
            $bytes,
            $crate::helper::sha256_helper::sha256_to_hex_string($digest)
        );
    };
}
