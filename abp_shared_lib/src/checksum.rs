use byteorder::{ByteOrder, LittleEndian};
use crate::field_types::Checksum;

/// 16 bit one's complement checksum over `payload`.
///
/// Words are read little endian, a trailing odd byte is zero extended.
/// Only meant to catch accidental corruption.
pub fn checksum(payload: &[u8]) -> Checksum {
    let mut sum: u32 = 0;
    let mut words = payload.chunks_exact(2);

    for word in &mut words {
        sum += LittleEndian::read_u16(word) as u32;
        // fold early so the accumulator never overflows on long payloads
        if sum > 0xFFFF {
            sum = (sum & 0xFFFF) + (sum >> 16);
        }
    }

    if let Some(&byte) = words.remainder().first() {
        sum += byte as u32;
    }

    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !(sum as u16)
}

/// true if `expected` is the checksum of `payload`
pub fn verify(payload: &[u8], expected: Checksum) -> bool {
    checksum(payload) == expected
}
