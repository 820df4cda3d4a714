use std::fmt::{Display, Formatter};
use byteorder::{BigEndian, ByteOrder};
use crate::checksum::{checksum, verify};
use crate::constants::{ABP_PACKET_HEADER_SIZE, ACK_PAYLOAD, MAX_DATAGRAM_SIZE, SENTINEL_PAYLOAD};
use crate::error::{ErrorType, Result};
use crate::field_types::{Checksum, ChunkSize, SequenceRaw};
use crate::sequence_bit::SequenceBit;

pub mod name_frame;

/// A fixed size ABP frame.
///
/// Wire layout, integers in network byte order:
/// `[sequence: u32][checksum: u16][payload: chunk_size bytes]`
///
/// The same layout is used for data frames, acknowledgments, the name frame
/// and the end of transfer sentinel. The checksum only covers the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    sequence: SequenceRaw,
    checksum: Checksum,
    payload: Vec<u8>,
}

impl Packet {

    pub fn frame_size(chunk_size: ChunkSize) -> usize {
        ABP_PACKET_HEADER_SIZE + chunk_size
    }

    /// every chunk must be able to carry the sentinel
    pub fn validate_chunk_size(chunk_size: ChunkSize) -> Result<()> {
        if chunk_size < SENTINEL_PAYLOAD.len() || chunk_size > MAX_DATAGRAM_SIZE - ABP_PACKET_HEADER_SIZE {
            return Err(ErrorType::InvalidChunkSize(chunk_size));
        }
        Ok(())
    }

    /// `payload` is zero padded to `chunk_size`, a payload that does not fit is an error
    pub(crate) fn from_parts(sequence: SequenceRaw, checksum: Checksum, payload: &[u8], chunk_size: ChunkSize) -> Result<Packet> {
        if payload.len() > chunk_size {
            return Err(ErrorType::InvalidChunkSize(chunk_size));
        }
        let mut padded = vec![0u8; chunk_size];
        padded[..payload.len()].copy_from_slice(payload);
        Ok(Packet {
            sequence,
            checksum,
            payload: padded,
        })
    }

    /// data frame, the checksum is computed over the padded payload
    pub fn data(bit: SequenceBit, data: &[u8], chunk_size: ChunkSize) -> Result<Packet> {
        let mut packet = Self::from_parts(bit.to_raw(), 0, data, chunk_size)?;
        packet.checksum = checksum(&packet.payload);
        Ok(packet)
    }

    /// acknowledgment for the data frame with `bit` and `checksum`
    pub fn ack(bit: SequenceBit, checksum: Checksum, chunk_size: ChunkSize) -> Result<Packet> {
        Self::from_parts(bit.to_raw(), checksum, ACK_PAYLOAD, chunk_size)
    }

    pub fn sentinel(bit: SequenceBit, chunk_size: ChunkSize) -> Result<Packet> {
        Self::data(bit, SENTINEL_PAYLOAD, chunk_size)
    }

    pub fn sequence(&self) -> SequenceRaw {
        self.sequence
    }

    /// None if the sequence field holds neither 0 nor 1
    pub fn sequence_bit(&self) -> Option<SequenceBit> {
        SequenceBit::from_raw(self.sequence)
    }

    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn chunk_size(&self) -> ChunkSize {
        self.payload.len()
    }

    /// copy of this frame with a different sequence field
    pub fn with_sequence(&self, sequence: SequenceRaw) -> Packet {
        Packet { sequence, ..self.clone() }
    }

    /// copy of this frame with a different checksum field
    pub fn with_checksum(&self, checksum: Checksum) -> Packet {
        Packet { checksum, ..self.clone() }
    }

    /// true if the checksum field matches the payload
    pub fn has_valid_checksum(&self) -> bool {
        verify(&self.payload, self.checksum)
    }

    /// compares the whole payload with the padded sentinel literal
    pub fn is_sentinel(&self) -> bool {
        self.payload.len() >= SENTINEL_PAYLOAD.len()
            && self.payload.starts_with(SENTINEL_PAYLOAD)
            && self.payload[SENTINEL_PAYLOAD.len()..].iter().all(|b| *b == 0)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::frame_size(self.chunk_size())];
        BigEndian::write_u32(&mut buf[0..4], self.sequence);
        BigEndian::write_u16(&mut buf[4..6], self.checksum);
        buf[ABP_PACKET_HEADER_SIZE..].copy_from_slice(&self.payload);
        buf
    }

    /// None if `buf` is shorter than a frame, bytes past the frame are ignored
    pub fn decode(buf: &[u8], chunk_size: ChunkSize) -> Option<Packet> {
        let frame_size = Self::frame_size(chunk_size);
        if buf.len() < frame_size {
            return None;
        }
        Some(Packet {
            sequence: BigEndian::read_u32(&buf[0..4]),
            checksum: BigEndian::read_u16(&buf[4..6]),
            payload: buf[ABP_PACKET_HEADER_SIZE..frame_size].to_vec(),
        })
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Packet {{ sequence: {}, checksum: {:#06x}, payload: {:?} }}",
            self.sequence,
            self.checksum,
            String::from_utf8_lossy(&self.payload).trim_end_matches('\0')
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::packet::Packet;
    use crate::sequence_bit::SequenceBit;
    use crate::checksum::checksum;
    use crate::constants::{ABP_PACKET_HEADER_SIZE, MAX_DATAGRAM_SIZE};
    use crate::error::ErrorType;

    #[test]
    fn encode_layout() {
        let packet = Packet::data(SequenceBit::One, b"abc", 10).unwrap();
        let buf = packet.encode();
        assert_eq!(buf.len(), 16);
        assert_eq!(&buf[0..4], &[0, 0, 0, 1]);
        assert_eq!(&buf[4..6], &packet.checksum().to_be_bytes());
        assert_eq!(&buf[6..], b"abc\0\0\0\0\0\0\0");
        assert_eq!(packet.checksum(), checksum(b"abc\0\0\0\0\0\0\0"));
    }

    #[test]
    fn decode_wire_bytes() {
        let buf = [0, 0, 0, 1, 0x12, 0x34, b'A', b'C', b'K', 0, 0, 0, 0, 0, 0, 0];
        let packet = Packet::decode(&buf, 10).unwrap();
        assert_eq!(packet.sequence_bit(), Some(SequenceBit::One));
        assert_eq!(packet.checksum(), 0x1234);
        assert_eq!(packet, Packet::ack(SequenceBit::One, 0x1234, 10).unwrap());
    }

    #[test]
    fn undersized_buffer_is_no_data() {
        let buf = Packet::data(SequenceBit::Zero, b"abc", 10).unwrap().encode();
        assert_eq!(Packet::decode(&buf[..15], 10), None);
        assert_eq!(Packet::decode(&[], 10), None);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let packet = Packet::data(SequenceBit::Zero, b"0123456789", 10).unwrap();
        let mut buf = packet.encode();
        buf.push(0xAA);
        assert_eq!(Packet::decode(&buf, 10), Some(packet));
    }

    #[test]
    fn garbage_decodes_without_failing() {
        let buf = [0xFFu8; 16];
        let packet = Packet::decode(&buf, 10).unwrap();
        assert_eq!(packet.sequence_bit(), None);
        assert!(!packet.has_valid_checksum());
    }

    #[test]
    fn sentinel_matches_exactly() {
        assert!(Packet::sentinel(SequenceBit::Zero, 10).unwrap().is_sentinel());
        assert!(Packet::sentinel(SequenceBit::One, 64).unwrap().is_sentinel());
        assert!(!Packet::data(SequenceBit::Zero, b"***End***x", 10).unwrap().is_sentinel());
        assert!(!Packet::data(SequenceBit::Zero, b"***End**", 10).unwrap().is_sentinel());
        assert!(!Packet::ack(SequenceBit::Zero, 0, 10).unwrap().is_sentinel());
    }

    #[test]
    fn chunk_size_must_fit_the_sentinel() {
        assert!(Packet::validate_chunk_size(10).is_ok());
        assert!(Packet::validate_chunk_size(9).is_ok());
        assert!(Packet::validate_chunk_size(8).is_err());
        assert!(Packet::validate_chunk_size(usize::MAX / 2).is_err());
        assert!(matches!(Packet::validate_chunk_size(usize::MAX), Err(ErrorType::InvalidChunkSize(usize::MAX))));
        assert!(Packet::validate_chunk_size(MAX_DATAGRAM_SIZE - ABP_PACKET_HEADER_SIZE).is_ok());
        assert!(Packet::validate_chunk_size(MAX_DATAGRAM_SIZE - ABP_PACKET_HEADER_SIZE + 1).is_err());
    }

    #[test]
    fn payload_larger_than_chunk_is_an_error() {
        assert!(matches!(Packet::data(SequenceBit::One, &[0; 11], 10), Err(ErrorType::InvalidChunkSize(10))));
        assert!(matches!(Packet::sentinel(SequenceBit::One, 8), Err(ErrorType::InvalidChunkSize(8))));
        assert!(Packet::ack(SequenceBit::One, 0, 2).is_err());
        assert!(Packet::data(SequenceBit::One, &[0; 10], 10).is_ok());
    }

    #[test]
    fn with_field_returns_modified_copy() {
        let packet = Packet::data(SequenceBit::Zero, b"abc", 10).unwrap();
        let corrupted = packet.with_checksum(!packet.checksum());
        assert!(packet.has_valid_checksum());
        assert!(!corrupted.has_valid_checksum());
        assert_eq!(corrupted.payload(), packet.payload());
    }
}
