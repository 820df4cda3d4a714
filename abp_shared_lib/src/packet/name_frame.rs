use crate::error::{ErrorType, Result};
use crate::field_types::ChunkSize;
use crate::packet::Packet;
use crate::sequence_bit::SequenceBit;
use crate::checksum::checksum;

/// The first frame of a transfer carries the destination file name.
///
/// The name is UTF-8, followed by NUL padding. It ends at the first NUL byte
/// or at the end of the payload, so it can use the whole chunk.
/// The frame is neither acknowledged nor validated by the receiver.
impl Packet {

    pub fn name(file_name: &str, chunk_size: ChunkSize) -> Result<Packet> {
        let bytes = file_name.as_bytes();
        if bytes.is_empty() || bytes.len() > chunk_size || bytes.contains(&0) {
            return Err(ErrorType::InvalidFileName(file_name.to_string()));
        }
        let mut packet = Packet::from_parts(SequenceBit::Zero.to_raw(), 0, bytes, chunk_size)?;
        packet.checksum = checksum(packet.payload());
        Ok(packet)
    }

    /// reads the payload as a name frame
    pub fn file_name(&self) -> Result<String> {
        let payload = self.payload();
        let end = payload.iter().position(|b| *b == 0).unwrap_or(payload.len());
        let name = std::str::from_utf8(&payload[..end])
            .map_err(|_| ErrorType::InvalidFileName(String::from_utf8_lossy(&payload[..end]).into_owned()))?;
        if name.is_empty() {
            return Err(ErrorType::InvalidFileName(String::new()));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::packet::Packet;
    use crate::error::ErrorType;
    use test_case::test_case;

    #[test_case("out.txt"; "short name")]
    #[test_case("output.md"; "nine bytes")]
    #[test_case("output.txt"; "fills the whole chunk")]
    fn name_survives_the_wire(name: &str) {
        let frame = Packet::name(name, 10).unwrap();
        let decoded = Packet::decode(&frame.encode(), 10).unwrap();
        assert_eq!(decoded.file_name().unwrap(), name);
    }

    #[test_case(""; "empty")]
    #[test_case("output.text"; "longer than chunk")]
    #[test_case("a\0b"; "embedded nul")]
    fn rejects_names_that_do_not_fit(name: &str) {
        assert!(matches!(Packet::name(name, 10), Err(ErrorType::InvalidFileName(_))));
    }

    #[test]
    fn rejects_non_utf8_names() {
        let frame = Packet::from_parts(0, 0, &[0xC3, 0x28], 10).unwrap();
        assert!(matches!(frame.file_name(), Err(ErrorType::InvalidFileName(_))));
    }

    #[test]
    fn rejects_empty_payload() {
        let frame = Packet::from_parts(0, 0, &[], 10).unwrap();
        assert!(frame.file_name().is_err());
    }
}
