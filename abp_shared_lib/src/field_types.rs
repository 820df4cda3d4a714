/// raw value of the sequence field, only 0 and 1 are valid sequence bits
pub type SequenceRaw = u32;
pub type Checksum = u16;
pub type ChunkSize = usize;
pub type Digest = [u8; 32];
