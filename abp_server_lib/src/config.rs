use abp_shared_lib::constants::DEFAULT_CHUNK_SIZE;
use abp_shared_lib::error::Result;
use abp_shared_lib::field_types::ChunkSize;
use abp_shared_lib::packet::Packet;

/// buffer size of the output file writer
pub const FILE_WRITER_BUFFER_SIZE: usize = 2usize.pow(16);

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// must match the client
    pub chunk_size: ChunkSize,
    /// answer a duplicate data frame with the last acknowledgment again,
    /// otherwise a lost acknowledgment can only be recovered by giving up
    pub reack_duplicates: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            reack_duplicates: true,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        Packet::validate_chunk_size(self.chunk_size)
    }
}
