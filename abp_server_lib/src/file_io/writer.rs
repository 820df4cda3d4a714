use std::io::Write;
use abp_shared_lib::error::Result;
use abp_shared_lib::field_types::Digest;
use abp_shared_lib::helper::sha256_helper::TransferDigest;

const ZEROS: [u8; 512] = [0; 512];

/// Writes accepted payloads to the output file.
///
/// Frames carry no length, the last chunk of a file is zero padded.
/// Trailing zero bytes of every chunk are therefore held back and only
/// written once another chunk follows. Whatever is still held back when
/// the transfer ends is treated as padding and discarded.
pub struct ChunkWriter<W: Write> {
    inner: W,
    pending_zeros: usize,
    bytes_written: u64,
    digest: TransferDigest,
}

impl<W: Write> ChunkWriter<W> {

    pub fn new(inner: W) -> Self {
        ChunkWriter {
            inner,
            pending_zeros: 0,
            bytes_written: 0,
            digest: TransferDigest::new(),
        }
    }

    pub fn write_chunk(&mut self, payload: &[u8]) -> Result<()> {
        let end = match payload.iter().rposition(|b| *b != 0) {
            Some(last) => last + 1,
            None => {
                self.pending_zeros += payload.len();
                return Ok(());
            }
        };
        self.write_pending_zeros()?;
        self.write_all(&payload[..end])?;
        self.pending_zeros = payload.len() - end;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// drops held back padding, flushes and returns the sink with the digest of everything written
    pub fn finish(mut self) -> Result<(W, Digest)> {
        if self.pending_zeros > 0 {
            log::trace!("discarded {} bytes of padding", self.pending_zeros);
        }
        self.inner.flush()?;
        Ok((self.inner, self.digest.finish()))
    }

    fn write_pending_zeros(&mut self) -> Result<()> {
        while self.pending_zeros > 0 {
            let len = self.pending_zeros.min(ZEROS.len());
            self.write_all(&ZEROS[..len])?;
            self.pending_zeros -= len;
        }
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.digest.update(bytes);
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}
