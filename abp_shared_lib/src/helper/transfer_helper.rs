use std::io::{ErrorKind, Read};
use crate::error::Result;

/// fills `buf` from `source` until it is full or the source is exhausted
///
/// returns the number of bytes read, 0 means end of file
pub fn read_chunk<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
