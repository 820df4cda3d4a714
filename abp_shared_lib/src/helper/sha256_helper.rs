use sha2::{Digest as _, Sha256};
use crate::field_types::Digest;

pub fn sha256_to_hex_string(sha: Digest) -> String {
    let mut str = String::with_capacity(64);
    for byte in sha.iter() {
        str.push_str(&format!("{:02x}", byte));
    }
    str
}

// generate sha256 from bytes
pub fn sha256_from_bytes(bytes: &[u8]) -> Digest {
    let mut digest = TransferDigest::new();
    digest.update(bytes);
    digest.finish()
}

/// running sha256 over the bytes of a transfer
pub struct TransferDigest {
    inner: Sha256,
}

impl TransferDigest {
    pub fn new() -> Self {
        TransferDigest { inner: Sha256::new() }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    pub fn finish(self) -> Digest {
        let mut digest: Digest = [0; 32];
        digest.clone_from_slice(self.inner.finalize().as_slice());
        digest
    }
}

impl Default for TransferDigest {
    fn default() -> Self {
        Self::new()
    }
}
