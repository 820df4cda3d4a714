pub mod sha256_helper;
pub mod transfer_helper;
