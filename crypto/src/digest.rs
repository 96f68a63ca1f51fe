use sha1::Sha1;
use sha2::{Digest, Sha256};

/// SHA-1 of `data` as lowercase hex
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// SHA-256 of `data` as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
