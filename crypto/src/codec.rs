//! Hex conversion at the crate boundary.

use crate::error::{CryptoError, CryptoResult};

/// Decode a hex string into bytes.
///
/// Accepts upper- and lowercase digits. Odd length or any non-hex
/// character is rejected before the caller touches any key material.
pub fn hex_to_bytes(input: &str) -> CryptoResult<Vec<u8>> {
    hex::decode(input).map_err(|e| CryptoError::InvalidEncoding(format!("hex: {}", e)))
}

/// Encode bytes as lowercase hex
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
