use crate::error::{CryptoError, CryptoResult};
use rand::rngs::OsRng;
use rand::RngCore;

/// Length of a one-time symmetric key (AES-256)
pub const ONE_TIME_KEY_LEN: usize = 32;

/// Length of a one-time initialization vector (AES block)
pub const ONE_TIME_IV_LEN: usize = 16;

/// Operating-system backed random generator.
///
/// Every call goes to the OS source; there is no user-space fallback.
pub struct RandomSource;

impl RandomSource {
    /// Fill `buf` with random bytes
    pub fn fill(buf: &mut [u8]) -> CryptoResult<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::RandomUnavailable(e.to_string()))
    }

    /// Generate `len` random bytes
    pub fn generate(len: usize) -> CryptoResult<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        Self::fill(&mut bytes)?;
        Ok(bytes)
    }

    /// Generate a fresh key for [`SymmetricCipher`](crate::SymmetricCipher)
    pub fn one_time_key() -> CryptoResult<[u8; ONE_TIME_KEY_LEN]> {
        let mut key = [0u8; ONE_TIME_KEY_LEN];
        Self::fill(&mut key)?;
        Ok(key)
    }

    /// Generate a fresh IV for [`SymmetricCipher`](crate::SymmetricCipher)
    pub fn one_time_iv() -> CryptoResult<[u8; ONE_TIME_IV_LEN]> {
        let mut iv = [0u8; ONE_TIME_IV_LEN];
        Self::fill(&mut iv)?;
        Ok(iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length() {
        assert_eq!(RandomSource::generate(0).unwrap().len(), 0);
        assert_eq!(RandomSource::generate(1).unwrap().len(), 1);
        assert_eq!(RandomSource::generate(4096).unwrap().len(), 4096);
    }

    #[test]
    fn test_generate_is_not_repeated() {
        let a = RandomSource::generate(32).unwrap();
        let b = RandomSource::generate(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_one_time_material_sizes() {
        let key = RandomSource::one_time_key().unwrap();
        let iv = RandomSource::one_time_iv().unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(iv.len(), 16);
        assert_ne!(key, [0u8; 32]);
    }
}
