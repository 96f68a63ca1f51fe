use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Malformed hex input or an undecodable public/private key encoding.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Padding or structure check failed after decryption.
    ///
    /// A wrong passphrase and a corrupted ciphertext look the same at this
    /// layer, so both surface here.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Malformed protected private key container: {0}")]
    MalformedContainer(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Payload too large: {len} bytes, at most {max} allowed for this key")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Invalid {what} length: expected {expected}, got {got}")]
    InvalidKeyOrIv {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Secure random generator unavailable: {0}")]
    RandomUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Fieldless failure classification, stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEncoding,
    DecryptionFailed,
    MalformedContainer,
    KeyGenerationFailed,
    SigningFailed,
    PayloadTooLarge,
    InvalidKeyOrIv,
    RandomUnavailable,
    Configuration,
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoError::InvalidEncoding(_) => ErrorKind::InvalidEncoding,
            CryptoError::DecryptionFailed(_) => ErrorKind::DecryptionFailed,
            CryptoError::MalformedContainer(_) => ErrorKind::MalformedContainer,
            CryptoError::KeyGenerationFailed(_) => ErrorKind::KeyGenerationFailed,
            CryptoError::SigningFailed(_) => ErrorKind::SigningFailed,
            CryptoError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            CryptoError::InvalidKeyOrIv { .. } => ErrorKind::InvalidKeyOrIv,
            CryptoError::RandomUnavailable(_) => ErrorKind::RandomUnavailable,
            CryptoError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether the failure means the caller supplied a bad credential or
    /// a damaged container, as opposed to a caller bug or environment fault.
    pub fn is_unrecoverable_key(&self) -> bool {
        matches!(
            self,
            CryptoError::DecryptionFailed(_) | CryptoError::MalformedContainer(_)
        )
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = CryptoError::PayloadTooLarge { len: 300, max: 214 };
        assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
        assert_eq!(
            err.to_string(),
            "Payload too large: 300 bytes, at most 214 allowed for this key"
        );

        let err = CryptoError::InvalidKeyOrIv {
            what: "iv",
            expected: 16,
            got: 8,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidKeyOrIv);
        assert_eq!(err.to_string(), "Invalid iv length: expected 16, got 8");
    }

    #[test]
    fn test_unrecoverable_key_classification() {
        assert!(CryptoError::DecryptionFailed("bad padding".into()).is_unrecoverable_key());
        assert!(CryptoError::MalformedContainer("truncated".into()).is_unrecoverable_key());
        assert!(!CryptoError::InvalidEncoding("odd length".into()).is_unrecoverable_key());
    }
}
