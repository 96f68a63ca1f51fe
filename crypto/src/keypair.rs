use crate::config::CryptoConfig;
use crate::error::{CryptoError, CryptoResult};
use crate::protector::PrivateKeyProtector;
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{info, instrument};

/// A freshly generated key pair as handed to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// SubjectPublicKeyInfo DER
    pub public_key: Vec<u8>,
    /// EncryptedPrivateKeyInfo DER, see [`ProtectedPrivateKey`](crate::ProtectedPrivateKey)
    pub protected_private_key: Vec<u8>,
}

/// Decode a PKCS#8 DER RSA private key
pub fn decode_private_key(der: &[u8]) -> CryptoResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_der(der)
        .map_err(|e| CryptoError::InvalidEncoding(format!("private key: {}", e)))
}

/// Decode a SubjectPublicKeyInfo DER RSA public key
pub fn decode_public_key(der: &[u8]) -> CryptoResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(der)
        .map_err(|e| CryptoError::InvalidEncoding(format!("public key: {}", e)))
}

/// Generates RSA key pairs whose private half is passphrase-protected
#[derive(Debug, Clone, Default)]
pub struct KeyPairFactory {
    protector: PrivateKeyProtector,
}

impl KeyPairFactory {
    pub fn new(config: CryptoConfig) -> CryptoResult<Self> {
        Ok(Self {
            protector: PrivateKeyProtector::new(config)?,
        })
    }

    pub fn from_protector(protector: PrivateKeyProtector) -> Self {
        Self { protector }
    }

    pub fn config(&self) -> &CryptoConfig {
        self.protector.config()
    }

    /// Generate a key pair of `modulus_bits` and wrap the private key under
    /// `passphrase`.
    ///
    /// Every failure, including an out-of-range modulus, is reported as
    /// [`CryptoError::KeyGenerationFailed`]; no partial pair is returned.
    #[instrument(skip_all, fields(modulus_bits = modulus_bits))]
    pub fn generate(&self, modulus_bits: usize, passphrase: &str) -> CryptoResult<KeyPair> {
        let config = self.config();
        if !config.accepts_modulus(modulus_bits) {
            return Err(CryptoError::KeyGenerationFailed(format!(
                "modulus of {} bits is outside the supported range {}..={}",
                modulus_bits, config.min_modulus_bits, config.max_modulus_bits
            )));
        }

        let private_key = RsaPrivateKey::new(&mut OsRng, modulus_bits)
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("RSA: {}", e)))?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_der = private_key
            .to_pkcs8_der()
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("PKCS#8 encoding: {}", e)))?;
        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("SPKI encoding: {}", e)))?;

        let protected_private_key = self
            .protector
            .wrap(private_der.as_bytes(), passphrase)
            .and_then(|protected| protected.to_der())
            .map_err(as_generation_failure)?;

        info!(
            algorithm = %config.wrap_algorithm,
            iterations = config.iterations,
            "generated RSA key pair"
        );

        Ok(KeyPair {
            public_key: public_der.as_bytes().to_vec(),
            protected_private_key,
        })
    }
}

fn as_generation_failure(err: CryptoError) -> CryptoError {
    match err {
        CryptoError::KeyGenerationFailed(_) => err,
        other => CryptoError::KeyGenerationFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::protector::ProtectedPrivateKey;

    fn fast_factory() -> KeyPairFactory {
        KeyPairFactory::new(CryptoConfig::default().with_iterations(1000)).unwrap()
    }

    #[test]
    fn test_generate_produces_matching_pair() {
        let factory = fast_factory();
        let pair = factory.generate(2048, "correct-horse").unwrap();

        let public_key = decode_public_key(&pair.public_key).unwrap();
        let private_der = factory
            .protector
            .unwrap(&pair.protected_private_key, "correct-horse")
            .unwrap();
        let private_key = decode_private_key(&private_der).unwrap();

        assert_eq!(RsaPublicKey::from(&private_key), public_key);
    }

    #[test]
    fn test_container_carries_configured_parameters() {
        let pair = fast_factory().generate(2048, "pw").unwrap();
        let container = ProtectedPrivateKey::from_der(&pair.protected_private_key).unwrap();

        assert_eq!(container.params().name(), "pbe-sha1-3des");
        assert_eq!(container.params().salt().len(), 32);
        assert_eq!(container.params().iterations(), 1000);
    }

    #[test]
    fn test_rejects_weak_modulus() {
        let err = fast_factory().generate(1024, "pw").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyGenerationFailed);

        let err = fast_factory().generate(0, "pw").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyGenerationFailed);
    }

    #[test]
    fn test_rejects_oversized_modulus() {
        let err = fast_factory().generate(65536, "pw").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyGenerationFailed);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(
            decode_private_key(b"\x30\x03\x02\x01\x00").unwrap_err().kind(),
            ErrorKind::InvalidEncoding
        );
        assert_eq!(
            decode_public_key(b"junk").unwrap_err().kind(),
            ErrorKind::InvalidEncoding
        );
    }

    #[test]
    fn test_generation_failure_wrapping() {
        let err = as_generation_failure(CryptoError::RandomUnavailable("no entropy".into()));
        assert_eq!(err.kind(), ErrorKind::KeyGenerationFailed);
        assert!(err.to_string().contains("no entropy"));
    }
}
