//! Passphrase protection for private keys at rest.
//!
//! [`PrivateKeyProtector::wrap`] encrypts a PKCS#8 private key under a key
//! derived from the passphrase and a fresh salt, producing a
//! [`ProtectedPrivateKey`]. [`PrivateKeyProtector::unwrap`] reverses it using
//! whatever scheme and parameters the container names.

pub mod container;
pub mod pbes2;
pub mod pkcs12;

pub use container::{ProtectedPrivateKey, WrapParams};
pub use pbes2::{Pbes2Params, Prf};
pub use pkcs12::Pkcs12PbeParams;

use crate::config::{CryptoConfig, WrapAlgorithm};
use crate::error::{CryptoError, CryptoResult};
use crate::keypair::decode_private_key;
use crate::random::RandomSource;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

#[derive(Debug, Clone, Default)]
pub struct PrivateKeyProtector {
    config: CryptoConfig,
}

impl PrivateKeyProtector {
    pub fn new(config: CryptoConfig) -> CryptoResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }

    /// Encrypt a PKCS#8 private key under `passphrase`
    #[instrument(
        skip_all,
        fields(algorithm = %self.config.wrap_algorithm, iterations = self.config.iterations)
    )]
    pub fn wrap(
        &self,
        private_key_der: &[u8],
        passphrase: &str,
    ) -> CryptoResult<ProtectedPrivateKey> {
        let salt = RandomSource::generate(self.config.salt_len)?;
        let params = match self.config.wrap_algorithm {
            WrapAlgorithm::Pkcs12Sha1TripleDes => WrapParams::Pkcs12Sha1TripleDes(
                Pkcs12PbeParams::new(salt, self.config.iterations)?,
            ),
            WrapAlgorithm::Pbes2Sha256Aes256Cbc => WrapParams::Pbes2(Pbes2Params::new(
                salt,
                self.config.iterations,
                RandomSource::one_time_iv()?,
            )),
        };

        let ciphertext = params.encrypt(passphrase, private_key_der)?;
        debug!(ciphertext_len = ciphertext.len(), "private key wrapped");

        Ok(ProtectedPrivateKey::new(params, ciphertext))
    }

    /// Decrypt a container produced by [`wrap`](Self::wrap) or any other
    /// `EncryptedPrivateKeyInfo` writer using a supported scheme.
    ///
    /// Returns the PKCS#8 encoding of the private key. A wrong passphrase
    /// yields [`CryptoError::DecryptionFailed`]; it cannot be told apart from
    /// a damaged ciphertext.
    #[instrument(skip_all, fields(container_len = container.len()))]
    pub fn unwrap(&self, container: &[u8], passphrase: &str) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let protected = ProtectedPrivateKey::from_der(container)?;
        debug!(
            algorithm = protected.params().name(),
            iterations = protected.params().iterations(),
            "unwrapping private key"
        );

        let plaintext = protected
            .params()
            .decrypt(passphrase, protected.ciphertext())
            .map_err(|e| {
                debug!(kind = ?e.kind(), "private key unwrap failed");
                e
            })?;

        // Padding can line up by chance under a wrong key; the structure check
        // catches what the padding check misses.
        decode_private_key(&plaintext).map_err(|_| {
            CryptoError::DecryptionFailed("decrypted data is not a valid private key".to_string())
        })?;

        Ok(plaintext)
    }
}
