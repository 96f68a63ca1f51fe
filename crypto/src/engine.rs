//! Hex-string boundary over the crate's primitives.
//!
//! Every hex argument is decoded before any cryptographic work starts, so a
//! malformed argument fails with [`CryptoError::InvalidEncoding`] and never
//! reaches a cipher. Results are raw bytes.

use crate::codec::hex_to_bytes;
use crate::config::CryptoConfig;
use crate::error::CryptoResult;
use crate::keypair::{KeyPair, KeyPairFactory};
use crate::protector::PrivateKeyProtector;
use crate::random::{RandomSource, ONE_TIME_IV_LEN, ONE_TIME_KEY_LEN};
use crate::{digest, AsymmetricCipher, SignatureEngine, SymmetricCipher};
use zeroize::Zeroizing;

#[cfg(doc)]
use crate::error::CryptoError;

/// Stateless entry point for a bridge layer.
///
/// Holds only the immutable configuration, so one engine can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct CryptoEngine {
    factory: KeyPairFactory,
    protector: PrivateKeyProtector,
}

impl CryptoEngine {
    /// Engine with the default legacy-compatible configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CryptoConfig) -> CryptoResult<Self> {
        let protector = PrivateKeyProtector::new(config)?;
        Ok(Self {
            factory: KeyPairFactory::from_protector(protector.clone()),
            protector,
        })
    }

    pub fn config(&self) -> &CryptoConfig {
        self.protector.config()
    }

    pub fn random_bytes(&self, len: usize) -> CryptoResult<Vec<u8>> {
        RandomSource::generate(len)
    }

    pub fn generate_one_time_key(&self) -> CryptoResult<[u8; ONE_TIME_KEY_LEN]> {
        RandomSource::one_time_key()
    }

    pub fn generate_one_time_iv(&self) -> CryptoResult<[u8; ONE_TIME_IV_LEN]> {
        RandomSource::one_time_iv()
    }

    /// SHA-1 of hex-encoded `data`, as lowercase hex
    pub fn sha1(&self, data_hex: &str) -> CryptoResult<String> {
        Ok(digest::sha1_hex(&hex_to_bytes(data_hex)?))
    }

    /// SHA-256 of hex-encoded `data`, as lowercase hex
    pub fn sha256(&self, data_hex: &str) -> CryptoResult<String> {
        Ok(digest::sha256_hex(&hex_to_bytes(data_hex)?))
    }

    pub fn generate_rsa_key_pair(
        &self,
        modulus_bits: usize,
        passphrase: &str,
    ) -> CryptoResult<KeyPair> {
        self.factory.generate(modulus_bits, passphrase)
    }

    /// Recover the PKCS#8 private key from a hex-encoded protected container
    pub fn decrypt_private_key(
        &self,
        protected_private_key_hex: &str,
        passphrase: &str,
    ) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let container = hex_to_bytes(protected_private_key_hex)?;
        self.protector.unwrap(&container, passphrase)
    }

    pub fn sign(&self, payload_hex: &str, private_key_hex: &str) -> CryptoResult<Vec<u8>> {
        let payload = hex_to_bytes(payload_hex)?;
        let private_key = Zeroizing::new(hex_to_bytes(private_key_hex)?);
        SignatureEngine::sign(&payload, &private_key)
    }

    /// `Ok(false)` when the signature does not match
    pub fn verify(
        &self,
        payload_hex: &str,
        public_key_hex: &str,
        signature_hex: &str,
    ) -> CryptoResult<bool> {
        let payload = hex_to_bytes(payload_hex)?;
        let public_key = hex_to_bytes(public_key_hex)?;
        let signature = hex_to_bytes(signature_hex)?;
        SignatureEngine::verify(&payload, &public_key, &signature)
    }

    pub fn public_encrypt(&self, payload_hex: &str, public_key_hex: &str) -> CryptoResult<Vec<u8>> {
        let payload = Zeroizing::new(hex_to_bytes(payload_hex)?);
        let public_key = hex_to_bytes(public_key_hex)?;
        AsymmetricCipher::encrypt(&payload, &public_key)
    }

    pub fn private_decrypt(
        &self,
        ciphertext_hex: &str,
        private_key_hex: &str,
    ) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let ciphertext = hex_to_bytes(ciphertext_hex)?;
        let private_key = Zeroizing::new(hex_to_bytes(private_key_hex)?);
        AsymmetricCipher::decrypt(&ciphertext, &private_key)
    }

    pub fn symmetric_encrypt(
        &self,
        payload_hex: &str,
        key_hex: &str,
        iv_hex: &str,
    ) -> CryptoResult<Vec<u8>> {
        let payload = Zeroizing::new(hex_to_bytes(payload_hex)?);
        let key = Zeroizing::new(hex_to_bytes(key_hex)?);
        let iv = hex_to_bytes(iv_hex)?;
        SymmetricCipher::encrypt(&payload, &key, &iv)
    }

    pub fn symmetric_decrypt(
        &self,
        ciphertext_hex: &str,
        key_hex: &str,
        iv_hex: &str,
    ) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let ciphertext = hex_to_bytes(ciphertext_hex)?;
        let key = Zeroizing::new(hex_to_bytes(key_hex)?);
        let iv = hex_to_bytes(iv_hex)?;
        SymmetricCipher::decrypt(&ciphertext, &key, &iv)
    }
}
