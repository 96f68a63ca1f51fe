use crate::error::{CryptoError, CryptoResult};
use crate::keypair::{decode_private_key, decode_public_key};
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256};

/// RSASSA-PKCS1-v1_5 with SHA-256 ("SHA256withRSA")
pub struct SignatureEngine;

impl SignatureEngine {
    /// Sign `payload` with a PKCS#8 DER private key.
    ///
    /// Deterministic: the same key and payload always give the same signature.
    pub fn sign(payload: &[u8], private_key_der: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = decode_private_key(private_key_der)?;
        let digest = Sha256::digest(payload);

        key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))
    }

    /// Check `signature` over `payload` against a SubjectPublicKeyInfo DER key.
    ///
    /// A signature that does not match is `Ok(false)`; only an unreadable
    /// public key is an error.
    pub fn verify(payload: &[u8], public_key_der: &[u8], signature: &[u8]) -> CryptoResult<bool> {
        let key = decode_public_key(public_key_der)?;
        let digest = Sha256::digest(payload);

        Ok(key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .is_ok())
    }
}
