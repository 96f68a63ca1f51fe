use crate::error::{CryptoError, CryptoResult};
use crate::keypair::{decode_private_key, decode_public_key};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPublicKey};
use sha1::Sha1;
use zeroize::Zeroizing;

/// SHA-1 output length, which fixes the OAEP overhead
const OAEP_HASH_LEN: usize = 20;

/// RSA-OAEP with SHA-1 and MGF1-SHA-1
pub struct AsymmetricCipher;

impl AsymmetricCipher {
    /// Largest payload `key` can encrypt in one block
    pub fn max_payload_len(key: &RsaPublicKey) -> usize {
        key.size().saturating_sub(2 * OAEP_HASH_LEN + 2)
    }

    /// Encrypt `payload` to a SubjectPublicKeyInfo DER key.
    ///
    /// The ciphertext is randomized and always as long as the modulus.
    pub fn encrypt(payload: &[u8], public_key_der: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = decode_public_key(public_key_der)?;
        let max = Self::max_payload_len(&key);
        if payload.len() > max {
            return Err(CryptoError::PayloadTooLarge {
                len: payload.len(),
                max,
            });
        }

        key.encrypt(&mut OsRng, Oaep::new::<Sha1>(), payload)
            .map_err(|e| match e {
                rsa::Error::MessageTooLong => CryptoError::PayloadTooLarge {
                    len: payload.len(),
                    max,
                },
                other => CryptoError::InvalidEncoding(format!("OAEP encryption: {}", other)),
            })
    }

    pub fn decrypt(ciphertext: &[u8], private_key_der: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let key = decode_private_key(private_key_der)?;

        key.decrypt(Oaep::new::<Sha1>(), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::DecryptionFailed("OAEP decryption failed".to_string()))
    }
}
