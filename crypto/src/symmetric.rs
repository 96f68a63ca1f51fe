use crate::error::{CryptoError, CryptoResult};
use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256-CBC with PKCS#7 padding.
///
/// Output is not authenticated. Callers that need integrity pair it with a
/// signature from [`SignatureEngine`](crate::SignatureEngine).
pub struct SymmetricCipher;

impl SymmetricCipher {
    pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> CryptoResult<Vec<u8>> {
        check_lengths(key, iv)?;
        let cipher = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| {
            CryptoError::InvalidKeyOrIv {
                what: "key",
                expected: KEY_LEN,
                got: key.len(),
            }
        })?;
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        check_lengths(key, iv)?;
        let cipher = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| {
            CryptoError::InvalidKeyOrIv {
                what: "key",
                expected: KEY_LEN,
                got: key.len(),
            }
        })?;
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::DecryptionFailed("invalid padding".to_string()))
    }
}

fn check_lengths(key: &[u8], iv: &[u8]) -> CryptoResult<()> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::InvalidKeyOrIv {
            what: "key",
            expected: KEY_LEN,
            got: key.len(),
        });
    }
    if iv.len() != IV_LEN {
        return Err(CryptoError::InvalidKeyOrIv {
            what: "iv",
            expected: IV_LEN,
            got: iv.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    fn test_key() -> Vec<u8> {
        (0u8..32).collect()
    }

    fn test_iv() -> Vec<u8> {
        (0u8..16).rev().collect()
    }

    #[test]
    fn test_known_answer() {
        let ciphertext =
            SymmetricCipher::encrypt(b"one time message", &test_key(), &test_iv()).unwrap();
        assert_eq!(
            hex::encode(&ciphertext),
            "997e644ecba992d6a2156ee601f6bb63235cf28171baf1c9490a4da8d9ae8f94"
        );

        let plaintext = SymmetricCipher::decrypt(&ciphertext, &test_key(), &test_iv()).unwrap();
        assert_eq!(plaintext.as_slice(), b"one time message");
    }

    #[test]
    fn test_empty_plaintext_is_one_padding_block() {
        let ciphertext = SymmetricCipher::encrypt(b"", &test_key(), &test_iv()).unwrap();
        assert_eq!(hex::encode(&ciphertext), "daf015b15d25544a9510b84fb6d94efd");
        assert!(SymmetricCipher::decrypt(&ciphertext, &test_key(), &test_iv())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rejects_bad_key_length() {
        let err = SymmetricCipher::encrypt(b"data", &[0u8; 16], &test_iv()).unwrap_err();
        assert_eq!(
            err,
            CryptoError::InvalidKeyOrIv {
                what: "key",
                expected: 32,
                got: 16
            }
        );
    }

    #[test]
    fn test_rejects_bad_iv_length() {
        let err = SymmetricCipher::decrypt(&[0u8; 16], &test_key(), &[0u8; 12]).unwrap_err();
        assert_eq!(
            err,
            CryptoError::InvalidKeyOrIv {
                what: "iv",
                expected: 16,
                got: 12
            }
        );
    }

    #[test]
    fn test_rejects_partial_block() {
        let err = SymmetricCipher::decrypt(&[0u8; 15], &test_key(), &test_iv()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailed);

        let err = SymmetricCipher::decrypt(&[], &test_key(), &test_iv()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
    }

    #[test]
    fn test_wrong_key_does_not_return_plaintext() {
        let ciphertext =
            SymmetricCipher::encrypt(b"one time message", &test_key(), &test_iv()).unwrap();
        let mut other_key = test_key();
        other_key[0] ^= 0xff;

        match SymmetricCipher::decrypt(&ciphertext, &other_key, &test_iv()) {
            Err(err) => assert_eq!(err.kind(), ErrorKind::DecryptionFailed),
            Ok(plaintext) => assert_ne!(plaintext.as_slice(), b"one time message"),
        }
    }

    proptest! {
        #[test]
        fn test_recovers_any_plaintext(
            plaintext in prop::collection::vec(any::<u8>(), 0..512),
            key in prop::array::uniform32(any::<u8>()),
            iv in prop::array::uniform16(any::<u8>()),
        ) {
            let ciphertext = SymmetricCipher::encrypt(&plaintext, &key, &iv).unwrap();
            prop_assert_eq!(ciphertext.len(), (plaintext.len() / 16 + 1) * 16);

            let recovered = SymmetricCipher::decrypt(&ciphertext, &key, &iv).unwrap();
            prop_assert_eq!(recovered.as_slice(), plaintext.as_slice());
        }
    }
}
