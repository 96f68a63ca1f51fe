//! PKCS#12 password-based encryption with SHA-1 and 3-key triple-DES
//!
//! Key and IV come from the PKCS#12 key-derivation function (RFC 7292,
//! appendix B.2) over the BMPString form of the passphrase.

use crate::error::{CryptoError, CryptoResult};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use der::asn1::{ObjectIdentifier, OctetString};
use der::Sequence;
use sha1::digest::Output;
use sha1::{Digest, Sha1};
use zeroize::Zeroizing;

/// pbeWithSHAAnd3-KeyTripleDES-CBC
pub const PBE_SHA1_3DES_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.12.1.3");

const TDES_KEY_LEN: usize = 24;
const TDES_IV_LEN: usize = 8;

/// SHA-1 output length (`u` in RFC 7292)
const HASH_LEN: usize = 20;
/// SHA-1 block length (`v` in RFC 7292)
const BLOCK_LEN: usize = 64;

type TdesCbcEnc = cbc::Encryptor<des::TdesEde3>;
type TdesCbcDec = cbc::Decryptor<des::TdesEde3>;

/// Diversifier selecting what the KDF produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPurpose {
    Key = 1,
    Iv = 2,
}

/// pkcs-12PbeParams: `SEQUENCE { salt OCTET STRING, iterations INTEGER }`
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct Pkcs12PbeParams {
    salt: OctetString,
    iterations: u32,
}

impl Pkcs12PbeParams {
    pub fn new(salt: Vec<u8>, iterations: u32) -> CryptoResult<Self> {
        let salt = OctetString::new(salt)
            .map_err(|e| CryptoError::MalformedContainer(format!("salt: {}", e)))?;
        Ok(Self { salt, iterations })
    }

    pub fn salt(&self) -> &[u8] {
        self.salt.as_bytes()
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn key_and_iv(&self, passphrase: &str) -> (Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>) {
        let password = bmp_password(passphrase);
        let (salt, iterations) = (self.salt(), self.iterations);
        let key = derive_key(&password, salt, iterations, KeyPurpose::Key, TDES_KEY_LEN);
        let iv = derive_key(&password, salt, iterations, KeyPurpose::Iv, TDES_IV_LEN);
        (key, iv)
    }

    pub fn encrypt(&self, passphrase: &str, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let (key, iv) = self.key_and_iv(passphrase);
        let cipher = TdesCbcEnc::new_from_slices(&key, &iv)
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("triple-DES init: {}", e)))?;
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    pub fn decrypt(&self, passphrase: &str, ciphertext: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let (key, iv) = self.key_and_iv(passphrase);
        let cipher = TdesCbcDec::new_from_slices(&key, &iv)
            .map_err(|e| CryptoError::MalformedContainer(format!("triple-DES init: {}", e)))?;
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| {
                CryptoError::DecryptionFailed(
                    "wrong passphrase or corrupted container".to_string(),
                )
            })
    }
}

/// Encode a passphrase as a NUL-terminated big-endian UTF-16 BMPString
pub fn bmp_password(passphrase: &str) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity((passphrase.len() + 1) * 2));
    for unit in passphrase.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out.extend_from_slice(&[0, 0]);
    out
}

/// PKCS#12 key derivation with SHA-1.
///
/// `password` must already be in BMPString form, see [`bmp_password`].
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    purpose: KeyPurpose,
    len: usize,
) -> Zeroizing<Vec<u8>> {
    let diversifier = [purpose as u8; BLOCK_LEN];

    let mut input = Zeroizing::new(Vec::new());
    input.extend_from_slice(&fill_blocks(salt));
    input.extend_from_slice(&fill_blocks(password));

    let mut out = Zeroizing::new(Vec::with_capacity(len));
    let mut block = Zeroizing::new([0u8; HASH_LEN]);
    let mut hasher = Sha1::new();
    while out.len() < len {
        hasher.update(diversifier);
        hasher.update(input.as_slice());
        hasher.finalize_into_reset(Output::<Sha1>::from_mut_slice(block.as_mut_slice()));
        for _ in 1..iterations {
            hasher.update(block.as_slice());
            hasher.finalize_into_reset(Output::<Sha1>::from_mut_slice(block.as_mut_slice()));
        }

        let take = (len - out.len()).min(HASH_LEN);
        out.extend_from_slice(&block[..take]);
        if out.len() >= len {
            break;
        }

        // I_j = (I_j + B + 1) mod 2^(8v), B being the hash repeated to v bytes
        let b: Zeroizing<Vec<u8>> =
            Zeroizing::new(block.iter().copied().cycle().take(BLOCK_LEN).collect());
        for chunk in input.chunks_mut(BLOCK_LEN) {
            add_with_carry(chunk, &b);
        }
    }

    out
}

fn fill_blocks(input: &[u8]) -> Zeroizing<Vec<u8>> {
    if input.is_empty() {
        return Zeroizing::new(Vec::new());
    }
    let len = BLOCK_LEN * input.len().div_ceil(BLOCK_LEN);
    Zeroizing::new(input.iter().copied().cycle().take(len).collect())
}

fn add_with_carry(block: &mut [u8], addend: &[u8]) {
    let mut carry = 1u16;
    for (x, y) in block.iter_mut().rev().zip(addend.iter().rev()) {
        let sum = u16::from(*x) + u16::from(*y) + carry;
        *x = (sum & 0xff) as u8;
        carry = sum >> 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vectors cross-checked against OpenSSL's PKCS12KDF with SHA-1.

    #[test]
    fn test_kdf_single_iteration() {
        let password = bmp_password("smeg");
        let salt = hex::decode("0a58cf64530d823f").unwrap();

        let key = derive_key(&password, &salt, 1, KeyPurpose::Key, 24);
        assert_eq!(
            hex::encode(key.as_slice()),
            "8aaae6297b6cb04642ab5b077851284eb7128f1a2a7fbca3"
        );

        let iv = derive_key(&password, &salt, 1, KeyPurpose::Iv, 8);
        assert_eq!(hex::encode(iv.as_slice()), "79993dfe048d3b76");
    }

    #[test]
    fn test_kdf_thousand_iterations() {
        let password = bmp_password("queeg");
        let salt = hex::decode("1682c0fc5b3f7ec5").unwrap();

        let key = derive_key(&password, &salt, 1000, KeyPurpose::Key, 24);
        assert_eq!(
            hex::encode(key.as_slice()),
            "483dd6e919d7de2e8e648ba8f862f3fbfbdc2bcb2c02957f"
        );

        let iv = derive_key(&password, &salt, 1000, KeyPurpose::Iv, 8);
        assert_eq!(hex::encode(iv.as_slice()), "9d461d1b00355c50");
    }

    #[test]
    fn test_kdf_output_longer_than_one_hash() {
        let password = bmp_password("sesame");
        let salt = [0xffu8; 8];

        let key = derive_key(&password, &salt, 2048, KeyPurpose::Key, 24);
        assert_eq!(
            hex::encode(key.as_slice()),
            "7cd9fd3e2b3be7691a44e3bef0f9ea0fb9b897d4e325d9d1"
        );
    }

    #[test]
    fn test_kdf_iterates_hash_in_place() {
        let password = bmp_password("chain");
        let salt = [0x5au8; 8];

        let mut input = fill_blocks(&salt).to_vec();
        input.extend_from_slice(&fill_blocks(&password));
        let mut hasher = Sha1::new();
        hasher.update([KeyPurpose::Key as u8; BLOCK_LEN]);
        hasher.update(&input);
        let expected = Sha1::digest(Sha1::digest(hasher.finalize()));

        let key = derive_key(&password, &salt, 3, KeyPurpose::Key, HASH_LEN);
        assert_eq!(key.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_kdf_carry_into_leading_zero() {
        let salt = hex::decode("f37e05b518324b4b").unwrap();

        let key = derive_key(&[0, 0], &salt, 2048, KeyPurpose::Key, 24);
        assert_eq!(
            hex::encode(key.as_slice()),
            "00f759ff47d14dd03665d5943cb3c4a39a2555c02aed66e1"
        );
    }

    #[test]
    fn test_bmp_password_encoding() {
        assert_eq!(bmp_password("").as_slice(), &[0, 0]);
        assert_eq!(bmp_password("ab").as_slice(), &[0, b'a', 0, b'b', 0, 0]);
        // U+00E9 stays one UTF-16 unit
        assert_eq!(bmp_password("\u{e9}").as_slice(), &[0x00, 0xe9, 0, 0]);
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let params = Pkcs12PbeParams::new(vec![7u8; 32], 16).unwrap();
        let ciphertext = params.encrypt("hunter2", b"private key bytes").unwrap();
        assert_eq!(ciphertext.len() % 8, 0);

        let plaintext = params.decrypt("hunter2", &ciphertext).unwrap();
        assert_eq!(plaintext.as_slice(), b"private key bytes");
    }

    #[test]
    fn test_params_der_layout() {
        use der::{Decode, Encode};

        let params = Pkcs12PbeParams::new(vec![0xaa; 4], 2048).unwrap();
        let encoded = params.to_der().unwrap();
        assert_eq!(hex::encode(&encoded), "300a0404aaaaaaaa02020800");
        assert_eq!(Pkcs12PbeParams::from_der(&encoded).unwrap(), params);
    }
}
