//! PBES2 (PKCS#5 v2) with PBKDF2 and AES-256-CBC
//!
//! This is the layout OpenSSL writes for `aes-256-cbc` encrypted PKCS#8
//! keys. Only the PBKDF2 + AES-256-CBC combination is understood.

use super::container::{from_any, to_any};
use crate::error::{CryptoError, CryptoResult};
use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use der::asn1::{Null, ObjectIdentifier, OctetString};
use der::Sequence;
use sha1::Sha1;
use sha2::Sha256;
use spki::AlgorithmIdentifierOwned;
use zeroize::Zeroizing;

pub const PBES2_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.5.13");
pub const PBKDF2_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.5.12");
pub const HMAC_WITH_SHA1_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.2.7");
pub const HMAC_WITH_SHA256_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.2.9");
pub const AES_256_CBC_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.42");

pub const AES_256_KEY_LEN: usize = 32;
pub const AES_IV_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

#[derive(Sequence)]
struct Pbes2ParamsAsn1 {
    key_derivation_func: AlgorithmIdentifierOwned,
    encryption_scheme: AlgorithmIdentifierOwned,
}

#[derive(Sequence)]
struct Pbkdf2ParamsAsn1 {
    salt: OctetString,
    iteration_count: u32,
    key_length: Option<u32>,
    prf: Option<AlgorithmIdentifierOwned>,
}

/// Pseudo-random function driving PBKDF2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prf {
    /// DEFAULT when the parameters omit the PRF
    HmacSha1,
    HmacSha256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbes2Params {
    salt: Vec<u8>,
    iterations: u32,
    prf: Prf,
    iv: [u8; AES_IV_LEN],
}

impl Pbes2Params {
    /// PBKDF2-HMAC-SHA256 parameters for a new container
    pub fn new(salt: Vec<u8>, iterations: u32, iv: [u8; AES_IV_LEN]) -> Self {
        Self {
            salt,
            iterations,
            prf: Prf::HmacSha256,
            iv,
        }
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn prf(&self) -> Prf {
        self.prf
    }

    pub fn iv(&self) -> &[u8; AES_IV_LEN] {
        &self.iv
    }

    pub(crate) fn from_any(params: &der::Any) -> CryptoResult<Self> {
        let malformed = |what: &str| CryptoError::MalformedContainer(format!("PBES2 {}", what));

        let outer: Pbes2ParamsAsn1 =
            from_any(params).map_err(|e| malformed(&format!("parameters: {}", e)))?;

        if outer.key_derivation_func.oid != PBKDF2_OID {
            return Err(malformed(&format!(
                "key derivation {} is not PBKDF2",
                outer.key_derivation_func.oid
            )));
        }
        let kdf_params = outer
            .key_derivation_func
            .parameters
            .as_ref()
            .ok_or_else(|| malformed("PBKDF2 parameters missing"))?;
        let kdf: Pbkdf2ParamsAsn1 =
            from_any(kdf_params).map_err(|e| malformed(&format!("PBKDF2 parameters: {}", e)))?;

        if let Some(key_length) = kdf.key_length {
            if key_length as usize != AES_256_KEY_LEN {
                return Err(malformed(&format!("key length {} is not 32", key_length)));
            }
        }
        if kdf.iteration_count == 0 {
            return Err(malformed("iteration count is zero"));
        }

        let prf = match kdf.prf {
            None => Prf::HmacSha1,
            Some(alg) if alg.oid == HMAC_WITH_SHA1_OID => Prf::HmacSha1,
            Some(alg) if alg.oid == HMAC_WITH_SHA256_OID => Prf::HmacSha256,
            Some(alg) => return Err(malformed(&format!("unsupported PRF {}", alg.oid))),
        };

        if outer.encryption_scheme.oid != AES_256_CBC_OID {
            return Err(malformed(&format!(
                "unsupported cipher {}",
                outer.encryption_scheme.oid
            )));
        }
        let iv_any = outer
            .encryption_scheme
            .parameters
            .as_ref()
            .ok_or_else(|| malformed("IV missing"))?;
        let iv: OctetString = from_any(iv_any).map_err(|e| malformed(&format!("IV: {}", e)))?;
        let iv: [u8; AES_IV_LEN] = iv
            .as_bytes()
            .try_into()
            .map_err(|_| malformed(&format!("IV length {} is not 16", iv.as_bytes().len())))?;

        Ok(Self {
            salt: kdf.salt.as_bytes().to_vec(),
            iterations: kdf.iteration_count,
            prf,
            iv,
        })
    }

    pub(crate) fn to_any(&self) -> der::Result<der::Any> {
        let prf_oid = match self.prf {
            Prf::HmacSha1 => HMAC_WITH_SHA1_OID,
            Prf::HmacSha256 => HMAC_WITH_SHA256_OID,
        };
        let kdf = Pbkdf2ParamsAsn1 {
            salt: OctetString::new(self.salt.clone())?,
            iteration_count: self.iterations,
            key_length: None,
            prf: Some(AlgorithmIdentifierOwned {
                oid: prf_oid,
                parameters: Some(to_any(&Null)?),
            }),
        };

        to_any(&Pbes2ParamsAsn1 {
            key_derivation_func: AlgorithmIdentifierOwned {
                oid: PBKDF2_OID,
                parameters: Some(to_any(&kdf)?),
            },
            encryption_scheme: AlgorithmIdentifierOwned {
                oid: AES_256_CBC_OID,
                parameters: Some(to_any(&OctetString::new(self.iv.to_vec())?)?),
            },
        })
    }

    fn derive_key(&self, passphrase: &str) -> Zeroizing<[u8; AES_256_KEY_LEN]> {
        let mut key = Zeroizing::new([0u8; AES_256_KEY_LEN]);
        match self.prf {
            Prf::HmacSha1 => pbkdf2::pbkdf2_hmac::<Sha1>(
                passphrase.as_bytes(),
                &self.salt,
                self.iterations,
                key.as_mut_slice(),
            ),
            Prf::HmacSha256 => pbkdf2::pbkdf2_hmac::<Sha256>(
                passphrase.as_bytes(),
                &self.salt,
                self.iterations,
                key.as_mut_slice(),
            ),
        }
        key
    }

    pub fn encrypt(&self, passphrase: &str, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = self.derive_key(passphrase);
        let cipher = Aes256CbcEnc::new_from_slices(key.as_slice(), &self.iv)
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("AES init: {}", e)))?;
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    pub fn decrypt(&self, passphrase: &str, ciphertext: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let key = self.derive_key(passphrase);
        let cipher = Aes256CbcDec::new_from_slices(key.as_slice(), &self.iv)
            .map_err(|e| CryptoError::MalformedContainer(format!("AES init: {}", e)))?;
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
