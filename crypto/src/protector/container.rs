//! Self-describing container for a passphrase-protected private key.
//!
//! Encoded as PKCS#8 `EncryptedPrivateKeyInfo`:
//!
//! ```text
//! EncryptedPrivateKeyInfo ::= SEQUENCE {
//!     encryptionAlgorithm  AlgorithmIdentifier,
//!     encryptedData        OCTET STRING }
//! ```
//!
//! The algorithm identifier carries the scheme and every parameter needed
//! to reverse it, so decrypting never relies on local defaults.

use super::pbes2::{Pbes2Params, Prf, PBES2_OID};
use super::pkcs12::{Pkcs12PbeParams, PBE_SHA1_3DES_OID};
use crate::error::{CryptoError, CryptoResult};
use der::asn1::{ObjectIdentifier, OctetString};
use der::{Any, Decode, DecodeOwned, Encode, Sequence};
use spki::AlgorithmIdentifierOwned;
use zeroize::Zeroizing;

#[derive(Sequence)]
struct EncryptedPrivateKeyInfo {
    encryption_algorithm: AlgorithmIdentifierOwned,
    encrypted_data: OctetString,
}

/// Re-read an `ANY` value as a concrete ASN.1 type
pub(crate) fn from_any<T: DecodeOwned>(any: &Any) -> der::Result<T> {
    T::from_der(&any.to_der()?)
}

/// Capture a concrete ASN.1 value as `ANY`
pub(crate) fn to_any<T: Encode>(value: &T) -> der::Result<Any> {
    Any::from_der(&value.to_der()?)
}

/// Wrapping scheme together with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapParams {
    Pkcs12Sha1TripleDes(Pkcs12PbeParams),
    Pbes2(Pbes2Params),
}

impl WrapParams {
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            WrapParams::Pkcs12Sha1TripleDes(_) => PBE_SHA1_3DES_OID,
            WrapParams::Pbes2(_) => PBES2_OID,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WrapParams::Pkcs12Sha1TripleDes(_) => "pbe-sha1-3des",
            WrapParams::Pbes2(p) if p.prf() == Prf::HmacSha1 => "pbes2-sha1-aes256-cbc",
            WrapParams::Pbes2(_) => "pbes2-sha256-aes256-cbc",
        }
    }

    pub fn salt(&self) -> &[u8] {
        match self {
            WrapParams::Pkcs12Sha1TripleDes(p) => p.salt(),
            WrapParams::Pbes2(p) => p.salt(),
        }
    }

    pub fn iterations(&self) -> u32 {
        match self {
            WrapParams::Pkcs12Sha1TripleDes(p) => p.iterations(),
            WrapParams::Pbes2(p) => p.iterations(),
        }
    }

    pub fn encrypt(&self, passphrase: &str, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        match self {
            WrapParams::Pkcs12Sha1TripleDes(p) => p.encrypt(passphrase, plaintext),
            WrapParams::Pbes2(p) => p.encrypt(passphrase, plaintext),
        }
    }

    pub fn decrypt(&self, passphrase: &str, ciphertext: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        match self {
            WrapParams::Pkcs12Sha1TripleDes(p) => p.decrypt(passphrase, ciphertext),
            WrapParams::Pbes2(p) => p.decrypt(passphrase, ciphertext),
        }
    }

    fn from_algorithm_identifier(algorithm: &AlgorithmIdentifierOwned) -> CryptoResult<Self> {
        let params = algorithm.parameters.as_ref().ok_or_else(|| {
            CryptoError::MalformedContainer(format!("{} has no parameters", algorithm.oid))
        })?;

        if algorithm.oid == PBE_SHA1_3DES_OID {
            let params: Pkcs12PbeParams = from_any(params).map_err(|e| {
                CryptoError::MalformedContainer(format!("PKCS#12 PBE parameters: {}", e))
            })?;
            if params.iterations() == 0 {
                return Err(CryptoError::MalformedContainer(
                    "PKCS#12 PBE iteration count is zero".to_string(),
                ));
            }
            Ok(WrapParams::Pkcs12Sha1TripleDes(params))
        } else if algorithm.oid == PBES2_OID {
            Pbes2Params::from_any(params).map(WrapParams::Pbes2)
        } else {
            Err(CryptoError::MalformedContainer(format!(
                "unsupported wrapping algorithm {}",
                algorithm.oid
            )))
        }
    }

    fn to_algorithm_identifier(&self) -> der::Result<AlgorithmIdentifierOwned> {
        let parameters = match self {
            WrapParams::Pkcs12Sha1TripleDes(p) => to_any(p)?,
            WrapParams::Pbes2(p) => p.to_any()?,
        };
        Ok(AlgorithmIdentifierOwned {
            oid: self.oid(),
            parameters: Some(parameters),
        })
    }
}

/// A private key encrypted under a passphrase-derived key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedPrivateKey {
    params: WrapParams,
    ciphertext: Vec<u8>,
}

impl ProtectedPrivateKey {
    pub fn new(params: WrapParams, ciphertext: Vec<u8>) -> Self {
        Self { params, ciphertext }
    }

    pub fn params(&self) -> &WrapParams {
        &self.params
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Parse an `EncryptedPrivateKeyInfo` DER encoding
    pub fn from_der(bytes: &[u8]) -> CryptoResult<Self> {
        let info = EncryptedPrivateKeyInfo::from_der(bytes)
            .map_err(|e| CryptoError::MalformedContainer(e.to_string()))?;
        let params = WrapParams::from_algorithm_identifier(&info.encryption_algorithm)?;

        Ok(Self {
            params,
            ciphertext: info.encrypted_data.as_bytes().to_vec(),
        })
    }

    /// Serialize as `EncryptedPrivateKeyInfo` DER
    pub fn to_der(&self) -> CryptoResult<Vec<u8>> {
        let encode = || -> der::Result<Vec<u8>> {
            EncryptedPrivateKeyInfo {
                encryption_algorithm: self.params.to_algorithm_identifier()?,
                encrypted_data: OctetString::new(self.ciphertext.clone())?,
            }
            .to_der()
        };
        encode().map_err(|e| CryptoError::MalformedContainer(format!("encoding: {}", e)))
    }
}
