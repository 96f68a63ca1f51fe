//! Key protection configuration
//!
//! Parameters that used to be fixed module constants:
//! - Password-based wrapping scheme for new containers
//! - Salt length and iteration count for the key derivation
//! - Accepted RSA modulus range for key generation

use crate::error::{CryptoError, CryptoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Salt length used by containers this crate produces by default
pub const DEFAULT_SALT_LEN: usize = 32;

/// Iteration count used by containers this crate produces by default
pub const DEFAULT_ITERATIONS: u32 = 250_000;

/// Smallest modulus any configuration may accept
pub const MIN_MODULUS_BITS: usize = 2048;

/// Largest modulus any configuration may accept
pub const MAX_MODULUS_BITS: usize = 16384;

const MIN_SALT_LEN: usize = 8;
const MAX_SALT_LEN: usize = 64;

/// Password-based scheme used to wrap freshly generated private keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapAlgorithm {
    /// pbeWithSHAAnd3-KeyTripleDES-CBC (PKCS#12). Legacy, kept for the
    /// mobile counterpart which can only read this scheme.
    #[default]
    #[serde(rename = "pbe-sha1-3des")]
    Pkcs12Sha1TripleDes,
    /// PBES2 with PBKDF2-HMAC-SHA256 and AES-256-CBC
    #[serde(rename = "pbes2-sha256-aes256-cbc")]
    Pbes2Sha256Aes256Cbc,
}

impl WrapAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            WrapAlgorithm::Pkcs12Sha1TripleDes => "pbe-sha1-3des",
            WrapAlgorithm::Pbes2Sha256Aes256Cbc => "pbes2-sha256-aes256-cbc",
        }
    }
}

impl fmt::Display for WrapAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WrapAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pbe-sha1-3des"
            | "pbewithsha1anddesede"
            | "pbewithshaand3-keytripledes-cbc"
            | "pbewithsha1and3-keytripledes-cbc" => Ok(WrapAlgorithm::Pkcs12Sha1TripleDes),
            "pbes2-sha256-aes256-cbc" | "pbes2" | "aes-256-cbc" => {
                Ok(WrapAlgorithm::Pbes2Sha256Aes256Cbc)
            }
            _ => Err(CryptoError::Configuration(format!(
                "Unknown wrap algorithm: {}. Valid options: pbe-sha1-3des, pbes2-sha256-aes256-cbc",
                s
            ))),
        }
    }
}

/// Configuration shared by the key-pair factory and the private-key protector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Scheme for new containers. Unwrapping always follows the scheme
    /// embedded in the container.
    pub wrap_algorithm: WrapAlgorithm,

    /// Salt length in bytes for new containers
    pub salt_len: usize,

    /// Key-derivation iteration count for new containers
    pub iterations: u32,

    /// Smallest RSA modulus the factory will generate
    pub min_modulus_bits: usize,

    /// Largest RSA modulus the factory will generate
    pub max_modulus_bits: usize,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            wrap_algorithm: WrapAlgorithm::default(),
            salt_len: DEFAULT_SALT_LEN,
            iterations: DEFAULT_ITERATIONS,
            min_modulus_bits: MIN_MODULUS_BITS,
            max_modulus_bits: 8192,
        }
    }
}

impl CryptoConfig {
    pub fn with_wrap_algorithm(mut self, algorithm: WrapAlgorithm) -> Self {
        self.wrap_algorithm = algorithm;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_salt_len(mut self, salt_len: usize) -> Self {
        self.salt_len = salt_len;
        self
    }

    pub fn with_modulus_range(mut self, min_bits: usize, max_bits: usize) -> Self {
        self.min_modulus_bits = min_bits;
        self.max_modulus_bits = max_bits;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> CryptoResult<()> {
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&self.salt_len) {
            return Err(CryptoError::Configuration(format!(
                "Salt length must be between {} and {} bytes, got {}",
                MIN_SALT_LEN, MAX_SALT_LEN, self.salt_len
            )));
        }

        if self.iterations == 0 {
            return Err(CryptoError::Configuration(
                "Iteration count must be at least 1".to_string(),
            ));
        }

        if self.min_modulus_bits < MIN_MODULUS_BITS {
            return Err(CryptoError::Configuration(format!(
                "Minimum modulus must be at least {} bits, got {}",
                MIN_MODULUS_BITS, self.min_modulus_bits
            )));
        }

        if self.max_modulus_bits > MAX_MODULUS_BITS {
            return Err(CryptoError::Configuration(format!(
                "Maximum modulus must be at most {} bits, got {}",
                MAX_MODULUS_BITS, self.max_modulus_bits
            )));
        }

        if self.min_modulus_bits > self.max_modulus_bits {
            return Err(CryptoError::Configuration(format!(
                "Minimum modulus ({} bits) exceeds maximum ({} bits)",
                self.min_modulus_bits, self.max_modulus_bits
            )));
        }

        Ok(())
    }

    /// Check a requested modulus size against the configured range
    pub fn accepts_modulus(&self, bits: usize) -> bool {
        (self.min_modulus_bits..=self.max_modulus_bits).contains(&bits)
    }
}
