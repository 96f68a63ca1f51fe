//! Client-side cryptographic primitives
//!
//! - Secure random bytes and one-time symmetric key material
//! - RSA key pairs whose private key is stored encrypted under a passphrase
//! - RSA signatures (PKCS#1 v1.5 with SHA-256)
//! - RSA-OAEP public-key encryption (SHA-1, MGF1-SHA-1)
//! - AES-256-CBC shared-key encryption
//!
//! Everything is synchronous and holds no shared mutable state; a host
//! application is expected to call in from worker threads. [`CryptoEngine`]
//! is the hex-string boundary, the component types below it work on bytes.
//!
//! # Example
//!
//! ```rust
//! use client_crypto::CryptoEngine;
//!
//! # fn main() -> Result<(), client_crypto::CryptoError> {
//! let engine = CryptoEngine::new();
//! let key = hex::encode(engine.generate_one_time_key()?);
//! let iv = hex::encode(engine.generate_one_time_iv()?);
//!
//! let ciphertext = engine.symmetric_encrypt("68656c6c6f", &key, &iv)?;
//! let plaintext = engine.symmetric_decrypt(&hex::encode(&ciphertext), &key, &iv)?;
//! assert_eq!(plaintext.as_slice(), b"hello");
//! # Ok(())
//! # }
//! ```

pub mod asymmetric;
pub mod codec;
pub mod config;
pub mod digest;
pub mod engine;
pub mod error;
pub mod keypair;
pub mod protector;
pub mod random;
pub mod signature;
pub mod symmetric;

pub use asymmetric::AsymmetricCipher;
pub use codec::{bytes_to_hex, hex_to_bytes};
pub use config::{CryptoConfig, WrapAlgorithm};
pub use engine::CryptoEngine;
pub use error::*;
pub use keypair::{KeyPair, KeyPairFactory};
pub use protector::{PrivateKeyProtector, ProtectedPrivateKey, WrapParams};
pub use random::RandomSource;
pub use signature::SignatureEngine;
pub use symmetric::SymmetricCipher;
