//! Password-based encryption for shareable links.
//!
//! A share token is `base64url(salt ‖ nonce ‖ ciphertext)`. The key is derived
//! per token from the user's password (PBKDF2-SHA256), the payload is sealed
//! with AES-256-GCM.

pub mod encryption;
pub mod keys;

pub use encryption::*;
pub use keys::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,

    /// Wrong password and corrupted token both map here.
    #[error("Decryption failed: wrong password or corrupted link")]
    DecryptionFailed,
}
