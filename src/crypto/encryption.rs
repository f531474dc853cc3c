use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use zeroize::Zeroizing;

use super::keys::{ShareKey, SALT_LENGTH};
use super::CryptoError;

pub const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;

/// Sealed share payload: salt + nonce + ciphertext (includes AES-GCM auth tag)
#[derive(Debug, Clone)]
pub struct EncryptedToken {
    pub salt: [u8; SALT_LENGTH],
    pub nonce: [u8; NONCE_LENGTH],
    pub ciphertext: Vec<u8>,
}

impl EncryptedToken {
    /// Seal plaintext under `key`, with a fresh random nonce
    fn seal(key: &ShareKey, plaintext: &[u8]) -> Result<Self, CryptoError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        Ok(Self {
            salt: key.salt(),
            nonce: nonce_bytes,
            ciphertext,
        })
    }

    fn open(&self, key: &ShareKey) -> Result<Vec<u8>, CryptoError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        cipher
            .decrypt(Nonce::from_slice(&self.nonce), self.ciphertext.as_ref())
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    /// Serialize to bytes: [16-byte salt][12-byte nonce][ciphertext...]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_LENGTH + NONCE_LENGTH + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Deserialize from bytes: [16-byte salt][12-byte nonce][ciphertext...]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < SALT_LENGTH + NONCE_LENGTH + TAG_LENGTH {
            return Err(CryptoError::DecryptionFailed);
        }

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&bytes[..SALT_LENGTH]);
        let mut nonce = [0u8; NONCE_LENGTH];
        nonce.copy_from_slice(&bytes[SALT_LENGTH..SALT_LENGTH + NONCE_LENGTH]);
        let ciphertext = bytes[SALT_LENGTH + NONCE_LENGTH..].to_vec();

        Ok(Self {
            salt,
            nonce,
            ciphertext,
        })
    }

    /// URL-safe text form, unpadded base64url
    pub fn to_token(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    /// Parse the text form; trailing `=` padding is tolerated
    pub fn from_token(token: &str) -> Result<Self, CryptoError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim().trim_end_matches('='))
            .map_err(|_| CryptoError::DecryptionFailed)?;
        Self::from_bytes(&bytes)
    }
}

/// Encrypt `plaintext` under `password` into a single URL-safe token.
///
/// Salt and nonce are fresh for every call, so sharing the same record twice
/// with the same password yields unrelated tokens.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, CryptoError> {
    let key = ShareKey::for_new_link(password);
    let sealed = EncryptedToken::seal(&key, plaintext.as_bytes())?;
    Ok(sealed.to_token())
}

/// Reverse of [`encrypt`]. Every failure mode surfaces as `DecryptionFailed`.
pub fn decrypt(token: &str, password: &str) -> Result<String, CryptoError> {
    let sealed = EncryptedToken::from_token(token)?;
    let key = ShareKey::for_token(password, sealed.salt);
    let plaintext = sealed.open(&key)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

/// [`encrypt`] on the blocking pool; key derivation takes hundreds of milliseconds.
pub async fn encrypt_async(plaintext: String, password: String) -> Result<String, CryptoError> {
    let password = Zeroizing::new(password);
    tokio::task::spawn_blocking(move || encrypt(&plaintext, &password))
        .await
        .map_err(|_| CryptoError::EncryptionFailed)?
}

/// [`decrypt`] on the blocking pool.
pub async fn decrypt_async(token: String, password: String) -> Result<String, CryptoError> {
    let password = Zeroizing::new(password);
    tokio::task::spawn_blocking(move || decrypt(&token, &password))
        .await
        .map_err(|_| CryptoError::DecryptionFailed)?
}
