use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const KEY_LENGTH: usize = 32; // AES-256
pub const SALT_LENGTH: usize = 16;

/// Key for one share link, together with the salt it was derived from.
/// The salt travels in the token header; the key bytes are zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct ShareKey {
    key_bytes: [u8; KEY_LENGTH],
    salt: [u8; SALT_LENGTH],
}

impl ShareKey {
    /// Key for a link being created: a fresh random salt every time.
    pub fn for_new_link(password: &str) -> Self {
        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::for_token(password, salt)
    }

    /// Re-derive the key of an existing link from the salt in its token.
    pub fn for_token(password: &str, salt: [u8; SALT_LENGTH]) -> Self {
        let mut key_bytes = [0u8; KEY_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key_bytes);
        Self { key_bytes, salt }
    }

    pub fn salt(&self) -> [u8; SALT_LENGTH] {
        self.salt
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key_bytes
    }
}
