//! Salted password hashing (PBKDF2-HMAC-SHA256).

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// Iteration count used when the config does not set one.
pub const DEFAULT_ITERATIONS: u32 = 100_000;
/// Smallest iteration count the config accepts.
pub const MIN_ITERATIONS: u32 = 1_000;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// A stored password hash. Hash and salt are hex encoded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
    pub iterations: u32,
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHash")
            .field("hash", &"***")
            .field("salt", &self.salt)
            .field("iterations", &self.iterations)
            .finish()
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    pub fn new(password: &str, iterations: u32) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let key = derive(password, &salt, iterations);
        Self {
            hash: hex::encode(key),
            salt: hex::encode(salt),
            iterations,
        }
    }

    /// Check `password` against this hash in constant time.
    ///
    /// A malformed stored salt or hash never verifies.
    pub fn verify(&self, password: &str) -> bool {
        let (Ok(salt), Ok(expected)) = (hex::decode(&self.salt), hex::decode(&self.hash)) else {
            return false;
        };
        let actual = derive(password, &salt, self.iterations);
        constant_time_eq(&actual, &expected)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low count keeps the tests fast.
    const ITERS: u32 = 1_000;

    #[test]
    fn verify_accepts_only_the_original_password() {
        let hash = PasswordHash::new("correct horse", ITERS);
        assert!(hash.verify("correct horse"));
        assert!(!hash.verify("correct horse "));
        assert!(!hash.verify(""));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = PasswordHash::new("same", ITERS);
        let b = PasswordHash::new("same", ITERS);
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
        assert_eq!(a.hash.len(), KEY_LEN * 2);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let mut hash = PasswordHash::new("pw", ITERS);
        hash.salt = "zz".into();
        assert!(!hash.verify("pw"));
    }

    #[test]
    fn debug_masks_hash() {
        let hash = PasswordHash::new("pw", ITERS);
        let dbg = format!("{hash:?}");
        assert!(dbg.contains("***"));
        assert!(!dbg.contains(&hash.hash));
    }

    #[test]
    fn constant_time_eq_lengths() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
