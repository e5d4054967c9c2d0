//! PBKDF2 password hashing.
//!
//! Hashes are stored as `pbkdf2-sha256$<rounds>$<salt>$<hash>` with the salt
//! and hash in unpadded standard base64, so the iteration count can be raised
//! later without invalidating existing accounts.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    rounds: u32,
}

impl PasswordHasher {
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    /// Hashes `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let mut hash = [0u8; HASH_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, self.rounds, &mut hash);

        format!(
            "{SCHEME}${}${}${}",
            self.rounds,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        )
    }

    /// Checks `password` against a stored hash. Unparseable hashes never match.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let mut parts = encoded.split('$');
        let (Some(SCHEME), Some(rounds), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };

        let (Ok(rounds), Ok(salt), Ok(expected)) = (
            rounds.parse::<u32>(),
            STANDARD_NO_PAD.decode(salt),
            STANDARD_NO_PAD.decode(expected),
        ) else {
            return false;
        };
        if rounds == 0 || expected.is_empty() {
            return false;
        }

        let mut actual = vec![0u8; expected.len()];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, rounds, &mut actual);
        actual.ct_eq(&expected).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(1_000);
        let hash = hasher.hash("password123");

        assert!(hash.starts_with("pbkdf2-sha256$1000$"));
        assert!(hasher.verify("password123", &hash));
        assert!(!hasher.verify("password124", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new(10);
        assert_ne!(hasher.hash("same"), hasher.hash("same"));
    }

    #[test]
    fn test_rounds_are_read_from_hash() {
        let old = PasswordHasher::new(500).hash("password123");
        assert!(PasswordHasher::new(2_000).verify("password123", &old));
    }

    #[test]
    fn test_garbage_hashes_never_match() {
        let hasher = PasswordHasher::new(10);
        assert!(!hasher.verify("x", ""));
        assert!(!hasher.verify("x", "bcrypt$10$abc$def"));
        assert!(!hasher.verify("x", "pbkdf2-sha256$zero$abc$def"));
        assert!(!hasher.verify("x", "pbkdf2-sha256$0$c2FsdA$aGFzaA"));
    }
}
