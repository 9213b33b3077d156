use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A salted password digest as stored in the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: String,
    pub salt: String,
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> PasswordDigest {
    let salt = Uuid::new_v4().simple().to_string();
    let hash = digest(&salt, password);
    PasswordDigest { hash, salt }
}

pub fn verify_password(password: &str, stored_hash: &str, salt: &str) -> bool {
    let candidate = digest(salt, password);
    constant_time_eq(candidate.as_bytes(), stored_hash.as_bytes())
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    STANDARD.encode(hasher.finalize())
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

    #[test]
    fn test_hash_and_verify() {
        let d = hash_password("segredo123");
        assert!(verify_password("segredo123", &d.hash, &d.salt));
        assert!(!verify_password("segredo124", &d.hash, &d.salt));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_wrong_salt_fails() {
        let d = hash_password("senha!");
        assert!(!verify_password("senha!", &d.hash, "other-salt"));
    }
}
