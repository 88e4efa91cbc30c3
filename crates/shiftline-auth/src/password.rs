//! Password hashing and verification.
//!
//! Hashes are salted bcrypt: the same input produces a different hash each
//! call, so equality comparisons must always go through
//! [`verify_password`], never compare hashes directly.

use bcrypt::{DEFAULT_COST, hash, verify};

use shiftline_core::AppError;

/// Hashes a password with a random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

/// Verifies a password against a stored hash.
///
/// Returns `false` for a mismatch and for a malformed hash alike; a broken
/// stored hash must read as "wrong password", not as a server error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("Secret123!").unwrap();
        assert!(verify_password("Secret123!", &hashed));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hashed = hash_password("Secret123!").unwrap();
        assert!(!verify_password("wrong-password", &hashed));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let first = hash_password("Secret123!").unwrap();
        let second = hash_password("Secret123!").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("Secret123!", &first));
        assert!(verify_password("Secret123!", &second));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        assert!(!verify_password("Secret123!", "not-a-bcrypt-hash"));
        assert!(!verify_password("Secret123!", ""));
    }
}
