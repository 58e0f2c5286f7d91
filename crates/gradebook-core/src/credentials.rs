//! Password-hash verification.
//!
//! Stored hashes are either Argon2 PHC strings (written by `hash_password`)
//! or bcrypt strings from older seed data. Passwords are never compared in
//! plaintext.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::account::{Account, Identity};
use crate::error::{CoreError, CoreResult};

/// Result of checking a submitted password against an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified(Identity),
    Rejected,
}

/// Checks a submitted password against a stored account.
///
/// Implementations may be CPU heavy; callers run them off the async runtime.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, account: &Account, password: &str) -> CoreResult<Verification>;

    /// Does the work of a failed `verify` when no account matched, so an
    /// unknown email takes as long as a wrong password.
    fn verify_absent(&self, password: &str) {
        let _ = password;
    }
}

/// Verifies Argon2 and bcrypt password hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashVerifier;

impl CredentialVerifier for HashVerifier {
    fn verify(&self, account: &Account, password: &str) -> CoreResult<Verification> {
        let valid = verify_password(&account.password_hash, password)?;
        Ok(if valid {
            Verification::Verified(account.identity())
        } else {
            Verification::Rejected
        })
    }

    fn verify_absent(&self, password: &str) {
        if let Some(hash) = absent_account_hash() {
            let _ = verify_password(hash, password);
        }
    }
}

/// Argon2 hash checked against when the account does not exist.
fn absent_account_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| match hash_password("gradebook-absent-account") {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::warn!("Could not prepare absent-account hash: {e}");
            None
        }
    })
    .as_deref()
}

/// Returns `true` if `password` matches `hash`.
///
/// # Errors
///
/// [`CoreError::PasswordHash`] if `hash` is not a recognised hash string.
pub fn verify_password(hash: &str, password: &str) -> CoreResult<bool> {
    if is_bcrypt(hash) {
        return bcrypt::verify(password, hash)
            .map_err(|e| CoreError::PasswordHash(format!("invalid bcrypt hash: {e}")));
    }

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| CoreError::PasswordHash(format!("invalid password hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hashes `password` into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(format!("failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountKind;

    fn account_with_hash(password_hash: String) -> Account {
        Account {
            id: 1,
            email: "grace@example.edu".to_string(),
            name: "Grace Hopper".to_string(),
            password_hash,
            kind: AccountKind::Instructor,
        }
    }

    #[test]
    fn argon2_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "correct horse").unwrap());
        assert!(!verify_password(&hash, "battery staple").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verifies_bcrypt_hashes() {
        let hash = bcrypt::hash("password123", 4).unwrap();
        assert!(verify_password(&hash, "password123").unwrap());
        assert!(!verify_password(&hash, "password124").unwrap());
    }

    #[test]
    fn plaintext_stored_value_is_an_error() {
        let err = verify_password("password123", "password123").unwrap_err();
        assert!(matches!(err, CoreError::PasswordHash(_)));
    }

    #[test]
    fn verifier_returns_identity_on_match() {
        let account = account_with_hash(hash_password("s3cret").unwrap());
        let result = HashVerifier.verify(&account, "s3cret").unwrap();
        assert_eq!(result, Verification::Verified(account.identity()));
    }

    #[test]
    fn verifier_rejects_wrong_password() {
        let account = account_with_hash(hash_password("s3cret").unwrap());
        let result = HashVerifier.verify(&account, "password123").unwrap();
        assert_eq!(result, Verification::Rejected);
    }

    #[test]
    fn absent_account_hash_is_stable_argon2() {
        let first = absent_account_hash().unwrap();
        assert!(first.starts_with("$argon2"));
        assert_eq!(absent_account_hash().unwrap(), first);
        assert!(!verify_password(first, "password123").unwrap());
        HashVerifier.verify_absent("password123");
    }

    #[test]
    fn verifier_rejects_empty_password() {
        let account = account_with_hash(hash_password("s3cret").unwrap());
        assert_eq!(HashVerifier.verify(&account, "").unwrap(), Verification::Rejected);
    }
}
