//! Password hashing with Argon2id
//!
//! Parameters are fixed process-wide: 19 MiB memory, 2 iterations,
//! parallelism 1 (the OWASP baseline). Output is a PHC string embedding the
//! random salt, so hashing the same password twice yields different strings.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

fn argon2() -> Argon2<'static> {
    match Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None) {
        Ok(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        // Unreachable with the constants above; fall back to crate defaults
        // rather than panic.
        Err(_) => Argon2::default(),
    }
}

/// Hash a plaintext password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    argon2()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
///
/// Never errors: a malformed hash verifies as `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    argon2().verify_password(password.as_bytes(), &parsed).is_ok()
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// A valid hash of no real credential, verified on login when the username
/// does not exist so the unknown-user path costs the same as a real
/// verification (no user-existence timing oracle).
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash_password("streakd-dummy-credential").unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("hunter2pass").unwrap();
        assert!(verify_password("hunter2pass", &hash));
        assert!(!verify_password("hunter2fail", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("hunter2pass").unwrap();
        let b = hash_password("hunter2pass").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_phc_argon2id() {
        let hash = hash_password("hunter2pass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=19456,t=2,p=1"));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", "$argon2id$broken"));
    }

    #[test]
    fn dummy_hash_matches_nothing_likely() {
        let hash = dummy_hash();
        assert!(!hash.is_empty());
        assert!(!verify_password("hunter2pass", hash));
    }
}
