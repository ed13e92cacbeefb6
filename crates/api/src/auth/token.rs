//! Session token generation and format validation
//!
//! Session ids are 48 characters drawn uniformly from the 62-symbol
//! alphanumeric alphabet: 48 * log2(62) ≈ 286 bits of entropy, comfortably
//! past the 256-bit bar for unguessable bearer tokens.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Exact length of a session id, in characters.
pub const SESSION_ID_LEN: usize = 48;

/// Generate a fresh session id from a cryptographically secure source.
///
/// `ThreadRng` is a CSPRNG reseeded from the OS; successive calls are
/// independent draws.
pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

/// Check the session-id wire format: exactly 48 alphanumeric characters.
///
/// Runs before any store access so malformed cookies never cost a lookup.
pub fn is_valid_session_id(candidate: &str) -> bool {
    candidate.len() == SESSION_ID_LEN
        && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_48_alphanumeric_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(id.bytes().all(|b| b.is_ascii_alphanumeric()));
        assert!(is_valid_session_id(&id));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: Vec<String> = (0..32).map(|_| generate_session_id()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn format_rejects_wrong_length() {
        assert!(!is_valid_session_id("short"));
        assert!(!is_valid_session_id(""));
        assert!(!is_valid_session_id(&"a".repeat(47)));
        assert!(!is_valid_session_id(&"a".repeat(49)));
        assert!(is_valid_session_id(&"a".repeat(48)));
    }

    #[test]
    fn format_rejects_non_alphanumeric() {
        let mut id = "a".repeat(47);
        id.push('-');
        assert!(!is_valid_session_id(&id));

        let mut id = "a".repeat(47);
        id.push(' ');
        assert!(!is_valid_session_id(&id));

        // Multi-byte input must not pass on char count alone.
        let id = "é".repeat(24);
        assert!(!is_valid_session_id(&id));
    }
}
