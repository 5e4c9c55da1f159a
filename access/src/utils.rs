//! Utility functions for access verification.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a uniform random 6-digit code, leading zeros preserved.
///
/// Sampled from `0..1_000_000` so every code is equally likely; "004217" is
/// a valid code.
#[must_use]
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

/// SHA-256 hash of a code, lowercase hex.
///
/// Only the hash is ever persisted; plaintext codes exist in memory just
/// long enough to hand to the delivery collaborator.
#[must_use]
pub fn hash_code(code: &str) -> String {
    use std::fmt::Write as _;

    let digest = Sha256::digest(code.as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Normalize a subject for storage and lookup: trimmed and lowercased.
#[must_use]
pub fn normalize_subject(subject: &str) -> String {
    subject.trim().to_lowercase()
}

/// Validate email address format.
///
/// Basic RFC 5322 validation: exactly one `@`, non-empty local and domain
/// parts, a dotted domain, and a sane length. For full compliance, use the
/// `email_address` crate.
///
/// # Examples
///
/// ```
/// use gatekit_access::utils::is_valid_email;
///
/// assert!(is_valid_email("staff@example.com"));
/// assert!(!is_valid_email("not-an-email"));
/// assert!(!is_valid_email("@example.com"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    if !local.chars().all(valid_local) || !domain.chars().all(valid_domain) {
        return false;
    }

    // Domain parts between dots must be non-empty
    domain.split('.').all(|part| !part.is_empty())
}
