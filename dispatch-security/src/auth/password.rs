/// Password hashing and strength validation
///
/// Passwords are stored as `base64(salt)$hex(digest)`: a fresh 16-byte
/// random salt per record, then 10,000 SHA-256 iterations over
/// (salt ‖ password). The salt lives in the record so verification can
/// recompute the digest; equality is only ever decided by
/// [`constant_time_compare`], never by direct string comparison.
///
/// # Security
///
/// - **Salt**: 16 random bytes per hash call from the OS CSPRNG
/// - **Digest**: SHA-256, 10,000 iterations
/// - **Verification**: recompute + constant-time comparison, fails closed
/// - **Records**: two hashes of the same password never match (fresh salt)
///
/// # Example
///
/// ```
/// use dispatch_security::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), dispatch_security::error::SecurityError> {
/// let record = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &record));
/// assert!(!verify_password("wrong_password", &record));
/// # Ok(())
/// # }
/// ```
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::config::DEFAULT_PASSWORD_MIN_LENGTH;
use crate::error::SecurityError;

/// Length of the per-record random salt in bytes
pub const SALT_LEN: usize = 16;

/// Number of digest iterations applied to (salt ‖ password)
pub const HASH_ITERATIONS: u32 = 10_000;

/// Separator between the encoded salt and the encoded digest
///
/// `$` appears in neither the base64 nor the hex alphabet, so splitting on
/// the first occurrence is unambiguous.
const SEPARATOR: char = '$';

/// Hashes a password with a fresh random salt
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
///
/// # Returns
///
/// Encoded record `base64(salt)$hex(digest)`. Two calls with the same
/// password return different records because the salt is fresh per call.
///
/// # Errors
///
/// Returns `SecurityError::InvalidArgument` if the password is empty.
pub fn hash_password(password: &str) -> Result<String, SecurityError> {
    if password.is_empty() {
        return Err(SecurityError::InvalidArgument(
            "password must not be empty",
        ));
    }

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let digest = digest_password(&salt, password);

    Ok(format!(
        "{}{}{}",
        BASE64.encode(salt),
        SEPARATOR,
        hex::encode(digest)
    ))
}

/// Verifies a password against a stored record
///
/// Fails closed: empty inputs, a missing separator, undecodable salt or
/// digest, and any other malformation all return `false` rather than an
/// error, so a forged or corrupt credential simply does not authenticate.
///
/// # Example
///
/// ```
/// use dispatch_security::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), dispatch_security::error::SecurityError> {
/// let record = hash_password("correct_password")?;
///
/// assert!(verify_password("correct_password", &record));
/// assert!(!verify_password("wrong_password", &record));
/// assert!(!verify_password("correct_password", "garbage-record"));
/// # Ok(())
/// # }
/// ```
pub fn verify_password(password: &str, encoded: &str) -> bool {
    if password.is_empty() || encoded.is_empty() {
        return false;
    }

    let Some((salt_part, digest_part)) = encoded.split_once(SEPARATOR) else {
        return false;
    };

    let Ok(salt) = BASE64.decode(salt_part) else {
        return false;
    };
    let Ok(stored_digest) = hex::decode(digest_part) else {
        return false;
    };

    let candidate = digest_password(&salt, password);
    constant_time_compare(&candidate, &stored_digest)
}

/// Computes the iterated digest over (salt ‖ password)
fn digest_password(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut digest = hasher.finalize();

    for _ in 1..HASH_ITERATIONS {
        digest = Sha256::digest(digest);
    }

    digest.into()
}

/// Constant-time byte comparison
///
/// Prevents timing attacks by ensuring the comparison always takes the
/// same amount of time regardless of where the inputs differ: differences
/// are XOR-accumulated over the full length with no early return. Shared
/// by password verification and token validation.
///
/// # Example
///
/// ```
/// use dispatch_security::auth::password::constant_time_compare;
///
/// assert!(constant_time_compare(b"hello", b"hello"));
/// assert!(!constant_time_compare(b"hello", b"world"));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    // Different lengths = not equal; length is not secret here (digest and
    // token lengths are fixed and public).
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for i in 0..a.len() {
        result |= a[i] ^ b[i];
    }

    result == 0
}

/// Checks password strength against the default policy
///
/// A password is strong when it is at least
/// [`DEFAULT_PASSWORD_MIN_LENGTH`] characters long and contains at least
/// one uppercase letter, one lowercase letter, one digit, and one other
/// character. Never errors; empty input is simply not strong.
///
/// # Example
///
/// ```
/// use dispatch_security::auth::password::is_strong;
///
/// assert!(is_strong("Aa1!aaaa"));
/// assert!(!is_strong("aaaaaaaa"));
/// assert!(!is_strong(""));
/// ```
pub fn is_strong(password: &str) -> bool {
    is_strong_with_min_length(password, DEFAULT_PASSWORD_MIN_LENGTH)
}

/// Checks password strength against a configured minimum length
///
/// Single left-to-right pass: classifies each character as
/// upper/lower/digit/other and exits early once all four classes have been
/// seen and the minimum length is reached.
pub fn is_strong_with_min_length(password: &str, min_length: usize) -> bool {
    let mut length = 0usize;
    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_other = false;

    for c in password.chars() {
        length += 1;

        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else {
            has_other = true;
        }

        if has_upper && has_lower && has_digit && has_other && length >= min_length {
            return true;
        }
    }

    length >= min_length && has_upper && has_lower && has_digit && has_other
}
