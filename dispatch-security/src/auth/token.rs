/// Session token issuance and validation
///
/// Tokens are opaque strings: `dsp_` followed by the hex SHA-256 of
/// (subject ‖ expiry ‖ 32 random bytes). They carry no caller-readable
/// structure and are valid only by lookup against the service's own state.
/// Each [`TokenService`] owns its subject → token map; two instances share
/// nothing, and a token issued by one is not valid against another.
///
/// Per-subject lifecycle: `NoToken → Active(token, expiry) → Expired |
/// Revoked → NoToken`. Issuing a new token for a subject supersedes the old
/// one — at most one live token per subject at any time.
///
/// # Security
///
/// - **Entropy**: 32 bytes (256 bits) from the OS CSPRNG per token
/// - **Expiry**: absolute timestamp, default 24 hours after issuance
/// - **Validation**: constant-time comparison, fails closed
/// - **Storage**: sharded concurrent map, so distinct subjects do not
///   contend while same-subject operations serialize
///
/// # Example
///
/// ```
/// use dispatch_security::auth::token::TokenService;
///
/// # fn example() -> Result<(), dispatch_security::error::SecurityError> {
/// let tokens = TokenService::new();
///
/// let token = tokens.generate_token("alice")?;
/// assert!(tokens.validate_token("alice", &token));
/// assert!(!tokens.validate_token("alice", "dsp_forged"));
///
/// tokens.revoke("alice");
/// assert!(!tokens.validate_token("alice", &token));
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::auth::password::constant_time_compare;
use crate::error::SecurityError;

/// Prefix identifying Dispatch session tokens
pub const TOKEN_PREFIX: &str = "dsp_";

/// Bytes of CSPRNG entropy mixed into each token (256 bits)
pub const TOKEN_ENTROPY_LEN: usize = 32;

/// Default token lifetime
const DEFAULT_TTL_HOURS: i64 = 24;

/// A token bound to a subject, with its absolute expiry
struct IssuedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Expiry-aware session token store
///
/// The map is instance-owned: construct one per service and pass it where
/// it is needed, instead of reaching for process-wide state. Dropping the
/// service drops every live token with it.
pub struct TokenService {
    tokens: DashMap<String, IssuedToken>,
    ttl: Duration,
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenService {
    /// Creates a token service with the default 24-hour lifetime
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_TTL_HOURS))
    }

    /// Creates a token service with a custom lifetime
    ///
    /// Primarily for tests and services with shorter session policies;
    /// `Duration::zero()` makes every token expired on arrival.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl,
        }
    }

    /// Issues a new token for a subject
    ///
    /// Any previously issued token for the same subject is superseded
    /// atomically — the map never holds two entries for one subject. Each
    /// call also sweeps expired entries so the map cannot grow without
    /// bound under churn.
    ///
    /// # Errors
    ///
    /// Returns `SecurityError::InvalidArgument` if the subject is empty.
    pub fn generate_token(&self, subject: &str) -> Result<String, SecurityError> {
        if subject.is_empty() {
            return Err(SecurityError::InvalidArgument(
                "subject must not be empty",
            ));
        }

        self.purge_expired();

        let mut entropy = [0u8; TOKEN_ENTROPY_LEN];
        OsRng.fill_bytes(&mut entropy);

        let expires_at = Utc::now() + self.ttl;

        // Opaque token: subject and expiry are folded through the digest,
        // not encoded readably.
        let mut hasher = Sha256::new();
        hasher.update(subject.as_bytes());
        hasher.update(expires_at.timestamp_millis().to_be_bytes());
        hasher.update(entropy);
        let token = format!("{}{}", TOKEN_PREFIX, hex::encode(hasher.finalize()));

        self.tokens.insert(
            subject.to_string(),
            IssuedToken {
                token: token.clone(),
                expires_at,
            },
        );
        tracing::debug!(live_tokens = self.tokens.len(), "issued session token");

        Ok(token)
    }

    /// Validates a token for a subject
    ///
    /// Fails closed: empty inputs, an unknown subject, and an expired entry
    /// all return `false` without erroring. An expired entry is removed as
    /// a side effect. The stored token is compared with
    /// [`constant_time_compare`], never direct equality.
    pub fn validate_token(&self, subject: &str, token: &str) -> bool {
        if subject.is_empty() || token.is_empty() {
            return false;
        }

        let now = Utc::now();
        let verdict = match self.tokens.get(subject) {
            None => return false,
            Some(entry) if entry.expires_at <= now => None,
            Some(entry) => Some(constant_time_compare(
                token.as_bytes(),
                entry.token.as_bytes(),
            )),
        };

        match verdict {
            Some(matches) => matches,
            None => {
                // Lazy expiry removal. The read guard is released above;
                // remove_if re-checks under the shard lock so a token
                // reissued in between survives.
                self.tokens
                    .remove_if(subject, |_, issued| issued.expires_at <= now);
                false
            }
        }
    }

    /// Revokes a subject's token, if one exists
    ///
    /// Idempotent: revoking a subject with no live token is a no-op.
    pub fn revoke(&self, subject: &str) {
        if subject.is_empty() {
            return;
        }

        if self.tokens.remove(subject).is_some() {
            tracing::debug!("revoked session token");
        }
    }

    /// Removes every expired entry and returns how many were removed
    ///
    /// Runs on every issuance; also callable directly by an owning service
    /// that wants a scheduled sweep. The count is approximate while other
    /// threads are mutating the map.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, issued| issued.expires_at > now);
        let removed = before.saturating_sub(self.tokens.len());

        if removed > 0 {
            tracing::debug!(removed, "purged expired session tokens");
        }
        removed
    }

    /// Number of stored tokens, including any not yet swept
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the store currently holds no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate() {
        let service = TokenService::new();

        let token = service.generate_token("alice").expect("issue should succeed");
        assert!(service.validate_token("alice", &token));
    }

    #[test]
    fn test_token_format() {
        let service = TokenService::new();
        let token = service.generate_token("alice").unwrap();

        assert!(token.starts_with(TOKEN_PREFIX));
        // Prefix + hex SHA-256
        assert_eq!(token.len(), TOKEN_PREFIX.len() + 64);
    }

    #[test]
    fn test_tokens_are_distinct() {
        let service = TokenService::new();

        let token1 = service.generate_token("alice").unwrap();
        let token2 = service.generate_token("bob").unwrap();
        let token3 = service.generate_token("alice").unwrap();

        assert_ne!(token1, token2);
        assert_ne!(token1, token3);
        assert_ne!(token2, token3);
    }

    #[test]
    fn test_wrong_token_is_rejected() {
        let service = TokenService::new();
        let _token = service.generate_token("alice").unwrap();

        assert!(!service.validate_token("alice", "dsp_wrong"));
    }

    #[test]
    fn test_other_subjects_token_is_rejected() {
        let service = TokenService::new();
        let alice_token = service.generate_token("alice").unwrap();
        let _bob_token = service.generate_token("bob").unwrap();

        assert!(!service.validate_token("bob", &alice_token));
    }

    #[test]
    fn test_empty_inputs() {
        let service = TokenService::new();

        assert!(matches!(
            service.generate_token(""),
            Err(SecurityError::InvalidArgument(_))
        ));
        assert!(!service.validate_token("", "dsp_token"));
        assert!(!service.validate_token("alice", ""));
    }

    #[test]
    fn test_supersession() {
        let service = TokenService::new();

        let old = service.generate_token("alice").unwrap();
        let new = service.generate_token("alice").unwrap();

        // One live token per subject: the reissue replaced the old entry.
        assert_eq!(service.len(), 1);
        assert!(!service.validate_token("alice", &old));
        assert!(service.validate_token("alice", &new));
    }

    #[test]
    fn test_revoke() {
        let service = TokenService::new();
        let token = service.generate_token("alice").unwrap();

        service.revoke("alice");
        assert!(!service.validate_token("alice", &token));
        assert!(service.is_empty());
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let service = TokenService::new();

        // Revoking an unknown subject is a no-op, not an error.
        service.revoke("nobody");
        service.revoke("");

        let _ = service.generate_token("alice").unwrap();
        service.revoke("alice");
        service.revoke("alice");
        assert!(service.is_empty());
    }

    #[test]
    fn test_expired_token_is_rejected_and_removed() {
        let service = TokenService::with_ttl(Duration::zero());
        let token = service.generate_token("alice").unwrap();

        assert!(!service.validate_token("alice", &token));
        // Lazy removal happened as a side effect of validation.
        assert!(service.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let service = TokenService::with_ttl(Duration::zero());

        let _ = service.generate_token("alice").unwrap();
        let _ = service.generate_token("bob").unwrap();
        let _ = service.generate_token("carol").unwrap();

        service.purge_expired();
        assert!(service.is_empty());
    }

    #[test]
    fn test_issuance_sweeps_expired_entries() {
        let service = TokenService::with_ttl(Duration::zero());
        let _ = service.generate_token("alice").unwrap();

        // The next issuance's on-access sweep removes alice's dead entry.
        let _ = service.generate_token("bob").unwrap();
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_instances_are_independent() {
        let service1 = TokenService::new();
        let service2 = TokenService::new();

        let token = service1.generate_token("alice").unwrap();
        assert!(!service2.validate_token("alice", &token));
    }
}
