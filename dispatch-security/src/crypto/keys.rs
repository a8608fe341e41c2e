/// Key derivation from the configured secret
///
/// Stretches the master secret from [`SecurityConfig`] into a fixed-length
/// symmetric key using PBKDF2-HMAC-SHA256. The derivation is a pure
/// function of the configuration: same secret + same salt = same key, so
/// the key is never persisted and can be recomputed on demand from any
/// thread.
///
/// # Security
///
/// - **Algorithm**: PBKDF2-HMAC-SHA256
/// - **Iterations**: 120,000
/// - **Output**: 32-byte key (AES-256)
/// - **Salt**: Deployment-configured, with a versioned built-in default
///
/// The derived key is returned inside [`Zeroizing`] so the bytes are wiped
/// when the caller drops them.

use sha2::Sha256;
use zeroize::Zeroizing;

use crate::config::SecurityConfig;
use crate::error::SecurityError;

/// Length of the derived symmetric key in bytes (256 bits)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
///
/// Fixed for all deployments; changing it changes every derived key, so it
/// is part of the data contract for anything encrypted with the output.
pub const KDF_ITERATIONS: u32 = 120_000;

/// Built-in salt used when no deployment salt is configured
///
/// Versioned so a future parameter change can ship under a new label
/// without silently re-keying existing deployments.
const DEFAULT_SALT: &[u8] = b"dispatch-security-kdf-v1";

/// Derives the symmetric encryption key from the configured secret
///
/// # Errors
///
/// Returns `SecurityError::Configuration` if the secret is empty. This is
/// the "first use" failure point for a misconfigured deployment: the
/// config loader accepts an injected empty secret, but nothing can be
/// derived from it.
///
/// # Example
///
/// ```
/// use dispatch_security::config::SecurityConfig;
/// use dispatch_security::crypto::keys::{derive_key, KEY_LEN};
///
/// # fn example() -> Result<(), dispatch_security::error::SecurityError> {
/// let config = SecurityConfig::new("master-secret").with_salt("deployment-salt");
/// let key = derive_key(&config)?;
/// assert_eq!(key.len(), KEY_LEN);
/// # Ok(())
/// # }
/// ```
pub fn derive_key(config: &SecurityConfig) -> Result<Zeroizing<[u8; KEY_LEN]>, SecurityError> {
    if config.secret().is_empty() {
        return Err(SecurityError::Configuration(
            "secret key material is not set",
        ));
    }

    let salt = config
        .salt()
        .map(str::as_bytes)
        .unwrap_or(DEFAULT_SALT);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(
        config.secret().as_bytes(),
        salt,
        KDF_ITERATIONS,
        &mut key[..],
    );

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_deterministic() {
        let config = SecurityConfig::new("master-secret").with_salt("salt");

        let key1 = derive_key(&config).expect("derive should succeed");
        let key2 = derive_key(&config).expect("derive should succeed");

        assert_eq!(*key1, *key2);
    }

    #[test]
    fn test_different_secrets_different_keys() {
        let key1 = derive_key(&SecurityConfig::new("secret-one")).unwrap();
        let key2 = derive_key(&SecurityConfig::new("secret-two")).unwrap();

        assert_ne!(*key1, *key2);
    }

    #[test]
    fn test_different_salts_different_keys() {
        let key1 = derive_key(&SecurityConfig::new("secret").with_salt("salt-a")).unwrap();
        let key2 = derive_key(&SecurityConfig::new("secret").with_salt("salt-b")).unwrap();

        assert_ne!(*key1, *key2);
    }

    #[test]
    fn test_default_salt_differs_from_configured() {
        let key1 = derive_key(&SecurityConfig::new("secret")).unwrap();
        let key2 = derive_key(&SecurityConfig::new("secret").with_salt("salt")).unwrap();

        assert_ne!(*key1, *key2);
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let result = derive_key(&SecurityConfig::new(""));

        assert!(matches!(result, Err(SecurityError::Configuration(_))));
    }

    #[test]
    fn test_key_is_not_all_zeroes() {
        let key = derive_key(&SecurityConfig::new("secret")).unwrap();
        assert_ne!(*key, [0u8; KEY_LEN]);
    }
}
