/// Sensitive-field encryption using AES-256-GCM
///
/// This module encrypts individual sensitive text fields (e.g. assignee
/// contact details) before the persistence layer stores them. Each call
/// generates a fresh random 96-bit nonce, which is prepended to the
/// ciphertext so decryption needs nothing beyond the encoded blob and the
/// derived key.
///
/// # Security
///
/// - **Algorithm**: AES-256-GCM (authenticated encryption)
/// - **Nonce**: 12 random bytes per call, never reused, never counter-based
/// - **Key**: Derived once from [`SecurityConfig`] via PBKDF2, zeroized on drop
/// - **Failure policy**: encryption failure is a hard error — there is no
///   fallback that returns the plaintext
///
/// Nonce reuse with the same key breaks GCM completely (forgeable tags,
/// recoverable plaintext), which is why the nonce comes from the CSPRNG on
/// every call rather than from any shared counter.
///
/// # Example
///
/// ```
/// use dispatch_security::config::SecurityConfig;
/// use dispatch_security::crypto::encryptor::DataEncryptor;
///
/// # fn example() -> Result<(), dispatch_security::error::SecurityError> {
/// let encryptor = DataEncryptor::new(&SecurityConfig::new("master-secret"))?;
///
/// let blob = encryptor.encrypt("alice@example.com")?;
/// assert_ne!(blob, "alice@example.com");
///
/// let plaintext = encryptor.decrypt(&blob)?;
/// assert_eq!(plaintext, "alice@example.com");
/// # Ok(())
/// # }
/// ```
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::config::SecurityConfig;
use crate::crypto::keys::{derive_key, KEY_LEN};
use crate::error::SecurityError;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_LEN: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_LEN: usize = 16;

/// Encryptor for sensitive text fields
///
/// Holds the derived key for its lifetime; the key bytes are zeroized when
/// the encryptor is dropped. Stateless per call, so one instance can be
/// shared freely across request-handling threads.
pub struct DataEncryptor {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl DataEncryptor {
    /// Creates an encryptor by deriving the key from configuration
    ///
    /// # Errors
    ///
    /// Returns `SecurityError::Configuration` if key derivation fails
    /// (missing/empty secret). Surfacing this at construction keeps a
    /// misconfigured deployment from accepting writes it can never encrypt.
    pub fn new(config: &SecurityConfig) -> Result<Self, SecurityError> {
        let key = derive_key(config)?;
        Ok(Self { key })
    }

    /// Encrypts one plaintext field
    ///
    /// Returns `base64(nonce ‖ ciphertext)`. Two calls with the same
    /// plaintext produce different blobs because the nonce is fresh per
    /// call.
    ///
    /// # Errors
    ///
    /// - `SecurityError::InvalidArgument` if the plaintext is empty
    /// - `SecurityError::Encryption` if the cipher fails; the plaintext is
    ///   never returned in place of ciphertext
    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecurityError> {
        if plaintext.is_empty() {
            return Err(SecurityError::InvalidArgument(
                "plaintext must not be empty",
            ));
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(self.key.as_slice())
            .map_err(|_| SecurityError::Encryption)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| SecurityError::Encryption)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(payload))
    }

    /// Decrypts a blob produced by [`DataEncryptor::encrypt`]
    ///
    /// # Errors
    ///
    /// - `SecurityError::InvalidArgument` if the input is empty
    /// - `SecurityError::Decode` if the input is not valid base64 or is too
    ///   short to contain a nonce and authentication tag
    /// - `SecurityError::Decryption` if the cipher rejects the payload
    ///   (wrong key, corrupt or tampered ciphertext)
    pub fn decrypt(&self, encoded: &str) -> Result<String, SecurityError> {
        if encoded.is_empty() {
            return Err(SecurityError::InvalidArgument(
                "encoded payload must not be empty",
            ));
        }

        let payload = BASE64
            .decode(encoded)
            .map_err(|_| SecurityError::Decode("payload is not valid base64"))?;

        // A valid blob carries the nonce, the tag, and at least one
        // ciphertext byte (empty plaintext is rejected on encrypt).
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(SecurityError::Decode(
                "payload too short to contain nonce and tag",
            ));
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new_from_slice(self.key.as_slice())
            .map_err(|_| SecurityError::Decryption)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| SecurityError::Decryption)?;

        String::from_utf8(plaintext)
            .map_err(|_| SecurityError::Decode("decrypted payload is not valid UTF-8"))
    }
}
