/// Cryptographic primitives for Dispatch
///
/// # Modules
///
/// - [`keys`]: Key derivation from the configured secret
/// - [`encryptor`]: AES-256-GCM encryption of sensitive fields
///
/// # Security Features
///
/// - **Key Derivation**: PBKDF2-HMAC-SHA256 with a fixed iteration count
/// - **Field Encryption**: AES-256-GCM with a fresh random nonce per call
/// - **Key Hygiene**: Derived key material is zeroized on drop
///
/// Both modules are stateless per call apart from the encryptor holding its
/// derived key; they are safe to use concurrently from many threads.

pub mod encryptor;
pub mod keys;
