/// Error type for all security operations
///
/// The taxonomy distinguishes caller mistakes (`InvalidArgument`), broken
/// deployment state (`Configuration`), malformed encoded payloads
/// (`Decode`), and cipher-level failures (`Encryption`/`Decryption`).
/// Hashing and encryption surface failures to the caller as errors;
/// validation-style operations (`verify_password`, `validate_token`) fail
/// closed by returning `false` instead and never construct these variants.
///
/// Error messages must never contain a password, key, token, or plaintext
/// value; every variant carries a static description only.
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    /// Caller supplied null/empty/malformed input; rejected before any
    /// crypto work happens
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Secret material is missing or unusable; fatal, never retried
    #[error("Security configuration error: {0}")]
    Configuration(&'static str),

    /// An encoded payload could not be decoded (bad base64, truncated, or
    /// otherwise malformed)
    #[error("Malformed encoded payload: {0}")]
    Decode(&'static str),

    /// The cipher failed while encrypting; the caller must treat the field
    /// as not persisted — there is no plaintext fallback
    #[error("Encryption failed")]
    Encryption,

    /// The cipher rejected the payload (wrong key, corrupt ciphertext, or
    /// failed authentication tag); distinct from a decode failure
    #[error("Decryption failed")]
    Decryption,
}
