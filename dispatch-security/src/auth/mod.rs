/// Authentication primitives for Dispatch
///
/// # Modules
///
/// - [`password`]: Salted iterated-digest password hashing, verification,
///   and the strength policy
/// - [`token`]: Session token issuance, validation, and revocation
///
/// # Security Features
///
/// - **Password Hashing**: Fresh 16-byte salt and 10,000 digest iterations
///   per record
/// - **Session Tokens**: 256 bits of CSPRNG entropy, expiry-bound, one live
///   token per subject
/// - **Constant-time Comparison**: All credential verification uses
///   constant-time operations
///
/// # Example
///
/// ```
/// use dispatch_security::auth::password::{hash_password, verify_password};
/// use dispatch_security::auth::token::TokenService;
///
/// # fn example() -> Result<(), dispatch_security::error::SecurityError> {
/// // Password authentication
/// let record = hash_password("user_password")?;
/// assert!(verify_password("user_password", &record));
///
/// // Session tokens
/// let tokens = TokenService::new();
/// let token = tokens.generate_token("alice")?;
/// assert!(tokens.validate_token("alice", &token));
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod token;
