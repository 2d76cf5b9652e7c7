//! Authentication error types.

use thiserror::Error;

/// Everything that can go wrong while issuing or verifying a token.
///
/// The rejection variants stay distinct so they can be logged, but the HTTP
/// layer answers all of them with the same 401.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately a single variant.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The token could not be decoded.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// The signature does not match the header and payload.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The current time is at or past the `exp` claim.
    #[error("Token expired")]
    TokenExpired,

    #[error("Signing key must not be empty")]
    EmptySigningKey,

    /// Issue time plus lifetime does not fit in a timestamp.
    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl AuthError {
    /// True for failures caused by what the caller presented, as opposed to
    /// faults on our side.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::MalformedToken(_)
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
        )
    }
}

/// Maps decoding failures from `jsonwebtoken`.
impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAlgorithm => {
                AuthError::MalformedToken("unsupported algorithm".into())
            }
            ErrorKind::MissingRequiredClaim(claim) => {
                AuthError::MalformedToken(format!("missing claim `{}`", claim))
            }
            _ => AuthError::MalformedToken(err.to_string()),
        }
    }
}
