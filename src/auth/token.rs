//! Issuing and verifying signed access tokens.
//!
//! Tokens are compact HS256 JWTs:
//!
//! ```text
//! base64url({"typ":"JWT","alg":"HS256"}) . base64url(claims) . base64url(hmac)
//! ```
//!
//! Nothing about an issued token is stored. A token stays valid until the
//! clock reaches its `exp` claim.

use crate::auth::clock::Clock;
use crate::auth::credentials::CredentialStore;
use crate::auth::error::AuthError;
use bcrypt::non_truncating_hash;
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Validity window of a freshly issued token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// The payload carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated user.
    pub sub: String,
    pub role: String,
    /// Issued at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

/// Symmetric secret used to both sign and verify tokens.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn from_secret(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySigningKey);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// Checks passwords against a [`CredentialStore`] and hands out tokens.
///
/// Holds no mutable state; one instance serves every worker.
pub struct TokenAuthenticator {
    store: Arc<dyn CredentialStore>,
    key: SigningKey,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    validation: Validation,
    // Stands in for the stored hash when the username is unknown.
    decoy_hash: String,
}

impl TokenAuthenticator {
    /// `cost` must match the bcrypt cost of the stored hashes.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        key: SigningKey,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        cost: u32,
    ) -> Result<Self, AuthError> {
        let decoy_hash = non_truncating_hash(uuid::Uuid::new_v4().to_string(), cost)?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            store,
            key,
            clock,
            ttl,
            validation,
            decoy_hash,
        })
    }

    /// Returns a signed token for a matching username and password.
    ///
    /// Unknown users and wrong passwords both yield
    /// [`AuthError::InvalidCredentials`].
    pub fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let credential = match self.store.lookup(username) {
            Some(credential) if credential.verify_password(password) => credential,
            Some(_) => return Err(self.reject(username)),
            None => {
                let _ = bcrypt::non_truncating_verify(password, &self.decoy_hash);
                return Err(self.reject(username));
            }
        };

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: credential.username,
            role: credential.role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key.encoding)
            .map_err(AuthError::Signing)?;

        tracing::info!(
            subject = %claims.sub,
            role = %claims.role,
            exp = claims.exp,
            "issued access token"
        );
        Ok(token)
    }

    /// Checks signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.key.decoding, &self.validation)?.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn reject(&self, username: &str) -> AuthError {
        tracing::info!(username = %username, "authentication failed");
        AuthError::InvalidCredentials
    }
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
