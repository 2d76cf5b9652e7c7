//! Credential checks and stateless bearer tokens.

pub mod clock;
pub mod credentials;
pub mod error;
pub mod middleware;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{
    read_credentials_file, Credential, CredentialEntry, CredentialError, CredentialStore,
    InMemoryCredentialStore,
};
pub use error::AuthError;
pub use token::{Claims, SigningKey, TokenAuthenticator, DEFAULT_TOKEN_TTL_HOURS};
