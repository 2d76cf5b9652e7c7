//! Process settings, read from environment variables.

use crate::auth::{
    read_credentials_file, CredentialEntry, CredentialError, DEFAULT_TOKEN_TTL_HOURS,
};
use chrono::Duration;
use secrecy::{ExposeSecret, Secret};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
/// One year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub jwt_secret: Secret<String>,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub credentials: Vec<CredentialEntry>,
    pub seed_commands: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSigningKey,

    #[error("JWT_SECRET must not be empty")]
    EmptySigningKey,

    #[error("{name} has invalid value `{value}`")]
    InvalidValue { name: &'static str, value: String },

    #[error("BCRYPT_COST must be between 4 and 31, got {0}")]
    BcryptCost(u32),

    #[error("Failed to load credentials from {}: {source}", path.display())]
    Credentials {
        path: PathBuf,
        #[source]
        source: CredentialError,
    },
}

impl Settings {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::MissingSigningKey)?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptySigningKey);
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8000u16)?;
        let ttl_hours = parse_or(&lookup, "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        let token_ttl = Some(ttl_hours)
            .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
            .and_then(Duration::try_hours)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: "TOKEN_TTL_HOURS",
                value: ttl_hours.to_string(),
            })?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::BcryptCost(bcrypt_cost));
        }

        let credentials = match lookup("CREDENTIALS_FILE") {
            Some(path) => {
                let path = PathBuf::from(path);
                read_credentials_file(&path)
                    .map_err(|source| ConfigError::Credentials { path, source })?
            }
            None => {
                tracing::warn!("CREDENTIALS_FILE not set; no user will be able to log in");
                Vec::new()
            }
        };

        let seed_commands = parse_or(&lookup, "SEED_COMMANDS", true)?;

        Ok(Self {
            host,
            port,
            jwt_secret: Secret::new(jwt_secret),
            token_ttl,
            bcrypt_cost,
            credentials,
            seed_commands,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn signing_secret(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
