//! Environment configuration helpers
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file in the working directory.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading environment settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// A required variable is unset or blank
    #[error("{0} environment variable not found")]
    Missing(String),

    /// A variable is set but cannot be parsed
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Load variables from `.env` if present
///
/// Variables already set in the process environment win. Returns the path of
/// the loaded file.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Read a required, non-blank variable
pub fn env_var(key: &str) -> Result<String, EnvError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| EnvError::Missing(key.to_string()))
}

/// Read a variable, falling back to a default when unset or blank
pub fn env_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a variable, falling back to a default when unset or blank
pub fn env_parse<T>(key: &str, default: T) -> Result<T, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(key) {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(EnvError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
                value,
            }),
        },
        Err(_) => Ok(default),
    }
}
