//! Server settings parsing and validation.
//!
//! Environment-driven configuration is centralised here so the values are
//! validated consistently and testable through `mockable::MockEnv`. Release
//! builds require explicit secrets; debug builds may fall back to ephemeral
//! ones with a warning.

use chrono::Duration;
use mockable::Env;
use tracing::warn;
use uuid::Uuid;

use crate::domain::TokenSecret;

const ACCESS_SECRET_ENV: &str = "AMITY_ACCESS_SECRET";
const REFRESH_SECRET_ENV: &str = "AMITY_REFRESH_SECRET";
const ACCESS_TTL_ENV: &str = "AMITY_ACCESS_TTL_SECS";
const COOKIE_SECURE_ENV: &str = "AMITY_COOKIE_SECURE";
const BIND_ADDR_ENV: &str = "AMITY_BIND_ADDR";

// Access tokens default to a 30 day lifetime. Refresh tokens are issued
// by the login flow elsewhere; only their secret lives here.
const DEFAULT_ACCESS_TTL_SECS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SECS_EXPECTED: &str = "a positive number of seconds";

/// Build mode for settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing values.
    Debug,
    /// Release builds require explicit secrets and valid values.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Runtime configuration derived from the environment.
#[derive(Clone, Debug)]
pub struct Settings {
    pub access_secret: TokenSecret,
    pub refresh_secret: TokenSecret,
    pub access_ttl: Duration,
    pub cookie_secure: bool,
    pub bind_addr: String,
}

/// Errors raised while validating server configuration.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Build settings from environment variables and build mode.
pub fn settings_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Settings, SettingsError> {
    Ok(Settings {
        access_secret: secret_from_env(env, mode, ACCESS_SECRET_ENV)?,
        refresh_secret: secret_from_env(env, mode, REFRESH_SECRET_ENV)?,
        access_ttl: ttl_from_env(env, mode, ACCESS_TTL_ENV, DEFAULT_ACCESS_TTL_SECS)?,
        cookie_secure: cookie_secure_from_env(env, mode)?,
        bind_addr: env
            .string(BIND_ADDR_ENV)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
    })
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
) -> Result<TokenSecret, SettingsError> {
    match env.string(name) {
        Some(value) if !value.is_empty() => Ok(TokenSecret::new(value)),
        Some(_) | None => {
            if mode.is_debug() {
                warn!(name, "secret not set; using ephemeral key (dev only)");
                Ok(TokenSecret::new(format!(
                    "{}{}",
                    Uuid::new_v4(),
                    Uuid::new_v4()
                )))
            } else {
                Err(SettingsError::MissingEnv { name })
            }
        }
    }
}

fn ttl_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default_secs: i64,
) -> Result<Duration, SettingsError> {
    match env.string(name) {
        Some(value) => match value.parse::<i64>() {
            Ok(secs) if secs > 0 => Ok(Duration::seconds(secs)),
            _ => {
                if mode.is_debug() {
                    warn!(name, value = %value, "invalid TTL; using default");
                    Ok(Duration::seconds(default_secs))
                } else {
                    Err(SettingsError::InvalidEnv {
                        name,
                        value,
                        expected: SECS_EXPECTED,
                    })
                }
            }
        },
        None => Ok(Duration::seconds(default_secs)),
    }
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SettingsError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => {
                if mode.is_debug() {
                    warn!(value = %value, "invalid AMITY_COOKIE_SECURE; defaulting to insecure");
                    Ok(false)
                } else {
                    Err(SettingsError::InvalidEnv {
                        name: COOKIE_SECURE_ENV,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            }
        },
        None => {
            if mode.is_debug() {
                warn!("AMITY_COOKIE_SECURE not set; defaulting to insecure");
                Ok(false)
            } else {
                Err(SettingsError::MissingEnv {
                    name: COOKIE_SECURE_ENV,
                })
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
