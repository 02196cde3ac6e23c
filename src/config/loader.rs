//! Load gateway settings from environment variables.

use crate::config::types::*;
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

impl GatewayConfig {
    /// Read settings from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; unset variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(GatewayConfig {
            port: parsed(&lookup, "PORT", DEFAULT_PORT)?,
            relational: RelationalConfig {
                host: text("DB_HOST", "localhost"),
                port: parsed(&lookup, "DB_PORT", 3306)?,
                user: text("DB_USER", "root"),
                password: text("DB_PASSWORD", ""),
                database: text("DB_NAME", "gateway"),
                pool_size: parsed(&lookup, "DB_POOL_SIZE", DEFAULT_POOL_SIZE)?,
                acquire_timeout: Duration::from_secs(parsed(
                    &lookup,
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    DEFAULT_ACQUIRE_TIMEOUT_SECS,
                )?),
            },
            document: DocumentConfig {
                uri: text("MONGO_URI", "mongodb://localhost:27017/gateway"),
            },
            object_storage: ObjectStorageConfig {
                region: text("AWS_REGION", "us-east-1"),
                endpoint: lookup("S3_ENDPOINT").filter(|s| !s.trim().is_empty()),
            },
            expose_error_details: flag(&lookup, "EXPOSE_ERROR_DETAILS", true)?,
            body_limit_bytes: parsed(&lookup, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?,
        })
    }
}

fn parsed<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            name,
            value: raw,
            reason: "expected true or false".into(),
        }),
    }
}
