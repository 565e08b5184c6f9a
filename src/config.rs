// src/config.rs
//
// Runtime settings
//
// Settings are plain data: defaults come from `Default`, a JSON file may
// override any subset, and the binary layers CLI/env overrides on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Development-only signing secret. `Settings::validate` warns when it is still in use.
pub const DEFAULT_JWT_SECRET: &str = "reviewhub-development-secret";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub mail: MailSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file. `None` means `{data_dir}/reviewhub/reviewhub.db`.
    pub path: Option<PathBuf>,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// Bearer token lifetime
    pub token_ttl_secs: i64,
    /// Confirmation code lifetime
    pub code_ttl_secs: i64,
    /// Clear the confirmation code once it has been exchanged for a token
    pub single_use_codes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub from_address: String,
    /// When unset, messages are written to the log instead of being sent.
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_tls: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            pool_size: 15,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_secs: 24 * 60 * 60,
            code_ttl_secs: 24 * 60 * 60,
            single_use_codes: true,
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from_address: "noreply@reviewhub.local".to_string(),
            smtp_host: None,
            smtp_port: 25,
            smtp_tls: false,
            smtp_username: None,
            smtp_password: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.database.pool_size == 0 {
            return Err(AppError::Other(
                "database.pool_size must be at least 1".to_string(),
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::Other("auth.jwt_secret cannot be empty".to_string()));
        }
        if self.auth.token_ttl_secs <= 0 || self.auth.code_ttl_secs <= 0 {
            return Err(AppError::Other(
                "auth lifetimes must be positive".to_string(),
            ));
        }
        if self.auth.jwt_secret == DEFAULT_JWT_SECRET {
            log::warn!("Using the built-in development JWT secret; set auth.jwt_secret in production");
        }
        Ok(())
    }
}
