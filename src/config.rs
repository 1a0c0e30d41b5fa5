// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration, read from the environment (and an optional `.env` file).

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Overrides the platform data directory database.
    pub db_path: Option<PathBuf>,

    /// Tracing filter used when RUST_LOG is unset.
    pub log_level: String,

    /// Currency code used when the settings table has none.
    pub currency: String,

    /// Applicant identity used when `--user` is not given.
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: "info".to_string(),
            currency: "KES".to_string(),
            user: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let currency = match non_empty("LOANEASE_CURRENCY") {
            Some(c) => validate_currency(&c)?,
            None => defaults.currency,
        };

        Ok(Config {
            db_path: non_empty("LOANEASE_DB").map(PathBuf::from),
            log_level: non_empty("LOANEASE_LOG").unwrap_or(defaults.log_level),
            currency,
            user: non_empty("LOANEASE_USER"),
        })
    }
}

pub fn validate_currency(code: &str) -> Result<String, ConfigError> {
    let code = code.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ConfigError::InvalidValue {
            var: "LOANEASE_CURRENCY",
            reason: format!("'{}' is not a three-letter currency code", code),
        })
    }
}
