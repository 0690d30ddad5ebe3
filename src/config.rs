// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. The KDF salt is
//! process-wide, read-only state: it is validated once here (and again by
//! `SecretCipher::new`) and never mutated for the process lifetime.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CUSTODY_KDF_SALT` | Service-held secret mixed into the PIN key derivation (>= 16 bytes) | Required |
//! | `SOLANA_RPC_URL` | JSON-RPC endpoint used to broadcast signed transactions | `https://api.mainnet-beta.solana.com` |

use crate::custody::cipher::MIN_SALT_LEN;

/// Environment variable name for the KDF salt.
///
/// The salt is a deployment secret shared by all wallets. Rotating it
/// invalidates every stored ciphertext, so treat it like a master key.
pub const KDF_SALT_ENV: &str = "CUSTODY_KDF_SALT";

/// Environment variable name for the Solana RPC endpoint.
pub const RPC_URL_ENV: &str = "SOLANA_RPC_URL";

/// Default RPC endpoint (Solana mainnet-beta).
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Errors raised while loading configuration.
///
/// All of these are fatal at startup: the engine must not be constructed
/// with a missing or weak salt.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("KDF salt too short: {0} bytes, minimum {MIN_SALT_LEN}")]
    SaltTooShort(usize),
}

/// Process-wide configuration for the custody engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service-held KDF salt (>= 16 bytes).
    pub kdf_salt: String,
    /// JSON-RPC endpoint for transaction broadcast.
    pub rpc_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails fast if the salt is absent or shorter than [`MIN_SALT_LEN`]
    /// bytes; this is a configuration-time invariant, not a per-call check.
    pub fn from_env() -> Result<Self, ConfigError> {
        let kdf_salt =
            std::env::var(KDF_SALT_ENV).map_err(|_| ConfigError::MissingVar(KDF_SALT_ENV))?;
        let rpc_url =
            std::env::var(RPC_URL_ENV).unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());

        Self::new(kdf_salt, rpc_url)
    }

    /// Build a configuration from explicit values, enforcing the salt
    /// length invariant.
    pub fn new(
        kdf_salt: impl Into<String>,
        rpc_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let kdf_salt = kdf_salt.into();
        if kdf_salt.len() < MIN_SALT_LEN {
            return Err(ConfigError::SaltTooShort(kdf_salt.len()));
        }

        Ok(Self {
            kdf_salt,
            rpc_url: rpc_url.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_short_salt() {
        let result = Config::new("too-short", DEFAULT_RPC_URL);
        assert!(matches!(result, Err(ConfigError::SaltTooShort(9))));
    }

    #[test]
    fn new_accepts_minimum_salt() {
        let salt = "x".repeat(MIN_SALT_LEN);
        let config = Config::new(salt, DEFAULT_RPC_URL).unwrap();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
    }
}
