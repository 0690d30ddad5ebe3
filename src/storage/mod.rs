// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet repository abstraction.
//!
//! The custody engine performs exactly one repository round-trip per fetch
//! and one per mutation; it never caches wallet state across calls. The
//! durable backend (SQL, KV, anything) lives behind [`WalletRepository`];
//! this crate ships an in-memory implementation for tests and embedding.
//!
//! Records store only non-secret material plus the PIN-encrypted mnemonic
//! blob. Plaintext mnemonics and private keys never reach this layer.

pub mod memory;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::InMemoryWalletRepository;

/// Errors raised by repository implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The owner already has a wallet (uniqueness enforced per owner).
    #[error("wallet already exists for owner {0}")]
    Conflict(String),

    /// No wallet for the owner.
    #[error("no wallet for owner {0}")]
    NotFound(String),

    /// Backend failure (connection, serialization, cancelled context).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A persisted wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletRecord {
    /// Owning user id. One wallet per owner.
    pub owner_id: String,
    /// Display name.
    pub name: String,
    /// Base58 public key (derived, not secret).
    pub public_key: String,
    /// Base58 nonce-prefixed AES-256-GCM blob holding the mnemonic.
    pub encrypted_mnemonic: String,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated (rename, PIN rotation).
    pub updated_at: DateTime<Utc>,
}

/// Durable storage for wallet records.
///
/// Implementations must enforce one wallet per owner on `create` and are
/// responsible for serializing concurrent writes to the same wallet.
pub trait WalletRepository: Send + Sync {
    /// Persist a new wallet. Fails with [`RepositoryError::Conflict`] if
    /// the owner already has one.
    fn create(
        &self,
        owner_id: &str,
        name: &str,
        public_key: &str,
        encrypted_mnemonic: &str,
    ) -> impl Future<Output = Result<WalletRecord, RepositoryError>> + Send;

    /// Fetch the wallet for an owner.
    fn get(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<WalletRecord, RepositoryError>> + Send;

    /// Fetch a wallet by its public key.
    fn get_by_public_key(
        &self,
        public_key: &str,
    ) -> impl Future<Output = Result<WalletRecord, RepositoryError>> + Send;

    /// Overwrite name and encrypted secret for an owner's wallet.
    fn update(
        &self,
        owner_id: &str,
        name: &str,
        encrypted_mnemonic: &str,
    ) -> impl Future<Output = Result<WalletRecord, RepositoryError>> + Send;

    /// Delete the wallet for an owner.
    ///
    /// Callers treat [`RepositoryError::NotFound`] from delete as success
    /// (idempotent delete).
    fn delete(&self, owner_id: &str)
        -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
