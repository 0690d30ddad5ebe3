// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory wallet repository.
//!
//! Backs tests and single-process embeddings. A `tokio::sync::RwLock`
//! around a `HashMap` keyed by owner id; the lock serializes concurrent
//! writes to the same wallet, matching what a durable backend would do at
//! the row level.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{RepositoryError, WalletRecord, WalletRepository};

/// Wallet store held entirely in process memory.
#[derive(Default)]
pub struct InMemoryWalletRepository {
    wallets: RwLock<HashMap<String, WalletRecord>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored wallets.
    pub async fn len(&self) -> usize {
        self.wallets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.wallets.read().await.is_empty()
    }
}

impl WalletRepository for InMemoryWalletRepository {
    async fn create(
        &self,
        owner_id: &str,
        name: &str,
        public_key: &str,
        encrypted_mnemonic: &str,
    ) -> Result<WalletRecord, RepositoryError> {
        let mut wallets = self.wallets.write().await;
        if wallets.contains_key(owner_id) {
            return Err(RepositoryError::Conflict(owner_id.to_string()));
        }

        let now = Utc::now();
        let record = WalletRecord {
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            public_key: public_key.to_string(),
            encrypted_mnemonic: encrypted_mnemonic.to_string(),
            created_at: now,
            updated_at: now,
        };
        wallets.insert(owner_id.to_string(), record.clone());
        Ok(record)
    }

    async fn get(&self, owner_id: &str) -> Result<WalletRecord, RepositoryError> {
        self.wallets
            .read()
            .await
            .get(owner_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(owner_id.to_string()))
    }

    async fn get_by_public_key(&self, public_key: &str) -> Result<WalletRecord, RepositoryError> {
        self.wallets
            .read()
            .await
            .values()
            .find(|record| record.public_key == public_key)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(public_key.to_string()))
    }

    async fn update(
        &self,
        owner_id: &str,
        name: &str,
        encrypted_mnemonic: &str,
    ) -> Result<WalletRecord, RepositoryError> {
        let mut wallets = self.wallets.write().await;
        let record = wallets
            .get_mut(owner_id)
            .ok_or_else(|| RepositoryError::NotFound(owner_id.to_string()))?;

        record.name = name.to_string();
        record.encrypted_mnemonic = encrypted_mnemonic.to_string();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, owner_id: &str) -> Result<(), RepositoryError> {
        self.wallets
            .write()
            .await
            .remove(owner_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(owner_id.to_string()))
    }
}
