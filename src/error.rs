// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy for the custody engine.
//!
//! `InvalidPin` and `NotFound` are expected, caller-recoverable outcomes.
//! The cryptographic variants (`Entropy`, `Derivation`, `Cipher`,
//! `Encoding`) normally only fire on misconfiguration and should alert
//! operators rather than be retried.
//!
//! Error messages never contain mnemonics, private keys or PINs.

use crate::blockchain::{BroadcastError, TransactionError};
use crate::custody::{DerivationError, MnemonicError};
use crate::storage::RepositoryError;

/// Top-level error returned by custody operations.
#[derive(Debug, thiserror::Error)]
pub enum CustodyError {
    /// Malformed caller input (empty name, PIN too short or unchanged).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The stored secret did not decrypt under the supplied PIN.
    ///
    /// Also covers corrupted ciphertext: authenticated encryption gives no
    /// oracle to tell a wrong key from tampered storage, and the two are
    /// deliberately indistinguishable to callers.
    #[error("invalid pin code")]
    InvalidPin,

    /// No wallet exists for the owner.
    #[error("wallet not found")]
    NotFound,

    /// The owner already has a wallet (one wallet per user).
    #[error("wallet already exists for this user")]
    AlreadyExists,

    /// The secure random source failed.
    #[error("entropy source failure: {0}")]
    Entropy(String),

    /// Mnemonic validation or hierarchical key derivation failed.
    #[error("account derivation failed: {0}")]
    Derivation(String),

    /// Encryption failed (key construction or random source).
    #[error("mnemonic encryption failed: {0}")]
    Cipher(String),

    /// A stored blob failed base58 decoding.
    #[error("ciphertext encoding invalid: {0}")]
    Encoding(String),

    /// A chain transaction payload could not be decoded or signed into.
    #[error("transaction decode failed: {0}")]
    TransactionDecode(String),

    /// Broadcast to the chain failed after signing completed.
    #[error("transaction submission failed: {0}")]
    Submission(String),

    /// The wallet repository failed for a reason other than conflict or
    /// missing record.
    #[error("repository failure: {0}")]
    Repository(String),
}

impl From<MnemonicError> for CustodyError {
    fn from(e: MnemonicError) -> Self {
        CustodyError::Entropy(e.to_string())
    }
}

impl From<DerivationError> for CustodyError {
    fn from(e: DerivationError) -> Self {
        CustodyError::Derivation(e.to_string())
    }
}

impl From<TransactionError> for CustodyError {
    fn from(e: TransactionError) -> Self {
        CustodyError::TransactionDecode(e.to_string())
    }
}

impl From<BroadcastError> for CustodyError {
    fn from(e: BroadcastError) -> Self {
        CustodyError::Submission(e.to_string())
    }
}

impl From<RepositoryError> for CustodyError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(_) => CustodyError::AlreadyExists,
            RepositoryError::NotFound(_) => CustodyError::NotFound,
            RepositoryError::Backend(msg) => CustodyError::Repository(msg),
        }
    }
}
