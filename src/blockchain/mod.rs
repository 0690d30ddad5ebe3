// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana integration: wire-format transaction signing and broadcast.

pub mod client;
pub mod signing;
pub mod transaction;

use std::future::Future;

pub use client::{BroadcastError, RpcClient};
pub use transaction::{SolanaTransaction, TransactionError};

/// Submits signed transactions to the chain.
///
/// Injected into the custody orchestrator so tests and alternative
/// backends can substitute the network. Submission failures surface to the
/// caller for caller-driven retry; the engine never retries on its own.
pub trait BroadcastClient: Send + Sync {
    /// Submit a base64-encoded signed transaction.
    ///
    /// Returns the transaction signature (base58) as the submission id.
    fn submit(
        &self,
        signed_tx_base64: &str,
    ) -> impl Future<Output = Result<String, BroadcastError>> + Send;
}
