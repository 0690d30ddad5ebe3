// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing of messages and transactions with a derived account.
//!
//! The signer never decrypts or derives key material; it is handed an
//! already-derived [`DerivedAccount`] by the orchestrator, which scopes the
//! account's lifetime to the single calling operation. Everything here is
//! pure computation with no I/O.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::custody::DerivedAccount;

use super::transaction::{SolanaTransaction, TransactionError};

/// Sign arbitrary bytes, returning the base58-encoded ed25519 signature.
pub fn sign_bytes(account: &DerivedAccount, payload: &[u8]) -> String {
    let signature = account.sign(payload);
    bs58::encode(signature.to_bytes()).into_string()
}

/// Sign a base64-encoded Solana transaction.
///
/// Decodes the wire format, signs the message bytes, places the signature
/// in the slot belonging to the account's public key, and re-encodes.
/// The account must be one of the transaction's required signers.
pub fn sign_transaction(
    account: &DerivedAccount,
    tx_base64: &str,
) -> Result<String, TransactionError> {
    let bytes = BASE64
        .decode(tx_base64)
        .map_err(|e| TransactionError::Base64(e.to_string()))?;

    let mut tx = SolanaTransaction::deserialize(&bytes)?;

    let signature = account.sign(tx.message_bytes());
    tx.place_signature(&account.public_key().to_bytes(), signature.to_bytes())?;

    Ok(BASE64.encode(tx.serialize()))
}
