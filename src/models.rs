// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! View types returned by custody operations. Secret fields (`private_key`,
//! `mnemonic`) are optional and only populated by `generate_wallet` and
//! `export_wallet`; they are skipped during serialization when absent so
//! `get_wallet` responses never carry empty secret slots.
//!
//! Keys, mnemonics and signatures cross this boundary as base58 text;
//! chain-native transaction and message payloads as base64 text.

use serde::{Deserialize, Serialize};

/// Name assigned to a wallet when the caller does not supply one.
pub const DEFAULT_WALLET_NAME: &str = "Wallet";

/// A wallet as seen by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet {
    /// Display name.
    pub name: String,
    /// Base58-encoded ed25519 public key.
    pub public_key: String,
    /// Base58-encoded 64-byte keypair (seed || public key). Secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// BIP39 mnemonic phrase. Secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

/// Result of a message-signing operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedMessage {
    /// The original base64-encoded message, echoed back.
    pub message: String,
    /// Base58-encoded ed25519 signature over the decoded message bytes.
    pub signature: String,
}
