// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Custody - Custodial Solana Wallet Engine
//!
//! This crate holds blockchain account secrets (BIP39 mnemonics) on behalf of
//! end users. Mnemonics are encrypted at rest under a user-supplied PIN and
//! decrypted only transiently to derive the ed25519 account and sign
//! transactions or messages on demand.
//!
//! ## Modules
//!
//! - `custody` - Mnemonic generation, PIN-derived encryption, account
//!   derivation and the wallet lifecycle orchestrator
//! - `blockchain` - Solana wire-format transaction signing and JSON-RPC
//!   broadcast
//! - `storage` - Wallet repository trait and in-memory implementation
//!
//! Transport (HTTP routing, request decoding) and durable persistence are the
//! embedding service's concern; both collaborators are injected as traits.

pub mod blockchain;
pub mod config;
pub mod custody;
pub mod error;
pub mod models;
pub mod storage;
