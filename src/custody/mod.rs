// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Secret custody: mnemonic generation, PIN-derived encryption, account
//! derivation and the wallet lifecycle orchestrator.
//!
//! Data flow on store: generator -> plaintext mnemonic -> cipher (AES-256-GCM
//! under `SHA-256(pin || salt)`) -> base58 blob persisted by the repository.
//! On use: repository -> blob -> cipher -> plaintext mnemonic -> account
//! deriver -> ed25519 account -> signer. Only the cipher, deriver and signer
//! ever observe plaintext secrets; the orchestrator passes them through as
//! transient values scoped to a single call.

pub mod account;
pub mod cipher;
pub mod kdf;
pub mod mnemonic;
pub mod service;

pub use account::{DerivationError, DerivedAccount, DERIVATION_PATH};
pub use cipher::{CipherError, SecretCipher, MIN_SALT_LEN};
pub use mnemonic::{MnemonicError, MnemonicStrength};
pub use service::CustodyService;
