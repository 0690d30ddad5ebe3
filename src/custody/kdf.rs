// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PIN key derivation.
//!
//! `derive_key` is a single SHA-256 pass over `pin || salt`, not a
//! memory-hard password hash. This matches the deployed ciphertext format;
//! swapping in Argon2id or scrypt would keep the surrounding contracts but
//! invalidate every stored blob, so it must be done as an explicit
//! migration, never silently.

use sha2::{Digest, Sha256};

/// Derive the 32-byte AES key for a PIN.
///
/// Deterministic: the same `(pin, salt)` pair always yields the same key.
/// The salt is the service-held secret validated at construction time.
pub fn derive_key(pin: &str, salt: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.finalize().into()
}
