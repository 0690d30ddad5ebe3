// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deterministic account derivation.
//!
//! A mnemonic maps to exactly one ed25519 account: BIP39 seed (empty
//! passphrase), then SLIP-10 hardened derivation along `m/44'/501'/0'/0'`.
//! The same path convention as Phantom and other mainstream Solana wallets,
//! so exported mnemonics import cleanly elsewhere.
//!
//! Derivation is pure and side-effect-free; it is safe to call repeatedly
//! and concurrently.

use bip39::Mnemonic;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

/// Fixed BIP44 path for Solana account index 0.
pub const DERIVATION_PATH: &str = "m/44'/501'/0'/0'";

/// SLIP-10 master key HMAC domain for ed25519.
const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// Hardened derivation offset.
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Errors raised during account derivation.
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    /// Bad checksum, wrong word count or unknown word.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Malformed derivation path (should not happen for the fixed path).
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// HMAC keying failed (should not happen for valid seeds).
    #[error("key derivation failed: {0}")]
    Hmac(String),
}

/// An ed25519 account derived from a mnemonic.
///
/// Holds the signing key in memory only; the key material is zeroized on
/// drop by `ed25519-dalek`.
pub struct DerivedAccount {
    signing_key: SigningKey,
}

impl DerivedAccount {
    /// Derive the account for a mnemonic phrase.
    ///
    /// Validates the BIP39 checksum, regenerates the 512-bit seed with an
    /// empty passphrase, and walks [`DERIVATION_PATH`] with SLIP-10
    /// hardened-only derivation.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, DerivationError> {
        let mnemonic = Mnemonic::parse_normalized(phrase)
            .map_err(|e| DerivationError::InvalidMnemonic(e.to_string()))?;

        let seed = Zeroizing::new(mnemonic.to_seed(""));
        let key = derive_path(seed.as_ref(), DERIVATION_PATH)?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&key),
        })
    }

    /// The account's public key bytes.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Base58-encoded public key (the Solana address).
    pub fn public_key_base58(&self) -> String {
        bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string()
    }

    /// Base58-encoded 64-byte keypair, `seed || public key`.
    ///
    /// This is the standard Solana private-key export format accepted by
    /// wallet import flows. Secret; never persist or log it.
    pub fn private_key_base58(&self) -> String {
        let mut keypair = Zeroizing::new([0u8; 64]);
        keypair[..32].copy_from_slice(self.signing_key.as_bytes());
        keypair[32..].copy_from_slice(self.signing_key.verifying_key().as_bytes());
        bs58::encode(keypair.as_ref()).into_string()
    }

    /// Sign arbitrary bytes with the account's private key.
    pub fn sign(&self, payload: &[u8]) -> Signature {
        self.signing_key.sign(payload)
    }
}

impl std::fmt::Debug for DerivedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedAccount")
            .field("public_key", &self.public_key_base58())
            .finish_non_exhaustive()
    }
}

/// Walk a hardened SLIP-10 path over an ed25519 master seed.
fn derive_path(seed: &[u8], path: &str) -> Result<[u8; 32], DerivationError> {
    let components = parse_path(path)?;

    let mut mac = Hmac::<Sha512>::new_from_slice(ED25519_SEED_KEY)
        .map_err(|e| DerivationError::Hmac(e.to_string()))?;
    mac.update(seed);
    let digest = mac.finalize().into_bytes();

    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&digest[..32]);
    chain_code.copy_from_slice(&digest[32..]);

    for index in components {
        let mut mac = Hmac::<Sha512>::new_from_slice(&chain_code)
            .map_err(|e| DerivationError::Hmac(e.to_string()))?;
        // 0x00 prefix marks ed25519 private parent key per SLIP-10.
        mac.update(&[0x00]);
        mac.update(&key);
        mac.update(&index.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
    }

    chain_code.zeroize();
    Ok(key)
}

/// Parse a BIP44-style path into hardened SLIP-10 indices.
fn parse_path(path: &str) -> Result<Vec<u32>, DerivationError> {
    let rest = path
        .strip_prefix("m/")
        .ok_or_else(|| DerivationError::InvalidPath("path must start with m/".to_string()))?;

    let mut components = Vec::new();
    for part in rest.split('/') {
        let num = part.strip_suffix('\'').ok_or_else(|| {
            DerivationError::InvalidPath(format!(
                "ed25519 requires hardened components, got {part}"
            ))
        })?;

        let index: u32 = num
            .parse()
            .map_err(|_| DerivationError::InvalidPath(format!("bad component {part}")))?;
        components.push(index | HARDENED_OFFSET);
    }

    Ok(components)
}
