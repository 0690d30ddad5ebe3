// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! BIP39 mnemonic generation.
//!
//! Entropy comes from the OS CSPRNG; the `bip39` crate embeds the checksum
//! and maps entropy to the English wordlist. Nothing here persists or logs
//! the generated phrase.

use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// Entropy strength of a generated mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 128 bits of entropy, 12 words.
    Words12,
    /// 256 bits of entropy, 24 words.
    Words24,
}

impl MnemonicStrength {
    /// Entropy size in bytes.
    pub fn entropy_bytes(self) -> usize {
        match self {
            MnemonicStrength::Words12 => 16,
            MnemonicStrength::Words24 => 32,
        }
    }

    /// Number of words in the resulting phrase.
    pub fn word_count(self) -> usize {
        match self {
            MnemonicStrength::Words12 => 12,
            MnemonicStrength::Words24 => 24,
        }
    }
}

/// Errors raised while generating a mnemonic.
#[derive(Debug, thiserror::Error)]
pub enum MnemonicError {
    /// The OS random source failed or was exhausted.
    #[error("secure random source unavailable: {0}")]
    EntropySource(String),

    /// Entropy could not be encoded as a mnemonic (wrong length; should not
    /// happen for the fixed strengths above).
    #[error("failed to encode entropy as mnemonic: {0}")]
    Encode(String),
}

/// Generate a fresh mnemonic phrase of the given strength.
pub fn generate(strength: MnemonicStrength) -> Result<String, MnemonicError> {
    let mut entropy = Zeroizing::new([0u8; 32]);
    let entropy = &mut entropy[..strength.entropy_bytes()];

    OsRng
        .try_fill_bytes(entropy)
        .map_err(|e| MnemonicError::EntropySource(e.to_string()))?;

    let mnemonic =
        Mnemonic::from_entropy(entropy).map_err(|e| MnemonicError::Encode(e.to_string()))?;

    Ok(mnemonic.to_string())
}
