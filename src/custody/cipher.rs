// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated encryption of mnemonic phrases.
//!
//! Blob layout: `nonce (12 bytes) || AES-256-GCM ciphertext+tag`, base58
//! encoded for storage and transport. A fresh random nonce is drawn per
//! encryption call.
//!
//! The GCM tag is the wrong-PIN detector: decrypting under a key derived
//! from a different PIN fails authentication instead of yielding garbage
//! plaintext, so callers see `Authentication` for both a wrong PIN and
//! tampered storage.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use super::kdf;

/// Minimum length of the service-held KDF salt, in bytes.
pub const MIN_SALT_LEN: usize = 16;

/// AES-GCM nonce size in bytes.
const NONCE_LEN: usize = 12;

/// Errors raised by the secret cipher.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    /// Configured salt is below [`MIN_SALT_LEN`] bytes.
    #[error("salt too short: {0} bytes, minimum {MIN_SALT_LEN}")]
    SaltTooShort(usize),

    /// The OS random source failed while drawing a nonce.
    #[error("secure random source unavailable: {0}")]
    EntropySource(String),

    /// AES-GCM seal failed (key construction; practically never).
    #[error("encryption failed")]
    Encrypt,

    /// The stored blob is not valid base58.
    #[error("invalid base58 blob: {0}")]
    Decode(String),

    /// The blob is too short to contain a nonce, or the authentication tag
    /// did not verify. Wrong key and corrupted ciphertext both land here.
    #[error("authentication failed")]
    Authentication,
}

/// Encrypts and decrypts mnemonic phrases under PIN-derived keys.
///
/// Holds the process-wide KDF salt as immutable state; construction fails
/// fast if the salt is shorter than [`MIN_SALT_LEN`] bytes.
#[derive(Clone)]
pub struct SecretCipher {
    salt: String,
}

impl SecretCipher {
    /// Create a cipher with the service-held salt.
    pub fn new(salt: impl Into<String>) -> Result<Self, CipherError> {
        let salt = salt.into();
        if salt.len() < MIN_SALT_LEN {
            return Err(CipherError::SaltTooShort(salt.len()));
        }
        Ok(Self { salt })
    }

    /// Encrypt a mnemonic under the key derived from `pin`.
    ///
    /// Returns the nonce-prefixed ciphertext as a base58 string.
    pub fn encrypt_mnemonic(&self, mnemonic: &str, pin: &str) -> Result<String, CipherError> {
        let key = Zeroizing::new(kdf::derive_key(pin, &self.salt));
        let cipher = Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| CipherError::Encrypt)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| CipherError::EntropySource(e.to_string()))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, mnemonic.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);

        Ok(bs58::encode(blob).into_string())
    }

    /// Decrypt a base58 blob produced by [`encrypt_mnemonic`].
    ///
    /// The plaintext is returned in a zeroizing buffer so it is wiped when
    /// the caller's scope ends.
    ///
    /// [`encrypt_mnemonic`]: SecretCipher::encrypt_mnemonic
    pub fn decrypt_mnemonic(
        &self,
        encrypted: &str,
        pin: &str,
    ) -> Result<Zeroizing<String>, CipherError> {
        let blob = bs58::decode(encrypted)
            .into_vec()
            .map_err(|e| CipherError::Decode(e.to_string()))?;

        if blob.len() < NONCE_LEN {
            return Err(CipherError::Authentication);
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);

        let key = Zeroizing::new(kdf::derive_key(pin, &self.salt));
        let cipher =
            Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| CipherError::Authentication)?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CipherError::Authentication)?;

        String::from_utf8(plaintext)
            .map(Zeroizing::new)
            .map_err(|_| CipherError::Authentication)
    }
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Salt is a deployment secret; never format it.
        f.debug_struct("SecretCipher").finish_non_exhaustive()
    }
}
