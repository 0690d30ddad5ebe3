// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana transaction wire codec.
//!
//! A serialized transaction is a compact-u16-prefixed array of 64-byte
//! signatures followed by the message bytes. The message is what gets
//! signed; signature slot `i` belongs to account key `i` of the message's
//! required signers.
//!
//! Both legacy and v0 (address-table) messages are parsed. Parsing is
//! strict: trailing bytes, truncated sections and out-of-range counts are
//! all decode errors.

const SIGNATURE_LEN: usize = 64;
const PUBKEY_LEN: usize = 32;
const BLOCKHASH_LEN: usize = 32;

/// High bit of the first message byte marks a versioned message.
const VERSION_PREFIX_MASK: u8 = 0x80;

/// Errors raised while decoding or re-assembling a transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(String),

    /// Wire format violation.
    #[error("malformed transaction: {0}")]
    Malformed(String),

    /// Unsupported message version byte.
    #[error("unsupported message version {0}")]
    UnsupportedVersion(u8),

    /// The signing account is not among the message's required signers.
    #[error("account is not a required signer of this transaction")]
    NotARequiredSigner,
}

/// A parsed Solana transaction.
///
/// Keeps the message as raw bytes (that is the exact payload a signature
/// covers) alongside the signature slots and the required-signer keys
/// extracted from the message header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolanaTransaction {
    signatures: Vec<[u8; SIGNATURE_LEN]>,
    message: Vec<u8>,
    required_signers: Vec<[u8; PUBKEY_LEN]>,
}

impl SolanaTransaction {
    /// Parse a transaction from wire bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = Reader::new(bytes);

        let sig_count = reader.compact_u16()?;
        let mut signatures = Vec::with_capacity(sig_count);
        for _ in 0..sig_count {
            let mut sig = [0u8; SIGNATURE_LEN];
            sig.copy_from_slice(reader.bytes(SIGNATURE_LEN)?);
            signatures.push(sig);
        }

        let message = reader.rest().to_vec();
        let required_signers = parse_required_signers(&message)?;

        if signatures.len() > required_signers.len() {
            return Err(TransactionError::Malformed(format!(
                "{} signatures for {} required signers",
                signatures.len(),
                required_signers.len()
            )));
        }
        // Partially-signed transactions may carry fewer slots; pad with
        // all-zero placeholders so slot indices line up with signer order.
        signatures.resize(required_signers.len(), [0u8; SIGNATURE_LEN]);

        Ok(Self {
            signatures,
            message,
            required_signers,
        })
    }

    /// The exact byte payload a signature must cover.
    pub fn message_bytes(&self) -> &[u8] {
        &self.message
    }

    /// Public keys that must sign this transaction, in slot order.
    pub fn required_signers(&self) -> &[[u8; PUBKEY_LEN]] {
        &self.required_signers
    }

    /// Place a signature into the slot belonging to `pubkey`.
    pub fn place_signature(
        &mut self,
        pubkey: &[u8; PUBKEY_LEN],
        signature: [u8; SIGNATURE_LEN],
    ) -> Result<(), TransactionError> {
        let slot = self
            .required_signers
            .iter()
            .position(|signer| signer == pubkey)
            .ok_or(TransactionError::NotARequiredSigner)?;

        self.signatures[slot] = signature;
        Ok(())
    }

    /// Re-encode to wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_LEN + self.message.len());
        write_compact_u16(&mut out, self.signatures.len() as u16);
        for sig in &self.signatures {
            out.extend_from_slice(sig);
        }
        out.extend_from_slice(&self.message);
        out
    }
}

/// Extract the required-signer pubkeys from message bytes, validating the
/// full message structure along the way.
fn parse_required_signers(
    message: &[u8],
) -> Result<Vec<[u8; PUBKEY_LEN]>, TransactionError> {
    let mut reader = Reader::new(message);

    let first = reader.peek_u8()?;
    let versioned = first & VERSION_PREFIX_MASK != 0;
    if versioned {
        let version = first & !VERSION_PREFIX_MASK;
        if version != 0 {
            return Err(TransactionError::UnsupportedVersion(version));
        }
        reader.u8()?;
    }

    let num_required_signatures = reader.u8()? as usize;
    let _num_readonly_signed = reader.u8()?;
    let _num_readonly_unsigned = reader.u8()?;

    let account_count = reader.compact_u16()?;
    if num_required_signatures == 0 || num_required_signatures > account_count {
        return Err(TransactionError::Malformed(format!(
            "{num_required_signatures} required signatures but {account_count} account keys"
        )));
    }

    let mut signers = Vec::with_capacity(num_required_signatures);
    for i in 0..account_count {
        let key = reader.bytes(PUBKEY_LEN)?;
        if i < num_required_signatures {
            let mut pubkey = [0u8; PUBKEY_LEN];
            pubkey.copy_from_slice(key);
            signers.push(pubkey);
        }
    }

    reader.bytes(BLOCKHASH_LEN)?;

    let instruction_count = reader.compact_u16()?;
    for _ in 0..instruction_count {
        let program_index = reader.u8()? as usize;
        if program_index >= account_count {
            return Err(TransactionError::Malformed(format!(
                "instruction program index {program_index} out of range"
            )));
        }
        let account_index_count = reader.compact_u16()?;
        for _ in 0..account_index_count {
            let index = reader.u8()? as usize;
            // v0 instructions may reference address-table entries beyond the
            // static key list, so only legacy messages can bound-check here.
            if !versioned && index >= account_count {
                return Err(TransactionError::Malformed(format!(
                    "instruction account index {index} out of range"
                )));
            }
        }
        let data_len = reader.compact_u16()?;
        reader.bytes(data_len)?;
    }

    if versioned {
        let lookup_count = reader.compact_u16()?;
        for _ in 0..lookup_count {
            reader.bytes(PUBKEY_LEN)?;
            let writable = reader.compact_u16()?;
            reader.bytes(writable)?;
            let readonly = reader.compact_u16()?;
            reader.bytes(readonly)?;
        }
    }

    if !reader.is_empty() {
        return Err(TransactionError::Malformed(format!(
            "{} trailing bytes after message",
            reader.remaining()
        )));
    }

    Ok(signers)
}

/// Bounds-checked reader over wire bytes.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn peek_u8(&self) -> Result<u8, TransactionError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or_else(|| TransactionError::Malformed("unexpected end of input".to_string()))
    }

    fn u8(&mut self) -> Result<u8, TransactionError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], TransactionError> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.buf.len());
        let end = end
            .ok_or_else(|| TransactionError::Malformed("unexpected end of input".to_string()))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read a compact-u16 (1-3 bytes, 7 bits per byte, little-endian).
    fn compact_u16(&mut self) -> Result<usize, TransactionError> {
        let mut value: u32 = 0;
        for i in 0..3 {
            let byte = self.u8()?;
            value |= u32::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                if value > u32::from(u16::MAX) {
                    return Err(TransactionError::Malformed(
                        "compact-u16 overflow".to_string(),
                    ));
                }
                return Ok(value as usize);
            }
        }
        Err(TransactionError::Malformed(
            "compact-u16 longer than 3 bytes".to_string(),
        ))
    }

    fn rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }
}

fn write_compact_u16(out: &mut Vec<u8>, mut value: u16) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}
