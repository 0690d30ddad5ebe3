// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet lifecycle orchestrator.
//!
//! Each public operation is a short-lived transaction over external
//! storage: fetch the wallet, decrypt under the caller's PIN, act, persist.
//! The service holds no wallet state between calls and never caches
//! decrypted secrets; plaintext mnemonics and derived keys live only for
//! the duration of the call that needs them.
//!
//! "Correct PIN" has no independent verification mechanism: it is defined
//! operationally as "the stored blob decrypts and yields a non-empty
//! phrase". Any decryption authentication failure therefore surfaces as
//! [`CustodyError::InvalidPin`].

use zeroize::Zeroizing;

use crate::blockchain::{signing, BroadcastClient};
use crate::error::CustodyError;
use crate::models::{SignedMessage, Wallet, DEFAULT_WALLET_NAME};
use crate::storage::{RepositoryError, WalletRecord, WalletRepository};

use super::cipher::{CipherError, SecretCipher};
use super::mnemonic::{self, MnemonicStrength};
use super::DerivedAccount;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Minimum accepted PIN length.
pub const MIN_PIN_LEN: usize = 4;

/// Custody orchestrator over injected storage and broadcast collaborators.
pub struct CustodyService<R, B> {
    cipher: SecretCipher,
    repo: R,
    broadcast: B,
}

impl<R, B> CustodyService<R, B>
where
    R: WalletRepository,
    B: BroadcastClient,
{
    /// Build a service from its collaborators.
    ///
    /// The cipher carries the process-wide KDF salt, already validated at
    /// construction.
    pub fn new(cipher: SecretCipher, repo: R, broadcast: B) -> Self {
        Self {
            cipher,
            repo,
            broadcast,
        }
    }

    /// Generate a fresh wallet without persisting anything.
    ///
    /// Returns the default name, public key, private key and mnemonic so
    /// the caller can show the phrase for backup before storing.
    pub fn generate_wallet(&self) -> Result<Wallet, CustodyError> {
        let phrase = mnemonic::generate(MnemonicStrength::Words12)?;
        let account = DerivedAccount::from_mnemonic(&phrase)?;

        Ok(Wallet {
            name: DEFAULT_WALLET_NAME.to_string(),
            public_key: account.public_key_base58(),
            private_key: Some(account.private_key_base58()),
            mnemonic: Some(phrase),
        })
    }

    /// Encrypt a mnemonic under `pin` and persist it for `owner_id`.
    ///
    /// Deriving the account doubles as mnemonic validation. An empty name
    /// falls back to the default. One wallet per owner; a second store
    /// fails with [`CustodyError::AlreadyExists`].
    pub async fn store_wallet(
        &self,
        owner_id: &str,
        pin: &str,
        phrase: &str,
        name: &str,
    ) -> Result<(), CustodyError> {
        validate_pin(pin)?;

        let account = DerivedAccount::from_mnemonic(phrase)?;
        let name = if name.is_empty() {
            DEFAULT_WALLET_NAME
        } else {
            name
        };

        let encrypted = self
            .cipher
            .encrypt_mnemonic(phrase, pin)
            .map_err(|e| CustodyError::Cipher(e.to_string()))?;

        self.repo
            .create(owner_id, name, &account.public_key_base58(), &encrypted)
            .await?;

        tracing::info!(owner_id, public_key = %account.public_key_base58(), "wallet stored");
        Ok(())
    }

    /// Fetch the public view of an owner's wallet: name and public key,
    /// never secret material.
    pub async fn get_wallet(&self, owner_id: &str) -> Result<Wallet, CustodyError> {
        let record = self.repo.get(owner_id).await?;

        Ok(Wallet {
            name: record.name,
            public_key: record.public_key,
            private_key: None,
            mnemonic: None,
        })
    }

    /// Delete an owner's wallet after proving PIN knowledge.
    ///
    /// Idempotent: an absent wallet is success, as is a delete race where
    /// the record vanishes between fetch and delete.
    pub async fn delete_wallet(&self, owner_id: &str, pin: &str) -> Result<(), CustodyError> {
        let record = match self.repo.get(owner_id).await {
            Ok(record) => record,
            Err(RepositoryError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        self.decrypt_checked(&record, pin)?;

        match self.repo.delete(owner_id).await {
            Ok(()) | Err(RepositoryError::NotFound(_)) => {
                tracing::info!(owner_id, "wallet deleted");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rename an owner's wallet. PIN-gated; the encrypted secret is
    /// written back unchanged. An absent wallet is success.
    pub async fn update_wallet_name(
        &self,
        owner_id: &str,
        pin: &str,
        name: &str,
    ) -> Result<(), CustodyError> {
        let record = match self.repo.get(owner_id).await {
            Ok(record) => record,
            Err(RepositoryError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        self.decrypt_checked(&record, pin)?;

        if name.is_empty() {
            return Err(CustodyError::Validation("name is required".to_string()));
        }

        self.repo
            .update(owner_id, name, &record.encrypted_mnemonic)
            .await?;

        tracing::info!(owner_id, "wallet renamed");
        Ok(())
    }

    /// Re-encrypt an owner's mnemonic under a new PIN.
    ///
    /// The plaintext phrase and derived account are unchanged; only the
    /// ciphertext rotates. An absent wallet is success.
    pub async fn change_wallet_pin(
        &self,
        owner_id: &str,
        pin: &str,
        new_pin: &str,
    ) -> Result<(), CustodyError> {
        if pin == new_pin {
            return Err(CustodyError::Validation(
                "new pin must differ from the old one".to_string(),
            ));
        }
        validate_pin(new_pin)?;

        let record = match self.repo.get(owner_id).await {
            Ok(record) => record,
            Err(RepositoryError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let phrase = self.decrypt_checked(&record, pin)?;

        let encrypted = self
            .cipher
            .encrypt_mnemonic(&phrase, new_pin)
            .map_err(|e| CustodyError::Cipher(e.to_string()))?;

        self.repo
            .update(owner_id, &record.name, &encrypted)
            .await?;

        tracing::info!(owner_id, "wallet pin rotated");
        Ok(())
    }

    /// Export an owner's wallet: name, public key, private key and
    /// mnemonic. PIN-gated; an absent wallet surfaces as `NotFound`.
    pub async fn export_wallet(&self, owner_id: &str, pin: &str) -> Result<Wallet, CustodyError> {
        let record = self.repo.get(owner_id).await?;
        let phrase = self.decrypt_checked(&record, pin)?;
        let account = DerivedAccount::from_mnemonic(&phrase)?;

        tracing::info!(owner_id, "wallet exported");
        Ok(Wallet {
            name: record.name,
            public_key: account.public_key_base58(),
            private_key: Some(account.private_key_base58()),
            mnemonic: Some(phrase.as_str().to_string()),
        })
    }

    /// Sign an arbitrary base64-encoded message with the owner's account.
    ///
    /// Returns the original message alongside the base58 signature.
    pub async fn sign_message(
        &self,
        owner_id: &str,
        pin: &str,
        message_base64: &str,
    ) -> Result<SignedMessage, CustodyError> {
        let account = self.account_for(owner_id, pin).await?;

        let payload = BASE64
            .decode(message_base64)
            .map_err(|e| CustodyError::Validation(format!("invalid base64 message: {e}")))?;

        Ok(SignedMessage {
            message: message_base64.to_string(),
            signature: signing::sign_bytes(&account, &payload),
        })
    }

    /// Sign a base64-encoded Solana transaction with the owner's account.
    ///
    /// Returns the re-encoded transaction with the signature placed in the
    /// owner's signer slot. Nothing is submitted to the chain.
    pub async fn sign_transaction(
        &self,
        owner_id: &str,
        pin: &str,
        tx_base64: &str,
    ) -> Result<String, CustodyError> {
        let account = self.account_for(owner_id, pin).await?;
        let signed = signing::sign_transaction(&account, tx_base64)?;
        Ok(signed)
    }

    /// Sign a transaction and broadcast it, returning the transaction
    /// signature as submission id.
    ///
    /// Signing is pure and always completes before submission is
    /// attempted; a broadcast failure arrives as
    /// [`CustodyError::Submission`] with the node's error preserved, and
    /// retry is the caller's decision.
    pub async fn sign_and_send_transaction(
        &self,
        owner_id: &str,
        pin: &str,
        tx_base64: &str,
    ) -> Result<String, CustodyError> {
        let signed = self.sign_transaction(owner_id, pin, tx_base64).await?;

        let submission_id = self.broadcast.submit(&signed).await?;
        tracing::info!(owner_id, submission_id = %submission_id, "transaction broadcast");
        Ok(submission_id)
    }

    /// Shared PIN-verification sub-sequence: fetch, decrypt, derive.
    async fn account_for(
        &self,
        owner_id: &str,
        pin: &str,
    ) -> Result<DerivedAccount, CustodyError> {
        let record = self.repo.get(owner_id).await?;
        let phrase = self.decrypt_checked(&record, pin)?;
        Ok(DerivedAccount::from_mnemonic(&phrase)?)
    }

    /// Decrypt a stored blob, collapsing authentication failures and empty
    /// plaintext into `InvalidPin`. A base58 decode failure is storage
    /// corruption at the encoding level and stays distinct.
    fn decrypt_checked(
        &self,
        record: &WalletRecord,
        pin: &str,
    ) -> Result<Zeroizing<String>, CustodyError> {
        match self.cipher.decrypt_mnemonic(&record.encrypted_mnemonic, pin) {
            Ok(phrase) if !phrase.is_empty() => Ok(phrase),
            Ok(_) => Err(CustodyError::InvalidPin),
            Err(CipherError::Decode(e)) => Err(CustodyError::Encoding(e)),
            Err(_) => Err(CustodyError::InvalidPin),
        }
    }
}

fn validate_pin(pin: &str) -> Result<(), CustodyError> {
    if pin.len() < MIN_PIN_LEN {
        return Err(CustodyError::Validation(format!(
            "pin must be at least {MIN_PIN_LEN} characters long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::BroadcastError;
    use crate::storage::InMemoryWalletRepository;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use std::sync::Mutex;

    const SALT: &str = "service-test-salt-0123456789";
    const PHRASE: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    /// Broadcast stub that records submissions and returns a fixed id.
    #[derive(Default)]
    struct RecordingBroadcast {
        submitted: Mutex<Vec<String>>,
        fail: bool,
    }

    impl BroadcastClient for RecordingBroadcast {
        async fn submit(&self, signed_tx_base64: &str) -> Result<String, BroadcastError> {
            if self.fail {
                return Err(BroadcastError::Rpc {
                    code: -32002,
                    message: "Blockhash not found".to_string(),
                });
            }
            self.submitted
                .lock()
                .unwrap()
                .push(signed_tx_base64.to_string());
            Ok("submission-id".to_string())
        }
    }

    fn service() -> CustodyService<InMemoryWalletRepository, RecordingBroadcast> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        CustodyService::new(
            SecretCipher::new(SALT).unwrap(),
            InMemoryWalletRepository::new(),
            RecordingBroadcast::default(),
        )
    }

    fn failing_service() -> CustodyService<InMemoryWalletRepository, RecordingBroadcast> {
        CustodyService::new(
            SecretCipher::new(SALT).unwrap(),
            InMemoryWalletRepository::new(),
            RecordingBroadcast {
                submitted: Mutex::new(Vec::new()),
                fail: true,
            },
        )
    }

    fn verify_base58(public_key: &str, payload: &[u8], signature: &str) -> bool {
        let pk_bytes: [u8; 32] = bs58::decode(public_key)
            .into_vec()
            .unwrap()
            .try_into()
            .unwrap();
        let pk = VerifyingKey::from_bytes(&pk_bytes).unwrap();
        let sig_bytes = bs58::decode(signature).into_vec().unwrap();
        let sig = Signature::from_slice(&sig_bytes).unwrap();
        pk.verify(payload, &sig).is_ok()
    }

    #[test]
    fn generate_wallet_returns_all_material() {
        let wallet = service().generate_wallet().unwrap();

        assert_eq!(wallet.name, DEFAULT_WALLET_NAME);
        let phrase = wallet.mnemonic.unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);

        // Returned key material is consistent with the phrase.
        let account = DerivedAccount::from_mnemonic(&phrase).unwrap();
        assert_eq!(wallet.public_key, account.public_key_base58());
        assert_eq!(wallet.private_key.unwrap(), account.private_key_base58());
    }

    #[tokio::test]
    async fn store_defaults_empty_name() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let wallet = service.get_wallet("u1").await.unwrap();
        assert_eq!(wallet.name, DEFAULT_WALLET_NAME);
    }

    #[tokio::test]
    async fn store_keeps_supplied_name() {
        let service = service();
        service
            .store_wallet("u1", "1234", PHRASE, "Savings")
            .await
            .unwrap();

        let wallet = service.get_wallet("u1").await.unwrap();
        assert_eq!(wallet.name, "Savings");
    }

    #[tokio::test]
    async fn store_rejects_short_pin() {
        let result = service().store_wallet("u1", "12", PHRASE, "").await;
        assert!(matches!(result, Err(CustodyError::Validation(_))));
    }

    #[tokio::test]
    async fn store_rejects_invalid_mnemonic() {
        let result = service()
            .store_wallet("u1", "1234", "definitely not a mnemonic", "")
            .await;
        assert!(matches!(result, Err(CustodyError::Derivation(_))));
    }

    #[tokio::test]
    async fn second_store_for_owner_conflicts() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let result = service.store_wallet("u1", "1234", PHRASE, "").await;
        assert!(matches!(result, Err(CustodyError::AlreadyExists)));
    }

    #[tokio::test]
    async fn get_wallet_never_returns_secrets() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let wallet = service.get_wallet("u1").await.unwrap();
        assert!(wallet.private_key.is_none());
        assert!(wallet.mnemonic.is_none());
    }

    #[tokio::test]
    async fn get_missing_wallet_is_not_found() {
        let result = service().get_wallet("nobody").await;
        assert!(matches!(result, Err(CustodyError::NotFound)));
    }

    #[tokio::test]
    async fn export_round_trips_phrase_and_keys() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let exported = service.export_wallet("u1", "1234").await.unwrap();
        assert_eq!(exported.mnemonic.as_deref(), Some(PHRASE));

        let account = DerivedAccount::from_mnemonic(PHRASE).unwrap();
        assert_eq!(exported.public_key, account.public_key_base58());
        assert_eq!(
            exported.private_key.as_deref(),
            Some(account.private_key_base58().as_str())
        );
    }

    #[tokio::test]
    async fn export_with_wrong_pin_fails() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let result = service.export_wallet("u1", "0000").await;
        assert!(matches!(result, Err(CustodyError::InvalidPin)));
    }

    #[tokio::test]
    async fn export_missing_wallet_is_not_found() {
        let result = service().export_wallet("nobody", "1234").await;
        assert!(matches!(result, Err(CustodyError::NotFound)));
    }

    #[tokio::test]
    async fn rename_requires_pin_and_name() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let wrong_pin = service.update_wallet_name("u1", "0000", "New").await;
        assert!(matches!(wrong_pin, Err(CustodyError::InvalidPin)));

        let empty_name = service.update_wallet_name("u1", "1234", "").await;
        assert!(matches!(empty_name, Err(CustodyError::Validation(_))));

        service.update_wallet_name("u1", "1234", "New").await.unwrap();
        assert_eq!(service.get_wallet("u1").await.unwrap().name, "New");
    }

    #[tokio::test]
    async fn rename_of_absent_wallet_is_success() {
        let service = service();
        service
            .update_wallet_name("nobody", "1234", "New")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pin_rotation_preserves_identity() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();
        let before = service.export_wallet("u1", "1234").await.unwrap();

        service.change_wallet_pin("u1", "1234", "5678").await.unwrap();

        let after = service.export_wallet("u1", "5678").await.unwrap();
        assert_eq!(after.public_key, before.public_key);
        assert_eq!(after.mnemonic, before.mnemonic);

        let old_pin = service.export_wallet("u1", "1234").await;
        assert!(matches!(old_pin, Err(CustodyError::InvalidPin)));
    }

    #[tokio::test]
    async fn pin_rotation_validations() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let same = service.change_wallet_pin("u1", "1234", "1234").await;
        assert!(matches!(same, Err(CustodyError::Validation(_))));

        let short = service.change_wallet_pin("u1", "1234", "12").await;
        assert!(matches!(short, Err(CustodyError::Validation(_))));

        let wrong = service.change_wallet_pin("u1", "0000", "5678").await;
        assert!(matches!(wrong, Err(CustodyError::InvalidPin)));
    }

    #[tokio::test]
    async fn pin_rotation_of_absent_wallet_is_success() {
        service().change_wallet_pin("nobody", "1234", "5678").await.unwrap();
    }

    #[tokio::test]
    async fn delete_is_pin_gated_and_idempotent() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let wrong = service.delete_wallet("u1", "0000").await;
        assert!(matches!(wrong, Err(CustodyError::InvalidPin)));

        service.delete_wallet("u1", "1234").await.unwrap();
        assert!(matches!(
            service.get_wallet("u1").await,
            Err(CustodyError::NotFound)
        ));

        // Absent wallet deletes again without error, whatever the pin.
        service.delete_wallet("u1", "0000").await.unwrap();
    }

    #[tokio::test]
    async fn sign_message_signature_verifies() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let message = BASE64.encode(b"Hello");
        let signed = service.sign_message("u1", "1234", &message).await.unwrap();

        assert_eq!(signed.message, message);
        let wallet = service.get_wallet("u1").await.unwrap();
        assert!(verify_base58(&wallet.public_key, b"Hello", &signed.signature));
    }

    #[tokio::test]
    async fn sign_message_rejects_bad_base64() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let result = service.sign_message("u1", "1234", "!!bad!!").await;
        assert!(matches!(result, Err(CustodyError::Validation(_))));
    }

    #[tokio::test]
    async fn sign_operations_require_pin() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let message = BASE64.encode(b"Hello");
        let result = service.sign_message("u1", "0000", &message).await;
        assert!(matches!(result, Err(CustodyError::InvalidPin)));
    }

    #[tokio::test]
    async fn sign_transaction_rejects_garbage() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let garbage = BASE64.encode([0xffu8; 3]);
        let result = service.sign_transaction("u1", "1234", &garbage).await;
        assert!(matches!(result, Err(CustodyError::TransactionDecode(_))));
    }

    #[tokio::test]
    async fn sign_and_send_submits_signed_transaction() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let account = DerivedAccount::from_mnemonic(PHRASE).unwrap();
        let tx_bytes = crate::blockchain::transaction::tests::unsigned_legacy_tx(&[account
            .public_key()
            .to_bytes()]);
        let tx_base64 = BASE64.encode(&tx_bytes);

        let submission_id = service
            .sign_and_send_transaction("u1", "1234", &tx_base64)
            .await
            .unwrap();
        assert_eq!(submission_id, "submission-id");

        let submitted = service.broadcast.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        // What went over the wire is the signed encoding, not the input.
        assert_ne!(submitted[0], tx_base64);
    }

    #[tokio::test]
    async fn broadcast_failure_surfaces_as_submission_error() {
        let service = failing_service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        let account = DerivedAccount::from_mnemonic(PHRASE).unwrap();
        let tx_bytes = crate::blockchain::transaction::tests::unsigned_legacy_tx(&[account
            .public_key()
            .to_bytes()]);
        let tx_base64 = BASE64.encode(&tx_bytes);

        let result = service
            .sign_and_send_transaction("u1", "1234", &tx_base64)
            .await;
        assert!(matches!(result, Err(CustodyError::Submission(_))));
    }

    #[tokio::test]
    async fn end_to_end_wallet_lifecycle() {
        let service = service();

        // Generate, then store under pin 1234 with no name.
        let generated = service.generate_wallet().unwrap();
        let phrase = generated.mnemonic.clone().unwrap();
        service.store_wallet("u1", "1234", &phrase, "").await.unwrap();

        // Public view carries the default name and the derived key.
        let wallet = service.get_wallet("u1").await.unwrap();
        assert_eq!(wallet.name, DEFAULT_WALLET_NAME);
        assert_eq!(
            wallet.public_key,
            DerivedAccount::from_mnemonic(&phrase).unwrap().public_key_base58()
        );

        // Message signature verifies against the stored public key.
        let message = BASE64.encode(b"Hello");
        let signed = service.sign_message("u1", "1234", &message).await.unwrap();
        assert_eq!(signed.message, message);
        assert!(verify_base58(&wallet.public_key, b"Hello", &signed.signature));

        // Wrong pin cannot delete; right pin can; the wallet is then gone.
        let wrong = service.delete_wallet("u1", "0000").await;
        assert!(matches!(wrong, Err(CustodyError::InvalidPin)));
        service.delete_wallet("u1", "1234").await.unwrap();
        assert!(matches!(
            service.get_wallet("u1").await,
            Err(CustodyError::NotFound)
        ));
    }

    #[tokio::test]
    async fn corrupted_blob_encoding_stays_distinct() {
        let service = service();
        service.store_wallet("u1", "1234", PHRASE, "").await.unwrap();

        // Overwrite the stored blob with non-base58 text.
        service.repo.delete("u1").await.unwrap();
        service
            .repo
            .create("u1", "Wallet", "pk", "0OIl-not-base58")
            .await
            .unwrap();

        let result = service.export_wallet("u1", "1234").await;
        assert!(matches!(result, Err(CustodyError::Encoding(_))));
    }
}
