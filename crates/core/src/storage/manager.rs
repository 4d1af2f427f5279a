use std::path::Path;
use tracing::info;

use crate::errors::CoreError;
use crate::models::ledger::Ledger;

use super::encryption::{self, KdfParams};
use super::format::{self, SnapshotHeader};

/// Save/load a [`Ledger`] as an encrypted, portable snapshot.
///
/// Flow: Ledger → JSON → AES-256-GCM(Argon2id(passphrase, salt)) → FTRK bytes.
pub struct SnapshotManager {
    kdf_params: KdfParams,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self {
            kdf_params: KdfParams::default(),
        }
    }

    /// Use non-default Argon2 costs for new snapshots (tests use cheap ones).
    pub fn with_kdf_params(kdf_params: KdfParams) -> Self {
        Self { kdf_params }
    }

    pub fn save_to_bytes(&self, ledger: &Ledger, passphrase: &str) -> Result<Vec<u8>, CoreError> {
        self.kdf_params.check_bounds()?;

        let plaintext = serde_json::to_vec(ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;

        let salt = encryption::random_bytes()?;
        let nonce = encryption::random_bytes()?;
        let key = encryption::derive_key(passphrase, &salt, &self.kdf_params)?;
        let ciphertext = encryption::seal(&plaintext, &key, &nonce)?;

        let header = SnapshotHeader {
            version: format::CURRENT_VERSION,
            kdf_params: self.kdf_params,
            salt,
            nonce,
            payload_len: ciphertext.len() as u64,
        };
        Ok(format::encode(&header, &ciphertext))
    }

    pub fn load_from_bytes(&self, data: &[u8], passphrase: &str) -> Result<Ledger, CoreError> {
        let (header, ciphertext) = format::decode(data)?;
        let key = encryption::derive_key(passphrase, &header.salt, &header.kdf_params)?;
        let plaintext = encryption::open(ciphertext, &key, &header.nonce)?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize ledger: {e}")))
    }

    pub fn save_to_file(
        &self,
        ledger: &Ledger,
        path: impl AsRef<Path>,
        passphrase: &str,
    ) -> Result<(), CoreError> {
        let path = path.as_ref();
        let bytes = self.save_to_bytes(ledger, passphrase)?;
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Wrote ledger snapshot");
        Ok(())
    }

    pub fn load_from_file(&self, path: impl AsRef<Path>, passphrase: &str) -> Result<Ledger, CoreError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let ledger = self.load_from_bytes(&bytes, passphrase)?;
        info!(path = %path.display(), expenses = ledger.expenses.len(), "Loaded ledger snapshot");
        Ok(ledger)
    }
}

impl Default for SnapshotManager {
    fn default() -> Self {
        Self::new()
    }
}
