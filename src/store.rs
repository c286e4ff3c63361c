// 🗄️ Account Store - Versioned whole-registry file
//
// The registry is written as ONE JSON document, rewritten in full on every save:
//
//   { "format_version": 1,
//     "saved_at": "2026-10-14T09:00:00Z",
//     "checksum": "<sha256 of the accounts array>",
//     "accounts": [ { "account_number": 100, "holder_name": "Alice", "balance": 450.0 } ] }
//
// Load policy:
// - File absent            → Ok(None), caller starts empty
// - File present but bad   → Err(StoreError), caller decides how loudly to recover

use crate::entities::{Account, AccountNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Current on-disk schema version
pub const FORMAT_VERSION: u32 = 1;

// ============================================================================
// STORE ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed store file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported store format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Checksum mismatch: recorded {recorded}, computed {computed}")]
    ChecksumMismatch { recorded: String, computed: String },

    #[error("Duplicate account number {0} in store file")]
    DuplicateAccount(AccountNumber),

    #[error("Account {account_number} has a non-finite balance ({balance})")]
    NonFiniteBalance {
        account_number: AccountNumber,
        balance: f64,
    },
}

impl StoreError {
    /// True when the file was read but its contents cannot be trusted
    ///
    /// I/O failures say nothing about the bytes on disk.
    pub fn is_corrupt_content(&self) -> bool {
        !matches!(self, StoreError::Io { .. })
    }

    fn io(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ============================================================================
// FILE SCHEMA
// ============================================================================

/// Only the version field, read first so a future schema fails with a clear error
#[derive(Debug, Deserialize)]
struct StoreHeader {
    format_version: u32,
}

/// Full on-disk document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFile {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub checksum: String,
    pub accounts: Vec<Account>,
}

impl StoreFile {
    /// Build a document for the given accounts, stamped now
    ///
    /// JSON has no representation for NaN or infinity, so such balances are refused.
    pub fn new(accounts: Vec<Account>) -> Result<Self, StoreError> {
        if let Some(account) = accounts.iter().find(|acc| !acc.balance().is_finite()) {
            return Err(StoreError::NonFiniteBalance {
                account_number: account.account_number(),
                balance: account.balance(),
            });
        }
        let checksum = compute_checksum(&accounts)?;
        Ok(StoreFile {
            format_version: FORMAT_VERSION,
            saved_at: Utc::now(),
            checksum,
            accounts,
        })
    }

    /// Check version, checksum and key uniqueness
    pub fn verify(&self) -> Result<(), StoreError> {
        if self.format_version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let computed = compute_checksum(&self.accounts)?;
        if computed != self.checksum {
            return Err(StoreError::ChecksumMismatch {
                recorded: self.checksum.clone(),
                computed,
            });
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if !seen.insert(account.account_number()) {
                return Err(StoreError::DuplicateAccount(account.account_number()));
            }
        }

        Ok(())
    }
}

/// SHA-256 (hex) over the compact JSON form of the accounts array
pub fn compute_checksum(accounts: &[Account]) -> Result<String, StoreError> {
    let bytes = serde_json::to_vec(accounts)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// ACCOUNT STORE
// ============================================================================

/// Handle on the single persisted-state file
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AccountStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted registry
    ///
    /// Returns `Ok(None)` when no file exists yet.
    pub fn load(&self) -> Result<Option<Vec<Account>>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file yet");
                return Ok(None);
            }
            Err(err) => return Err(StoreError::io(&self.path)(err)),
        };

        let header: StoreHeader = serde_json::from_slice(&bytes)?;
        if header.format_version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let file: StoreFile = serde_json::from_slice(&bytes)?;
        file.verify()?;

        info!(
            path = %self.path.display(),
            accounts = file.accounts.len(),
            saved_at = %file.saved_at,
            "loaded account store"
        );
        Ok(Some(file.accounts))
    }

    /// Overwrite the file with the full registry
    pub fn save<'a, I>(&self, accounts: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = &'a Account>,
    {
        let document = StoreFile::new(accounts.into_iter().cloned().collect())?;

        let file = File::create(&self.path).map_err(StoreError::io(&self.path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writeln!(writer).map_err(StoreError::io(&self.path))?;
        writer.flush().map_err(StoreError::io(&self.path))?;

        debug!(
            path = %self.path.display(),
            accounts = document.accounts.len(),
            "saved account store"
        );
        Ok(())
    }

    /// Move an unreadable file aside as `<name>.corrupt-<timestamp>`
    pub fn quarantine(&self) -> Result<PathBuf, StoreError> {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "accounts".into());
        name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")));

        let target = self.path.with_file_name(name);
        fs::rename(&self.path, &target).map_err(StoreError::io(&self.path))?;
        Ok(target)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> AccountStore {
        AccountStore::new(dir.path().join("accounts.json"))
    }

    fn sample_accounts() -> Vec<Account> {
        vec![
            Account::new(100, "Alice", 450.0),
            Account::new(200, "Bob Smith", 0.1 + 0.2),
            Account::new(-3, "", -12.75),
        ]
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let accounts = sample_accounts();

        store.save(&accounts).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, accounts);
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&sample_accounts()).unwrap();
        store.save(&[Account::new(1, "Only", 1.0)]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, vec![Account::new(1, "Only", 1.0)]);
    }

    #[test]
    fn test_saved_file_is_versioned_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_accounts()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["format_version"], 1);
        assert_eq!(value["accounts"][0]["account_number"], 100);
        assert_eq!(value["accounts"][0]["holder_name"], "Alice");
        assert_eq!(value["accounts"][0]["balance"], 450.0);
        assert_eq!(value["checksum"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_load_garbage_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"\xac\xed\x00\x05sr\x00\x11java.util.HashMap").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_load_truncated_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_accounts()).unwrap();

        let raw = fs::read(store.path()).unwrap();
        fs::write(store.path(), &raw[..raw.len() / 2]).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"format_version": 9, "records": []}"#).unwrap();

        match store.load() {
            Err(StoreError::UnsupportedVersion { found, expected }) => {
                assert_eq!(found, 9);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_load_detects_tampered_balance() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[Account::new(100, "Alice", 450.0)]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        fs::write(store.path(), raw.replace("450.0", "4500.0")).unwrap();

        assert!(matches!(store.load(), Err(StoreError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_verify_rejects_duplicate_numbers() {
        let file = StoreFile::new(vec![
            Account::new(5, "First", 1.0),
            Account::new(5, "Second", 2.0),
        ])
        .unwrap();

        assert!(matches!(file.verify(), Err(StoreError::DuplicateAccount(5))));
    }

    #[test]
    fn test_save_refuses_non_finite_balance() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[Account::new(1, "Good", 10.0)]).unwrap();

        let err = store
            .save(&[Account::new(1, "Good", 10.0), Account::new(2, "Inf", f64::INFINITY)])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NonFiniteBalance { account_number: 2, .. }
        ));

        // The previous file is left as it was
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, vec![Account::new(1, "Good", 10.0)]);
    }

    #[test]
    fn test_quarantine_preserves_bytes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"not json").unwrap();

        let moved = store.quarantine().unwrap();

        assert!(!store.path().exists());
        assert!(moved
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("accounts.json.corrupt-"));
        assert_eq!(fs::read(&moved).unwrap(), b"not json");
    }

    #[test]
    fn test_corrupt_content_classification() {
        let io = StoreError::Io {
            path: PathBuf::from("accounts.json"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!io.is_corrupt_content());
        assert!(StoreError::DuplicateAccount(1).is_corrupt_content());
        assert!(StoreError::UnsupportedVersion { found: 2, expected: 1 }.is_corrupt_content());
    }

    #[test]
    fn test_save_into_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("nope").join("accounts.json"));

        let err = store.save(&sample_accounts()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
