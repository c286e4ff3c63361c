// 🏦 Bank Registry - Account number → Account, backed by one store file
//
// Lifecycle:
// - open():  load the store file (absent → empty, unreadable → warn + preserve + empty)
// - mutate:  create_account / deposit / withdraw change memory only
// - save():  rewrite the whole registry; callers save after every successful mutation

use super::account::{Account, AccountError, AccountNumber};
use crate::store::{AccountStore, StoreError};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, error, warn};

// ============================================================================
// LOAD REPORT
// ============================================================================

/// What happened when the registry was opened
#[derive(Debug)]
pub enum LoadReport {
    /// No store file existed; starting empty
    Fresh,

    /// Store file read successfully
    Restored { accounts: usize },

    /// Store file existed but could not be read; starting empty
    ///
    /// `preserved_as` is where a corrupt file was moved, if that worked.
    /// It is `None` for I/O failures, which leave the file in place.
    Recovered {
        error: StoreError,
        preserved_as: Option<PathBuf>,
    },
}

// ============================================================================
// BANK REGISTRY
// ============================================================================

/// Registry of all accounts, keyed by account number
pub struct Bank {
    accounts: BTreeMap<AccountNumber, Account>,
    store: AccountStore,
}

impl Bank {
    /// Empty registry that will persist to `store` (nothing is read)
    pub fn new(store: AccountStore) -> Self {
        Bank {
            accounts: BTreeMap::new(),
            store,
        }
    }

    /// Load the registry from `store`
    pub fn open(store: AccountStore) -> (Self, LoadReport) {
        let mut bank = Bank::new(store);

        let report = match bank.store.load() {
            Ok(None) => LoadReport::Fresh,
            Ok(Some(accounts)) => {
                let count = accounts.len();
                bank.accounts = accounts
                    .into_iter()
                    .map(|acc| (acc.account_number(), acc))
                    .collect();
                LoadReport::Restored { accounts: count }
            }
            Err(err) if !err.is_corrupt_content() => {
                // Leave the file where it is; its bytes may be intact
                warn!(
                    path = %bank.store.path().display(),
                    error = %err,
                    "account store could not be read, starting with an empty registry"
                );
                LoadReport::Recovered {
                    error: err,
                    preserved_as: None,
                }
            }
            Err(err) => {
                warn!(
                    path = %bank.store.path().display(),
                    error = %err,
                    "account store unreadable, starting with an empty registry"
                );
                let preserved_as = match bank.store.quarantine() {
                    Ok(target) => {
                        warn!(moved_to = %target.display(), "unreadable store preserved");
                        Some(target)
                    }
                    Err(move_err) => {
                        error!(error = %move_err, "could not preserve unreadable store");
                        None
                    }
                };
                LoadReport::Recovered {
                    error: err,
                    preserved_as,
                }
            }
        };

        (bank, report)
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Insert a new account; an existing number is left untouched
    ///
    /// The opening balance may be any finite value, negative included.
    pub fn create_account(
        &mut self,
        account_number: AccountNumber,
        holder_name: impl Into<String>,
        balance: f64,
    ) -> Result<(), AccountError> {
        if !balance.is_finite() {
            return Err(AccountError::InvalidAmount(balance));
        }
        if self.accounts.contains_key(&account_number) {
            return Err(AccountError::AlreadyExists(account_number));
        }
        self.accounts
            .insert(account_number, Account::new(account_number, holder_name, balance));
        debug!(account_number, balance, "account created");
        Ok(())
    }

    pub fn deposit(&mut self, account_number: AccountNumber, amount: f64) -> Result<(), AccountError> {
        let account = self.account_mut(account_number)?;
        account.deposit(amount);
        debug!(account_number, amount, balance = account.balance(), "deposit");
        Ok(())
    }

    pub fn withdraw(&mut self, account_number: AccountNumber, amount: f64) -> Result<(), AccountError> {
        let account = self.account_mut(account_number)?;
        account.withdraw(amount)?;
        debug!(account_number, amount, balance = account.balance(), "withdrawal");
        Ok(())
    }

    pub fn account(&self, account_number: AccountNumber) -> Result<&Account, AccountError> {
        self.accounts
            .get(&account_number)
            .ok_or(AccountError::NotFound(account_number))
    }

    fn account_mut(&mut self, account_number: AccountNumber) -> Result<&mut Account, AccountError> {
        self.accounts
            .get_mut(&account_number)
            .ok_or(AccountError::NotFound(account_number))
    }

    /// Render one account, or report that it does not exist
    pub fn display_account<W: Write>(&self, account_number: AccountNumber, out: &mut W) -> io::Result<()> {
        match self.account(account_number) {
            Ok(account) => account.display(out),
            Err(err) => writeln!(out, "{}", err),
        }
    }

    /// All accounts in account-number order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Rewrite the store file with the whole registry
    ///
    /// On failure memory is kept as is; the next successful save catches the file up.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(self.accounts.values())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn temp_bank() -> (TempDir, Bank) {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("accounts.json"));
        (dir, Bank::new(store))
    }

    #[test]
    fn test_create_account() {
        let (_dir, mut bank) = temp_bank();
        bank.create_account(100, "Alice", 500.0).unwrap();

        let account = bank.account(100).unwrap();
        assert_eq!(account.holder_name(), "Alice");
        assert_eq!(account.balance(), 500.0);
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_create_duplicate_leaves_existing_untouched() {
        let (_dir, mut bank) = temp_bank();
        bank.create_account(100, "Alice", 500.0).unwrap();

        let err = bank.create_account(100, "Mallory", 1.0).unwrap_err();
        assert_eq!(err, AccountError::AlreadyExists(100));
        assert_eq!(err.to_string(), "Account already exists!");

        let account = bank.account(100).unwrap();
        assert_eq!(account.holder_name(), "Alice");
        assert_eq!(account.balance(), 500.0);
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        let (_dir, mut bank) = temp_bank();
        bank.create_account(1, "Existing", 10.0).unwrap();

        assert_eq!(bank.deposit(42, 10.0), Err(AccountError::NotFound(42)));
        assert_eq!(bank.withdraw(42, 10.0), Err(AccountError::NotFound(42)));
        let mut out = Vec::new();
        bank.display_account(42, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Account Not Found!\n");
        assert_eq!(AccountError::NotFound(42).to_string(), "Account Not Found!");

        assert_eq!(bank.len(), 1);
        assert_eq!(bank.account(1).unwrap().balance(), 10.0);
    }

    #[test]
    fn test_withdraw_insufficient_keeps_balance() {
        let (_dir, mut bank) = temp_bank();
        bank.create_account(7, "Bob", 100.0).unwrap();

        let err = bank.withdraw(7, 100.5).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientBalance { .. }));
        assert_eq!(bank.account(7).unwrap().balance(), 100.0);
    }

    #[test]
    fn test_deposit_non_positive_is_noop() {
        let (_dir, mut bank) = temp_bank();
        bank.create_account(7, "Bob", 100.0).unwrap();

        bank.deposit(7, 0.0).unwrap();
        bank.deposit(7, -40.0).unwrap();
        assert_eq!(bank.account(7).unwrap().balance(), 100.0);
    }

    #[test]
    fn test_alice_scenario() {
        let (_dir, mut bank) = temp_bank();
        bank.create_account(100, "Alice", 500.0).unwrap();
        bank.deposit(100, 150.0).unwrap();
        bank.withdraw(100, 200.0).unwrap();

        let mut out = Vec::new();
        bank.display_account(100, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(bank.account(100).unwrap().balance(), 450.0);
        assert!(text.contains("Balance        : 450.0"));
    }

    #[test]
    fn test_open_without_file_is_fresh() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("accounts.json"));

        let (bank, report) = Bank::open(store);
        assert!(matches!(report, LoadReport::Fresh));
        assert!(bank.is_empty());
    }

    #[test]
    fn test_save_then_open_round_trip() {
        let (dir, mut bank) = temp_bank();
        bank.create_account(100, "Alice", 450.0).unwrap();
        bank.create_account(3, "Carol", 0.1 + 0.2).unwrap();
        bank.save().unwrap();

        let store = AccountStore::new(dir.path().join("accounts.json"));
        let (reopened, report) = Bank::open(store);

        assert!(matches!(report, LoadReport::Restored { accounts: 2 }));
        let before: Vec<_> = bank.accounts().cloned().collect();
        let after: Vec<_> = reopened.accounts().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_open_corrupt_file_recovers_and_preserves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.json");
        fs::write(&path, b"{ definitely not an account store").unwrap();

        let (bank, report) = Bank::open(AccountStore::new(&path));

        assert!(bank.is_empty());
        match report {
            LoadReport::Recovered { error, preserved_as } => {
                assert!(matches!(error, StoreError::Malformed(_)));
                let preserved = preserved_as.unwrap();
                assert_eq!(
                    fs::read(preserved).unwrap(),
                    b"{ definitely not an account store"
                );
            }
            other => panic!("expected Recovered, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_open_unreadable_path_leaves_it_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.json");
        fs::create_dir(&path).unwrap();

        let (bank, report) = Bank::open(AccountStore::new(&path));

        assert!(bank.is_empty());
        match report {
            LoadReport::Recovered { error, preserved_as } => {
                assert!(matches!(error, StoreError::Io { .. }));
                assert!(preserved_as.is_none());
            }
            other => panic!("expected Recovered, got {:?}", other),
        }
        assert!(path.is_dir());
    }

    #[test]
    fn test_non_finite_opening_balance_rejected() {
        let (_dir, mut bank) = temp_bank();

        assert!(matches!(
            bank.create_account(1, "Nan", f64::NAN),
            Err(AccountError::InvalidAmount(_))
        ));
        assert_eq!(
            bank.create_account(2, "Inf", f64::INFINITY),
            Err(AccountError::InvalidAmount(f64::INFINITY))
        );
        assert!(bank.is_empty());
    }

    #[test]
    fn test_infinite_deposit_keeps_store_loadable() {
        let (dir, mut bank) = temp_bank();
        bank.create_account(1, "Good", 10.0).unwrap();
        bank.create_account(2, "Inf", 5.0).unwrap();

        bank.deposit(2, f64::INFINITY).unwrap();
        assert_eq!(bank.account(2).unwrap().balance(), 5.0);
        bank.save().unwrap();

        let (reopened, report) = Bank::open(AccountStore::new(dir.path().join("accounts.json")));
        assert!(matches!(report, LoadReport::Restored { accounts: 2 }));
        assert_eq!(reopened.account(1).unwrap().balance(), 10.0);
        assert_eq!(reopened.account(2).unwrap().balance(), 5.0);
    }

    #[test]
    fn test_failed_save_keeps_memory() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("missing").join("accounts.json"));
        let mut bank = Bank::new(store);

        bank.create_account(1, "Dana", 20.0).unwrap();
        assert!(bank.save().is_err());
        assert_eq!(bank.account(1).unwrap().balance(), 20.0);
    }
}
