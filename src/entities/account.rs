// 💳 Account Entity - Stable account number + mutable balance
//
// "Account number is IDENTITY (never changes), holder name and balance are VALUES"
//
// Rules:
// - Deposits of zero or less (or non-finite) are ignored
// - Withdrawals never drive the balance below zero
// - Withdrawals of zero or less are rejected

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use thiserror::Error;

/// Unique key of an account inside the registry
pub type AccountNumber = i32;

// ============================================================================
// ACCOUNT ERRORS
// ============================================================================

/// Domain errors raised by account and registry operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccountError {
    #[error("Insufficient balance!")]
    InsufficientBalance { balance: f64, requested: f64 },

    #[error("Amount must be greater than zero!")]
    InvalidAmount(f64),

    #[error("Account already exists!")]
    AlreadyExists(AccountNumber),

    #[error("Account Not Found!")]
    NotFound(AccountNumber),
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

/// Account Entity
///
/// Identity: account number (immutable after creation)
/// Values: holder name, balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    account_number: AccountNumber,
    holder_name: String,
    balance: f64,
}

impl Account {
    /// Create a new account. Neither the name nor the opening balance is validated.
    pub fn new(account_number: AccountNumber, holder_name: impl Into<String>, balance: f64) -> Self {
        Account {
            account_number,
            holder_name: holder_name.into(),
            balance,
        }
    }

    pub fn account_number(&self) -> AccountNumber {
        self.account_number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Add `amount` to the balance
    ///
    /// Non-positive or non-finite amounts are a silent no-op, as is any
    /// deposit that would overflow the balance to infinity.
    pub fn deposit(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        let balance = self.balance + amount;
        if balance.is_finite() {
            self.balance = balance;
        }
    }

    /// Subtract `amount` from the balance
    ///
    /// Fails without touching the balance when the amount is not positive
    /// or exceeds the current balance.
    pub fn withdraw(&mut self, amount: f64) -> Result<(), AccountError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AccountError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(AccountError::InsufficientBalance {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Render the account details block
    pub fn display<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n--- Account Details ---")?;
        writeln!(out, "Account Number : {}", self.account_number)?;
        writeln!(out, "Holder Name    : {}", self.holder_name)?;
        writeln!(out, "Balance        : {}", format_balance(self.balance))
    }
}

/// Format a balance with at least one decimal place ("450.0", "12.5")
pub fn format_balance(balance: f64) -> String {
    format!("{:?}", balance)
}

// ============================================================================
// TESTS
// ============================================================================
