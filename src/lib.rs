// Records Desk - Core Library
// Exposes the bank and student modules for both console binaries and tests

pub mod config;
pub mod console;
pub mod entities;
pub mod logging;
pub mod store;
pub mod bank_menu;    // bank-manager menu loop
pub mod student_menu; // student-manager menu loop

// Re-export commonly used types
pub use config::Config;
pub use console::{Console, ConsoleError, MenuChoice};
pub use entities::{
    Account, AccountError, AccountNumber,
    Bank, LoadReport,
    Student, StudentError, StudentId, StudentRoster,
};
pub use store::{AccountStore, StoreError, StoreFile, FORMAT_VERSION};
pub use bank_menu::BankMenu;
pub use student_menu::StudentMenu;
