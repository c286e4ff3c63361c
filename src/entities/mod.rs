// Entity Models
// Account + Bank registry (persisted) and Student roster (in memory only)

pub mod account;
pub mod bank;
pub mod student;

pub use account::{Account, AccountError, AccountNumber};
pub use bank::{Bank, LoadReport};
pub use student::{Student, StudentError, StudentId, StudentRoster};
