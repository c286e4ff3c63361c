// 🏦 Bank Menu - Interactive loop over the account registry
//
// One state only ("awaiting menu choice"). Each option runs to completion,
// saving the whole registry after every successful mutation.

use crate::console::{Console, ConsoleError, MenuChoice};
use crate::entities::{AccountNumber, Bank, LoadReport};
use crate::store::AccountStore;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{error, info};

const MENU: &[&str] = &[
    "\n------ * Bank Management System * ------",
    "1. Create Account",
    "2. Deposit Money",
    "3. Withdraw Money",
    "4. Check Account Details",
    "5. Exit",
];

enum Flow {
    Continue,
    Exit,
}

pub struct BankMenu<R, W> {
    bank: Bank,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> BankMenu<R, W> {
    pub fn new(bank: Bank, console: Console<R, W>) -> Self {
        BankMenu { bank, console }
    }

    /// Open the registry from `store` and tell the user if it had to be recovered
    pub fn start(store: AccountStore, console: Console<R, W>) -> Result<Self> {
        let path = store.path().to_path_buf();
        let (bank, report) = Bank::open(store);
        let mut menu = BankMenu::new(bank, console);

        match report {
            LoadReport::Fresh => info!(path = %path.display(), "starting with no accounts"),
            LoadReport::Restored { accounts } => info!(accounts, "accounts restored"),
            LoadReport::Recovered { error, preserved_as } => {
                menu.console
                    .say(format!(
                        "WARNING: could not read account data from {} ({}). Starting with no accounts.",
                        path.display(),
                        error
                    ))
                    .context("failed to print load warning")?;
                if let Some(preserved) = preserved_as {
                    menu.console
                        .say(format!("The unreadable file was kept as {}", preserved.display()))
                        .context("failed to print load warning")?;
                }
            }
        }

        Ok(menu)
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn into_parts(self) -> (Bank, Console<R, W>) {
        (self.bank, self.console)
    }

    /// Run until the exit option is chosen or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(ConsoleError::Closed) => {
                    info!("input closed, leaving bank menu");
                    return Ok(());
                }
                Err(err) => return Err(err).context("bank console failed"),
            }
        }
    }

    fn step(&mut self) -> Result<Flow, ConsoleError> {
        for line in MENU {
            self.console.say(line)?;
        }

        let choice = match self.console.read_choice("Choose Option: ")? {
            MenuChoice::Number(n) => n,
            MenuChoice::Invalid => return Ok(Flow::Continue),
        };

        match choice {
            1 => self.create_account()?,
            2 => self.deposit()?,
            3 => self.withdraw()?,
            4 => self.display_account()?,
            5 => {
                self.console.say("Thank you for using Bank Management System!")?;
                return Ok(Flow::Exit);
            }
            _ => self.console.say("Invalid choice!")?,
        }

        Ok(Flow::Continue)
    }

    fn prompt_account_number(&mut self) -> Result<AccountNumber, ConsoleError> {
        self.console.prompt_number("Enter Account Number: ")
    }

    fn prompt_amount(&mut self) -> Result<f64, ConsoleError> {
        let amount: i32 = self.console.prompt_number("Enter Amount: ")?;
        Ok(f64::from(amount))
    }

    fn create_account(&mut self) -> Result<(), ConsoleError> {
        let account_number = self.prompt_account_number()?;
        let name = self.console.prompt_line("Enter Holder Name: ")?;
        let balance: f64 = self.console.prompt_number("Enter Initial Balance: ")?;

        match self.bank.create_account(account_number, name, balance) {
            Ok(()) => {
                self.persist()?;
                self.console.say("Account Created Successfully!")
            }
            Err(err) => self.console.say(err),
        }
    }

    fn deposit(&mut self) -> Result<(), ConsoleError> {
        let account_number = self.prompt_account_number()?;
        let amount = self.prompt_amount()?;

        match self.bank.deposit(account_number, amount) {
            Ok(()) => {
                self.persist()?;
                self.console.say("Amount Deposited Successfully!")
            }
            Err(err) => self.console.say(err),
        }
    }

    fn withdraw(&mut self) -> Result<(), ConsoleError> {
        let account_number = self.prompt_account_number()?;
        let amount = self.prompt_amount()?;

        match self.bank.withdraw(account_number, amount) {
            Ok(()) => {
                self.persist()?;
                self.console.say("Withdrawal Successful!")
            }
            Err(err) => self.console.say(err),
        }
    }

    fn display_account(&mut self) -> Result<(), ConsoleError> {
        let account_number = self.prompt_account_number()?;
        self.bank.display_account(account_number, self.console.output())?;
        Ok(())
    }

    /// Save the registry; a failure is reported and memory is kept
    fn persist(&mut self) -> Result<(), ConsoleError> {
        if let Err(err) = self.bank.save() {
            error!(
                path = %self.bank.store().path().display(),
                error = %err,
                "failed to save accounts"
            );
            self.console.say("Error saving data!")?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
