// ⌨️ Console - Line-based prompts over any reader/writer pair
//
// Both menu programs own one Console for their whole run (stdin/stdout in the
// binaries, in-memory buffers in tests). Every numeric prompt re-asks until it
// gets a number, so handlers never see malformed input.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

pub const INVALID_NUMBER: &str = "Please enter a valid number!";

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// End of input reached while waiting for an answer
    #[error("input closed")]
    Closed,

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Result of reading a top-level menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Number(i32),
    /// Not a number; the warning has already been printed
    Invalid,
}

/// Values a numeric prompt accepts
pub trait Numeric: FromStr + Copy {
    fn is_acceptable(&self) -> bool {
        true
    }
}

impl Numeric for i32 {}

impl Numeric for f64 {
    /// "NaN" and "inf" parse, but are not amounts
    fn is_acceptable(&self) -> bool {
        self.is_finite()
    }
}

fn parse_number<T: Numeric>(raw: &str) -> Option<T> {
    raw.trim().parse::<T>().ok().filter(T::is_acceptable)
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line
    pub fn say(&mut self, line: impl Display) -> Result<(), ConsoleError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Read one line without its terminator
    fn read_line(&mut self) -> Result<String, ConsoleError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Closed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
        trace!(input = %trimmed, "console read");
        Ok(trimmed)
    }

    fn ask(&mut self, label: &str) -> Result<String, ConsoleError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Free-text answer, taken verbatim (may be empty)
    pub fn prompt_line(&mut self, label: &str) -> Result<String, ConsoleError> {
        self.ask(label)
    }

    /// Numeric answer; re-prompts until the line parses
    pub fn prompt_number<T: Numeric>(&mut self, label: &str) -> Result<T, ConsoleError> {
        loop {
            let raw = self.ask(label)?;
            match parse_number(&raw) {
                Some(value) => return Ok(value),
                None => self.say(INVALID_NUMBER)?,
            }
        }
    }

    /// Top-level menu choice; a non-number is reported once and returned as `Invalid`
    pub fn read_choice(&mut self, label: &str) -> Result<MenuChoice, ConsoleError> {
        let raw = self.ask(label)?;
        match parse_number::<i32>(&raw) {
            Some(choice) => Ok(MenuChoice::Number(choice)),
            None => {
                self.say(INVALID_NUMBER)?;
                Ok(MenuChoice::Invalid)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
