// 🎓 Student Menu - Interactive loop over the in-memory roster
//
// The roster is created empty when the menu starts and dropped when it ends.

use crate::console::{Console, ConsoleError, MenuChoice};
use crate::entities::{Student, StudentError, StudentId, StudentRoster};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info};

const MENU: &[&str] = &[
    "\n--- STUDENT MANAGEMENT ---",
    "1. Add Student",
    "2. View Students",
    "3. Search Student",
    "4. Update Marks",
    "5. Delete Student",
    "6. Exit",
];

enum Flow {
    Continue,
    Exit,
}

pub struct StudentMenu<R, W> {
    roster: StudentRoster,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> StudentMenu<R, W> {
    pub fn new(console: Console<R, W>) -> Self {
        StudentMenu {
            roster: StudentRoster::new(),
            console,
        }
    }

    pub fn roster(&self) -> &StudentRoster {
        &self.roster
    }

    pub fn into_parts(self) -> (StudentRoster, Console<R, W>) {
        (self.roster, self.console)
    }

    /// Run until the exit option is chosen or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(ConsoleError::Closed) => {
                    info!("input closed, leaving student menu");
                    return Ok(());
                }
                Err(err) => return Err(err).context("student console failed"),
            }
        }
    }

    fn step(&mut self) -> Result<Flow, ConsoleError> {
        for line in MENU {
            self.console.say(line)?;
        }

        let choice = match self.console.read_choice("Choose option: ")? {
            MenuChoice::Number(n) => n,
            MenuChoice::Invalid => return Ok(Flow::Continue),
        };

        match choice {
            1 => self.add_student()?,
            2 => self.view_students()?,
            3 => self.search_student()?,
            4 => self.update_marks()?,
            5 => self.delete_student()?,
            6 => {
                self.console.say("Bye 👋")?;
                return Ok(Flow::Exit);
            }
            _ => self.console.say("Invalid option")?,
        }

        Ok(Flow::Continue)
    }

    fn prompt_id(&mut self, label: &str) -> Result<StudentId, ConsoleError> {
        self.console.prompt_number(label)
    }

    fn add_student(&mut self) -> Result<(), ConsoleError> {
        let id = self.prompt_id("Enter ID: ")?;

        // Reject before asking for the rest
        if self.roster.contains(id) {
            return self.console.say(StudentError::AlreadyExists(id));
        }

        let name = self.console.prompt_line("Enter Name: ")?;
        let marks: i32 = self.console.prompt_number("Enter Marks: ")?;

        match self.roster.add(Student::new(id, name, marks)) {
            Ok(()) => {
                debug!(id, marks, students = self.roster.len(), "student added");
                self.console.say("Student added successfully ✅")
            }
            Err(err) => self.console.say(err),
        }
    }

    fn view_students(&mut self) -> Result<(), ConsoleError> {
        if self.roster.is_empty() {
            return self.console.say("No students found");
        }

        self.console.say("\nID | Name | Marks")?;
        for student in self.roster.students() {
            student.display(self.console.output())?;
        }
        Ok(())
    }

    fn search_student(&mut self) -> Result<(), ConsoleError> {
        let id = self.prompt_id("Enter ID to search: ")?;

        match self.roster.find(id) {
            Some(student) => {
                self.console.say("Student found:")?;
                student.display(self.console.output())?;
                Ok(())
            }
            None => self.console.say(StudentError::NotFound(id)),
        }
    }

    fn update_marks(&mut self) -> Result<(), ConsoleError> {
        let id = self.prompt_id("Enter ID: ")?;

        if !self.roster.contains(id) {
            return self.console.say(StudentError::NotFound(id));
        }

        let marks: i32 = self.console.prompt_number("Enter new marks: ")?;
        match self.roster.update_marks(id, marks) {
            Ok(()) => self.console.say("Marks updated ✅"),
            Err(err) => self.console.say(err),
        }
    }

    fn delete_student(&mut self) -> Result<(), ConsoleError> {
        let id = self.prompt_id("Enter ID: ")?;

        match self.roster.delete(id) {
            Ok(_) => {
                debug!(id, students = self.roster.len(), "student deleted");
                self.console.say("Student deleted ✅")
            }
            Err(err) => self.console.say(err),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
