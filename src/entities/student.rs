// 🎓 Student Entity - In-memory roster, insertion ordered
//
// Lives only for the process lifetime; nothing is persisted.
// Ids are unique, so "first match" lookups and removals are unambiguous.

use std::io::{self, Write};
use thiserror::Error;

pub type StudentId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentError {
    #[error("Student already exists!")]
    AlreadyExists(StudentId),

    #[error("Student not found ❌")]
    NotFound(StudentId),
}

// ============================================================================
// STUDENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    pub name: String,
    /// No range validation
    pub marks: i32,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>, marks: i32) -> Self {
        Student {
            id,
            name: name.into(),
            marks,
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    /// Render as `id | name | marks`
    pub fn display<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{} | {} | {}", self.id, self.name, self.marks)
    }
}

// ============================================================================
// STUDENT ROSTER
// ============================================================================

/// Ordered list of students, owned by the running application
#[derive(Debug, Default)]
pub struct StudentRoster {
    students: Vec<Student>,
}

impl StudentRoster {
    pub fn new() -> Self {
        StudentRoster::default()
    }

    /// Append a student unless the id is already taken
    pub fn add(&mut self, student: Student) -> Result<(), StudentError> {
        if self.contains(student.id) {
            return Err(StudentError::AlreadyExists(student.id));
        }
        self.students.push(student);
        Ok(())
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.students.iter().any(|s| s.id == id)
    }

    pub fn find(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn update_marks(&mut self, id: StudentId, marks: i32) -> Result<(), StudentError> {
        let student = self
            .students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StudentError::NotFound(id))?;
        student.marks = marks;
        Ok(())
    }

    /// Remove a student, keeping the relative order of everyone else
    pub fn delete(&mut self, id: StudentId) -> Result<Student, StudentError> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or(StudentError::NotFound(id))?;
        Ok(self.students.remove(index))
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
