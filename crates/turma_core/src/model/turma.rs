//! Class ("turma") domain records.
//!
//! # Responsibility
//! - Define the class record plus the teacher/student entities referenced
//!   by identifier.
//! - Provide constructor defaults and validation for write paths.
//!
//! # Invariants
//! - `code` is externally assigned and never reused for another class.
//! - `teacher_id`/`roster` hold identifiers only; resolution goes through
//!   the directory collaborators.
//! - `roster` order is enrollment order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Externally assigned class code ("código da turma").
pub type ClassCode = i64;

/// Identifier of a teacher in the teacher directory.
pub type TeacherId = i64;

/// Student enrollment number ("matrícula"), the student identifier.
pub type Matricula = i64;

/// Validation failures for class records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurmaValidationError {
    /// Class codes are positive by convention.
    NonPositiveCode(ClassCode),
    /// Room label must carry visible characters.
    BlankRoom,
}

impl Display for TurmaValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveCode(code) => {
                write!(f, "class code must be positive, got {code}")
            }
            Self::BlankRoom => write!(f, "room label cannot be blank"),
        }
    }
}

impl Error for TurmaValidationError {}

/// Canonical class record.
///
/// Holds non-owning references only: the teacher and every roster entry
/// live in their external directories and are resolved by identifier on
/// demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turma {
    /// Externally assigned primary key.
    pub code: ClassCode,
    /// Room label ("sala").
    pub room: String,
    /// Assigned teacher, at most one.
    pub teacher_id: Option<TeacherId>,
    /// Enrolled students in enrollment order, unique by matrícula.
    pub roster: Vec<Matricula>,
}

impl Turma {
    /// Creates an empty class record: no teacher, no students.
    pub fn new(code: ClassCode, room: impl Into<String>) -> Self {
        Self {
            code,
            room: room.into(),
            teacher_id: None,
            roster: Vec::new(),
        }
    }

    /// Checks record-level invariants enforced before every SQL mutation.
    pub fn validate(&self) -> Result<(), TurmaValidationError> {
        if self.code <= 0 {
            return Err(TurmaValidationError::NonPositiveCode(self.code));
        }
        if self.room.trim().is_empty() {
            return Err(TurmaValidationError::BlankRoom);
        }
        Ok(())
    }

    /// Returns whether a teacher is assigned.
    pub fn has_teacher(&self) -> bool {
        self.teacher_id.is_some()
    }

    /// Returns whether the matrícula is already on the roster.
    pub fn has_student(&self, matricula: Matricula) -> bool {
        self.roster.contains(&matricula)
    }

    /// Number of enrolled students.
    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }
}

/// Teacher entity owned by the external teacher directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Directory identifier.
    pub id: TeacherId,
    /// Display name used by the roll-call header.
    pub name: String,
}

/// Student entity owned by the external student directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Enrollment number, the student identifier.
    pub matricula: Matricula,
    /// Display name used by roll-call lines.
    pub name: String,
}
