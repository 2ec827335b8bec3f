//! Teacher and student directory collaborators.
//!
//! # Responsibility
//! - Expose fetch-entity-by-identifier lookups over the externally owned
//!   `teachers` and `students` tables.
//! - Keep directory ownership separate from the class registry: removing
//!   a class never touches directory rows.
//!
//! # Invariants
//! - Lookup traits stay single-operation; registration is an inherent
//!   capability of the SQLite implementations only.

use crate::db::DbError;
use crate::model::turma::{Matricula, Student, Teacher, TeacherId};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors from directory lookup and registration operations.
#[derive(Debug)]
pub enum DirectoryError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Required table is missing from the connection.
    MissingRequiredTable(&'static str),
    /// Rejected registration input.
    InvalidData(String),
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "directory requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid directory data: {message}"),
        }
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for DirectoryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for DirectoryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lookup interface over the external teacher directory.
pub trait TeacherDirectory {
    /// Fetches one teacher by identifier, `None` when absent.
    fn find_teacher(&self, id: TeacherId) -> DirectoryResult<Option<Teacher>>;
}

/// Lookup interface over the external student directory.
pub trait StudentDirectory {
    /// Fetches one student by matrícula, `None` when absent.
    fn find_student(&self, matricula: Matricula) -> DirectoryResult<Option<Student>>;
}

/// SQLite-backed teacher directory.
pub struct SqliteTeacherDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeacherDirectory<'conn> {
    /// Constructs a directory from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> DirectoryResult<Self> {
        ensure_directory_table(conn, "teachers")?;
        Ok(Self { conn })
    }

    /// Registers one teacher in the directory.
    pub fn register_teacher(&self, teacher: &Teacher) -> DirectoryResult<()> {
        if teacher.name.trim().is_empty() {
            return Err(DirectoryError::InvalidData(
                "teacher name cannot be blank".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO teachers (id, name) VALUES (?1, ?2);",
            params![teacher.id, teacher.name.as_str()],
        )?;
        Ok(())
    }
}

impl TeacherDirectory for SqliteTeacherDirectory<'_> {
    fn find_teacher(&self, id: TeacherId) -> DirectoryResult<Option<Teacher>> {
        let teacher = self
            .conn
            .query_row(
                "SELECT id, name FROM teachers WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Teacher {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;
        Ok(teacher)
    }
}

/// SQLite-backed student directory.
pub struct SqliteStudentDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentDirectory<'conn> {
    /// Constructs a directory from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> DirectoryResult<Self> {
        ensure_directory_table(conn, "students")?;
        Ok(Self { conn })
    }

    /// Registers one student in the directory.
    pub fn register_student(&self, student: &Student) -> DirectoryResult<()> {
        if student.name.trim().is_empty() {
            return Err(DirectoryError::InvalidData(
                "student name cannot be blank".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO students (matricula, name) VALUES (?1, ?2);",
            params![student.matricula, student.name.as_str()],
        )?;
        Ok(())
    }
}

impl StudentDirectory for SqliteStudentDirectory<'_> {
    fn find_student(&self, matricula: Matricula) -> DirectoryResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT matricula, name FROM students WHERE matricula = ?1;",
                [matricula],
                |row| {
                    Ok(Student {
                        matricula: row.get("matricula")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;
        Ok(student)
    }
}

fn ensure_directory_table(conn: &Connection, table: &'static str) -> DirectoryResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;

    if exists != 1 {
        return Err(DirectoryError::MissingRequiredTable(table));
    }
    Ok(())
}
