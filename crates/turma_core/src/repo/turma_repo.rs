//! Class repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `turmas` and `turma_students`
//!   tables.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Turma::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Roster listing is deterministic: `position ASC, matricula ASC`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::turma::{ClassCode, Matricula, TeacherId, Turma, TurmaValidationError};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for class persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TurmaValidationError),
    Db(DbError),
    NotFound(ClassCode),
    AlreadyExists(ClassCode),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(code) => write!(f, "class not found: {code}"),
            Self::AlreadyExists(code) => write!(f, "class already exists: {code}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "class repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "class repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "class repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted class data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TurmaValidationError> for RepoError {
    fn from(value: TurmaValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for class CRUD operations.
///
/// Business gating (teacher-first ordering, duplicate enrollment) lives in
/// the service layer; implementations persist what they are told.
pub trait TurmaRepository {
    /// Persists a new class record, including any roster links it carries.
    fn create_turma(&self, turma: &Turma) -> RepoResult<()>;
    /// Loads one class with its ordered roster.
    fn get_turma(&self, code: ClassCode) -> RepoResult<Option<Turma>>;
    /// Loads all classes with their ordered rosters, sorted by code.
    fn list_turmas(&self) -> RepoResult<Vec<Turma>>;
    /// Stores a teacher reference on an existing class.
    fn set_teacher(&self, code: ClassCode, teacher_id: TeacherId) -> RepoResult<()>;
    /// Appends one roster link at the end of the enrollment order.
    fn append_student(&self, code: ClassCode, matricula: Matricula) -> RepoResult<()>;
    /// Hard-deletes a class; roster links cascade, directory rows do not.
    fn delete_turma(&self, code: ClassCode) -> RepoResult<()>;
}

/// SQLite-backed class repository.
///
/// Borrows the connection immutably so repository and directory
/// implementations can share one storage handle; multi-statement writes
/// use unchecked immediate transactions.
pub struct SqliteTurmaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTurmaRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TurmaRepository for SqliteTurmaRepository<'_> {
    fn create_turma(&self, turma: &Turma) -> RepoResult<()> {
        turma.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if turma_exists_in_tx(&tx, turma.code)? {
            return Err(RepoError::AlreadyExists(turma.code));
        }

        tx.execute(
            "INSERT INTO turmas (cod_turma, sala, teacher_id) VALUES (?1, ?2, ?3);",
            params![turma.code, turma.room.as_str(), turma.teacher_id],
        )?;

        for (position, matricula) in turma.roster.iter().enumerate() {
            tx.execute(
                "INSERT INTO turma_students (cod_turma, matricula, position)
                 VALUES (?1, ?2, ?3);",
                params![turma.code, matricula, position as i64],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get_turma(&self, code: ClassCode) -> RepoResult<Option<Turma>> {
        let mut stmt = self.conn.prepare(
            "SELECT cod_turma, sala, teacher_id
             FROM turmas
             WHERE cod_turma = ?1;",
        )?;

        let mut rows = stmt.query([code])?;
        if let Some(row) = rows.next()? {
            let mut turma = Turma {
                code: row.get("cod_turma")?,
                room: row.get("sala")?,
                teacher_id: row.get("teacher_id")?,
                roster: Vec::new(),
            };
            turma.roster = load_roster(self.conn, turma.code)?;
            turma.validate()?;
            return Ok(Some(turma));
        }

        Ok(None)
    }

    fn list_turmas(&self) -> RepoResult<Vec<Turma>> {
        let mut stmt = self.conn.prepare(
            "SELECT cod_turma, sala, teacher_id
             FROM turmas
             ORDER BY cod_turma ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut turmas = Vec::new();
        while let Some(row) = rows.next()? {
            let mut turma = Turma {
                code: row.get("cod_turma")?,
                room: row.get("sala")?,
                teacher_id: row.get("teacher_id")?,
                roster: Vec::new(),
            };
            turma.roster = load_roster(self.conn, turma.code)?;
            turma.validate()?;
            turmas.push(turma);
        }

        Ok(turmas)
    }

    fn set_teacher(&self, code: ClassCode, teacher_id: TeacherId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE turmas
             SET
                teacher_id = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE cod_turma = ?1;",
            params![code, teacher_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(code));
        }

        Ok(())
    }

    fn append_student(&self, code: ClassCode, matricula: Matricula) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if !turma_exists_in_tx(&tx, code)? {
            return Err(RepoError::NotFound(code));
        }

        tx.execute(
            "INSERT INTO turma_students (cod_turma, matricula, position)
             SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0)
             FROM turma_students
             WHERE cod_turma = ?1;",
            params![code, matricula],
        )?;

        tx.execute(
            "UPDATE turmas
             SET updated_at = (strftime('%s', 'now') * 1000)
             WHERE cod_turma = ?1;",
            [code],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn delete_turma(&self, code: ClassCode) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM turmas WHERE cod_turma = ?1;", [code])?;

        if changed == 0 {
            return Err(RepoError::NotFound(code));
        }

        Ok(())
    }
}

fn load_roster(conn: &Connection, code: ClassCode) -> RepoResult<Vec<Matricula>> {
    let mut stmt = conn.prepare(
        "SELECT matricula
         FROM turma_students
         WHERE cod_turma = ?1
         ORDER BY position ASC, matricula ASC;",
    )?;

    let mut rows = stmt.query([code])?;
    let mut roster = Vec::new();
    while let Some(row) = rows.next()? {
        roster.push(row.get::<_, Matricula>(0)?);
    }
    Ok(roster)
}

fn turma_exists_in_tx(tx: &Transaction<'_>, code: ClassCode) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM turmas
            WHERE cod_turma = ?1
        );",
        [code],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["turmas", "turma_students"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["cod_turma", "sala", "teacher_id"] {
        if !table_has_column(conn, "turmas", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "turmas",
                column,
            });
        }
    }

    for column in ["cod_turma", "matricula", "position"] {
        if !table_has_column(conn, "turma_students", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "turma_students",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
