//! Class registry use-case service.
//!
//! # Responsibility
//! - Enforce the registry's business gates: duplicate class rejection,
//!   teacher-before-students ordering, unique roster entries.
//! - Resolve identifier references through the directory collaborators.
//! - Produce the roll-call export.
//!
//! # Invariants
//! - Every mutation loads current state, applies its gate, then persists
//!   through the repository.
//! - Failures carry a named reason; callers never get a bare "false".

use crate::directory::{DirectoryError, StudentDirectory, TeacherDirectory};
use crate::export::roll_call::{
    roll_call_file_name, write_roll_call, RollCall, RollCallEntry,
};
use crate::model::turma::{ClassCode, Matricula, TeacherId, Turma};
use crate::repo::turma_repo::{RepoError, TurmaRepository};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Entity a failed lookup was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// Class absent from the registry store.
    Class(ClassCode),
    /// Teacher absent from the teacher directory.
    Teacher(TeacherId),
    /// Student absent from the student directory.
    Student(Matricula),
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(code) => write!(f, "class {code}"),
            Self::Teacher(id) => write!(f, "teacher {id}"),
            Self::Student(matricula) => write!(f, "student {matricula}"),
        }
    }
}

/// Ordering/lifecycle gate that rejected an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// New classes must start with no teacher and no students.
    NewClassNotEmpty(ClassCode),
    /// The class already has its one teacher.
    TeacherAlreadyAssigned(ClassCode),
    /// Students can only join once a teacher is assigned.
    NoTeacherAssigned(ClassCode),
    /// Roll call requires at least one enrolled student.
    EmptyRoster(ClassCode),
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewClassNotEmpty(code) => {
                write!(f, "class {code} must be created empty")
            }
            Self::TeacherAlreadyAssigned(code) => {
                write!(f, "class {code} already has a teacher")
            }
            Self::NoTeacherAssigned(code) => {
                write!(f, "class {code} has no teacher yet")
            }
            Self::EmptyRoster(code) => {
                write!(f, "class {code} has no enrolled students")
            }
        }
    }
}

/// Registry operation failure reasons.
///
/// The closed set of domain reasons (`NotFound`, `AlreadyExists`,
/// `Precondition`, `DuplicateEntry`) covers every rule violation;
/// `Repo`/`Directory` carry unexpected storage-layer faults.
#[derive(Debug)]
pub enum RegistryError {
    /// Referenced entity does not exist.
    NotFound(Missing),
    /// A class with this code is already stored.
    AlreadyExists(ClassCode),
    /// An ordering/lifecycle gate rejected the operation.
    Precondition(Violation),
    /// The matrícula is already on the class roster.
    DuplicateEntry {
        code: ClassCode,
        matricula: Matricula,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Directory-collaborator failure.
    Directory(DirectoryError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(missing) => write!(f, "not found: {missing}"),
            Self::AlreadyExists(code) => write!(f, "class already exists: {code}"),
            Self::Precondition(violation) => write!(f, "{violation}"),
            Self::DuplicateEntry { code, matricula } => {
                write!(f, "student {matricula} is already enrolled in class {code}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::Directory(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Directory(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RegistryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(code) => Self::NotFound(Missing::Class(code)),
            RepoError::AlreadyExists(code) => Self::AlreadyExists(code),
            other => Self::Repo(other),
        }
    }
}

impl From<DirectoryError> for RegistryError {
    fn from(value: DirectoryError) -> Self {
        Self::Directory(value)
    }
}

/// Class registry facade over repository and directory implementations.
pub struct TurmaService<R, T, S>
where
    R: TurmaRepository,
    T: TeacherDirectory,
    S: StudentDirectory,
{
    repo: R,
    teachers: T,
    students: S,
    export_dir: PathBuf,
}

impl<R, T, S> TurmaService<R, T, S>
where
    R: TurmaRepository,
    T: TeacherDirectory,
    S: StudentDirectory,
{
    /// Creates a service with injected collaborators.
    ///
    /// Roll calls are written to the process working directory unless
    /// [`with_export_dir`](Self::with_export_dir) overrides it.
    pub fn new(repo: R, teachers: T, students: S) -> Self {
        Self {
            repo,
            teachers,
            students,
            export_dir: PathBuf::from("."),
        }
    }

    /// Overrides the directory roll-call files are written to.
    pub fn with_export_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.export_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Registers a new class.
    ///
    /// # Contract
    /// - The record must carry no teacher and no students.
    /// - The code must be unused.
    pub fn create_turma(&self, turma: &Turma) -> Result<(), RegistryError> {
        if turma.has_teacher() || turma.roster_len() > 0 {
            return Err(RegistryError::Precondition(Violation::NewClassNotEmpty(
                turma.code,
            )));
        }

        self.repo.create_turma(turma)?;
        Ok(())
    }

    /// Assigns a teacher to a class that has none.
    pub fn assign_teacher(
        &self,
        code: ClassCode,
        teacher_id: TeacherId,
    ) -> Result<(), RegistryError> {
        let turma = self
            .repo
            .get_turma(code)?
            .ok_or(RegistryError::NotFound(Missing::Class(code)))?;

        if turma.has_teacher() {
            return Err(RegistryError::Precondition(Violation::TeacherAlreadyAssigned(
                code,
            )));
        }

        if self.teachers.find_teacher(teacher_id)?.is_none() {
            return Err(RegistryError::NotFound(Missing::Teacher(teacher_id)));
        }

        self.repo.set_teacher(code, teacher_id)?;
        Ok(())
    }

    /// Enrolls a student at the end of the class roster.
    ///
    /// # Contract
    /// - The class must already have a teacher.
    /// - Each matrícula joins a roster at most once.
    pub fn enroll_student(
        &self,
        matricula: Matricula,
        code: ClassCode,
    ) -> Result<(), RegistryError> {
        let turma = self
            .repo
            .get_turma(code)?
            .ok_or(RegistryError::NotFound(Missing::Class(code)))?;

        if !turma.has_teacher() {
            return Err(RegistryError::Precondition(Violation::NoTeacherAssigned(
                code,
            )));
        }

        if self.students.find_student(matricula)?.is_none() {
            return Err(RegistryError::NotFound(Missing::Student(matricula)));
        }

        if turma.has_student(matricula) {
            return Err(RegistryError::DuplicateEntry { code, matricula });
        }

        self.repo.append_student(code, matricula)?;
        Ok(())
    }

    /// Gets one class with its ordered roster.
    pub fn get_turma(&self, code: ClassCode) -> Result<Option<Turma>, RegistryError> {
        Ok(self.repo.get_turma(code)?)
    }

    /// Lists all classes sorted by code.
    ///
    /// Full records are returned; listing callers typically surface only
    /// code and room.
    pub fn list_turmas(&self) -> Result<Vec<Turma>, RegistryError> {
        Ok(self.repo.list_turmas()?)
    }

    /// Hard-deletes a class. Directory rows are left untouched.
    pub fn remove_turma(&self, code: ClassCode) -> Result<(), RegistryError> {
        self.repo.delete_turma(code)?;
        Ok(())
    }

    /// Exports the class roll call as `chamada_<code>` and returns the
    /// target path.
    ///
    /// # Contract
    /// - Fails with `NotFound` when the class is absent and with
    ///   `Precondition(EmptyRoster)` when nobody is enrolled.
    /// - Dangling teacher/student references report `NotFound` for the
    ///   dangling entity.
    /// - A file-write failure is logged as a `roll_call_write` error event
    ///   and does not fail the operation; the returned path is the intended
    ///   target either way.
    pub fn export_roll_call(&self, code: ClassCode) -> Result<PathBuf, RegistryError> {
        let turma = self
            .repo
            .get_turma(code)?
            .ok_or(RegistryError::NotFound(Missing::Class(code)))?;

        if turma.roster.is_empty() {
            return Err(RegistryError::Precondition(Violation::EmptyRoster(code)));
        }

        let teacher_id = turma.teacher_id.ok_or(RegistryError::Precondition(
            Violation::NoTeacherAssigned(code),
        ))?;
        let teacher = self
            .teachers
            .find_teacher(teacher_id)?
            .ok_or(RegistryError::NotFound(Missing::Teacher(teacher_id)))?;

        let mut entries = Vec::with_capacity(turma.roster.len());
        for matricula in &turma.roster {
            let student = self
                .students
                .find_student(*matricula)?
                .ok_or(RegistryError::NotFound(Missing::Student(*matricula)))?;
            entries.push(RollCallEntry {
                name: student.name,
                matricula: student.matricula,
            });
        }

        let roll_call = RollCall {
            code: turma.code,
            room: turma.room.clone(),
            teacher_name: teacher.name,
            entries,
        };

        match write_roll_call(&self.export_dir, &roll_call) {
            Ok(path) => Ok(path),
            Err(err) => {
                error!(
                    "event=roll_call_write module=export status=error code={} error={}",
                    turma.code, err
                );
                Ok(self.export_dir.join(roll_call_file_name(turma.code)))
            }
        }
    }
}
