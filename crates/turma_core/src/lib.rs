//! Core domain logic for the turma class registry.
//! This crate is the single source of truth for enrollment invariants.

pub mod db;
pub mod directory;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use directory::{
    DirectoryError, DirectoryResult, SqliteStudentDirectory, SqliteTeacherDirectory,
    StudentDirectory, TeacherDirectory,
};
pub use export::roll_call::{render_roll_call, roll_call_file_name, RollCall, RollCallEntry};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::turma::{
    ClassCode, Matricula, Student, Teacher, TeacherId, Turma, TurmaValidationError,
};
pub use repo::turma_repo::{RepoError, RepoResult, SqliteTurmaRepository, TurmaRepository};
pub use service::turma_service::{Missing, RegistryError, TurmaService, Violation};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
