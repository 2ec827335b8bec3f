//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data-access contract the registry service is built on.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Turma::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyExists`)
//!   in addition to DB transport errors.

pub mod turma_repo;
