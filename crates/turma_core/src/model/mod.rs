//! Domain model for the class registry.
//!
//! # Responsibility
//! - Define the canonical class record and the directory-owned entities
//!   it references.
//! - Keep reference semantics identifier-based: the registry never embeds
//!   live teacher/student objects.
//!
//! # Invariants
//! - A class acquires at most one teacher, and only while it has none.
//! - Roster entries are unique by matrícula and keep insertion order.

pub mod turma;
