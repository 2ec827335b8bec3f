//! Registry use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and directory calls into use-case level APIs.
//! - Keep callers decoupled from storage details.

pub mod turma_service;
