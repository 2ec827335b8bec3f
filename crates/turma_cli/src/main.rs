//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `turma_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("turma_core version={}", turma_core::core_version());
}
