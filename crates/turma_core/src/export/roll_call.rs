//! Roll-call rendering and file output.
//!
//! # Responsibility
//! - Build the resolved roll-call read model into its wire text form.
//! - Write the text file under the configured export directory.
//!
//! # Invariants
//! - Output is three header lines followed by one line per student, in
//!   roster order.
//! - Matrículas are right-aligned to width 5 in student lines.

use crate::model::turma::{ClassCode, Matricula};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One resolved roster line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollCallEntry {
    /// Student display name.
    pub name: String,
    /// Enrollment number printed next to the name.
    pub matricula: Matricula,
}

/// Fully resolved roll call, ready for rendering.
///
/// Identifier references are resolved against the directories before this
/// model is built; rendering itself does no lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollCall {
    /// Class code, used in the header and the file name.
    pub code: ClassCode,
    /// Room label for the header line.
    pub room: String,
    /// Assigned teacher's display name.
    pub teacher_name: String,
    /// Resolved students in roster order.
    pub entries: Vec<RollCallEntry>,
}

/// Returns the conventional file name for a class roll call.
pub fn roll_call_file_name(code: ClassCode) -> String {
    format!("chamada_{code}")
}

/// Renders the roll call into its text form.
pub fn render_roll_call(roll_call: &RollCall) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Turma {} - Sala {}",
        roll_call.code, roll_call.room
    );
    let _ = writeln!(out, "Professor: {}", roll_call.teacher_name);
    let _ = writeln!(out, "Nome\tMatrícula");
    for entry in &roll_call.entries {
        let _ = writeln!(out, "{} {:>5}", entry.name, entry.matricula);
    }
    out
}

/// Writes the rendered roll call under `dir`, overwriting any existing
/// file, and returns the written path.
pub fn write_roll_call(dir: &Path, roll_call: &RollCall) -> io::Result<PathBuf> {
    let path = dir.join(roll_call_file_name(roll_call.code));
    fs::write(&path, render_roll_call(roll_call))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{render_roll_call, roll_call_file_name, RollCall, RollCallEntry};

    fn sample() -> RollCall {
        RollCall {
            code: 101,
            room: "A1".to_string(),
            teacher_name: "Marta Souza".to_string(),
            entries: vec![
                RollCallEntry {
                    name: "João Pedro".to_string(),
                    matricula: 200,
                },
                RollCallEntry {
                    name: "Ana Lima".to_string(),
                    matricula: 31_415,
                },
            ],
        }
    }

    #[test]
    fn file_name_follows_convention() {
        assert_eq!(roll_call_file_name(101), "chamada_101");
    }

    #[test]
    fn render_emits_three_headers_plus_one_line_per_student() {
        let text = render_roll_call(&sample());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Turma 101 - Sala A1");
        assert_eq!(lines[1], "Professor: Marta Souza");
        assert_eq!(lines[2], "Nome\tMatrícula");
        assert_eq!(lines[3], "João Pedro   200");
        assert_eq!(lines[4], "Ana Lima 31415");
    }

    #[test]
    fn short_matriculas_are_right_aligned_to_width_five() {
        let mut roll_call = sample();
        roll_call.entries.truncate(1);
        roll_call.entries[0].matricula = 7;

        let text = render_roll_call(&roll_call);
        assert!(text.contains("João Pedro     7\n"));
    }
}
