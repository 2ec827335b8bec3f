//! Attendance-list ("chamada") export.
//!
//! # Responsibility
//! - Render and write the plain-text roll-call file for one class.
//!
//! # Invariants
//! - File naming follows the `chamada_<code>` convention.
//! - Existing files are overwritten without checks.

pub mod roll_call;
