//! Orchestration layer shared by the CLI and library callers.
//!
//! Operations wire the core modules together and are the only place besides
//! `main` that logs.

pub mod check;

pub use check::{run_check, run_check_with};
