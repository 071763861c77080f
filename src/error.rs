//! Execution errors that abort a check run.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CheckError {
    /// No arch file at the expected location.
    ArchFileNotFound(PathBuf),
    /// No module manifest at the expected location.
    ManifestNotFound(PathBuf),
    /// The manifest exists but does not declare a module path.
    ModuleNameMissing(PathBuf),
    /// The arch file is not valid YAML or has the wrong shape.
    InvalidDocument(String),
    /// A glob pattern does not compile.
    InvalidPattern { pattern: String, message: String },
    /// Reading a project file failed.
    Io { path: PathBuf, message: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::ArchFileNotFound(path) => {
                write!(f, "Arch file not found at '{}'", path.display())
            }
            CheckError::ManifestNotFound(path) => {
                write!(f, "Module manifest not found at '{}'", path.display())
            }
            CheckError::ModuleNameMissing(path) => {
                write!(f, "No module directive in '{}'", path.display())
            }
            CheckError::InvalidDocument(msg) => write!(f, "Arch file has invalid syntax: {}", msg),
            CheckError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid glob '{}': {}", pattern, message)
            }
            CheckError::Io { path, message } => {
                write!(f, "Failed to read '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for CheckError {}
