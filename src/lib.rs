//! # Archcheck - architecture boundaries for Go modules
//!
//! Archcheck reads a YAML arch file that groups a project's packages into
//! components, names the third-party vendors they may use, and declares which
//! component may depend on which. It then checks every source file's imports
//! against those rules.
//!
//! ## Modules
//!
//! - [`spec`] - Arch file decoding, the annotated model and structural validation
//! - [`annotated`] - Values that remember where in the arch file they came from
//! - [`resolver`] - Glob matching of files to components and imports to vendors
//! - [`checker`] - Per-file dependency rules
//! - [`report`] - Ordering, truncation and the result payload
//! - [`project`] - Go module, file and import collaborators
//! - [`operations`] - The `check` run tying it all together
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use archcheck::config::CheckConfig;
//! use archcheck::operations::run_check;
//!
//! let config = CheckConfig::for_project(Path::new(".")).expect("project not found");
//! let payload = run_check(&config);
//! if !payload.is_ok() {
//!     eprintln!("{} warning(s)", payload.total_warnings);
//! }
//! ```

pub mod annotated;
pub mod checker;
pub mod config;
pub mod error;
pub mod formatters;
pub mod operations;
pub mod paths;
pub mod project;
pub mod report;
pub mod resolver;
pub mod spec;
