//! Run configuration.
//!
//! A [`CheckConfig`] is built once from command-line input and passed by
//! reference into [`crate::operations::run_check`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CheckError;
use crate::paths;
use crate::project::{GoModule, ModuleIdentity};
use crate::report::DEFAULT_MAX_WARNINGS;

/// Upper bound accepted for `--max-warnings`.
pub const MAX_WARNINGS_LIMIT: usize = 32768;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    project_dir: PathBuf,
    arch_file: PathBuf,
    manifest_file: PathBuf,
    module_name: String,
    max_warnings: usize,
    workers: usize,
}

impl CheckConfig {
    /// Resolve paths and the module name for a project.
    ///
    /// `arch_file` defaults to `.archcheck.yml` in the project directory.
    /// `max_warnings` is clamped into `1..=32768` and `workers` to at least 1.
    pub fn resolve(
        project_dir: &Path,
        arch_file: Option<&Path>,
        max_warnings: usize,
        workers: usize,
        identity: &dyn ModuleIdentity,
    ) -> Result<Self, CheckError> {
        let project_dir = fs::canonicalize(project_dir).map_err(|e| CheckError::Io {
            path: project_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let arch_file = match arch_file {
            Some(path) => path.to_path_buf(),
            None => project_dir.join(paths::ARCH_FILE_NAME),
        };
        if !arch_file.is_file() {
            return Err(CheckError::ArchFileNotFound(arch_file));
        }

        let module_name = identity.module_name(&project_dir)?;

        Ok(Self {
            manifest_file: GoModule::manifest_path(&project_dir),
            project_dir,
            arch_file,
            module_name,
            max_warnings: max_warnings.clamp(1, MAX_WARNINGS_LIMIT),
            workers: workers.max(1),
        })
    }

    /// Configuration for a Go module in `project_dir` with default limits.
    pub fn for_project(project_dir: &Path) -> Result<Self, CheckError> {
        Self::resolve(project_dir, None, DEFAULT_MAX_WARNINGS, 1, &GoModule)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn arch_file(&self) -> &Path {
        &self.arch_file
    }

    pub fn manifest_file(&self) -> &Path {
        &self.manifest_file
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn max_warnings(&self) -> usize {
        self.max_warnings
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FixedModule(&'static str);

    impl ModuleIdentity for FixedModule {
        fn module_name(&self, _project_root: &Path) -> Result<String, CheckError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".archcheck.yml"), "version: 2\n").unwrap();

        let config =
            CheckConfig::resolve(tmp.path(), None, 0, 0, &FixedModule("example.com/shop")).unwrap();

        assert!(config.arch_file().ends_with(".archcheck.yml"));
        assert!(config.manifest_file().ends_with("go.mod"));
        assert_eq!(config.module_name(), "example.com/shop");
        assert_eq!(config.max_warnings(), 1);
        assert_eq!(config.workers(), 1);
    }

    #[test]
    fn test_resolve_clamps_max_warnings() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".archcheck.yml"), "version: 2\n").unwrap();

        let config =
            CheckConfig::resolve(tmp.path(), None, 100_000, 4, &FixedModule("m")).unwrap();
        assert_eq!(config.max_warnings(), MAX_WARNINGS_LIMIT);
        assert_eq!(config.workers(), 4);
    }

    #[test]
    fn test_missing_arch_file() {
        let tmp = TempDir::new().unwrap();
        let result = CheckConfig::resolve(tmp.path(), None, 10, 1, &FixedModule("m"));
        assert!(matches!(result, Err(CheckError::ArchFileNotFound(_))));
    }

    #[test]
    fn test_explicit_arch_file() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("layers.yml");
        fs::write(&custom, "version: 2\n").unwrap();

        let config =
            CheckConfig::resolve(tmp.path(), Some(&custom), 10, 1, &FixedModule("m")).unwrap();
        assert_eq!(config.arch_file(), custom.as_path());
    }

    #[test]
    fn test_for_project_requires_manifest() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".archcheck.yml"), "version: 2\n").unwrap();

        assert!(matches!(
            CheckConfig::for_project(tmp.path()),
            Err(CheckError::ManifestNotFound(_))
        ));

        fs::write(tmp.path().join("go.mod"), "module example.com/shop\n\ngo 1.22\n").unwrap();
        let config = CheckConfig::for_project(tmp.path()).unwrap();
        assert_eq!(config.module_name(), "example.com/shop");
        assert_eq!(config.max_warnings(), DEFAULT_MAX_WARNINGS);
    }
}
