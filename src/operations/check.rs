//! The `check` operation.
//!
//! Loads the arch file, gates on structural validation, then runs the
//! dependency checker over every project file and aggregates the result.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::checker::{DependencyChecker, SourceFile};
use crate::config::CheckConfig;
use crate::project::{FileEnumerator, GoFileEnumerator, GoImportScanner, SourceImporter};
use crate::report::{CheckPayload, CheckResult};
use crate::resolver::PathResolver;
use crate::spec::{self, Specification};

/// Check a Go project with the default collaborators.
pub fn run_check(config: &CheckConfig) -> CheckPayload {
    run_check_with(config, &GoImportScanner, &GoFileEnumerator)
}

/// Check a project with caller-provided collaborators.
///
/// Never fails: any fatal problem becomes the payload's execution error.
pub fn run_check_with(
    config: &CheckConfig,
    importer: &dyn SourceImporter,
    enumerator: &dyn FileEnumerator,
) -> CheckPayload {
    match execute(config, importer, enumerator) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("check aborted: {:#}", e);
            CheckPayload::from_error(format!("{:#}", e))
        }
    }
}

fn execute(
    config: &CheckConfig,
    importer: &dyn SourceImporter,
    enumerator: &dyn FileEnumerator,
) -> Result<CheckPayload> {
    info!("using arch file {}", config.arch_file().display());
    let spec = Specification::load(config.arch_file())?;

    let spec_warnings = spec::validate(&spec);
    if !spec_warnings.is_empty() {
        info!("arch file has {} structural warning(s)", spec_warnings.len());
        return Ok(CheckPayload::from_spec_warnings(spec_warnings));
    }

    let resolver = PathResolver::new(&spec)?;

    let root = config.project_dir();
    let paths = enumerator
        .files(root, &resolver)
        .with_context(|| format!("Failed to list files in {}", root.display()))?;
    debug!("found {} file(s) to check", paths.len());

    let files = paths
        .into_iter()
        .map(|path| -> Result<SourceFile> {
            let imports = importer.imports(&root.join(&path))?;
            debug!("{}: {} import(s)", path, imports.len());
            Ok(SourceFile::new(path, imports))
        })
        .collect::<Result<Vec<_>>>()?;

    let checker = DependencyChecker::new(&spec, &resolver, config.module_name());
    let warnings = if config.workers() > 1 {
        debug!("checking with {} workers", config.workers());
        checker.check_parallel(&files, config.workers())
    } else {
        checker.check(&files)
    };

    let result = CheckResult::collect(warnings, config.max_warnings());
    info!(
        "checked {} file(s) of module {}: {} warning(s), {} truncated",
        files.len(),
        config.module_name(),
        result.total(),
        result.truncated()
    );

    Ok(CheckPayload::from_result(result))
}
