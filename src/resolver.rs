//! Maps file paths to components and import paths to vendors.
//!
//! Patterns are compiled once from a validated [`Specification`]. Matching is
//! case-sensitive and `*` never crosses a `/`; `**` does. Component patterns
//! were joined with the working directory when the specification was built,
//! so file paths here are relative to the project root.

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::error::CheckError;
use crate::paths::{self, clean_path};
use crate::spec::Specification;

/// Compile a single glob with the matching rules used everywhere in the crate.
pub fn compile_glob(pattern: &str) -> Result<GlobMatcher, CheckError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .case_insensitive(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| CheckError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.kind().to_string(),
        })
}

/// A compiled pattern. `dir/**` also matches `dir` itself.
#[derive(Debug, Clone)]
struct PathGlob {
    matcher: GlobMatcher,
    base: Option<String>,
}

impl PathGlob {
    fn compile(pattern: &str) -> Result<Self, CheckError> {
        Ok(Self {
            matcher: compile_glob(pattern)?,
            base: pattern.strip_suffix("/**").map(str::to_string),
        })
    }

    fn is_match(&self, candidate: &str) -> bool {
        self.base.as_deref() == Some(candidate) || self.matcher.is_match(candidate)
    }
}

#[derive(Debug, Clone)]
struct NamedGlobs<'a> {
    name: &'a str,
    globs: Vec<PathGlob>,
}

impl NamedGlobs<'_> {
    fn is_match(&self, candidate: &str) -> bool {
        self.globs.iter().any(|glob| glob.is_match(candidate))
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver<'a> {
    components: Vec<NamedGlobs<'a>>,
    vendors: Vec<NamedGlobs<'a>>,
    excluded_directories: Vec<String>,
    excluded_files: Vec<Regex>,
}

impl<'a> PathResolver<'a> {
    pub fn new(spec: &'a Specification) -> Result<Self, CheckError> {
        let components = spec
            .components()
            .iter()
            .map(|component| {
                let globs = component
                    .paths()
                    .iter()
                    .map(|p| PathGlob::compile(p.as_str()))
                    .collect::<Result<_, _>>()?;
                Ok(NamedGlobs {
                    name: component.name(),
                    globs,
                })
            })
            .collect::<Result<_, CheckError>>()?;

        let vendors = spec
            .vendors()
            .iter()
            .map(|vendor| {
                let globs = vendor
                    .import_paths()
                    .iter()
                    .map(|p| PathGlob::compile(p.as_str()))
                    .collect::<Result<_, _>>()?;
                Ok(NamedGlobs {
                    name: vendor.name(),
                    globs,
                })
            })
            .collect::<Result<_, CheckError>>()?;

        let workdir = spec.working_directory().as_str();
        let excluded_directories = spec
            .excluded_directories()
            .iter()
            .map(|dir| paths::join_workdir(workdir, dir.as_str()))
            .collect();

        let excluded_files = spec
            .excluded_files()
            .iter()
            .map(|pattern| {
                Regex::new(pattern.as_str()).map_err(|e| CheckError::InvalidPattern {
                    pattern: pattern.as_str().to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            components,
            vendors,
            excluded_directories,
            excluded_files,
        })
    }

    /// True when `file_path` is inside an excluded directory or matches an
    /// excluded file pattern. Excluded files are not analyzed at all.
    pub fn is_excluded(&self, file_path: &str) -> bool {
        let path = clean_path(file_path);
        self.excluded_directories
            .iter()
            .any(|dir| paths::is_within(&path, dir))
            || self.excluded_files.iter().any(|re| re.is_match(&path))
    }

    /// Component owning a source file: the owner of the file's directory, so a
    /// file and an import of its package always resolve alike.
    pub fn resolve_component(&self, file_path: &str) -> Option<&'a str> {
        let path = clean_path(file_path);
        self.resolve_package(paths::parent_dir(&path))
    }

    /// Component owning a package directory, e.g. the target of an internal
    /// import. Components are tried in declaration order and the first one
    /// wins.
    pub fn resolve_package(&self, package_path: &str) -> Option<&'a str> {
        let path = clean_path(package_path);
        self.components
            .iter()
            .find(|c| c.is_match(&path))
            .map(|c| c.name)
    }

    /// Vendor owning an external import path, first declared wins.
    pub fn resolve_vendor(&self, import_path: &str) -> Option<&'a str> {
        self.vendors
            .iter()
            .find(|v| v.is_match(import_path))
            .map(|v| v.name)
    }

    /// Declaration index of a component.
    pub fn component_order(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name == name)
    }

    /// Declaration index of a vendor.
    pub fn vendor_order(&self, name: &str) -> Option<usize> {
        self.vendors.iter().position(|v| v.name == name)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}
