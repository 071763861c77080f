//! Project collaborators: module identity, file enumeration and import
//! extraction.
//!
//! The checker itself only consumes module names, file lists and import lists.
//! The Go implementations here are line-oriented scanners, not parsers. They
//! are good enough for `import` declarations, which Go keeps at the top of the
//! file in a fixed shape.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::CheckError;
use crate::paths;
use crate::resolver::PathResolver;

/// Provides the project's own module path.
pub trait ModuleIdentity {
    fn module_name(&self, project_root: &Path) -> Result<String, CheckError>;
}

/// Extracts raw import paths from one source file, in source order.
pub trait SourceImporter {
    fn imports(&self, file: &Path) -> Result<Vec<String>>;
}

/// Lists the project files to analyze, relative to the root, `/`-separated.
pub trait FileEnumerator {
    fn files(&self, project_root: &Path, resolver: &PathResolver<'_>) -> Result<Vec<String>>;
}

/// Reads the `module` directive from `go.mod`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModule;

impl GoModule {
    pub fn manifest_path(project_root: &Path) -> PathBuf {
        project_root.join(paths::MANIFEST_FILE_NAME)
    }

    /// Module path declared in manifest text.
    pub fn parse_module_name(manifest: &str) -> Option<String> {
        static MODULE_RE: OnceLock<Regex> = OnceLock::new();
        let re = MODULE_RE.get_or_init(|| {
            Regex::new(r#"(?m)^\s*module\s+"?([^"\s]+)"?\s*(?://.*)?$"#).expect("valid regex")
        });

        re.captures(manifest).map(|caps| caps[1].to_string())
    }
}

impl ModuleIdentity for GoModule {
    fn module_name(&self, project_root: &Path) -> Result<String, CheckError> {
        let path = Self::manifest_path(project_root);
        if !path.is_file() {
            return Err(CheckError::ManifestNotFound(path));
        }

        let content = fs::read_to_string(&path).map_err(|e| CheckError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Self::parse_module_name(&content).ok_or(CheckError::ModuleNameMissing(path))
    }
}

/// Extracts import paths from Go source files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoImportScanner;

impl GoImportScanner {
    /// Import paths declared in Go source text.
    pub fn scan(source: &str) -> Vec<String> {
        static SPEC_RE: OnceLock<Regex> = OnceLock::new();
        let spec_re = SPEC_RE.get_or_init(|| {
            // Optional alias (name, `_` or `.`) followed by a quoted path.
            Regex::new(r#"^(?:[\p{L}_][\p{L}\p{N}_]*\s+|\.\s*)?(?:"([^"]+)"|`([^`]+)`)"#)
                .expect("valid regex")
        });

        let mut imports = Vec::new();
        let mut in_group = false;
        let mut in_comment = false;

        for raw_line in source.lines() {
            let line = strip_comments(raw_line, &mut in_comment);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if in_group {
                if line.starts_with(')') {
                    in_group = false;
                    continue;
                }
                for spec in line.split(';') {
                    if let Some(path) = capture_path(spec_re, spec.trim()) {
                        imports.push(path);
                    }
                }
                continue;
            }

            if line.starts_with("package ") {
                continue;
            }

            let Some(rest) = line.strip_prefix("import") else {
                // Imports must precede every other declaration.
                if is_declaration(line) {
                    break;
                }
                continue;
            };

            let rest = rest.trim_start();
            if let Some(group) = rest.strip_prefix('(') {
                let group = group.trim();
                match group.strip_suffix(')') {
                    // import ( "a"; "b" ) on one line
                    Some(inline) => {
                        for spec in inline.split(';') {
                            if let Some(path) = capture_path(spec_re, spec.trim()) {
                                imports.push(path);
                            }
                        }
                    }
                    None => {
                        in_group = true;
                        if let Some(path) = capture_path(spec_re, group) {
                            imports.push(path);
                        }
                    }
                }
            } else if let Some(path) = capture_path(spec_re, rest) {
                imports.push(path);
            }
        }

        imports
    }
}

impl SourceImporter for GoImportScanner {
    fn imports(&self, file: &Path) -> Result<Vec<String>> {
        let source = fs::read_to_string(file)
            .with_context(|| format!("Failed to read source file {}", file.display()))?;
        Ok(Self::scan(&source))
    }
}

fn capture_path(re: &Regex, spec: &str) -> Option<String> {
    let caps = re.captures(spec)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn is_declaration(line: &str) -> bool {
    ["func ", "func(", "type ", "var ", "const "]
        .iter()
        .any(|keyword| line.starts_with(keyword))
}

/// Remove `//` and `/* */` comments, tracking block comments across lines.
/// Comment markers inside string literals are left alone.
fn strip_comments(line: &str, in_comment: &mut bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if *in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_comment = false;
            }
            continue;
        }

        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_comment = true;
            }
            _ => out.push(c),
        }
    }

    out
}

/// Finds `.go` files below the project root with the `glob` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoFileEnumerator;

impl FileEnumerator for GoFileEnumerator {
    fn files(&self, project_root: &Path, resolver: &PathResolver<'_>) -> Result<Vec<String>> {
        let root = glob::Pattern::escape(&project_root.to_string_lossy());
        let pattern = format!("{}/**/*.go", root.trim_end_matches('/'));

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)
            .with_context(|| format!("Invalid source pattern {}", pattern))?
        {
            let path = entry.context("Failed to read project directory")?;
            if !path.is_file() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(project_root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if !resolver.is_excluded(&relative) {
                files.push(relative);
            }
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Specification;
    use tempfile::TempDir;

    #[test]
    fn test_parse_module_name() {
        let manifest = "// comment\nmodule github.com/acme/shop\n\ngo 1.22\n";
        assert_eq!(
            GoModule::parse_module_name(manifest).as_deref(),
            Some("github.com/acme/shop")
        );
        assert_eq!(
            GoModule::parse_module_name("module \"example.com/q\" // quoted\n").as_deref(),
            Some("example.com/q")
        );
        assert_eq!(GoModule::parse_module_name("go 1.22\n"), None);
    }

    #[test]
    fn test_module_identity_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            GoModule.module_name(tmp.path()),
            Err(CheckError::ManifestNotFound(_))
        ));

        fs::write(tmp.path().join("go.mod"), "go 1.22\n").unwrap();
        assert!(matches!(
            GoModule.module_name(tmp.path()),
            Err(CheckError::ModuleNameMissing(_))
        ));

        fs::write(tmp.path().join("go.mod"), "module example.com/shop\n").unwrap();
        assert_eq!(GoModule.module_name(tmp.path()).unwrap(), "example.com/shop");
    }

    #[test]
    fn test_scan_grouped_imports() {
        let source = r#"// Package api serves HTTP.
package api

import (
	"fmt"
	log "github.com/sirupsen/logrus" // structured logging
	_ "embed"
	. "example.com/shop/core/dsl"

	/* "example.com/shop/disabled" */
	"example.com/shop/core/service"
)

import "strings"

func Handler() {
	_ = "import \"not/an/import\""
}
"#;
        assert_eq!(
            GoImportScanner::scan(source),
            vec![
                "fmt",
                "github.com/sirupsen/logrus",
                "embed",
                "example.com/shop/core/dsl",
                "example.com/shop/core/service",
                "strings",
            ]
        );
    }

    #[test]
    fn test_scan_single_and_inline_imports() {
        let source = "package main\nimport \"os\"\nimport (\"a\"; b \"c/d\")\nimport `raw/path`\n";
        assert_eq!(GoImportScanner::scan(source), vec!["os", "a", "c/d", "raw/path"]);
    }

    #[test]
    fn test_scan_stops_at_first_declaration() {
        let source = "package x\n\nvar importer = 1\n\nimport \"late\"\n";
        assert!(GoImportScanner::scan(source).is_empty());
    }

    #[test]
    fn test_enumerate_go_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for file in [
            "main.go",
            "core/service.go",
            "core/service_test.go",
            "vendor/lib/lib.go",
            "docs/readme.md",
        ] {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "package x\n").unwrap();
        }

        let spec = Specification::parse(
            "version: 2\nexclude: [vendor]\nexcludeFiles: [\"_test\\\\.go$\"]\n",
        )
        .unwrap();
        let resolver = PathResolver::new(&spec).unwrap();

        let files = GoFileEnumerator.files(root, &resolver).unwrap();
        assert_eq!(files, vec!["core/service.go", "main.go"]);
    }
}
