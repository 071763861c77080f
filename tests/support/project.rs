use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const MODULE: &str = "example.com/shop";

/// Arch file used by most tests: `api` may use `core` and logrus, nothing else
/// has rules.
pub const SHOP_ARCH: &str = r#"version: 2
allow:
  depOnAnyVendor: false
vendors:
  logrus: { in: github.com/sirupsen/logrus }
components:
  api: { in: api/** }
  core: { in: core/** }
deps:
  api:
    mayDependOn: [core]
    canUse: [logrus]
"#;

pub fn archcheck_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_archcheck"))
}

/// A throwaway Go module on disk.
pub struct GoProject {
    pub dir: TempDir,
}

impl GoProject {
    /// Creates a temporary directory with a `go.mod` declaring [`MODULE`].
    pub fn new() -> Self {
        let project = Self::without_manifest();
        fs::write(
            project.path().join("go.mod"),
            format!("module {}\n\ngo 1.22\n", MODULE),
        )
        .expect("Failed to write go.mod");
        project
    }

    pub fn without_manifest() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn with_arch(self, yaml: &str) -> Self {
        fs::write(self.path().join(".archcheck.yml"), yaml).expect("Failed to write arch file");
        self
    }

    /// Writes a Go file whose package is its directory name and which imports
    /// `imports` in order.
    pub fn with_source(self, relative: &str, imports: &[&str]) -> Self {
        let path = self.path().join(relative);
        let dir = path.parent().expect("source file has a parent");
        fs::create_dir_all(dir).expect("Failed to create package dir");

        let package = dir
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|_| dir != self.path())
            .unwrap_or("main");

        let mut body = format!("package {}\n\n", package);
        if !imports.is_empty() {
            body.push_str("import (\n");
            for import in imports {
                body.push_str(&format!("\t\"{}\"\n", import));
            }
            body.push_str(")\n");
        }
        body.push_str("\nfunc init() {}\n");

        fs::write(&path, body).expect("Failed to write source file");
        self
    }

    /// Runs `archcheck check` on this project with extra arguments.
    pub fn check(&self, args: &[&str]) -> Output {
        Command::new(archcheck_binary())
            .arg("check")
            .arg("--project-path")
            .arg(self.path())
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run archcheck")
    }

    /// Runs `archcheck check --json` and decodes stdout.
    pub fn check_json(&self, args: &[&str]) -> (Output, serde_json::Value) {
        let mut all = vec!["--json"];
        all.extend_from_slice(args);
        let output = self.check(&all);
        let json = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&output.stdout)
            )
        });
        (output, json)
    }
}
