//! End-to-end runs of `archcheck check` against temporary Go modules.

use crate::support::project::{GoProject, SHOP_ARCH};

#[test]
fn test_clean_project_passes() {
    let project = GoProject::new()
        .with_arch(SHOP_ARCH)
        .with_source(
            "api/handler.go",
            &["fmt", "example.com/shop/core", "github.com/sirupsen/logrus"],
        )
        .with_source("core/service.go", &["strings"]);

    let output = project.check(&[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("OK - No warnings found"));
    assert!(stdout.contains("example.com/shop"));
}

#[test]
fn test_violations_fail_with_json_payload() {
    let project = GoProject::new()
        .with_arch(SHOP_ARCH)
        .with_source("api/handler.go", &["example.com/shop/core"])
        .with_source(
            "core/service.go",
            &["example.com/shop/api", "github.com/sirupsen/logrus"],
        )
        .with_source("tools/gen.go", &[]);

    let (output, json) = project.check_json(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["executionError"], "");
    assert_eq!(json["hasWarnings"], true);
    assert_eq!(json["truncatedWarnings"], 0);

    let deps = json["dependencyWarnings"].as_array().unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0]["component"], "core");
    assert_eq!(deps[0]["filePath"], "core/service.go");
    assert_eq!(deps[0]["importPath"], "example.com/shop/api");
    assert_eq!(deps[0]["resolvedImportName"], "api");
    assert_eq!(deps[0]["edge"], "internal");
    assert_eq!(deps[1]["resolvedImportName"], "logrus");
    assert_eq!(deps[1]["edge"], "external");

    let unmatched = json["notMatchedWarnings"].as_array().unwrap();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0]["filePath"], "tools/gen.go");
}

#[test]
fn test_human_output_lists_warnings() {
    let project = GoProject::new()
        .with_arch(SHOP_ARCH)
        .with_source("core/service.go", &["example.com/shop/api"])
        .with_source("api/handler.go", &[]);

    let output = project.check(&[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(stdout.contains("Component 'core': file 'core/service.go' shouldn't depend on 'api'"));
    assert!(stdout.contains("warnings found: 1"));
}

#[test]
fn test_max_warnings_truncates() {
    let mut project = GoProject::new().with_arch(SHOP_ARCH);
    for n in 0..5 {
        project = project.with_source(&format!("core/f{}.go", n), &["example.com/shop/api"]);
    }

    let (output, json) = project.check_json(&["--max-warnings", "2"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["dependencyWarnings"].as_array().unwrap().len(), 2);
    assert_eq!(json["dependencyWarnings"][0]["filePath"], "core/f0.go");
    assert_eq!(json["truncatedWarnings"], 3);
}

#[test]
fn test_parallel_jobs_match_sequential() {
    let mut project = GoProject::new().with_arch(SHOP_ARCH);
    for n in 0..8 {
        project = project
            .with_source(&format!("core/f{}.go", n), &["example.com/shop/api"])
            .with_source(&format!("misc/m{}.go", n), &[]);
    }

    let (_, sequential) = project.check_json(&[]);
    let (_, parallel) = project.check_json(&["--jobs", "4"]);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_excluded_files_are_skipped() {
    let arch = format!("{}exclude: [gen]\nexcludeFiles: [\"_test\\\\.go$\"]\n", SHOP_ARCH);
    let project = GoProject::new()
        .with_arch(&arch)
        .with_source("gen/models.go", &[])
        .with_source("core/service_test.go", &["example.com/shop/api"])
        .with_source("core/service.go", &[]);

    let (output, json) = project.check_json(&[]);
    assert!(output.status.success(), "payload: {}", json);
}

#[test]
fn test_invalid_arch_file_reports_annotated_warnings() {
    let arch = r#"version: 7
components:
  core: { in: core/** }
deps:
  core:
    mayDependOn: [ghost]
"#;
    let project = GoProject::new()
        .with_arch(arch)
        .with_source("core/service.go", &[]);

    let (output, json) = project.check_json(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["executionError"], "arch file invalid syntax");

    let warnings = json["executionWarnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0]["reference"]["path"], "$.version");
    assert_eq!(warnings[0]["reference"]["line"], 1);
    assert_eq!(warnings[1]["reference"]["path"], "$.deps.core.mayDependOn[0]");
    assert_eq!(warnings[1]["reference"]["line"], 6);
    assert!(warnings[1]["text"].as_str().unwrap().contains("ghost"));
}

#[test]
fn test_missing_manifest_is_an_execution_error() {
    let project = GoProject::without_manifest().with_arch(SHOP_ARCH);

    let (output, json) = project.check_json(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(json["executionError"].as_str().unwrap().contains("go.mod"));
    assert_eq!(json["hasWarnings"], false);
}

#[test]
fn test_missing_arch_file_is_an_execution_error() {
    let project = GoProject::new().with_source("main.go", &[]);

    let (output, json) = project.check_json(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(json["executionError"]
        .as_str()
        .unwrap()
        .contains(".archcheck.yml"));
}

#[test]
fn test_explicit_arch_file() {
    let project = GoProject::new().with_source("core/service.go", &[]);
    let arch = project.path().join("layers.yml");
    std::fs::write(&arch, SHOP_ARCH).unwrap();

    let (output, json) = project.check_json(&["--arch-file", arch.to_str().unwrap()]);
    assert!(output.status.success(), "payload: {}", json);
}

#[test]
fn test_root_package_component_owns_root_files() {
    let arch = r#"version: 2
components:
  main: { in: . }
  core: { in: core/** }
deps:
  main:
    mayDependOn: [core]
"#;
    let project = GoProject::new()
        .with_arch(arch)
        .with_source("main.go", &["example.com/shop/core"])
        .with_source("core/service.go", &[]);

    let (output, json) = project.check_json(&[]);
    assert!(output.status.success(), "payload: {}", json);
    assert!(json["notMatchedWarnings"].as_array().unwrap().is_empty());
}
