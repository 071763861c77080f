//! Argument handling and auxiliary commands.

use std::process::Command;

use crate::support::project::{archcheck_binary, GoProject, SHOP_ARCH};

#[test]
fn test_max_warnings_out_of_range_is_rejected() {
    let project = GoProject::new().with_arch(SHOP_ARCH);

    for value in ["0", "32769"] {
        let output = project.check(&["--max-warnings", value]);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("--max-warnings"), "stderr: {}", stderr);
    }
}

#[test]
fn test_completions_are_generated() {
    let output = Command::new(archcheck_binary())
        .args(["completions", "bash"])
        .output()
        .expect("Failed to run archcheck");

    assert!(output.status.success());
    let script = String::from_utf8_lossy(&output.stdout);
    assert!(script.contains("archcheck"));
    assert!(script.contains("--max-warnings"));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let project = GoProject::new()
        .with_arch(SHOP_ARCH)
        .with_source("core/service.go", &[]);

    let (output, json) = project.check_json(&["--verbose"]);

    assert!(output.status.success(), "payload: {}", json);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("using arch file"), "stderr: {}", stderr);
}
