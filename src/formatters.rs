//! Human-readable rendering of a [`CheckPayload`].
//!
//! JSON output goes straight through `serde_json`; this module only handles
//! the terminal format.

use colored::Colorize;

use crate::annotated::Located;
use crate::checker::{DependencyWarning, NotMatchedWarning};
use crate::config::CheckConfig;
use crate::report::CheckPayload;
use crate::spec::AnnotatedWarning;

/// Format a check run for the terminal.
///
/// `config` is `None` when the run failed before the project was resolved.
pub fn format_check_output(payload: &CheckPayload, config: Option<&CheckConfig>) -> String {
    let mut output = Vec::new();

    if let Some(config) = config {
        output.push(format!(
            "{} {}",
            "used arch file:".dimmed(),
            config.arch_file().display()
        ));
        output.push(format!("{} {}", "module:        ".dimmed(), config.module_name()));
        output.push(String::new());
    }

    if !payload.execution_warnings.is_empty() {
        for warning in &payload.execution_warnings {
            output.push(format_spec_warning(warning));
        }
        output.push(String::new());
    }

    if !payload.execution_error.is_empty() {
        output.push(format!("{} {}", "[ERROR]".red().bold(), payload.execution_error));
        return output.join("\n");
    }

    for warning in &payload.dependency_warnings {
        output.push(format_dependency_warning(warning));
    }
    for warning in &payload.not_matched_warnings {
        output.push(format_not_matched_warning(warning));
    }

    if payload.truncated_warnings > 0 {
        output.push(
            format!("{} warning(s) truncated", payload.truncated_warnings)
                .dimmed()
                .to_string(),
        );
    }

    if payload.has_warnings {
        output.push(String::new());
        output.push(
            format!("warnings found: {}", payload.total_warnings)
                .red()
                .bold()
                .to_string(),
        );
    } else {
        output.push("OK - No warnings found".green().bold().to_string());
    }

    output.join("\n")
}

fn format_spec_warning(warning: &AnnotatedWarning) -> String {
    let reference = warning.location();
    let mut lines = vec![format!(
        "{} {} {}",
        "[Archfile]".yellow().bold(),
        warning.text(),
        format!("at {}", reference).dimmed()
    )];

    if let Some(excerpt) = reference.excerpt() {
        lines.extend(excerpt.lines().map(|line| format!("    {}", line)));
    }

    lines.join("\n")
}

fn format_dependency_warning(warning: &DependencyWarning) -> String {
    format!(
        "{} Component '{}': file '{}' shouldn't depend on '{}'",
        "[WARN]".yellow().bold(),
        warning.component.cyan(),
        warning.file_path,
        warning.resolved_import_name.cyan()
    )
}

fn format_not_matched_warning(warning: &NotMatchedWarning) -> String {
    format!(
        "{} File '{}' not attached to any component in archfile",
        "[WARN]".yellow().bold(),
        warning.file_path
    )
}
