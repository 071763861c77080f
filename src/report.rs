//! Aggregates checker output into a capped, presentation-ready result.

use serde::Serialize;

use crate::checker::{sort_warnings, DependencyWarning, NotMatchedWarning, Warning};
use crate::spec::AnnotatedWarning;

/// Default for `--max-warnings`.
pub const DEFAULT_MAX_WARNINGS: usize = 512;

/// Outcome of a check run after truncation.
///
/// Dependency warnings are reported first and consume the shared budget before
/// not-matched warnings. Whatever does not fit is counted per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    dependency_warnings: Vec<DependencyWarning>,
    not_matched_warnings: Vec<NotMatchedWarning>,
    truncated_dependency: usize,
    truncated_not_matched: usize,
}

impl CheckResult {
    pub fn collect(mut warnings: Vec<Warning>, max_warnings: usize) -> Self {
        sort_warnings(&mut warnings);

        let mut dependency = Vec::new();
        let mut not_matched = Vec::new();
        for warning in warnings {
            match warning {
                Warning::Dependency(w) => dependency.push(w),
                Warning::NotMatched(w) => not_matched.push(w),
            }
        }

        let dependency_budget = max_warnings.min(dependency.len());
        let truncated_dependency = dependency.len() - dependency_budget;
        dependency.truncate(dependency_budget);

        let not_matched_budget = (max_warnings - dependency_budget).min(not_matched.len());
        let truncated_not_matched = not_matched.len() - not_matched_budget;
        not_matched.truncate(not_matched_budget);

        Self {
            dependency_warnings: dependency,
            not_matched_warnings: not_matched,
            truncated_dependency,
            truncated_not_matched,
        }
    }

    /// True when the check produced no warnings at all, truncated or not.
    pub fn is_ok(&self) -> bool {
        self.total() == 0
    }

    pub fn dependency_warnings(&self) -> &[DependencyWarning] {
        &self.dependency_warnings
    }

    pub fn not_matched_warnings(&self) -> &[NotMatchedWarning] {
        &self.not_matched_warnings
    }

    /// Number of warnings left out because of the cap.
    pub fn truncated(&self) -> usize {
        self.truncated_dependency + self.truncated_not_matched
    }

    pub fn truncated_dependency(&self) -> usize {
        self.truncated_dependency
    }

    pub fn truncated_not_matched(&self) -> usize {
        self.truncated_not_matched
    }

    /// Number of warnings found, including truncated ones.
    pub fn total(&self) -> usize {
        self.dependency_warnings.len() + self.not_matched_warnings.len() + self.truncated()
    }
}

/// Machine-readable result of the `check` command.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPayload {
    pub execution_error: String,
    pub execution_warnings: Vec<AnnotatedWarning>,
    pub has_warnings: bool,
    pub dependency_warnings: Vec<DependencyWarning>,
    pub not_matched_warnings: Vec<NotMatchedWarning>,
    pub truncated_warnings: usize,
    #[serde(skip)]
    pub total_warnings: usize,
}

impl CheckPayload {
    pub fn from_error(error: impl ToString) -> Self {
        Self {
            execution_error: error.to_string(),
            ..Self::default()
        }
    }

    /// The arch file failed structural validation.
    pub fn from_spec_warnings(warnings: Vec<AnnotatedWarning>) -> Self {
        Self {
            execution_error: "arch file invalid syntax".to_string(),
            execution_warnings: warnings,
            ..Self::default()
        }
    }

    pub fn from_result(result: CheckResult) -> Self {
        Self {
            has_warnings: !result.is_ok(),
            truncated_warnings: result.truncated(),
            total_warnings: result.total(),
            dependency_warnings: result.dependency_warnings,
            not_matched_warnings: result.not_matched_warnings,
            ..Self::default()
        }
    }

    /// Whether the run should exit successfully.
    pub fn is_ok(&self) -> bool {
        self.execution_error.is_empty() && !self.has_warnings
    }
}
