//! Structural checks on a decoded [`Specification`].
//!
//! Each check is a plain function over the specification. They all run, in a
//! fixed order, and every problem becomes one [`AnnotatedWarning`]. A non-empty
//! result means the specification must not be used for checking.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use super::Specification;
use crate::annotated::{Annotated, Located, Reference};
use crate::resolver;

/// Arch file schema versions this crate understands.
pub const SUPPORTED_VERSIONS: &[i64] = &[1, 2];

/// A structural problem in the arch file, with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedWarning {
    text: String,
    reference: Reference,
}

impl AnnotatedWarning {
    pub fn new(text: impl Into<String>, reference: Reference) -> Self {
        Self {
            text: text.into(),
            reference,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Located for AnnotatedWarning {
    fn location(&self) -> &Reference {
        &self.reference
    }
}

type SpecCheck = fn(&Specification) -> Vec<AnnotatedWarning>;

const CHECKS: &[SpecCheck] = &[
    check_version,
    check_workdir,
    check_vendors,
    check_components,
    check_excluded_directories,
    check_excluded_files,
    check_dependencies,
    check_common_components,
    check_common_vendors,
];

/// Run every structural check and collect all warnings.
pub fn validate(spec: &Specification) -> Vec<AnnotatedWarning> {
    CHECKS.iter().flat_map(|check| check(spec)).collect()
}

fn warn_at<T>(value: &Annotated<T>, text: String) -> AnnotatedWarning {
    AnnotatedWarning::new(text, value.location().clone())
}

fn check_version(spec: &Specification) -> Vec<AnnotatedWarning> {
    let version = spec.version();
    if SUPPORTED_VERSIONS.contains(version.value()) {
        return Vec::new();
    }

    let supported: Vec<String> = SUPPORTED_VERSIONS.iter().map(i64::to_string).collect();
    vec![warn_at(
        version,
        format!(
            "Version {} is not supported, supported: [{}]",
            version.value(),
            supported.join(", ")
        ),
    )]
}

fn check_workdir(spec: &Specification) -> Vec<AnnotatedWarning> {
    let workdir = spec.working_directory();
    if workdir.as_str().starts_with('/') {
        return vec![warn_at(
            workdir,
            format!(
                "Working directory '{}' must be relative to the project root",
                workdir.as_str()
            ),
        )];
    }
    Vec::new()
}

fn check_vendors(spec: &Specification) -> Vec<AnnotatedWarning> {
    let mut warnings = Vec::new();

    for vendor in spec.vendors() {
        if vendor.import_paths().is_empty() {
            warnings.push(AnnotatedWarning::new(
                format!("Vendor '{}' has no import paths ('in')", vendor.name()),
                vendor.location().clone(),
            ));
        }

        for pattern in vendor.import_paths() {
            if let Err(e) = resolver::compile_glob(pattern.as_str()) {
                warnings.push(warn_at(pattern, format!("Vendor '{}': {}", vendor.name(), e)));
            }
        }
    }

    warnings
}

fn check_components(spec: &Specification) -> Vec<AnnotatedWarning> {
    let mut warnings = Vec::new();

    for component in spec.components() {
        if component.paths().is_empty() {
            warnings.push(AnnotatedWarning::new(
                format!("Component '{}' has no paths ('in')", component.name()),
                component.location().clone(),
            ));
        }

        for pattern in component.paths() {
            if let Err(e) = resolver::compile_glob(pattern.as_str()) {
                warnings.push(warn_at(
                    pattern,
                    format!("Component '{}': {}", component.name(), e),
                ));
            }
        }
    }

    warnings
}

fn check_excluded_directories(spec: &Specification) -> Vec<AnnotatedWarning> {
    spec.excluded_directories()
        .iter()
        .filter(|dir| dir.as_str().trim().is_empty())
        .map(|dir| warn_at(dir, "Excluded directory must not be empty".to_string()))
        .collect()
}

fn check_excluded_files(spec: &Specification) -> Vec<AnnotatedWarning> {
    spec.excluded_files()
        .iter()
        .filter_map(|pattern| {
            Regex::new(pattern.as_str()).err().map(|e| {
                warn_at(
                    pattern,
                    format!("Invalid regular expression '{}': {}", pattern.as_str(), e),
                )
            })
        })
        .collect()
}

fn check_dependencies(spec: &Specification) -> Vec<AnnotatedWarning> {
    let mut warnings = Vec::new();

    for rule in spec.dependency_rules() {
        if spec.component(rule.component()).is_none() {
            warnings.push(AnnotatedWarning::new(
                format!(
                    "Rules defined for unknown component '{}'",
                    rule.component()
                ),
                rule.location().clone(),
            ));
        }

        let mut seen = HashSet::new();
        for target in rule.may_depend_on() {
            if spec.component(target.as_str()).is_none() {
                warnings.push(warn_at(
                    target,
                    format!("Unknown component '{}' in mayDependOn", target.as_str()),
                ));
            }
            if !seen.insert(target.as_str()) {
                warnings.push(warn_at(
                    target,
                    format!("Component '{}' listed twice in mayDependOn", target.as_str()),
                ));
            }
        }

        let mut seen = HashSet::new();
        for target in rule.can_use() {
            if spec.vendor(target.as_str()).is_none() {
                warnings.push(warn_at(
                    target,
                    format!("Unknown vendor '{}' in canUse", target.as_str()),
                ));
            }
            if !seen.insert(target.as_str()) {
                warnings.push(warn_at(
                    target,
                    format!("Vendor '{}' listed twice in canUse", target.as_str()),
                ));
            }
        }
    }

    warnings
}

fn check_common_components(spec: &Specification) -> Vec<AnnotatedWarning> {
    spec.common_components()
        .iter()
        .filter(|name| spec.component(name.as_str()).is_none())
        .map(|name| {
            warn_at(
                name,
                format!("Unknown component '{}' in commonComponents", name.as_str()),
            )
        })
        .collect()
}

fn check_common_vendors(spec: &Specification) -> Vec<AnnotatedWarning> {
    spec.common_vendors()
        .iter()
        .filter(|name| spec.vendor(name.as_str()).is_none())
        .map(|name| {
            warn_at(
                name,
                format!("Unknown vendor '{}' in commonVendors", name.as_str()),
            )
        })
        .collect()
}
