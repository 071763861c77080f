//! Annotated, read-only model of the arch file.
//!
//! The arch file is decoded once into [`document::RawDocument`] and then turned
//! into a [`Specification`] where every value carries a [`Reference`] into the
//! source text. Nothing mutates the model after [`Specification::parse`]
//! returns.
//!
//! ```
//! use archcheck::spec::Specification;
//!
//! let spec = Specification::parse("version: 2\ncomponents:\n  core: { in: core/** }\n").unwrap();
//! assert_eq!(spec.components()[0].name(), "core");
//! ```

pub mod document;
pub mod locate;
pub mod validation;

pub use validation::{validate, AnnotatedWarning};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::annotated::{Annotated, Located, Reference};
use crate::error::CheckError;
use crate::paths;
use document::{RawAllow, RawComponent, RawDocument, RawRules, RawVendor, StringList};
use locate::SourceLocator;

/// Global `allow` options.
#[derive(Debug, Clone)]
pub struct Allow {
    location: Reference,
    depend_on_any_vendor: Annotated<bool>,
}

impl Allow {
    pub fn depend_on_any_vendor(&self) -> &Annotated<bool> {
        &self.depend_on_any_vendor
    }
}

impl Located for Allow {
    fn location(&self) -> &Reference {
        &self.location
    }
}

/// A named group of external import paths.
#[derive(Debug, Clone)]
pub struct Vendor {
    name: String,
    location: Reference,
    import_paths: Vec<Annotated<String>>,
}

impl Vendor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Globs over import identifiers, e.g. `github.com/x/*`.
    pub fn import_paths(&self) -> &[Annotated<String>] {
        &self.import_paths
    }
}

impl Located for Vendor {
    fn location(&self) -> &Reference {
        &self.location
    }
}

/// A named partition of the source tree.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    location: Reference,
    paths: Vec<Annotated<String>>,
}

impl Component {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path globs, already joined with the working directory.
    pub fn paths(&self) -> &[Annotated<String>] {
        &self.paths
    }
}

impl Located for Component {
    fn location(&self) -> &Reference {
        &self.location
    }
}

/// What a component is allowed to import.
#[derive(Debug, Clone)]
pub struct DependencyRule {
    component: String,
    location: Reference,
    may_depend_on: Vec<Annotated<String>>,
    can_use: Vec<Annotated<String>>,
    any_project_deps: Annotated<bool>,
    any_vendor_deps: Annotated<bool>,
}

impl DependencyRule {
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn may_depend_on(&self) -> &[Annotated<String>] {
        &self.may_depend_on
    }

    pub fn can_use(&self) -> &[Annotated<String>] {
        &self.can_use
    }

    pub fn any_project_deps(&self) -> &Annotated<bool> {
        &self.any_project_deps
    }

    pub fn any_vendor_deps(&self) -> &Annotated<bool> {
        &self.any_vendor_deps
    }
}

impl Located for DependencyRule {
    fn location(&self) -> &Reference {
        &self.location
    }
}

/// The decoded arch file.
///
/// Vendors, components and rules are kept in declaration order.
#[derive(Debug, Clone)]
pub struct Specification {
    location: Reference,
    version: Annotated<i64>,
    working_directory: Annotated<String>,
    allow: Allow,
    vendors: Vec<Vendor>,
    components: Vec<Component>,
    excluded_directories: Vec<Annotated<String>>,
    excluded_files: Vec<Annotated<String>>,
    dependency_rules: Vec<DependencyRule>,
    common_components: Vec<Annotated<String>>,
    common_vendors: Vec<Annotated<String>>,
}

impl Specification {
    /// Read and decode the arch file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read arch file {}", path.display()))?;

        Self::parse(&source)
            .with_context(|| format!("Failed to parse arch file {}", path.display()))
    }

    /// Decode arch file text.
    pub fn parse(source: &str) -> Result<Self, CheckError> {
        let raw = document::parse_document(source)
            .map_err(|e| CheckError::InvalidDocument(e.to_string()))?;

        Ok(Self::from_document(raw, &SourceLocator::new(source)))
    }

    fn from_document(raw: RawDocument, locator: &SourceLocator<'_>) -> Self {
        let workdir = if raw.workdir.is_empty() {
            paths::DEFAULT_WORKDIR.to_string()
        } else {
            raw.workdir
        };

        let vendors = raw
            .vendors
            .iter()
            .map(|(name, vendor)| build_vendor(name, vendor, locator))
            .collect();

        let components = raw
            .components
            .iter()
            .map(|(name, component)| build_component(name, component, &workdir, locator))
            .collect();

        let dependency_rules = raw
            .deps
            .iter()
            .map(|(name, rules)| build_rule(name, rules, locator))
            .collect();

        Self {
            location: locator.reference("$"),
            version: Annotated::new(raw.version, locator.reference("$.version")),
            working_directory: Annotated::new(workdir, locator.reference("$.workdir")),
            allow: build_allow(&raw.allow, locator),
            vendors,
            components,
            excluded_directories: annotate_list("$.exclude", &raw.exclude, locator),
            excluded_files: annotate_list("$.excludeFiles", &raw.exclude_files, locator),
            dependency_rules,
            common_components: annotate_list(
                "$.commonComponents",
                &raw.common_components,
                locator,
            ),
            common_vendors: annotate_list("$.commonVendors", &raw.common_vendors, locator),
        }
    }

    pub fn version(&self) -> &Annotated<i64> {
        &self.version
    }

    pub fn working_directory(&self) -> &Annotated<String> {
        &self.working_directory
    }

    pub fn allow(&self) -> &Allow {
        &self.allow
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn vendor(&self, name: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.name == name)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn excluded_directories(&self) -> &[Annotated<String>] {
        &self.excluded_directories
    }

    pub fn excluded_files(&self) -> &[Annotated<String>] {
        &self.excluded_files
    }

    pub fn dependency_rules(&self) -> &[DependencyRule] {
        &self.dependency_rules
    }

    pub fn dependency_rule(&self, component: &str) -> Option<&DependencyRule> {
        self.dependency_rules
            .iter()
            .find(|r| r.component == component)
    }

    pub fn common_components(&self) -> &[Annotated<String>] {
        &self.common_components
    }

    pub fn common_vendors(&self) -> &[Annotated<String>] {
        &self.common_vendors
    }
}

impl Located for Specification {
    fn location(&self) -> &Reference {
        &self.location
    }
}

fn build_allow(raw: &RawAllow, locator: &SourceLocator<'_>) -> Allow {
    Allow {
        location: locator.reference("$.allow"),
        depend_on_any_vendor: Annotated::new(
            raw.dep_on_any_vendor,
            locator.reference("$.allow.depOnAnyVendor"),
        ),
    }
}

fn build_vendor(name: &str, raw: &RawVendor, locator: &SourceLocator<'_>) -> Vendor {
    let base = format!("$.vendors.{}", name);
    Vendor {
        name: name.to_string(),
        location: locator.reference(&base),
        import_paths: annotate_patterns(&base, &raw.import_paths, locator, |p| p.to_string()),
    }
}

fn build_component(
    name: &str,
    raw: &RawComponent,
    workdir: &str,
    locator: &SourceLocator<'_>,
) -> Component {
    let base = format!("$.components.{}", name);
    Component {
        name: name.to_string(),
        location: locator.reference(&base),
        paths: annotate_patterns(&base, &raw.local_paths, locator, |p| {
            paths::join_pattern(workdir, p)
        }),
    }
}

fn build_rule(name: &str, raw: &RawRules, locator: &SourceLocator<'_>) -> DependencyRule {
    let base = format!("$.deps.{}", name);
    DependencyRule {
        component: name.to_string(),
        location: locator.reference(&base),
        may_depend_on: annotate_list(&format!("{}.mayDependOn", base), &raw.may_depend_on, locator),
        can_use: annotate_list(&format!("{}.canUse", base), &raw.can_use, locator),
        any_project_deps: Annotated::new(
            raw.any_project_deps,
            locator.reference(&format!("{}.anyProjectDeps", base)),
        ),
        any_vendor_deps: Annotated::new(
            raw.any_vendor_deps,
            locator.reference(&format!("{}.anyVendorDeps", base)),
        ),
    }
}

fn annotate_list(
    path: &str,
    items: &[String],
    locator: &SourceLocator<'_>,
) -> Vec<Annotated<String>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            Annotated::new(item.clone(), locator.reference(&format!("{}[{}]", path, idx)))
        })
        .collect()
}

/// Annotate the `in` patterns of a vendor or component. Scalar `in` values
/// point at `in`, list values at `in[N]`.
fn annotate_patterns(
    base: &str,
    list: &StringList,
    locator: &SourceLocator<'_>,
    transform: impl Fn(&str) -> String,
) -> Vec<Annotated<String>> {
    let key = format!("{}.in", base);
    list.items()
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let path = if list.is_list() {
                format!("{}[{}]", key, idx)
            } else {
                key.clone()
            };
            Annotated::new(transform(item), locator.reference(&path))
        })
        .collect()
}
