//! Evaluates every import edge of every analyzed file against the rules.
//!
//! For each file: resolve the owning component (or report it as not matched),
//! pick that component's rule (strictest default when absent), and test each
//! import. Imports that resolve to no component or vendor are never flagged.
//! Output is sorted so identical input always yields identical warnings,
//! whether files were checked on one thread or many.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc;
use std::thread;

use crate::paths::clean_path;
use crate::resolver::PathResolver;
use crate::spec::{DependencyRule, Specification};

/// A source file and the import paths it declares, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub imports: Vec<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, imports: Vec<String>) -> Self {
        Self {
            path: path.into(),
            imports,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Import of a package of the same module.
    Internal,
    /// Import of a package outside the module.
    External,
}

/// A file imports a component or vendor its component may not use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyWarning {
    pub component: String,
    pub file_path: String,
    pub import_path: String,
    pub resolved_import_name: String,
    pub edge: EdgeKind,
    /// Declaration index of the resolved target; components first, then vendors.
    #[serde(skip)]
    pub(crate) target_order: usize,
}

/// A file no component claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotMatchedWarning {
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    Dependency(DependencyWarning),
    NotMatched(NotMatchedWarning),
}

impl Warning {
    pub fn file_path(&self) -> &str {
        match self {
            Warning::Dependency(w) => &w.file_path,
            Warning::NotMatched(w) => &w.file_path,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Warning::Dependency(_) => 0,
            Warning::NotMatched(_) => 1,
        }
    }

    fn target_order(&self) -> usize {
        match self {
            Warning::Dependency(w) => w.target_order,
            Warning::NotMatched(_) => 0,
        }
    }

    fn import_path(&self) -> &str {
        match self {
            Warning::Dependency(w) => &w.import_path,
            Warning::NotMatched(_) => "",
        }
    }
}

fn compare_warnings(a: &Warning, b: &Warning) -> Ordering {
    a.file_path()
        .cmp(b.file_path())
        .then(a.kind_rank().cmp(&b.kind_rank()))
        .then(a.target_order().cmp(&b.target_order()))
        .then_with(|| a.import_path().cmp(b.import_path()))
}

/// Sort by file path, then warning kind, then declaration order of the
/// violated target. The sort is stable.
pub fn sort_warnings(warnings: &mut [Warning]) {
    warnings.sort_by(compare_warnings);
}

/// Package path of `import` relative to the module root, if it is internal.
pub fn internal_package<'i>(module: &str, import: &'i str) -> Option<&'i str> {
    if module.is_empty() {
        return None;
    }
    if import == module {
        return Some(".");
    }
    import.strip_prefix(module)?.strip_prefix('/')
}

/// Allow-set of one component with the common lists folded in.
#[derive(Debug, Default)]
struct EffectiveRule<'a> {
    any_project_deps: bool,
    any_vendor_deps: bool,
    components: HashSet<&'a str>,
    vendors: HashSet<&'a str>,
}

impl<'a> EffectiveRule<'a> {
    fn new(rule: Option<&'a DependencyRule>, spec: &'a Specification) -> Self {
        let mut components: HashSet<&'a str> =
            spec.common_components().iter().map(|c| c.as_str()).collect();
        let mut vendors: HashSet<&'a str> =
            spec.common_vendors().iter().map(|v| v.as_str()).collect();

        let Some(rule) = rule else {
            return Self {
                components,
                vendors,
                ..Self::default()
            };
        };

        components.extend(rule.may_depend_on().iter().map(|c| c.as_str()));
        vendors.extend(rule.can_use().iter().map(|v| v.as_str()));

        Self {
            any_project_deps: rule.any_project_deps().get(),
            any_vendor_deps: rule.any_vendor_deps().get(),
            components,
            vendors,
        }
    }
}

pub struct DependencyChecker<'a> {
    resolver: &'a PathResolver<'a>,
    module: &'a str,
    any_vendor: bool,
    rules: HashMap<&'a str, EffectiveRule<'a>>,
    fallback: EffectiveRule<'a>,
}

impl<'a> DependencyChecker<'a> {
    /// `module` is the project's own module path; imports below it are
    /// internal edges, everything else is external.
    pub fn new(spec: &'a Specification, resolver: &'a PathResolver<'a>, module: &'a str) -> Self {
        let rules = spec
            .dependency_rules()
            .iter()
            .map(|rule| (rule.component(), EffectiveRule::new(Some(rule), spec)))
            .collect();

        Self {
            resolver,
            module,
            any_vendor: spec.allow().depend_on_any_vendor().get(),
            rules,
            fallback: EffectiveRule::new(None, spec),
        }
    }

    /// Check all files on the current thread.
    pub fn check(&self, files: &[SourceFile]) -> Vec<Warning> {
        let mut warnings: Vec<Warning> = files.iter().flat_map(|f| self.check_file(f)).collect();
        sort_warnings(&mut warnings);
        warnings
    }

    /// Check files on up to `workers` scoped threads.
    ///
    /// Each worker accumulates warnings for its slice of files and sends them
    /// to a single collector. The merged list is sorted the same way as
    /// [`check`](Self::check), so the result does not depend on `workers`.
    pub fn check_parallel(&self, files: &[SourceFile], workers: usize) -> Vec<Warning> {
        let workers = workers.clamp(1, files.len().max(1));
        if workers == 1 {
            return self.check(files);
        }

        let chunk_size = files.len().div_ceil(workers);
        let (tx, rx) = mpsc::channel::<Vec<Warning>>();

        thread::scope(|scope| {
            for chunk in files.chunks(chunk_size) {
                let tx = tx.clone();
                scope.spawn(move || {
                    let local: Vec<Warning> =
                        chunk.iter().flat_map(|f| self.check_file(f)).collect();
                    // The receiver outlives the scope, so sending cannot fail.
                    let _ = tx.send(local);
                });
            }
        });
        drop(tx);

        let mut warnings: Vec<Warning> = rx.into_iter().flatten().collect();
        sort_warnings(&mut warnings);
        warnings
    }

    /// Warnings for one file, in import order. Excluded files yield nothing.
    pub fn check_file(&self, file: &SourceFile) -> Vec<Warning> {
        if self.resolver.is_excluded(&file.path) {
            return Vec::new();
        }

        let file_path = clean_path(&file.path);
        let Some(component) = self.resolver.resolve_component(&file_path) else {
            return vec![Warning::NotMatched(NotMatchedWarning { file_path })];
        };

        let rule = self.rules.get(component).unwrap_or(&self.fallback);
        file.imports
            .iter()
            .filter_map(|import| self.check_import(component, rule, &file_path, import))
            .map(Warning::Dependency)
            .collect()
    }

    fn check_import(
        &self,
        component: &str,
        rule: &EffectiveRule<'_>,
        file_path: &str,
        import: &str,
    ) -> Option<DependencyWarning> {
        let (target, edge, target_order) = match internal_package(self.module, import) {
            Some(package) => {
                if rule.any_project_deps {
                    return None;
                }
                let target = self.resolver.resolve_package(package)?;
                if target == component || rule.components.contains(target) {
                    return None;
                }
                let order = self.resolver.component_order(target).unwrap_or(usize::MAX);
                (target, EdgeKind::Internal, order)
            }
            None => {
                if self.any_vendor || rule.any_vendor_deps {
                    return None;
                }
                let target = self.resolver.resolve_vendor(import)?;
                if rule.vendors.contains(target) {
                    return None;
                }
                let order = self
                    .resolver
                    .vendor_order(target)
                    .map_or(usize::MAX, |idx| self.resolver.component_count() + idx);
                (target, EdgeKind::External, order)
            }
        };

        Some(DependencyWarning {
            component: component.to_string(),
            file_path: file_path.to_string(),
            import_path: import.to_string(),
            resolved_import_name: target.to_string(),
            edge,
            target_order,
        })
    }
}
