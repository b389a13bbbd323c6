//! Diagnostics — Reporting every problem in a type declaration list.
//!
//! [`set_supertypes`](super::set_supertypes) stops at the first problem.
//! The checker here keeps going and reports all dangling basetypes,
//! cycles and duplicate declarations. It follows the same parent edges as
//! the resolver, so anything the resolver rejects shows up here as an error.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::error::HierarchyError;
use super::hierarchy::parent_table;
use super::options::HierarchyOptions;
use super::types::Type;
use crate::base::Name;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message about one type declaration.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The type the diagnostic is reported against.
    pub subject: Name,
    /// Position of the offending declaration in the input list, if known.
    pub index: Option<usize>,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Optional related notes.
    pub related: Vec<Arc<str>>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(subject: impl Into<Name>, message: impl Into<Arc<str>>) -> Self {
        Self {
            subject: subject.into(),
            index: None,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(subject: impl Into<Name>, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(subject, message)
        }
    }

    /// Set the declaration index.
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add a related note.
    pub fn with_related(mut self, note: impl Into<Arc<str>>) -> Self {
        self.related.push(note.into());
        self
    }
}

impl From<&HierarchyError> for Diagnostic {
    fn from(err: &HierarchyError) -> Self {
        let code = match err {
            HierarchyError::DanglingBasetype { .. } => codes::UNDEFINED_BASETYPE,
            HierarchyError::Cycle { .. } => codes::CIRCULAR_HIERARCHY,
        };
        Diagnostic::error(err.subject(), err.to_string()).with_code(code)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for type hierarchy problems.
pub mod codes {
    /// Basetype names an undeclared type.
    pub const UNDEFINED_BASETYPE: &str = "E0001";
    /// Type declared more than once.
    pub const DUPLICATE_DEFINITION: &str = "E0004";
    /// Basetype chain loops back on itself.
    pub const CIRCULAR_HIERARCHY: &str = "E0007";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while checking a type list.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add an undeclared basetype error.
    pub fn undefined_basetype(&mut self, index: usize, ty: &Type, basetype: &str) {
        self.add(
            Diagnostic::error(
                ty.name.clone(),
                format!("undefined basetype: '{}' derives from undeclared type '{}'", ty.name, basetype),
            )
            .at(index)
            .with_code(codes::UNDEFINED_BASETYPE),
        );
    }

    /// Add a circular hierarchy error.
    pub fn circular_hierarchy(&mut self, index: usize, path: &[Name]) {
        let rendered: Vec<_> = path.iter().map(Name::as_str).collect();
        let subject = path.first().cloned().unwrap_or_default();
        self.add(
            Diagnostic::error(subject, format!("circular type hierarchy: {}", rendered.join(" -> ")))
                .at(index)
                .with_code(codes::CIRCULAR_HIERARCHY),
        );
    }

    /// Add a duplicate declaration warning.
    pub fn duplicate_definition(&mut self, index: usize, ty: &Type, first: usize) {
        self.add(
            Diagnostic::warning(ty.name.clone(), format!("duplicate definition: type '{}' is already declared", ty.name))
                .at(index)
                .with_code(codes::DUPLICATE_DEFINITION)
                .with_related(format!("previous declaration at position {}", first)),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics reported against a specific type.
    pub fn diagnostics_for(&self, name: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.subject == name).collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clear all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

// ============================================================================
// HIERARCHY CHECKER
// ============================================================================

/// Checks a declaration list for every hierarchy problem.
pub struct HierarchyChecker<'a> {
    types: &'a [Type],
    options: HierarchyOptions,
    /// Name → position of its first declaration.
    first_decl: IndexMap<&'a str, usize>,
    collector: DiagnosticCollector,
}

#[derive(Clone, Copy)]
enum Visit {
    /// On the frame stack at this depth.
    OnStack(usize),
    Done,
}

impl<'a> HierarchyChecker<'a> {
    /// Create a new checker with default options.
    pub fn new(types: &'a [Type]) -> Self {
        Self::with_options(types, &HierarchyOptions::default())
    }

    /// Create a new checker that resolves like `set_supertypes_with(.., options)`.
    pub fn with_options(types: &'a [Type], options: &HierarchyOptions) -> Self {
        Self {
            types,
            options: options.clone(),
            first_decl: IndexMap::new(),
            collector: DiagnosticCollector::new(),
        }
    }

    /// Run all checks.
    pub fn check(&mut self) {
        self.check_declarations();
        self.check_basetypes();
        self.check_cycles();
    }

    fn check_declarations(&mut self) {
        let types = self.types;
        for (index, ty) in types.iter().enumerate() {
            match self.first_decl.get(ty.name.as_str()) {
                Some(&first) => self.collector.duplicate_definition(index, ty, first),
                None => {
                    self.first_decl.insert(ty.name.as_str(), index);
                }
            }
        }
    }

    fn check_basetypes(&mut self) {
        let types = self.types;
        let root = self.options.implicit_root();
        for (index, ty) in types.iter().enumerate() {
            let Some(base) = ty.basetype() else {
                continue;
            };
            if !self.first_decl.contains_key(base.as_str()) && root != Some(base.as_str()) {
                self.collector.undefined_basetype(index, ty, base);
            }
        }
    }

    /// Report each cycle closed by a back edge, over the same parent edges
    /// the resolver follows.
    fn check_cycles(&mut self) {
        let table = parent_table(self.types, &self.options);
        let mut marks: FxHashMap<&str, Visit> = FxHashMap::default();

        for start in table.keys() {
            if marks.contains_key(start.as_str()) {
                continue;
            }
            marks.insert(start.as_str(), Visit::OnStack(0));
            let mut stack: Vec<(&Name, usize)> = vec![(start, 0)];

            while let Some((name, next)) = stack.last_mut() {
                let name: &Name = *name;
                let parents = table.get(name).map(Vec::as_slice).unwrap_or_default();
                let Some(parent) = parents.get(*next) else {
                    marks.insert(name.as_str(), Visit::Done);
                    stack.pop();
                    continue;
                };
                *next += 1;

                match marks.get(parent.as_str()).copied() {
                    Some(Visit::Done) => {}
                    Some(Visit::OnStack(depth)) => {
                        let mut path: Vec<Name> = stack[depth..].iter().map(|(n, _)| Name::clone(n)).collect();
                        path.push(parent.clone());
                        let at = self.first_decl.get(path[0].as_str()).copied().unwrap_or_default();
                        self.collector.circular_hierarchy(at, &path);
                    }
                    None => {
                        marks.insert(parent.as_str(), Visit::OnStack(stack.len()));
                        stack.push((parent, 0));
                    }
                }
            }
        }
    }

    /// Get the collected diagnostics.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.collector.diagnostics
    }
}

/// Check a type list and return every diagnostic.
pub fn check_types(types: &[Type]) -> Vec<Diagnostic> {
    check_types_with(types, &HierarchyOptions::default())
}

/// Check a type list as `set_supertypes_with(.., options)` would see it.
#[tracing::instrument(level = "debug", skip_all, fields(types = types.len()))]
pub fn check_types_with(types: &[Type], options: &HierarchyOptions) -> Vec<Diagnostic> {
    let mut checker = HierarchyChecker::with_options(types, options);
    checker.check();
    let diagnostics = checker.finish();
    tracing::debug!(count = diagnostics.len(), "type check complete");
    diagnostics
}
