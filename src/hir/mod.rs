//! Semantic model of PDDL types and typed objects.
//!
//! - [`Type`] and [`set_supertypes`] - declarations and ancestor closure
//! - [`TypeHierarchy`] - read-only subtype queries
//! - [`TypedObject`] and [`NamingScope`] - objects and name uniquification
//! - [`Atom`] - unary type atoms produced from objects
//! - [`check_types`] - report every problem in a declaration list

mod atom;
mod diagnostics;
mod error;
mod hierarchy;
mod objects;
mod options;
mod types;

pub use atom::Atom;
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, HierarchyChecker, Severity, check_types, check_types_with, codes,
};
pub use error::HierarchyError;
pub use hierarchy::{TypeHierarchy, set_supertypes, set_supertypes_with};
pub use objects::{NamingScope, TypedObject};
pub use options::HierarchyOptions;
pub use types::Type;
