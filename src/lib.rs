//! # pddl-types
//!
//! Type layer of a PDDL/FSTRIPS domain model.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir   → Types, supertype closure, typed objects, diagnostics
//!   ↓
//! base  → Primitives (Name, fresh-name probing)
//! ```
//!
//! ## Example
//!
//! ```
//! use pddl_types::{Type, set_supertypes};
//!
//! let mut types = vec![
//!     Type::new("object"),
//!     Type::with_basetype("vehicle", "object"),
//!     Type::with_basetype("truck", "vehicle"),
//! ];
//! set_supertypes(&mut types).unwrap();
//! assert_eq!(types[2].supertype_names(), ["object", "vehicle"]);
//! ```

/// Foundation types: Name, fresh-name probing
pub mod base;

/// Semantic model: types, hierarchy, objects
pub mod hir;

// Re-export commonly needed items
pub use base::Name;
pub use hir::{
    Atom, HierarchyError, HierarchyOptions, NamingScope, Type, TypeHierarchy, TypedObject,
    check_types, check_types_with, set_supertypes, set_supertypes_with,
};
