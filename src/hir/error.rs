//! Errors raised while resolving a type hierarchy.

use thiserror::Error;

use crate::base::Name;

/// Error type for supertype resolution.
///
/// Resolution is all-or-nothing: when one of these is returned, no
/// `Type` passed to the resolver has been modified.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// A type names a basetype that was never declared.
    #[error("type '{ty}' has undeclared basetype '{basetype}'")]
    DanglingBasetype {
        /// The declaring type.
        ty: Name,
        /// The missing parent.
        basetype: Name,
    },
    /// The basetype relation loops back on itself.
    ///
    /// `path` starts and ends with the same name, e.g. `[a, b, a]`.
    #[error("circular type hierarchy: {}", join_path(.path))]
    Cycle {
        /// The names along the cycle.
        path: Vec<Name>,
    },
}

impl HierarchyError {
    /// The type the error is reported against.
    pub fn subject(&self) -> &str {
        match self {
            HierarchyError::DanglingBasetype { ty, .. } => ty,
            HierarchyError::Cycle { path } => path.first().map(Name::as_str).unwrap_or_default(),
        }
    }
}

fn join_path(path: &[Name]) -> String {
    path.iter().map(Name::as_str).collect::<Vec<_>>().join(" -> ")
}
