//! Declared PDDL types.

use std::fmt;

use crate::base::Name;

/// A declared type with an optional immediate parent.
///
/// `supertype_names` stays unset until [`set_supertypes`] runs over the
/// declaring type list; afterwards it holds every strict ancestor.
///
/// [`set_supertypes`]: super::set_supertypes
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Type {
    /// The unique type name.
    pub name: Name,
    /// The immediate parent, `None` for root types.
    pub basetype_name: Option<Name>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    supertype_names: Option<Vec<Name>>,
}

impl Type {
    /// Create a root type.
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            basetype_name: None,
            supertype_names: None,
        }
    }

    /// Create a type deriving from `basetype`.
    ///
    /// An empty basetype name means no parent.
    pub fn with_basetype(name: impl Into<Name>, basetype: impl Into<Name>) -> Self {
        let basetype: Name = basetype.into();
        Self {
            name: name.into(),
            basetype_name: Some(basetype).filter(|b| !b.is_empty()),
            supertype_names: None,
        }
    }

    /// The immediate parent, treating an empty name as none.
    pub fn basetype(&self) -> Option<&Name> {
        self.basetype_name.as_ref().filter(|b| !b.is_empty())
    }

    /// Strict ancestors of this type, sorted by name.
    ///
    /// Empty for root types and for types that have not been resolved yet;
    /// use [`Type::is_resolved`] to tell the two apart.
    pub fn supertype_names(&self) -> &[Name] {
        self.supertype_names.as_deref().unwrap_or_default()
    }

    /// Whether the resolver has populated the ancestor list.
    pub fn is_resolved(&self) -> bool {
        self.supertype_names.is_some()
    }

    /// Check whether `name` is a strict ancestor of this type.
    pub fn has_supertype(&self, name: &str) -> bool {
        self.supertype_names().iter().any(|s| s == name)
    }

    pub(crate) fn set_supertype_names(&mut self, names: Vec<Name>) {
        self.supertype_names = Some(names);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.basetype() {
            Some(base) => write!(f, "Type({}, {})", self.name, base),
            None => write!(f, "Type({}, None)", self.name),
        }
    }
}
