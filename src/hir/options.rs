//! Resolver configuration.

use crate::base::Name;

/// Options controlling supertype resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HierarchyOptions {
    /// Type that every parentless type implicitly derives from.
    ///
    /// PDDL domains use `object` here. The root need not be declared in
    /// the type list; it is always a valid basetype when set.
    pub implicit_root: Option<Name>,
}

impl HierarchyOptions {
    /// Create options with no implicit root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options using the conventional PDDL `object` root.
    pub fn pddl() -> Self {
        Self::new().with_implicit_root("object")
    }

    /// Set the implicit root type.
    pub fn with_implicit_root(mut self, root: impl Into<Name>) -> Self {
        self.implicit_root = Some(root.into());
        self
    }

    /// The implicit root, if configured.
    pub fn implicit_root(&self) -> Option<&str> {
        self.implicit_root.as_deref()
    }

    /// Load options from a JSON document.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
