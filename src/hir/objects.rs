//! Typed objects and per-scope name uniquification.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

use super::atom::Atom;
use crate::base::{Name, fresh_name};

/// A named entity of a given type, e.g. a PDDL object constant.
///
/// Equality and hashing cover both the name and the type.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypedObject {
    /// The object name.
    pub name: Name,
    /// The name of the object's type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: Name,
}

impl TypedObject {
    /// Create a typed object.
    pub fn new(name: impl Into<Name>, ty: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Make this object's name unique within `type_map`.
    ///
    /// If the name is free it is registered and `self` is returned as is.
    /// Otherwise the first free `name1`, `name2`, ... is registered, the
    /// renaming is recorded in `renamings`, and a renamed copy is returned.
    ///
    /// Any existing entry triggers a rename, even one with the same type.
    pub fn uniquify_name<'a>(
        &'a self,
        type_map: &mut IndexMap<Name, Name>,
        renamings: &mut IndexMap<Name, Name>,
    ) -> Cow<'a, TypedObject> {
        if !type_map.contains_key(&self.name) {
            type_map.insert(self.name.clone(), self.ty.clone());
            return Cow::Borrowed(self);
        }

        let (new_name, _) = fresh_name(&self.name, |candidate| type_map.contains_key(candidate));
        tracing::trace!(from = %self.name, to = %new_name, "renamed colliding object");
        renamings.insert(self.name.clone(), new_name.clone());
        type_map.insert(new_name.clone(), self.ty.clone());
        Cow::Owned(TypedObject::new(new_name, self.ty.clone()))
    }

    /// The unary atom asserting this object's type, e.g. `truck(t1)`.
    pub fn to_untyped_strips(&self) -> Atom {
        Atom::new(self.ty.clone(), [self.name.clone()])
    }
}

impl fmt::Display for TypedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

impl fmt::Debug for TypedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TypedObject {}: {}>", self.name, self.ty)
    }
}

/// The naming state of one uniquification pass.
///
/// Owns the name → type map and the old → new renamings. Create one per
/// scope being built and drop it when the pass is over.
#[derive(Clone, Debug, Default)]
pub struct NamingScope {
    type_map: IndexMap<Name, Name>,
    renamings: IndexMap<Name, Name>,
}

impl NamingScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniquify one object against this scope.
    pub fn uniquify<'a>(&mut self, object: &'a TypedObject) -> Cow<'a, TypedObject> {
        object.uniquify_name(&mut self.type_map, &mut self.renamings)
    }

    /// Uniquify a sequence of objects in order, returning the final objects.
    pub fn uniquify_all<'a>(
        &mut self,
        objects: impl IntoIterator<Item = &'a TypedObject>,
    ) -> Vec<TypedObject> {
        objects
            .into_iter()
            .map(|object| self.uniquify(object).into_owned())
            .collect()
    }

    /// The type registered under `name`.
    pub fn type_of(&self, name: &str) -> Option<&Name> {
        self.type_map.get(name)
    }

    /// The name an object was last renamed to.
    pub fn renamed(&self, old_name: &str) -> Option<&Name> {
        self.renamings.get(old_name)
    }

    /// Name → type map, in registration order.
    pub fn type_map(&self) -> &IndexMap<Name, Name> {
        &self.type_map
    }

    /// Old → new renamings, in the order they were first made.
    pub fn renamings(&self) -> &IndexMap<Name, Name> {
        &self.renamings
    }

    /// Consume the scope, returning the type map and renamings.
    pub fn into_parts(self) -> (IndexMap<Name, Name>, IndexMap<Name, Name>) {
        (self.type_map, self.renamings)
    }
}
