//! Supertype resolution — transitive closure of the basetype relation.
//!
//! The basetype edges form a forest (or, with duplicate declarations, a DAG).
//! Resolution walks it depth-first from every declared type, memoising the
//! ancestor set of each name:
//!
//! ```text
//! ancestors(t) = ⋃ { {p} ∪ ancestors(p) | p parent of t }
//! ```
//!
//! Each name is expanded exactly once. The walk keeps its own frame stack
//! instead of recursing, so hierarchy depth is bounded by memory, not by the
//! thread stack. A name reached again while it is still being expanded
//! closes a cycle, which is reported as [`HierarchyError::Cycle`].
//!
//! Ancestor lists are emitted sorted by name.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::error::HierarchyError;
use super::objects::TypedObject;
use super::options::HierarchyOptions;
use super::types::Type;
use crate::base::Name;

// ============================================================================
// RESOLUTION
// ============================================================================

/// Populate `supertype_names` on every type in `types`.
///
/// Uses [`HierarchyOptions::default`], i.e. no implicit root.
pub fn set_supertypes(types: &mut [Type]) -> Result<(), HierarchyError> {
    set_supertypes_with(types, &HierarchyOptions::default())
}

/// Populate `supertype_names` on every type in `types` using `options`.
///
/// The closure is computed completely before any type is touched, so on
/// error every `Type` keeps whatever ancestor list it had before the call.
#[tracing::instrument(level = "debug", skip_all, fields(types = types.len()))]
pub fn set_supertypes_with(
    types: &mut [Type],
    options: &HierarchyOptions,
) -> Result<(), HierarchyError> {
    let mut closure = Closure::compute(types, options)?;

    // Duplicate declarations share one list; the last of them takes it.
    let mut pending: FxHashMap<Name, usize> = FxHashMap::default();
    for ty in types.iter() {
        *pending.entry(ty.name.clone()).or_default() += 1;
    }

    for ty in types.iter_mut() {
        let left = pending
            .get_mut(&ty.name)
            .map(|n| {
                *n -= 1;
                *n
            })
            .unwrap_or(0);
        let ancestors = match closure.ancestors.get_mut(&ty.name) {
            Some(list) if left == 0 => std::mem::take(list),
            Some(list) => list.clone(),
            None => Vec::new(),
        };
        tracing::trace!(ty = %ty.name, ancestors = ancestors.len(), "resolved supertypes");
        ty.set_supertype_names(ancestors);
    }

    Ok(())
}

/// Parent edges and resolved ancestors for every known type name.
struct Closure {
    /// Name → immediate parents, in declaration order.
    parents: IndexMap<Name, Vec<Name>>,
    /// Name → strict ancestors, sorted.
    ancestors: IndexMap<Name, Vec<Name>>,
}

impl Closure {
    fn compute(types: &[Type], options: &HierarchyOptions) -> Result<Self, HierarchyError> {
        let parents = collect_parents(types, options)?;
        let edge_count: usize = parents.values().map(Vec::len).sum();
        tracing::debug!(nodes = parents.len(), edges = edge_count, "computing type closure");

        let mut walk = Walk {
            parents: &parents,
            marks: FxHashMap::default(),
            memo: FxHashMap::default(),
            stack: Vec::new(),
        };
        for name in parents.keys() {
            walk.visit(name)?;
        }

        let Walk { mut memo, .. } = walk;
        let ancestors: IndexMap<Name, Vec<Name>> = parents
            .keys()
            .map(|name| (name.clone(), memo.remove(name).unwrap_or_default()))
            .collect();

        Ok(Self { parents, ancestors })
    }
}

/// Build the name → parents table for `types`.
///
/// Every declaration of a name contributes its basetype. Parentless types
/// get the implicit root when one is configured, and the root itself is
/// always present as a key. Basetypes are not checked against the keys.
pub(crate) fn parent_table(types: &[Type], options: &HierarchyOptions) -> IndexMap<Name, Vec<Name>> {
    let root = options.implicit_root.as_ref().filter(|r| !r.is_empty());
    let mut parents: IndexMap<Name, Vec<Name>> = IndexMap::new();

    for ty in types {
        let entry = parents.entry(ty.name.clone()).or_default();
        let parent = match (ty.basetype(), root) {
            (Some(base), _) => Some(base),
            (None, Some(root)) if *root != ty.name => Some(root),
            (None, _) => None,
        };
        if let Some(parent) = parent {
            if !entry.contains(parent) {
                entry.push(parent.clone());
            }
        }
    }
    if let Some(root) = root {
        parents.entry(root.clone()).or_default();
    }

    parents
}

/// Build the parent table and reject dangling basetypes.
fn collect_parents(
    types: &[Type],
    options: &HierarchyOptions,
) -> Result<IndexMap<Name, Vec<Name>>, HierarchyError> {
    let parents = parent_table(types, options);

    for ty in types {
        let Some(base) = ty.basetype() else {
            continue;
        };
        if !parents.contains_key(base) {
            return Err(HierarchyError::DanglingBasetype {
                ty: ty.name.clone(),
                basetype: base.clone(),
            });
        }
    }

    Ok(parents)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the frame stack at this depth.
    InProgress(usize),
    Done,
}

/// Memoised depth-first expansion of the parent table.
struct Walk<'a> {
    parents: &'a IndexMap<Name, Vec<Name>>,
    marks: FxHashMap<Name, Mark>,
    memo: FxHashMap<Name, Vec<Name>>,
    /// Frames being expanded, outermost first: name and next parent index.
    stack: Vec<(Name, usize)>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, start: &Name) -> Result<(), HierarchyError> {
        if self.marks.contains_key(start) {
            return Ok(());
        }
        self.enter(start);

        let table = self.parents;
        while let Some((name, next)) = self.stack.last_mut() {
            let parents: &'a [Name] = table.get(&*name).map(Vec::as_slice).unwrap_or_default();

            if let Some(parent) = parents.get(*next) {
                *next += 1;
                match self.marks.get(parent).copied() {
                    Some(Mark::Done) => {}
                    Some(Mark::InProgress(depth)) => return Err(self.cycle_error(depth, parent)),
                    None => self.enter(parent),
                }
                continue;
            }

            let name = name.clone();
            let ancestors = self.inherit(parents);
            self.stack.pop();
            self.marks.insert(name.clone(), Mark::Done);
            self.memo.insert(name, ancestors);
        }

        Ok(())
    }

    fn enter(&mut self, name: &Name) {
        self.marks.insert(name.clone(), Mark::InProgress(self.stack.len()));
        self.stack.push((name.clone(), 0));
    }

    /// Sorted union of every parent and its memoised ancestors.
    fn inherit(&self, parents: &[Name]) -> Vec<Name> {
        match parents {
            [] => Vec::new(),
            [parent] => {
                let mut acc = self.memo.get(parent).cloned().unwrap_or_default();
                if let Err(pos) = acc.binary_search(parent) {
                    acc.insert(pos, parent.clone());
                }
                acc
            }
            _ => {
                let mut acc = BTreeSet::new();
                for parent in parents {
                    acc.insert(parent.clone());
                    if let Some(inherited) = self.memo.get(parent) {
                        acc.extend(inherited.iter().cloned());
                    }
                }
                acc.into_iter().collect()
            }
        }
    }

    fn cycle_error(&self, depth: usize, name: &Name) -> HierarchyError {
        let mut path: Vec<Name> = self.stack[depth..].iter().map(|(n, _)| n.clone()).collect();
        path.push(name.clone());
        HierarchyError::Cycle { path }
    }
}

// ============================================================================
// QUERIES
// ============================================================================

/// A resolved, read-only view of a type hierarchy.
///
/// Built from a declaration list without modifying it. Answers subtype
/// questions such as "is an object of type `truck` also a `vehicle`".
#[derive(Clone, Debug, Default)]
pub struct TypeHierarchy {
    parents: IndexMap<Name, Vec<Name>>,
    ancestors: IndexMap<Name, Vec<Name>>,
}

impl TypeHierarchy {
    /// Resolve `types` with default options.
    pub fn from_types(types: &[Type]) -> Result<Self, HierarchyError> {
        Self::from_types_with(types, &HierarchyOptions::default())
    }

    /// Resolve `types` with `options`.
    #[tracing::instrument(level = "debug", skip_all, fields(types = types.len()))]
    pub fn from_types_with(types: &[Type], options: &HierarchyOptions) -> Result<Self, HierarchyError> {
        let Closure { parents, ancestors } = Closure::compute(types, options)?;
        Ok(Self { parents, ancestors })
    }

    /// Strict ancestors of `name`, sorted. `None` if the type is unknown.
    pub fn supertypes(&self, name: &str) -> Option<&[Name]> {
        self.ancestors.get(name).map(Vec::as_slice)
    }

    /// Immediate parents of `name`. `None` if the type is unknown.
    pub fn parents(&self, name: &str) -> Option<&[Name]> {
        self.parents.get(name).map(Vec::as_slice)
    }

    /// Reflexive subtype test: every known type is a subtype of itself.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return self.contains(sub);
        }
        self.supertypes(sub)
            .is_some_and(|ancestors| ancestors.binary_search_by(|n| n.as_str().cmp(sup)).is_ok())
    }

    /// Check whether `object` can be used where type `ty` is expected.
    pub fn is_instance_of(&self, object: &TypedObject, ty: &str) -> bool {
        self.is_subtype(&object.ty, ty)
    }

    /// Types declaring `name` as an immediate parent, in declaration order.
    pub fn direct_subtypes(&self, name: &str) -> Vec<&Name> {
        self.parents
            .iter()
            .filter(|(_, parents)| parents.iter().any(|p| p == name))
            .map(|(child, _)| child)
            .collect()
    }

    /// All strict descendants of `name`, in declaration order.
    pub fn subtypes(&self, name: &str) -> Vec<&Name> {
        self.ancestors
            .iter()
            .filter(|(_, ancestors)| ancestors.binary_search_by(|n| n.as_str().cmp(name)).is_ok())
            .map(|(child, _)| child)
            .collect()
    }

    /// Types without a parent, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &Name> {
        self.parents
            .iter()
            .filter(|(_, parents)| parents.is_empty())
            .map(|(name, _)| name)
    }

    /// Iterate over every type and its ancestors, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &[Name])> {
        self.ancestors.iter().map(|(name, a)| (name, a.as_slice()))
    }

    /// Check if a type is known.
    pub fn contains(&self, name: &str) -> bool {
        self.ancestors.contains_key(name)
    }

    /// Number of distinct type names.
    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    /// Check if the hierarchy is empty.
    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(types: &[Type], name: &str) -> Vec<String> {
        types
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.supertype_names().iter().map(|n| n.to_string()).collect())
            .unwrap_or_default()
    }

    fn chain() -> Vec<Type> {
        vec![
            Type::with_basetype("a", "b"),
            Type::with_basetype("b", "c"),
            Type::new("c"),
        ]
    }

    #[test]
    fn test_chain_closure() {
        let mut types = chain();
        set_supertypes(&mut types).unwrap();

        assert_eq!(names(&types, "a"), ["b", "c"]);
        assert_eq!(names(&types, "b"), ["c"]);
        assert!(names(&types, "c").is_empty());
        assert!(types.iter().all(Type::is_resolved));
    }

    #[test]
    fn test_forest_does_not_mix() {
        let mut types = vec![
            Type::with_basetype("a", "b"),
            Type::new("b"),
            Type::with_basetype("x", "y"),
            Type::new("y"),
        ];
        set_supertypes(&mut types).unwrap();

        assert_eq!(names(&types, "a"), ["b"]);
        assert_eq!(names(&types, "x"), ["y"]);
    }

    #[test]
    fn test_diamond() {
        let mut types = vec![
            Type::new("d"),
            Type::with_basetype("b", "d"),
            Type::with_basetype("c", "d"),
            Type::with_basetype("a", "b"),
            Type::with_basetype("a2", "c"),
        ];
        set_supertypes(&mut types).unwrap();

        assert_eq!(names(&types, "a"), ["b", "d"]);
        assert_eq!(names(&types, "a2"), ["c", "d"]);
        assert!(names(&types, "d").is_empty());
    }

    #[test]
    fn test_ancestors_sorted_by_name() {
        let mut types = vec![
            Type::with_basetype("truck", "vehicle"),
            Type::with_basetype("vehicle", "locatable"),
            Type::with_basetype("locatable", "object"),
            Type::new("object"),
        ];
        set_supertypes(&mut types).unwrap();

        assert_eq!(names(&types, "truck"), ["locatable", "object", "vehicle"]);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut types = chain();
        set_supertypes(&mut types).unwrap();
        let first: Vec<_> = types.iter().map(|t| t.supertype_names().to_vec()).collect();

        set_supertypes(&mut types).unwrap();
        let second: Vec<_> = types.iter().map(|t| t.supertype_names().to_vec()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_dangling_basetype_fails_without_mutation() {
        let mut types = vec![Type::with_basetype("truck", "vehicle"), Type::new("object")];
        let err = set_supertypes(&mut types).unwrap_err();

        assert_eq!(
            err,
            HierarchyError::DanglingBasetype {
                ty: Name::new("truck"),
                basetype: Name::new("vehicle"),
            }
        );
        assert!(types.iter().all(|t| !t.is_resolved()));
    }

    #[test]
    fn test_error_keeps_previous_resolution() {
        let mut types = chain();
        set_supertypes(&mut types).unwrap();

        types[2].basetype_name = Some(Name::new("a"));
        let err = set_supertypes(&mut types).unwrap_err();

        assert!(matches!(err, HierarchyError::Cycle { .. }));
        assert_eq!(names(&types, "a"), ["b", "c"]);
    }

    #[test]
    fn test_cycle_path() {
        let mut types = vec![
            Type::with_basetype("a", "b"),
            Type::with_basetype("b", "c"),
            Type::with_basetype("c", "a"),
        ];
        let err = set_supertypes(&mut types).unwrap_err();

        let HierarchyError::Cycle { path } = err else {
            panic!("expected cycle, got {err:?}");
        };
        assert_eq!(path, ["a", "b", "c", "a"]);
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let mut types = vec![Type::with_basetype("a", "a")];
        let err = set_supertypes(&mut types).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::Cycle {
                path: vec![Name::new("a"), Name::new("a")]
            }
        );
    }

    #[test]
    fn test_duplicate_declarations_share_ancestors() {
        let mut types = vec![
            Type::new("object"),
            Type::with_basetype("truck", "object"),
            Type::with_basetype("truck", "object"),
        ];
        set_supertypes(&mut types).unwrap();

        assert_eq!(types[1].supertype_names(), types[2].supertype_names());
        assert_eq!(types[1].supertype_names(), ["object"]);
    }

    #[test]
    fn test_duplicate_declaration_closing_cycle() {
        let mut types = vec![
            Type::with_basetype("a", "b"),
            Type::new("b"),
            Type::with_basetype("a", "c"),
            Type::with_basetype("c", "a"),
        ];
        let err = set_supertypes(&mut types).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::Cycle {
                path: vec![Name::new("a"), Name::new("c"), Name::new("a")]
            }
        );
    }

    #[test]
    fn test_deep_chain_on_small_stack() {
        const DEPTH: usize = 2_000;
        // A recursive walk needs far more than 256 KiB at this depth.
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let types: Vec<Type> = (0..DEPTH)
                    .map(|i| match i + 1 {
                        next if next == DEPTH => Type::new(format!("t{i}")),
                        next => Type::with_basetype(format!("t{i}"), format!("t{next}")),
                    })
                    .collect();
                TypeHierarchy::from_types(&types).map(|h| h.supertypes("t0").map(<[Name]>::len))
            })
            .unwrap();

        assert_eq!(handle.join().unwrap(), Ok(Some(DEPTH - 1)));
    }

    #[test]
    fn test_deep_cycle_reports_full_path() {
        const DEPTH: usize = 10_000;
        let types: Vec<Type> = (0..DEPTH)
            .map(|i| Type::with_basetype(format!("t{i}"), format!("t{}", (i + 1) % DEPTH)))
            .collect();

        let HierarchyError::Cycle { path } = TypeHierarchy::from_types(&types).unwrap_err() else {
            panic!("expected cycle");
        };
        assert_eq!(path.len(), DEPTH + 1);
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn test_empty_basetype_has_no_parent() {
        let mut root = Type::new("object");
        root.basetype_name = Some(Name::new(""));
        let mut types = vec![root, Type::with_basetype("truck", "object")];
        set_supertypes(&mut types).unwrap();

        assert!(names(&types, "object").is_empty());
        assert_eq!(names(&types, "truck"), ["object"]);
    }

    #[test]
    fn test_implicit_root() {
        let mut types = vec![
            Type::new("location"),
            Type::with_basetype("city", "location"),
            Type::new("vehicle"),
        ];
        set_supertypes_with(&mut types, &HierarchyOptions::pddl()).unwrap();

        assert_eq!(names(&types, "location"), ["object"]);
        assert_eq!(names(&types, "city"), ["location", "object"]);
        assert_eq!(names(&types, "vehicle"), ["object"]);
    }

    #[test]
    fn test_implicit_root_declared() {
        let mut types = vec![Type::new("object"), Type::new("truck")];
        set_supertypes_with(&mut types, &HierarchyOptions::pddl()).unwrap();

        assert!(names(&types, "object").is_empty());
        assert_eq!(names(&types, "truck"), ["object"]);
    }

    #[test]
    fn test_empty_input() {
        let mut types: Vec<Type> = Vec::new();
        set_supertypes(&mut types).unwrap();
        assert!(TypeHierarchy::from_types(&types).unwrap().is_empty());
    }

    #[test]
    fn test_hierarchy_queries() {
        let types = vec![
            Type::new("object"),
            Type::with_basetype("vehicle", "object"),
            Type::with_basetype("truck", "vehicle"),
            Type::with_basetype("plane", "vehicle"),
            Type::with_basetype("city", "object"),
        ];
        let h = TypeHierarchy::from_types(&types).unwrap();

        assert_eq!(h.len(), 5);
        assert!(h.is_subtype("truck", "vehicle"));
        assert!(h.is_subtype("truck", "object"));
        assert!(h.is_subtype("truck", "truck"));
        assert!(!h.is_subtype("vehicle", "truck"));
        assert!(!h.is_subtype("city", "vehicle"));
        assert!(!h.is_subtype("boat", "boat"));

        assert_eq!(h.direct_subtypes("vehicle"), ["truck", "plane"]);
        assert_eq!(h.subtypes("object"), ["vehicle", "truck", "plane", "city"]);
        assert_eq!(h.roots().collect::<Vec<_>>(), ["object"]);
        assert_eq!(h.parents("truck"), Some(&[Name::new("vehicle")][..]));
        assert_eq!(h.supertypes("boat"), None);
    }

    #[test]
    fn test_is_instance_of() {
        let types = vec![Type::new("vehicle"), Type::with_basetype("truck", "vehicle")];
        let h = TypeHierarchy::from_types(&types).unwrap();
        let t1 = TypedObject::new("t1", "truck");

        assert!(h.is_instance_of(&t1, "vehicle"));
        assert!(h.is_instance_of(&t1, "truck"));
        assert!(!h.is_instance_of(&TypedObject::new("v1", "vehicle"), "truck"));
    }
}
