//! Property-based checks of the supertype closure over generated forests.
//!
//! Forests are generated as a parent index per type that always points at
//! an earlier type, so the input is acyclic by construction. Declarations
//! are then shuffled to make sure resolution does not depend on order.
#![cfg(feature = "proptest")]

use std::collections::BTreeSet;

use proptest::prelude::*;
use pddl_types::{Name, Type, TypeHierarchy, set_supertypes};

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Strategy for an acyclic type list of up to 24 types.
fn arb_forest() -> impl Strategy<Value = Vec<Type>> {
    proptest::collection::vec(any::<prop::sample::Index>(), 1..24)
        .prop_map(|picks| {
            picks
                .iter()
                .enumerate()
                .map(|(i, pick)| {
                    let name = format!("t{i}");
                    // Roughly a third of types are roots.
                    if i == 0 || pick.index(3) == 0 {
                        Type::new(name)
                    } else {
                        Type::with_basetype(name, format!("t{}", pick.index(i)))
                    }
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

/// Ancestors by following basetype links one at a time.
fn walk_ancestors(types: &[Type], name: &str) -> BTreeSet<Name> {
    let mut out = BTreeSet::new();
    let mut current = types.iter().find(|t| t.name == name).and_then(|t| t.basetype_name.clone());
    while let Some(parent) = current {
        current = types.iter().find(|t| t.name == parent).and_then(|t| t.basetype_name.clone());
        out.insert(parent);
    }
    out
}

proptest! {
    #[test]
    fn closure_equals_parent_walk(mut types in arb_forest()) {
        let reference = types.clone();
        set_supertypes(&mut types).map_err(|e| TestCaseError::Fail(e.to_string().into()))?;

        for ty in &types {
            let expected: Vec<Name> = walk_ancestors(&reference, &ty.name).into_iter().collect();
            prop_assert_eq!(ty.supertype_names(), expected.as_slice());
            prop_assert!(!ty.has_supertype(&ty.name));
        }
    }

    #[test]
    fn subtype_relation_is_reflexive_and_transitive(types in arb_forest()) {
        let h = TypeHierarchy::from_types(&types).map_err(|e| TestCaseError::Fail(e.to_string().into()))?;

        for (a, supers) in h.iter() {
            prop_assert!(h.is_subtype(a, a));
            for b in supers {
                prop_assert!(h.is_subtype(a, b));
                for c in h.supertypes(b).unwrap_or_default() {
                    prop_assert!(h.is_subtype(a, c));
                }
            }
        }
    }
}
