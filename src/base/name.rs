//! Name primitives shared by the type and object models.

use smol_str::{SmolStr, format_smolstr};

/// An identifier for a type, object or predicate.
///
/// PDDL names are short, so `SmolStr` keeps nearly all of them inline
/// and makes clones cheap.
pub type Name = SmolStr;

/// Find the first `base1`, `base2`, ... for which `is_taken` returns false.
///
/// Returns the fresh name together with the counter that produced it.
/// The probe is unbounded; it terminates as soon as an unused suffix exists.
pub fn fresh_name(base: &str, mut is_taken: impl FnMut(&str) -> bool) -> (Name, u32) {
    let mut counter = 1u32;
    loop {
        let candidate = format_smolstr!("{base}{counter}");
        if !is_taken(&candidate) {
            return (candidate, counter);
        }
        counter += 1;
    }
}
