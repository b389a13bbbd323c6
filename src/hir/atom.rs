//! Ground atoms — the value type shared by the object model and conditions.

use std::fmt;

use crate::base::Name;

/// An atomic predicate assertion such as `truck(t1)`.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    /// The predicate symbol.
    pub predicate: Name,
    /// Arguments in positional order.
    pub args: Vec<Name>,
}

impl Atom {
    /// Create an atom.
    pub fn new(predicate: impl Into<Name>, args: impl IntoIterator<Item = impl Into<Name>>) -> Self {
        Self {
            predicate: predicate.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(arg)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Atom {}>", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_display() {
        let atom = Atom::new("at", ["t1", "depot"]);
        assert_eq!(atom.to_string(), "at(t1, depot)");
        assert_eq!(atom.arity(), 2);
    }

    #[test]
    fn test_nullary_atom() {
        let atom = Atom::new("handempty", std::iter::empty::<&str>());
        assert_eq!(atom.to_string(), "handempty()");
        assert_eq!(format!("{:?}", atom), "<Atom handempty()>");
    }
}
