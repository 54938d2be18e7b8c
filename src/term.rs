//! First-order terms.

use std::fmt;

/// Identifier type for terms, serving as an index into [`crate::formula::Arena::terms`].
///
/// Opaque outside this crate, like [`crate::formula::FormulaId`].
pub type TermId = usize;

/// A first-order term.
///
/// Only [`Term::Constant`] and [`Term::Variable`] are required by a minimal first-order surface;
/// [`Term::Function`] is an extension, included here because `Term` already needs to recurse
/// structurally for [`crate::formula::FormulaNode::Predicate`] argument lists, so there is no
/// implementation cost saved by omitting it.
///
/// Equality is structural: two terms compare equal iff they are the same variant with equal
/// contents (recursively, for [`Term::Function`]).
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub(crate) enum Term {
    /// A constant (an individual of the domain), identified by name.
    Constant(String),

    /// A variable bound by a restricted quantifier, identified by name.
    Variable(String),

    /// A function term applied to argument terms.
    Function(String, Vec<TermId>),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Constant(name) | Term::Variable(name) => write!(f, "{name}"),
            Term::Function(name, _) => write!(f, "{name}(..)"),
        }
    }
}
