//! A formula paired with a sign denoting a semantic commitment.

use std::fmt;

use crate::formula::{Arena, FormulaId};
use crate::sign::Sign;

/// A sign paired with a formula identifier.
///
/// `SignedFormula` is `Copy` because both `S: Sign` and `FormulaId` are `Copy`; this is what
/// makes appending to a branch, inserting into a processed-set, and cloning a branch's signed
/// formula list all cheap, regardless of how large the underlying formula tree is (it lives once
/// in the [`Arena`], not in the branch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedFormula<S: Sign> {
    pub sign: S,
    pub formula: FormulaId,
}

impl<S: Sign> SignedFormula<S> {
    pub fn new(sign: S, formula: FormulaId) -> Self {
        Self { sign, formula }
    }

    /// Two signed formulas contradict iff their formulas are equal and their signs contradict.
    /// Because formulas are hash-consed, "formulas are equal" is just `==` on
    /// [`FormulaId`].
    pub fn contradicts(self, other: Self) -> bool {
        self.formula == other.formula && self.sign.contradicts(other.sign)
    }

    pub fn display(self, arena: &Arena) -> String {
        format!("{}:{}", self.sign, arena.display_formula(self.formula))
    }
}

impl<S: Sign> fmt::Display for SignedFormula<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:#{}", self.sign, self.formula)
    }
}
