//! Per-logic sign systems.
//!
//! A sign system is a small, closed enum plus a `contradicts` predicate. The engine never
//! inspects sign identity directly — it only ever calls [`Sign::contradicts`] — so adding a new
//! logic is purely a matter of registering a new [`Sign`] implementation, a new
//! [`crate::rule::RuleRegistry`], and (if its model shape differs) a new extractor in
//! [`crate::model`]. This gets rule dispatch across logics without an inheritance hierarchy:
//! instead of a sign base class, each logic gets its own small `Copy` enum and the engine is
//! generic over it.

use std::fmt;
use std::hash::Hash;

/// A finite, per-logic set of signs with a symmetric, reflexive-free contradiction relation.
pub trait Sign: fmt::Debug + fmt::Display + Copy + Eq + Hash + 'static {
    /// Returns whether `self` and `other`, asserted of the same formula, are contradictory.
    ///
    /// Implementations must be symmetric (`a.contradicts(b) == b.contradicts(a)`) and must never
    /// return `true` for `a.contradicts(a)` unless a sign can contradict itself by definition of
    /// the logic (none of the four required logics do).
    fn contradicts(self, other: Self) -> bool;
}

/// Classical Propositional Logic's two signs: `T` contradicts `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CplSign {
    T,
    F,
}

impl Sign for CplSign {
    fn contradicts(self, other: Self) -> bool {
        matches!((self, other), (CplSign::T, CplSign::F) | (CplSign::F, CplSign::T))
    }
}

impl fmt::Display for CplSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if *self == CplSign::T { "T" } else { "F" })
    }
}

/// Weak Kleene three-valued logic's signs: only `T3` and `F3` contradict; `U` never
/// contradicts anything (it represents "undefined", which is never inconsistent with any
/// commitment under weak-Kleene semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wk3Sign {
    T3,
    F3,
    U,
}

impl Sign for Wk3Sign {
    fn contradicts(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Wk3Sign::T3, Wk3Sign::F3) | (Wk3Sign::F3, Wk3Sign::T3)
        )
    }
}

impl fmt::Display for Wk3Sign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Wk3Sign::T3 => "T3",
            Wk3Sign::F3 => "F3",
            Wk3Sign::U => "U",
        };
        write!(f, "{label}")
    }
}

/// Ferguson's wKrQ four-signed epistemic logic's signs: only `T` contradicts `F`; `M`
/// ("may be true") and `N` ("need not be true") express epistemic possibility and are pairwise
/// non-contradictory with every other sign, including each other — `M:p` and `N:p` coexisting on
/// the same open branch is the point of the logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WkrqSign {
    T,
    F,
    M,
    N,
}

impl Sign for WkrqSign {
    fn contradicts(self, other: Self) -> bool {
        matches!(
            (self, other),
            (WkrqSign::T, WkrqSign::F) | (WkrqSign::F, WkrqSign::T)
        )
    }
}

impl fmt::Display for WkrqSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            WkrqSign::T => "T",
            WkrqSign::F => "F",
            WkrqSign::M => "M",
            WkrqSign::N => "N",
        };
        write!(f, "{label}")
    }
}

/// First-Degree Entailment's signs.
///
/// No pair of FDE signs contradicts: FDE is paraconsistent by design, so `B` ("both true and
/// false") asserted alongside `T` or `F` for the same formula is not itself a defect of the
/// branch. This crate resolves FDE's open design question (recorded in DESIGN.md) by declaring it
/// *never-closing* via the ordinary pairwise path; [`WkrqSign::contradicts`]-style closure
/// therefore never fires for FDE, and a branch's only route to closure would be a designated
/// auxiliary rule producing an explicit inconsistency marker, which this implementation does not
/// populate for any of the four connectives (no FDE rule is defined that needs one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FdeSign {
    T,
    F,
    B,
    N,
}

impl Sign for FdeSign {
    fn contradicts(self, _other: Self) -> bool {
        false
    }
}

impl fmt::Display for FdeSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            FdeSign::T => "T",
            FdeSign::F => "F",
            FdeSign::B => "B",
            FdeSign::N => "N",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpl_t_and_f_contradict_symmetrically() {
        assert!(CplSign::T.contradicts(CplSign::F));
        assert!(CplSign::F.contradicts(CplSign::T));
        assert!(!CplSign::T.contradicts(CplSign::T));
    }

    #[test]
    fn wk3_u_never_contradicts() {
        assert!(!Wk3Sign::U.contradicts(Wk3Sign::T3));
        assert!(!Wk3Sign::U.contradicts(Wk3Sign::F3));
        assert!(!Wk3Sign::U.contradicts(Wk3Sign::U));
        assert!(Wk3Sign::T3.contradicts(Wk3Sign::F3));
    }

    #[test]
    fn wkrq_m_and_n_never_contradict_anything() {
        assert!(!WkrqSign::M.contradicts(WkrqSign::N));
        assert!(!WkrqSign::M.contradicts(WkrqSign::T));
        assert!(!WkrqSign::N.contradicts(WkrqSign::F));
        assert!(WkrqSign::T.contradicts(WkrqSign::F));
    }

    #[test]
    fn fde_signs_never_contradict() {
        assert!(!FdeSign::T.contradicts(FdeSign::F));
        assert!(!FdeSign::B.contradicts(FdeSign::N));
    }
}
