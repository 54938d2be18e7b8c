//! A per-logic table of expansion rules keyed by (sign, connective).
//!
//! A rule is a value, not a function with side effects: it pairs an applicability predicate with
//! an expansion function, both plain `fn` pointers, so the registry itself stays `Clone`-free data
//! that can be built once and shared read-only across engine runs.
//!
//! This module is the registration surface spec.md §6 item 3 asks for: a caller that wants a
//! fifth logic builds its own [`Sign`] implementation (already public), assembles a
//! [`RuleRegistry`] of [`Rule`]s for it with [`RuleRegistry::register`], and hands the result to
//! [`crate::engine::Engine::new`] to get a working, statically-typed [`crate::engine::Engine`] —
//! without touching anything in this crate. See `DESIGN.md` for why this is a typed constructor
//! rather than the string-keyed `register(name, signs, contradiction_fn, rules)` free function
//! spec.md's prose literally names.

use crate::formula::{Arena, FormulaId};
use crate::sign::Sign;
use crate::signed_formula::SignedFormula;

/// Priority bands controlling expansion order. Lower fires first.
pub mod priority {
    /// Immediate simplifications (e.g. double negation).
    pub const IMMEDIATE: u8 = 0;
    /// α-rules: linear, extend the current branch.
    pub const ALPHA: u8 = 1;
    /// Negation/duality rules.
    pub const NEGATION: u8 = 2;
    /// β-rules: branching, replace the current branch with k > 1 children.
    pub const BETA: u8 = 3;
    /// Reserved for quantifier and other expensive rules.
    pub const QUANTIFIER: u8 = 4;
}

/// Grants a rule's expansion function access to the branch-scoped state a quantifier rule needs:
/// a fresh-constant supply and the current constant domain.
///
/// This is deliberately not part of [`Rule::expand`]'s signature as a concrete type, so that
/// propositional rule sets (CPL) never need to know this trait exists; only the wKrQ quantifier
/// rules call into it. A custom logic with its own quantifier-like rules implements this on
/// whatever scoped state it needs; [`crate::branch::Branch`] is the implementation the built-in
/// logics use.
pub trait QuantifierContext {
    /// Introduces and returns a fresh constant, scoped so it cannot collide with a constant
    /// introduced on any other branch.
    fn fresh_constant(&mut self, arena: &mut Arena) -> crate::term::TermId;

    /// Returns the branch's current constant domain (grows as existential rules fire).
    fn domain_constants(&self) -> Vec<crate::term::TermId>;
}

/// The result of applying a rule to a signed formula.
///
/// For an α-rule (`is_linear = true`), `branches` holds exactly one list, whose contents are all
/// appended to the triggering branch. For a β-rule, `branches` holds k ≥ 2 lists; the engine
/// replaces the triggering branch with k children, each inheriting the parent's signed formulas
/// plus one list's contents.
pub struct Expansion<S: Sign> {
    pub is_linear: bool,
    pub branches: Vec<Vec<SignedFormula<S>>>,
}

impl<S: Sign> Expansion<S> {
    pub fn alpha(formulas: Vec<SignedFormula<S>>) -> Self {
        Self {
            is_linear: true,
            branches: vec![formulas],
        }
    }

    pub fn beta(branches: Vec<Vec<SignedFormula<S>>>) -> Self {
        debug_assert!(branches.len() >= 2, "a β-rule must produce at least two branches");
        Self {
            is_linear: false,
            branches,
        }
    }
}

/// A single expansion rule: an applicability predicate, a priority, and an expansion function.
pub struct Rule<S: Sign> {
    /// Name used in step-log / statistics output; purely diagnostic.
    pub name: &'static str,
    pub priority: u8,
    pub applies: fn(SignedFormula<S>, &Arena) -> bool,
    pub expand: fn(SignedFormula<S>, &mut Arena, &mut dyn QuantifierContext) -> Expansion<S>,
}

/// A per-logic table of rules, consulted by [`crate::branch::Branch::next_expandable`].
///
/// Rules are tried in registration order; when two rules of equal priority both apply (this
/// cannot happen for the rule sets this crate registers, since applicability patterns are
/// disjoint per sign+connective, but the tie-break is defined regardless), the
/// first-registered rule wins, matching [`Iterator::min_by_key`]'s documented behavior of
/// returning the first minimal element.
pub struct RuleRegistry<S: Sign> {
    rules: Vec<Rule<S>>,
}

impl<S: Sign> Default for RuleRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sign> RuleRegistry<S> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Rule<S>) {
        self.rules.push(rule);
    }

    /// Returns the applicable rule of lowest numeric priority for `sf`, or `None` if no
    /// registered rule applies. `None` means the signed formula is not expandable, not an error.
    pub(crate) fn rule_for(&self, sf: SignedFormula<S>, arena: &Arena) -> Option<&Rule<S>> {
        self.rules
            .iter()
            .filter(|rule| (rule.applies)(sf, arena))
            .min_by_key(|rule| rule.priority)
    }

    pub(crate) fn has_rule(&self, sf: SignedFormula<S>, arena: &Arena) -> bool {
        self.rule_for(sf, arena).is_some()
    }
}

/// Helper used by every rule set's applicability predicate: is `formula` a [`FormulaId`] whose
/// node matches the shape `pattern` expects? Exists purely to avoid repeating the
/// `arena.node(formula)` call at every applicability predicate call site.
pub(crate) fn node<'a>(formula: FormulaId, arena: &'a Arena) -> &'a crate::formula::FormulaNode {
    arena.node(formula)
}
