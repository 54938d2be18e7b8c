//! An ordered, append-only set of signed formulas with O(1) closure detection.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::formula::{Arena, FormulaNode};
use crate::rule::{QuantifierContext, RuleRegistry};
use crate::sign::Sign;
use crate::signed_formula::SignedFormula;
use crate::term::TermId;

/// A tableau branch: a commitment history plus the bookkeeping needed to expand and close it in
/// O(1) amortized time per addition.
///
/// Signed formulas are `Copy` (they're just a sign plus a [`crate::formula::FormulaId`]), so
/// [`Branch::clone_for_child`] — invoked once per child on every β-rule application — only
/// copies small maps keyed by those `Copy` values, never a formula tree.
pub struct Branch<S: Sign> {
    branch_id: u64,
    parent_id: Option<u64>,

    /// Insertion-ordered signed formulas. Append-only; see [`Branch::add`].
    signed_formulas: Vec<SignedFormula<S>>,

    /// Signed formulas that have already been expanded on this branch.
    ///
    /// Monotonic except for the universal-quantifier reactivation carve-out in
    /// [`Branch::grow_domain`].
    processed: FxHashSet<SignedFormula<S>>,

    /// Maps a literal's formula to the signs currently asserted for it on this branch.
    ///
    /// Restricted to literals; non-literal formulas never need a contradiction check
    /// because only [`Sign::contradicts`] on identical formulas can close a branch, and only a
    /// literal's sign set needs to be probed per addition.
    literal_index: FxHashMap<crate::formula::FormulaId, Vec<S>>,

    closed: bool,
    witness: Option<(SignedFormula<S>, SignedFormula<S>)>,

    /// The constants known on this branch.
    constant_domain: Vec<TermId>,

    /// Branch-scoped counter for fresh constant names.
    fresh_counter: u32,
}

impl<S: Sign> Branch<S> {
    pub(crate) fn new(branch_id: u64, parent_id: Option<u64>) -> Self {
        Self {
            branch_id,
            parent_id,
            signed_formulas: Vec::new(),
            processed: FxHashSet::default(),
            literal_index: FxHashMap::default(),
            closed: false,
            witness: None,
            constant_domain: Vec::new(),
            fresh_counter: 0,
        }
    }

    pub fn branch_id(&self) -> u64 {
        self.branch_id
    }

    pub fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn witness(&self) -> Option<(SignedFormula<S>, SignedFormula<S>)> {
        self.witness
    }

    pub fn signed_formulas(&self) -> &[SignedFormula<S>] {
        &self.signed_formulas
    }

    pub fn len(&self) -> usize {
        self.signed_formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signed_formulas.is_empty()
    }

    /// Returns the sign(s) currently asserted for `formula_id` on this branch, if any.
    pub(crate) fn signs_for(&self, formula_id: crate::formula::FormulaId) -> &[S] {
        self.literal_index
            .get(&formula_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Appends `sf` to the branch.
    ///
    /// A no-op if the branch is already closed, matching the invariant that a closed branch
    /// receives no further additions. Otherwise updates the literal index if `sf`'s formula is a
    /// literal, and closes the branch (recording the witness pair) if a contradicting sign is
    /// already present for that formula.
    pub(crate) fn add(&mut self, sf: SignedFormula<S>, arena: &Arena) {
        if self.closed {
            return;
        }
        self.signed_formulas.push(sf);

        if arena.is_literal(sf.formula) {
            let signs = self.literal_index.entry(sf.formula).or_default();
            if let Some(&contradicting_sign) = signs.iter().find(|&&s| sf.sign.contradicts(s)) {
                self.closed = true;
                self.witness = Some((sf, SignedFormula::new(contradicting_sign, sf.formula)));
                log::debug!(
                    "branch {} closed: {} contradicts {}",
                    self.branch_id,
                    sf.display(arena),
                    SignedFormula::new(contradicting_sign, sf.formula).display(arena)
                );
                return;
            }
            signs.push(sf.sign);
        }
    }

    pub(crate) fn mark_processed(&mut self, sf: SignedFormula<S>) {
        self.processed.insert(sf);
    }

    pub(crate) fn is_processed(&self, sf: SignedFormula<S>) -> bool {
        self.processed.contains(&sf)
    }

    /// Returns the unprocessed signed formula of minimum rule priority with an applicable rule,
    /// or `None` if the branch is saturated.
    ///
    /// Ties are broken by insertion order: the first (lowest-index) signed formula achieving the
    /// minimum priority wins, since we scan in insertion order and only replace the current best
    /// on a strictly lower priority.
    pub(crate) fn next_expandable(
        &self,
        registry: &RuleRegistry<S>,
        arena: &Arena,
    ) -> Option<(SignedFormula<S>, u8)> {
        let mut best: Option<(SignedFormula<S>, u8)> = None;
        for &sf in &self.signed_formulas {
            if self.is_processed(sf) {
                continue;
            }
            let Some(rule) = registry.rule_for(sf, arena) else {
                continue;
            };
            match best {
                Some((_, best_priority)) if rule.priority >= best_priority => {}
                _ => best = Some((sf, rule.priority)),
            }
        }
        best
    }

    pub(crate) fn has_expandable(&self, registry: &RuleRegistry<S>, arena: &Arena) -> bool {
        self.next_expandable(registry, arena).is_some()
    }

    /// Produces a child branch inheriting all of this branch's state.
    ///
    /// The signed-formula list, processed-set, literal index, and constant domain are all
    /// copied so the child cannot alias the parent's mutable state; the child's fresh-name
    /// counter starts independently (uniqueness across branches comes from `new_branch_id` being
    /// baked into generated names, not from the counter itself, see [`Branch::fresh_constant`]).
    pub(crate) fn clone_for_child(&self, new_branch_id: u64) -> Self {
        Self {
            branch_id: new_branch_id,
            parent_id: Some(self.branch_id),
            signed_formulas: self.signed_formulas.clone(),
            processed: self.processed.clone(),
            literal_index: self.literal_index.clone(),
            closed: self.closed,
            witness: self.witness,
            constant_domain: self.constant_domain.clone(),
            fresh_counter: self.fresh_counter,
        }
    }

    /// Adds `constant` to this branch's domain if not already present, reactivating any
    /// processed universal-quantifier signed formula: a universal rule instantiated over the old
    /// domain must be allowed to fire again now that a wider domain exists.
    fn grow_domain(&mut self, constant: TermId, arena: &Arena) {
        if self.constant_domain.contains(&constant) {
            return;
        }
        self.constant_domain.push(constant);
        self.processed.retain(|sf| {
            !matches!(arena.node(sf.formula), FormulaNode::RestrictedForall(_, _, _))
        });
    }
}

impl<S: Sign> QuantifierContext for Branch<S> {
    fn fresh_constant(&mut self, arena: &mut Arena) -> TermId {
        self.fresh_counter += 1;
        let name = format!("_c{}_{}", self.branch_id, self.fresh_counter);
        let constant = arena.constant(name);
        self.grow_domain(constant, arena);
        constant
    }

    fn domain_constants(&self) -> Vec<TermId> {
        self.constant_domain.clone()
    }
}

/// A [`QuantifierContext`] that panics if invoked; used by propositional rule-set unit tests
/// that never exercise a quantifier rule and so never need branch-scoped state.
#[cfg(test)]
pub(crate) struct NullQuantifierContext;

#[cfg(test)]
impl QuantifierContext for NullQuantifierContext {
    fn fresh_constant(&mut self, _arena: &mut Arena) -> TermId {
        panic!("NullQuantifierContext::fresh_constant called by a non-quantifier rule test")
    }

    fn domain_constants(&self) -> Vec<TermId> {
        panic!("NullQuantifierContext::domain_constants called by a non-quantifier rule test")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::CplSign;

    #[test]
    fn adding_contradicting_literals_closes_the_branch() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let mut branch = Branch::<CplSign>::new(0, None);
        branch.add(SignedFormula::new(CplSign::T, p), &arena);
        assert!(!branch.is_closed());
        branch.add(SignedFormula::new(CplSign::F, p), &arena);
        assert!(branch.is_closed());
        let (a, b) = branch.witness().unwrap();
        assert!(a.contradicts(b));
    }

    #[test]
    fn closed_branch_rejects_further_additions() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let mut branch = Branch::<CplSign>::new(0, None);
        branch.add(SignedFormula::new(CplSign::T, p), &arena);
        branch.add(SignedFormula::new(CplSign::F, p), &arena);
        assert_eq!(branch.len(), 2);
        branch.add(SignedFormula::new(CplSign::T, q), &arena);
        assert_eq!(branch.len(), 2, "closed branch must not grow further");
    }

    #[test]
    fn clone_for_child_does_not_alias_parent_state() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let mut parent = Branch::<CplSign>::new(0, None);
        parent.add(SignedFormula::new(CplSign::T, p), &arena);

        let mut child = parent.clone_for_child(1);
        let q = arena.atom("q");
        child.add(SignedFormula::new(CplSign::T, q), &arena);

        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.parent_id(), Some(0));
    }

    #[test]
    fn literal_index_matches_signed_formula_list() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let mut branch = Branch::<CplSign>::new(0, None);
        branch.add(SignedFormula::new(CplSign::T, p), &arena);
        assert_eq!(branch.signs_for(p), &[CplSign::T]);
    }

    #[test]
    fn domain_growth_reactivates_processed_universal_formula() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let guard = arena.predicate("G", vec![x]);
        let body = arena.predicate("B", vec![x]);
        let forall = arena.restricted_forall("x", guard, body);
        let mut branch = Branch::<CplSign>::new(0, None);
        let sf = SignedFormula::new(CplSign::T, forall);
        branch.add(sf, &arena);
        branch.mark_processed(sf);
        assert!(branch.is_processed(sf));

        let c = arena.constant("c1");
        branch.grow_domain(c, &arena);
        assert!(!branch.is_processed(sf), "growing the domain must reactivate universal rules");
    }
}
