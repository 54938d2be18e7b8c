//! Immutable, hash-consed representation of formulas.
//!
//! Formulas are interned into an [`Arena`]: every unique sub-formula is stored exactly once and
//! referred to everywhere else by a small [`FormulaId`] index. This makes structural equality and
//! hashing of formulas an O(1) integer comparison, which is what makes branch closure detection a
//! lookup rather than a tree comparison, and keeps a [`crate::branch::Branch`] clone (required on
//! every β-rule application) cheap: a branch never owns formula trees, only `(Sign, FormulaId)`
//! pairs and small maps keyed by `FormulaId`.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use crate::term::{Term, TermId};

/// Identifier type for formulas, serving as an index into [`Arena::formulas`].
///
/// Opaque outside this crate: callers receive and pass around `FormulaId`s returned by `Arena`'s
/// constructor methods, but the index has no meaning without the `Arena` that produced it.
pub type FormulaId = usize;

/// A node in a formula's syntax tree.
///
/// [`FormulaNode::RestrictedExists`] and [`FormulaNode::RestrictedForall`] carry
/// `(variable name, guard, body)`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub(crate) enum FormulaNode {
    /// A propositional atom, identified by name.
    Atom(String),
    /// An atomic first-order formula: a predicate applied to argument terms.
    Predicate(String, Vec<TermId>),
    /// The negation of a formula.
    Negation(FormulaId),
    /// The conjunction of two formulas.
    Conjunction(FormulaId, FormulaId),
    /// The disjunction of two formulas.
    Disjunction(FormulaId, FormulaId),
    /// The implication from an antecedent to a consequent.
    Implication(FormulaId, FormulaId),
    /// A restricted existential: `[exists var where guard(var)] body(var)`.
    RestrictedExists(String, FormulaId, FormulaId),
    /// A restricted universal: `[forall var where guard(var)] body(var)`.
    RestrictedForall(String, FormulaId, FormulaId),
}

/// A literal is an atom, a predicate, or the negation of either.
fn is_literal_node(node: &FormulaNode, arena: &Arena) -> bool {
    match node {
        FormulaNode::Atom(_) | FormulaNode::Predicate(_, _) => true,
        FormulaNode::Negation(inner) => matches!(
            arena.formulas[*inner],
            FormulaNode::Atom(_) | FormulaNode::Predicate(_, _)
        ),
        _ => false,
    }
}

fn calc_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Owns all terms and formulas ever constructed during one [`crate::engine::Engine::build`] call.
///
/// Terms and formulas are interned independently, each with its own canonical-identifier lookup.
/// Nothing is ever removed; formulas are immutable once interned, and rules only ever *combine*
/// existing formulas into new ones, never rewrite a formula already in the arena.
#[derive(Debug, Default)]
pub struct Arena {
    terms: Vec<Term>,
    terms_inv: FxHashMap<u64, Vec<TermId>>,
    formulas: Vec<FormulaNode>,
    formulas_inv: FxHashMap<u64, Vec<FormulaId>>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern_term(&mut self, term: Term) -> TermId {
        let hash = calc_hash(&term);
        if let Some(ids) = self.terms_inv.get(&hash) {
            if let Some(id) = ids.iter().find(|id| self.terms[**id] == term) {
                return *id;
            }
        }
        let id = self.terms.len();
        self.terms.push(term);
        self.terms_inv.entry(hash).or_default().push(id);
        id
    }

    pub fn constant(&mut self, name: impl Into<String>) -> TermId {
        self.intern_term(Term::Constant(name.into()))
    }

    pub fn variable(&mut self, name: impl Into<String>) -> TermId {
        self.intern_term(Term::Variable(name.into()))
    }

    pub fn function(&mut self, name: impl Into<String>, args: Vec<TermId>) -> TermId {
        self.intern_term(Term::Function(name.into(), args))
    }

    pub(crate) fn term(&self, id: TermId) -> &Term {
        &self.terms[id]
    }

    fn intern_formula(&mut self, node: FormulaNode) -> FormulaId {
        let hash = calc_hash(&node);
        if let Some(ids) = self.formulas_inv.get(&hash) {
            if let Some(id) = ids.iter().find(|id| self.formulas[**id] == node) {
                return *id;
            }
        }
        let id = self.formulas.len();
        self.formulas.push(node);
        self.formulas_inv.entry(hash).or_default().push(id);
        id
    }

    pub fn atom(&mut self, name: impl Into<String>) -> FormulaId {
        self.intern_formula(FormulaNode::Atom(name.into()))
    }

    pub fn predicate(&mut self, name: impl Into<String>, args: Vec<TermId>) -> FormulaId {
        self.intern_formula(FormulaNode::Predicate(name.into(), args))
    }

    pub fn negation(&mut self, f: FormulaId) -> FormulaId {
        self.intern_formula(FormulaNode::Negation(f))
    }

    pub fn conjunction(&mut self, l: FormulaId, r: FormulaId) -> FormulaId {
        self.intern_formula(FormulaNode::Conjunction(l, r))
    }

    pub fn disjunction(&mut self, l: FormulaId, r: FormulaId) -> FormulaId {
        self.intern_formula(FormulaNode::Disjunction(l, r))
    }

    pub fn implication(&mut self, l: FormulaId, r: FormulaId) -> FormulaId {
        self.intern_formula(FormulaNode::Implication(l, r))
    }

    pub fn restricted_exists(
        &mut self,
        var: impl Into<String>,
        guard: FormulaId,
        body: FormulaId,
    ) -> FormulaId {
        self.intern_formula(FormulaNode::RestrictedExists(var.into(), guard, body))
    }

    pub fn restricted_forall(
        &mut self,
        var: impl Into<String>,
        guard: FormulaId,
        body: FormulaId,
    ) -> FormulaId {
        self.intern_formula(FormulaNode::RestrictedForall(var.into(), guard, body))
    }

    pub(crate) fn node(&self, id: FormulaId) -> &FormulaNode {
        &self.formulas[id]
    }

    pub(crate) fn is_literal(&self, id: FormulaId) -> bool {
        is_literal_node(&self.formulas[id], self)
    }

    /// Names of every atom/predicate ever interned, in interning order.
    ///
    /// Used by the model extractor (C6) to default-fill atoms that the initial formulas mention
    /// but that no rule application ever asserted on a given branch. Relies on CPL/WK3/wKrQ rules
    /// never interning a *new* atom/predicate name mid-derivation (they only combine existing
    /// formulas), so every name reachable from the initial formulas is already present here.
    pub(crate) fn atom_names(&self) -> impl Iterator<Item = &str> {
        self.formulas.iter().filter_map(|node| match node {
            FormulaNode::Atom(name) | FormulaNode::Predicate(name, _) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Returns the atom/predicate name of a literal's underlying formula, stripping one negation.
    ///
    /// Used by the model extractor (C6) to recover an atom's name from a literal's
    /// [`FormulaId`] without re-deriving it from the signed formula each time.
    pub(crate) fn literal_name(&self, id: FormulaId) -> &str {
        match &self.formulas[id] {
            FormulaNode::Atom(name) | FormulaNode::Predicate(name, _) => name,
            FormulaNode::Negation(inner) => self.literal_name(*inner),
            _ => panic!("literal_name called on a non-literal formula"),
        }
    }

    /// Replaces free occurrences of `var` in `formula_id` with `replacement`, returning the
    /// identifier of the resulting (newly interned, or reused) formula.
    ///
    /// Since `replacement` is always a ground term freshly introduced by a quantifier rule (a
    /// fresh constant), no variable of `replacement` can ever be captured by a binder in
    /// `formula_id` — capture avoidance only matters when substituting a term that
    /// itself contains free variables, which this engine's rule set never does. We still honor
    /// variable shadowing: substitution does not descend past a quantifier that rebinds `var`.
    pub(crate) fn substitute(&mut self, formula_id: FormulaId, var: &str, replacement: TermId) -> FormulaId {
        match self.formulas[formula_id].clone() {
            FormulaNode::Atom(name) => self.atom(name),
            FormulaNode::Predicate(name, args) => {
                let new_args = args
                    .into_iter()
                    .map(|t| self.substitute_term(t, var, replacement))
                    .collect();
                self.predicate(name, new_args)
            }
            FormulaNode::Negation(inner) => {
                let new_inner = self.substitute(inner, var, replacement);
                self.negation(new_inner)
            }
            FormulaNode::Conjunction(l, r) => {
                let (l, r) = (
                    self.substitute(l, var, replacement),
                    self.substitute(r, var, replacement),
                );
                self.conjunction(l, r)
            }
            FormulaNode::Disjunction(l, r) => {
                let (l, r) = (
                    self.substitute(l, var, replacement),
                    self.substitute(r, var, replacement),
                );
                self.disjunction(l, r)
            }
            FormulaNode::Implication(l, r) => {
                let (l, r) = (
                    self.substitute(l, var, replacement),
                    self.substitute(r, var, replacement),
                );
                self.implication(l, r)
            }
            FormulaNode::RestrictedExists(bound_var, guard, body) => {
                if bound_var == var {
                    formula_id
                } else {
                    let (guard, body) = (
                        self.substitute(guard, var, replacement),
                        self.substitute(body, var, replacement),
                    );
                    self.restricted_exists(bound_var, guard, body)
                }
            }
            FormulaNode::RestrictedForall(bound_var, guard, body) => {
                if bound_var == var {
                    formula_id
                } else {
                    let (guard, body) = (
                        self.substitute(guard, var, replacement),
                        self.substitute(body, var, replacement),
                    );
                    self.restricted_forall(bound_var, guard, body)
                }
            }
        }
    }

    fn substitute_term(&mut self, term_id: TermId, var: &str, replacement: TermId) -> TermId {
        match self.terms[term_id].clone() {
            Term::Constant(_) => term_id,
            Term::Variable(name) => {
                if name == var {
                    replacement
                } else {
                    term_id
                }
            }
            Term::Function(name, args) => {
                let new_args = args
                    .into_iter()
                    .map(|t| self.substitute_term(t, var, replacement))
                    .collect();
                self.function(name, new_args)
            }
        }
    }

    /// Formats a formula for display (used by the optional step log and by test assertions).
    pub fn display_formula(&self, id: FormulaId) -> String {
        format!("{}", FormulaDisplay { arena: self, id })
    }

    fn fmt_term(&self, id: TermId, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.terms[id] {
            Term::Constant(name) | Term::Variable(name) => write!(f, "{name}"),
            Term::Function(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.fmt_term(*arg, f)?;
                }
                write!(f, ")")
            }
        }
    }

    fn fmt_formula(&self, id: FormulaId, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.formulas[id] {
            FormulaNode::Atom(name) => write!(f, "{name}"),
            FormulaNode::Predicate(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.fmt_term(*arg, f)?;
                }
                write!(f, ")")
            }
            FormulaNode::Negation(inner) => {
                write!(f, "¬")?;
                self.fmt_formula(*inner, f)
            }
            FormulaNode::Conjunction(l, r) => {
                write!(f, "(")?;
                self.fmt_formula(*l, f)?;
                write!(f, " ∧ ")?;
                self.fmt_formula(*r, f)?;
                write!(f, ")")
            }
            FormulaNode::Disjunction(l, r) => {
                write!(f, "(")?;
                self.fmt_formula(*l, f)?;
                write!(f, " ∨ ")?;
                self.fmt_formula(*r, f)?;
                write!(f, ")")
            }
            FormulaNode::Implication(l, r) => {
                write!(f, "(")?;
                self.fmt_formula(*l, f)?;
                write!(f, " → ")?;
                self.fmt_formula(*r, f)?;
                write!(f, ")")
            }
            FormulaNode::RestrictedExists(var, guard, body) => {
                write!(f, "[∃{var} ")?;
                self.fmt_formula(*guard, f)?;
                write!(f, "] ")?;
                self.fmt_formula(*body, f)
            }
            FormulaNode::RestrictedForall(var, guard, body) => {
                write!(f, "[∀{var} ")?;
                self.fmt_formula(*guard, f)?;
                write!(f, "] ")?;
                self.fmt_formula(*body, f)
            }
        }
    }
}

/// Pairs a [`FormulaId`] with the [`Arena`] it belongs to so it can be displayed.
///
/// Formula identifiers are meaningless without the arena that interns them, so a displayable
/// handle must carry both.
struct FormulaDisplay<'a> {
    arena: &'a Arena,
    id: FormulaId,
}

impl<'a> fmt::Display for FormulaDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.arena.fmt_formula(self.id, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_sharing_dedups_identical_atoms() {
        let mut arena = Arena::new();
        let a1 = arena.atom("p");
        let a2 = arena.atom("p");
        assert_eq!(a1, a2);
    }

    #[test]
    fn distinct_atoms_get_distinct_ids() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        assert_ne!(p, q);
    }

    #[test]
    fn compound_formulas_are_interned_structurally() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let c1 = arena.conjunction(p, q);
        let c2 = arena.conjunction(p, q);
        assert_eq!(c1, c2);
    }

    #[test]
    fn is_literal_recognizes_atoms_predicates_and_their_negations() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let not_p = arena.negation(p);
        let and = arena.conjunction(p, not_p);
        assert!(arena.is_literal(p));
        assert!(arena.is_literal(not_p));
        assert!(!arena.is_literal(and));
    }

    #[test]
    fn substitute_replaces_free_variable_with_constant() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let pred = arena.predicate("P", vec![x]);
        let c = arena.constant("c1");
        let substituted = arena.substitute(pred, "x", c);
        assert_eq!(arena.display_formula(substituted), "P(c1)");
    }

    #[test]
    fn substitute_does_not_descend_past_shadowing_quantifier() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let guard = arena.predicate("Guard", vec![x]);
        let body = arena.predicate("Body", vec![x]);
        let inner_exists = arena.restricted_exists("x", guard, body);
        let c = arena.constant("c1");
        let substituted = arena.substitute(inner_exists, "x", c);
        assert_eq!(substituted, inner_exists);
    }

    #[test]
    fn display_renders_connectives_with_expected_shape() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let not_p = arena.negation(p);
        let disj = arena.disjunction(not_p, q);
        assert_eq!(arena.display_formula(disj), "(¬p ∨ q)");
    }
}
