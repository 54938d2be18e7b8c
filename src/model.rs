//! Extracts a satisfying model from an open branch, one extractor per logic.
//!
//! An extracted model maps each atom/predicate name mentioned on the branch to the truth value
//! the branch's signed literals commit it to. Extraction only reads the branch's literal
//! assertions; it never inspects non-literal formulas, since every non-literal signed formula on
//! an open (and therefore saturated) branch has already been reduced to literals by some rule.

use std::collections::BTreeMap;

use crate::branch::Branch;
use crate::error::EngineError;
use crate::formula::Arena;
use crate::sign::{CplSign, FdeSign, Wk3Sign, WkrqSign};

/// A named truth value assigned to an atom or predicate on an open branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    True,
    False,
    /// Weak Kleene's third value: neither true nor false.
    Undefined,
    /// FDE's "both true and false".
    Both,
    /// FDE's "neither true nor false" (distinct from [`Value::Undefined`]: FDE's `N` does not
    /// carry WK3's "undefined compound" propagation semantics, only an epistemic gap).
    Neither,
    /// wKrQ's epistemic commitment without a truth value: the branch carries `M` ("may be true")
    /// and/or `N` ("need not be true") for this atom but never a classical `T`/`F`. Present in the
    /// model (per spec) so a caller can tell "committed epistemically, no truth value" apart from
    /// an atom the branch never mentions at all.
    Unknown,
}

/// A satisfying assignment extracted from an open branch: atom/predicate name to [`Value`].
///
/// Backed by a [`BTreeMap`] so iteration order (and therefore `Display`/debug output) is
/// deterministic across runs, which matters for reproducible test assertions and logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    assignments: BTreeMap<String, Value>,
}

impl Model {
    pub fn get(&self, name: &str) -> Option<Value> {
        self.assignments.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.assignments.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn insert_if_absent(&mut self, name: &str, value: Value) {
        self.assignments.entry(name.to_string()).or_insert(value);
    }
}

/// Extracts a CPL model: `T:p` → `p = True`, `F:p` → `p = False`.
///
/// The negation of a literal (e.g. `T:¬p`) is folded into the same atom's assignment by
/// `literal_name`'s one-negation strip, so `T:¬p` and `F:p` both assign `p = False`.
///
/// Every atom/predicate interned in `arena` (not just the ones the branch happens to assert) is
/// present in the returned model: per spec.md §4.6, an atom the branch never mentions is
/// defaulted to `False` so the result is a *total* assignment that satisfies every initial
/// formula, not merely the literals a rule happened to derive. This relies on no CPL rule ever
/// interning a new atom mid-derivation, so `arena.atom_names()` after a completed `build()` is
/// exactly the set of atoms the initial formulas mention.
pub fn extract_cpl(branch: &Branch<CplSign>, arena: &Arena) -> Result<Model, EngineError> {
    if branch.is_closed() {
        return Err(EngineError::ModelExtractionFromClosedBranch(branch.branch_id()));
    }
    let mut model = Model::default();
    for sf in branch.signed_formulas() {
        if !arena.is_literal(sf.formula) {
            continue;
        }
        let name = arena.literal_name(sf.formula);
        let negated = matches!(arena.node(sf.formula), crate::formula::FormulaNode::Negation(_));
        let value = match (sf.sign, negated) {
            (CplSign::T, false) | (CplSign::F, true) => Value::True,
            (CplSign::F, false) | (CplSign::T, true) => Value::False,
        };
        model.insert_if_absent(name, value);
    }
    for name in arena.atom_names() {
        model.insert_if_absent(name, Value::False);
    }
    Ok(model)
}

/// Extracts a WK3 model: `T3` → `True`, `F3` → `False`, `U` → `Undefined`.
///
/// Atoms the branch never constrains are defaulted to `Undefined` (a deterministic choice per
/// spec.md §4.6, which leaves the default open as long as it is consistent and reproducible),
/// the same `arena.atom_names()` total-coverage strategy `extract_cpl` uses.
pub fn extract_wk3(branch: &Branch<Wk3Sign>, arena: &Arena) -> Result<Model, EngineError> {
    if branch.is_closed() {
        return Err(EngineError::ModelExtractionFromClosedBranch(branch.branch_id()));
    }
    let mut model = Model::default();
    for sf in branch.signed_formulas() {
        if !arena.is_literal(sf.formula) {
            continue;
        }
        let name = arena.literal_name(sf.formula);
        let negated = matches!(arena.node(sf.formula), crate::formula::FormulaNode::Negation(_));
        let value = match (sf.sign, negated) {
            (Wk3Sign::T3, false) | (Wk3Sign::F3, true) => Value::True,
            (Wk3Sign::F3, false) | (Wk3Sign::T3, true) => Value::False,
            (Wk3Sign::U, _) => Value::Undefined,
        };
        model.insert_if_absent(name, value);
    }
    for name in arena.atom_names() {
        model.insert_if_absent(name, Value::Undefined);
    }
    Ok(model)
}

/// Extracts a wKrQ model.
///
/// `T`/`F` assign definite values exactly as in CPL. An atom that only ever carries `M` and/or
/// `N` (no `T`/`F` assertion reaches it) has no definite classical value on this branch; per
/// spec.md §4.6 it still appears in the model, as [`Value::Unknown`], rather than being left out —
/// the model records that the branch made an epistemic commitment to the atom even though it
/// never pinned down a truth value.
pub fn extract_wkrq(branch: &Branch<WkrqSign>, arena: &Arena) -> Result<Model, EngineError> {
    if branch.is_closed() {
        return Err(EngineError::ModelExtractionFromClosedBranch(branch.branch_id()));
    }
    // Two passes so a definite `T`/`F` always wins over `M`/`N` for the same atom regardless of
    // which signed formula the branch happens to list first.
    let mut definite = Model::default();
    let mut epistemic_only: BTreeMap<String, ()> = BTreeMap::new();
    for sf in branch.signed_formulas() {
        if !arena.is_literal(sf.formula) {
            continue;
        }
        let name = arena.literal_name(sf.formula);
        let negated = matches!(arena.node(sf.formula), crate::formula::FormulaNode::Negation(_));
        match (sf.sign, negated) {
            (WkrqSign::T, false) | (WkrqSign::F, true) => definite.insert_if_absent(name, Value::True),
            (WkrqSign::F, false) | (WkrqSign::T, true) => definite.insert_if_absent(name, Value::False),
            (WkrqSign::M, _) | (WkrqSign::N, _) => {
                epistemic_only.entry(name.to_string()).or_insert(());
            }
        }
    }
    let mut model = definite;
    for name in epistemic_only.into_keys() {
        model.insert_if_absent(&name, Value::Unknown);
    }
    Ok(model)
}

/// Extracts an FDE model. Since FDE branches never close via pairwise contradiction, an atom can
/// legitimately carry both `T` and `F` (or neither) on the same open branch; `T`+`F` together (or
/// a standalone `B`) assign [`Value::Both`], and the complete absence of any of `T`/`F`/`B` for an
/// atom that does carry `N` assigns [`Value::Neither`].
pub fn extract_fde(branch: &Branch<FdeSign>, arena: &Arena) -> Result<Model, EngineError> {
    if branch.is_closed() {
        return Err(EngineError::ModelExtractionFromClosedBranch(branch.branch_id()));
    }
    let mut seen_true: BTreeMap<String, bool> = BTreeMap::new();
    let mut seen_false: BTreeMap<String, bool> = BTreeMap::new();
    let mut seen_neither: BTreeMap<String, bool> = BTreeMap::new();

    for sf in branch.signed_formulas() {
        if !arena.is_literal(sf.formula) {
            continue;
        }
        let name = arena.literal_name(sf.formula).to_string();
        let negated = matches!(arena.node(sf.formula), crate::formula::FormulaNode::Negation(_));
        match (sf.sign, negated) {
            (FdeSign::T, false) | (FdeSign::F, true) => {
                seen_true.insert(name, true);
            }
            (FdeSign::F, false) | (FdeSign::T, true) => {
                seen_false.insert(name, true);
            }
            (FdeSign::B, _) => {
                seen_true.insert(name.clone(), true);
                seen_false.insert(name, true);
            }
            (FdeSign::N, _) => {
                seen_neither.insert(name, true);
            }
        }
    }

    let mut model = Model::default();
    let names: std::collections::BTreeSet<String> = seen_true
        .keys()
        .chain(seen_false.keys())
        .chain(seen_neither.keys())
        .cloned()
        .collect();
    for name in names {
        let is_true = seen_true.contains_key(&name);
        let is_false = seen_false.contains_key(&name);
        let value = match (is_true, is_false) {
            (true, true) => Value::Both,
            (true, false) => Value::True,
            (false, true) => Value::False,
            (false, false) => Value::Neither,
        };
        model.insert_if_absent(&name, value);
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signed_formula::SignedFormula;

    #[test]
    fn cpl_extraction_reads_positive_and_negative_literals() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let not_q = arena.negation(q);
        let mut branch = Branch::<CplSign>::new(0, None);
        branch.add(SignedFormula::new(CplSign::T, p), &arena);
        branch.add(SignedFormula::new(CplSign::T, not_q), &arena);

        let model = extract_cpl(&branch, &arena).unwrap();
        assert_eq!(model.get("p"), Some(Value::True));
        assert_eq!(model.get("q"), Some(Value::False));
    }

    #[test]
    fn extraction_from_closed_branch_fails_loudly() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let mut branch = Branch::<CplSign>::new(0, None);
        branch.add(SignedFormula::new(CplSign::T, p), &arena);
        branch.add(SignedFormula::new(CplSign::F, p), &arena);
        assert!(matches!(
            extract_cpl(&branch, &arena),
            Err(EngineError::ModelExtractionFromClosedBranch(0))
        ));
    }

    #[test]
    fn wk3_extraction_reports_undefined() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let mut branch = Branch::<Wk3Sign>::new(0, None);
        branch.add(SignedFormula::new(Wk3Sign::U, p), &arena);
        let model = extract_wk3(&branch, &arena).unwrap();
        assert_eq!(model.get("p"), Some(Value::Undefined));
    }

    #[test]
    fn cpl_extraction_defaults_unmentioned_atoms_to_false() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let _disj = arena.disjunction(p, q);
        let mut branch = Branch::<CplSign>::new(0, None);
        branch.add(SignedFormula::new(CplSign::T, p), &arena);
        let model = extract_cpl(&branch, &arena).unwrap();
        assert_eq!(model.get("p"), Some(Value::True));
        assert_eq!(model.get("q"), Some(Value::False));
    }

    #[test]
    fn wk3_extraction_defaults_unmentioned_atoms_to_undefined() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let _disj = arena.disjunction(p, q);
        let mut branch = Branch::<Wk3Sign>::new(0, None);
        branch.add(SignedFormula::new(Wk3Sign::T3, p), &arena);
        let model = extract_wk3(&branch, &arena).unwrap();
        assert_eq!(model.get("p"), Some(Value::True));
        assert_eq!(model.get("q"), Some(Value::Undefined));
    }

    #[test]
    fn wkrq_extraction_reports_epistemic_only_atoms_as_unknown() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let mut branch = Branch::<WkrqSign>::new(0, None);
        branch.add(SignedFormula::new(WkrqSign::M, p), &arena);
        branch.add(SignedFormula::new(WkrqSign::T, q), &arena);
        let model = extract_wkrq(&branch, &arena).unwrap();
        assert_eq!(model.get("p"), Some(Value::Unknown));
        assert_eq!(model.get("q"), Some(Value::True));
    }

    #[test]
    fn wkrq_extraction_lets_a_definite_sign_win_over_an_epistemic_one() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let mut branch = Branch::<WkrqSign>::new(0, None);
        branch.add(SignedFormula::new(WkrqSign::M, p), &arena);
        branch.add(SignedFormula::new(WkrqSign::T, p), &arena);
        let model = extract_wkrq(&branch, &arena).unwrap();
        assert_eq!(model.get("p"), Some(Value::True));
    }

    #[test]
    fn fde_extraction_reports_both_when_t_and_f_coexist() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let mut branch = Branch::<FdeSign>::new(0, None);
        branch.add(SignedFormula::new(FdeSign::T, p), &arena);
        branch.add(SignedFormula::new(FdeSign::F, p), &arena);
        assert!(!branch.is_closed());
        let model = extract_fde(&branch, &arena).unwrap();
        assert_eq!(model.get("p"), Some(Value::Both));
    }
}
