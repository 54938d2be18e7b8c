//! Drives a set of branches to saturation: the tableau control loop.
//!
//! [`Engine<S>`] is generic over the sign system, so the same control loop serves every logic;
//! only the [`crate::rule::RuleRegistry<S>`] it is built with differs. [`AnyEngine`] and
//! [`new_engine`] exist on top of it for callers that select a logic by name at runtime (e.g. a
//! configuration file or command-line flag feeding into this library) rather than at compile
//! time; the typed [`Engine<S>`] API underneath is what actually builds and runs a derivation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::branch::Branch;
use crate::error::EngineError;
use crate::formula::Arena;
use crate::rule::{QuantifierContext, RuleRegistry};
use crate::sign::{CplSign, FdeSign, Sign, Wk3Sign, WkrqSign};
use crate::signed_formula::SignedFormula;

/// Programmatic configuration for an [`Engine`]. Constructed via [`EngineConfig::default`] and
/// the builder-style setters below; there is no file-backed configuration format, since the
/// engine has no outer CLI/config-file surface to drive it.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    max_branches: usize,
    cancelled: Option<Arc<AtomicBool>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_branches: 1_000_000,
            cancelled: None,
        }
    }
}

impl EngineConfig {
    pub fn with_max_branches(mut self, max_branches: usize) -> Self {
        self.max_branches = max_branches;
        self
    }

    /// Registers a shared flag the caller can flip from another thread to abort `build()` between
    /// rule applications.
    pub fn with_cancellation_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.as_ref().is_some_and(|f| f.load(Ordering::Relaxed))
    }
}

/// Aggregate counters updated in place over the course of one `build()` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub rule_applications: usize,
    pub total_branches: usize,
    pub open_branches: usize,
    pub closed_branches: usize,
    pub max_branch_size: usize,
}

/// Observes the engine's progress without influencing it. All methods default to doing nothing,
/// so callers only override the hooks they care about.
///
/// Exists for the external CLI/visualizer this crate's non-goals exclude; the engine itself never
/// reads back anything an observer does, so implementing one cannot change a `build()` outcome.
pub trait EngineObserver {
    /// Called once per rule application, after the triggering signed formula has been applied and
    /// the resulting signed formulas appended (α) or the child branches created (β).
    ///
    /// `parent_branch_id` is the branch the rule fired on; `branch_id` is the same id for an
    /// α-rule (the branch was extended in place) or one of the new child ids for a β-rule (called
    /// once per child, since each child is a distinct commitment the observer should see
    /// separately).
    fn on_rule_applied(
        &mut self,
        _branch_id: u64,
        _parent_branch_id: u64,
        _rule_name: &str,
        _triggering: &str,
        _produced: &[String],
    ) {
    }

    fn on_branch_closed(&mut self, _branch_id: u64) {}
}

/// An [`EngineObserver`] that does nothing; the default when a caller has no interest in
/// step-by-step progress.
pub struct NullObserver;

impl EngineObserver for NullObserver {}

/// The result of a completed `build()`: whether the input is satisfiable in this logic, every
/// branch left open at saturation (there can be more than one — each is an independent model),
/// and the run's statistics.
pub struct BuildOutcome<S: Sign> {
    pub satisfiable: bool,
    pub open_branches: Vec<Branch<S>>,
    pub statistics: Statistics,
}

/// Drives branches to saturation for one fixed sign system `S`.
pub struct Engine<S: Sign> {
    registry: RuleRegistry<S>,
    config: EngineConfig,
}

impl<S: Sign> Engine<S> {
    /// Builds an engine from a caller-supplied rule table, the registration surface spec.md §6
    /// item 3 asks for: adding a fifth logic means implementing [`Sign`], building a
    /// [`RuleRegistry`] of [`crate::rule::Rule`]s for it, and calling this constructor — no change
    /// to this crate is required.
    pub fn new(registry: RuleRegistry<S>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Runs the tableau to completion: starting from a single branch seeded with `initial`,
    /// repeatedly selects the open branch with the lowest id that still has an expandable signed
    /// formula, applies that formula's highest-priority rule, and either extends the branch
    /// (α-rule) or replaces it with its children (β-rule), until every branch is either closed or
    /// saturated.
    ///
    /// Returns [`EngineError::NoInitialFormulas`] if `initial` is empty,
    /// [`EngineError::ResourceExhausted`] if the branch count would exceed
    /// [`EngineConfig::with_max_branches`], and [`EngineError::Cancelled`] if a cancellation flag
    /// set via [`EngineConfig::with_cancellation_flag`] trips between rule applications.
    pub fn build(
        &self,
        arena: &mut Arena,
        initial: Vec<SignedFormula<S>>,
        observer: &mut dyn EngineObserver,
    ) -> Result<BuildOutcome<S>, EngineError> {
        if initial.is_empty() {
            return Err(EngineError::NoInitialFormulas);
        }

        let mut next_branch_id: u64 = 1;
        let mut statistics = Statistics::default();

        let mut root = Branch::new(0, None);
        for sf in &initial {
            root.add(*sf, arena);
        }
        log::debug!(
            "build: seeded root branch 0 with {} initial signed formulas",
            initial.len()
        );

        let mut branches: Vec<Branch<S>> = vec![root];

        loop {
            if self.config.is_cancelled() {
                log::warn!(
                    "build cancelled after {} rule applications",
                    statistics.rule_applications
                );
                return Err(EngineError::Cancelled);
            }
            if branches.len() > self.config.max_branches {
                log::warn!("build exhausted max_branches ({})", self.config.max_branches);
                return Err(EngineError::ResourceExhausted(self.config.max_branches));
            }

            let candidate = branches
                .iter()
                .enumerate()
                .filter(|(_, b)| !b.is_closed() && b.has_expandable(&self.registry, arena))
                .min_by_key(|(_, b)| b.branch_id())
                .map(|(i, _)| i);

            let Some(pos) = candidate else {
                break;
            };

            let (sf, rule_name, expand) = {
                let branch = &branches[pos];
                let (sf, _priority) = branch
                    .next_expandable(&self.registry, arena)
                    .ok_or(EngineError::NoApplicableRule)?;
                let rule = self
                    .registry
                    .rule_for(sf, arena)
                    .ok_or(EngineError::NoApplicableRule)?;
                (sf, rule.name, rule.expand)
            };

            let parent_branch_id = branches[pos].branch_id();
            let triggering = sf.display(arena);
            branches[pos].mark_processed(sf);
            let expansion = expand(sf, arena, &mut branches[pos]);
            statistics.rule_applications += 1;
            log::trace!(
                "branch {}: applied {} to {}",
                parent_branch_id,
                rule_name,
                triggering
            );

            if expansion.is_linear {
                let produced = expansion.branches.into_iter().next().unwrap_or_default();
                let produced_display: Vec<String> =
                    produced.iter().map(|sf| sf.display(arena)).collect();
                for new_sf in produced {
                    branches[pos].add(new_sf, arena);
                }
                observer.on_rule_applied(
                    parent_branch_id,
                    parent_branch_id,
                    rule_name,
                    &triggering,
                    &produced_display,
                );
                if branches[pos].is_closed() {
                    observer.on_branch_closed(branches[pos].branch_id());
                    log::debug!("branch {} closed", branches[pos].branch_id());
                }
            } else {
                let parent = branches.remove(pos);
                for formulas in expansion.branches {
                    let mut child = parent.clone_for_child(next_branch_id);
                    next_branch_id += 1;
                    let produced_display: Vec<String> =
                        formulas.iter().map(|sf| sf.display(arena)).collect();
                    for new_sf in formulas {
                        child.add(new_sf, arena);
                    }
                    observer.on_rule_applied(
                        child.branch_id(),
                        parent_branch_id,
                        rule_name,
                        &triggering,
                        &produced_display,
                    );
                    if child.is_closed() {
                        observer.on_branch_closed(child.branch_id());
                        log::debug!("branch {} closed", child.branch_id());
                    }
                    branches.push(child);
                }
            }
        }

        let (open, closed): (Vec<_>, Vec<_>) = branches.into_iter().partition(|b| !b.is_closed());
        statistics.total_branches = open.len() + closed.len();
        statistics.open_branches = open.len();
        statistics.closed_branches = closed.len();
        statistics.max_branch_size = open
            .iter()
            .chain(closed.iter())
            .map(Branch::len)
            .max()
            .unwrap_or(0);

        let satisfiable = !open.is_empty();
        log::info!(
            "build finished: satisfiable={satisfiable} open_branches={} closed_branches={}",
            statistics.open_branches,
            statistics.closed_branches
        );

        Ok(BuildOutcome {
            satisfiable,
            open_branches: open,
            statistics,
        })
    }
}

impl Engine<CplSign> {
    /// Builds an `Engine` fixed to classical propositional logic's rule set.
    pub fn cpl(config: EngineConfig) -> Self {
        Self::new(crate::rules::cpl::registry(), config)
    }
}

impl Engine<Wk3Sign> {
    /// Builds an `Engine` fixed to weak Kleene logic's rule set.
    pub fn wk3(config: EngineConfig) -> Self {
        Self::new(crate::rules::wk3::registry(), config)
    }
}

impl Engine<WkrqSign> {
    /// Builds an `Engine` fixed to wKrQ's rule set.
    pub fn wkrq(config: EngineConfig) -> Self {
        Self::new(crate::rules::wkrq::registry(), config)
    }
}

impl Engine<FdeSign> {
    /// Builds an `Engine` fixed to first-degree entailment's rule set.
    pub fn fde(config: EngineConfig) -> Self {
        Self::new(crate::rules::fde::registry(), config)
    }
}

/// A logic selected at runtime, wrapping the correspondingly-typed [`Engine`].
///
/// Exists for callers that only know which logic to run by name (e.g. `"wkrq"` read from a
/// configuration value); the typed `Engine<S>` API is what callers actually build formulas and
/// run derivations against, via the `as_*` accessors below.
pub enum AnyEngine {
    Cpl(Engine<CplSign>),
    Wk3(Engine<Wk3Sign>),
    Wkrq(Engine<WkrqSign>),
    Fde(Engine<FdeSign>),
}

impl AnyEngine {
    pub fn logic_name(&self) -> &'static str {
        match self {
            AnyEngine::Cpl(_) => "cpl",
            AnyEngine::Wk3(_) => "wk3",
            AnyEngine::Wkrq(_) => "wkrq",
            AnyEngine::Fde(_) => "fde",
        }
    }

    pub fn as_cpl(&self) -> Option<&Engine<CplSign>> {
        match self {
            AnyEngine::Cpl(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_wk3(&self) -> Option<&Engine<Wk3Sign>> {
        match self {
            AnyEngine::Wk3(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_wkrq(&self) -> Option<&Engine<WkrqSign>> {
        match self {
            AnyEngine::Wkrq(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_fde(&self) -> Option<&Engine<FdeSign>> {
        match self {
            AnyEngine::Fde(e) => Some(e),
            _ => None,
        }
    }
}

/// Builds an [`AnyEngine`] for `logic_name` (`"cpl"`, `"wk3"`, `"wkrq"`, or `"fde"`) with default
/// configuration. Returns [`EngineError::UnknownLogic`] for any other name.
pub fn new_engine(logic_name: &str) -> Result<AnyEngine, EngineError> {
    new_engine_with_config(logic_name, EngineConfig::default())
}

/// Like [`new_engine`], but with caller-supplied configuration.
pub fn new_engine_with_config(logic_name: &str, config: EngineConfig) -> Result<AnyEngine, EngineError> {
    match logic_name {
        "cpl" => Ok(AnyEngine::Cpl(Engine::new(crate::rules::cpl::registry(), config))),
        "wk3" => Ok(AnyEngine::Wk3(Engine::new(crate::rules::wk3::registry(), config))),
        "wkrq" => Ok(AnyEngine::Wkrq(Engine::new(crate::rules::wkrq::registry(), config))),
        "fde" => Ok(AnyEngine::Fde(Engine::new(crate::rules::fde::registry(), config))),
        other => Err(EngineError::UnknownLogic(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::CplSign::{F, T};

    fn engine() -> Engine<CplSign> {
        Engine::new(crate::rules::cpl::registry(), EngineConfig::default())
    }

    #[test]
    fn tautology_p_or_not_p_has_no_open_branch_when_negated() {
        // F:(p ∨ ¬p) must close every branch: refuting a tautology is unsatisfiable.
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let not_p = arena.negation(p);
        let disj = arena.disjunction(p, not_p);
        let e = engine();
        let mut observer = NullObserver;
        let outcome = e
            .build(&mut arena, vec![SignedFormula::new(F, disj)], &mut observer)
            .unwrap();
        assert!(!outcome.satisfiable);
        assert_eq!(outcome.statistics.open_branches, 0);
    }

    #[test]
    fn contradiction_p_and_not_p_is_unsatisfiable() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let not_p = arena.negation(p);
        let conj = arena.conjunction(p, not_p);
        let e = engine();
        let mut observer = NullObserver;
        let outcome = e
            .build(&mut arena, vec![SignedFormula::new(T, conj)], &mut observer)
            .unwrap();
        assert!(!outcome.satisfiable);
    }

    #[test]
    fn modus_ponens_refutation_is_unsatisfiable() {
        // T:(p→q), T:p, F:q: if modus ponens holds, this combination must close every branch.
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let imp = arena.implication(p, q);
        let e = engine();
        let mut observer = NullObserver;
        let outcome = e
            .build(
                &mut arena,
                vec![
                    SignedFormula::new(T, imp),
                    SignedFormula::new(T, p),
                    SignedFormula::new(F, q),
                ],
                &mut observer,
            )
            .unwrap();
        assert!(!outcome.satisfiable);
    }

    #[test]
    fn satisfiable_disjunction_leaves_an_open_branch_with_a_model() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let disj = arena.disjunction(p, q);
        let e = engine();
        let mut observer = NullObserver;
        let outcome = e
            .build(&mut arena, vec![SignedFormula::new(T, disj)], &mut observer)
            .unwrap();
        assert!(outcome.satisfiable);
        assert!(!outcome.open_branches.is_empty());
        for branch in &outcome.open_branches {
            let model = crate::model::extract_cpl(branch, &arena).unwrap();
            // Both atoms are present in the model (a total assignment), and at least one is
            // true, satisfying `p ∨ q`; whichever one the branch never asserted defaults to
            // false rather than being left out.
            assert!(model.get("p").is_some() && model.get("q").is_some());
            assert!(model.get("p") == Some(crate::model::Value::True) || model.get("q") == Some(crate::model::Value::True));
        }
    }

    #[test]
    fn empty_initial_formulas_is_rejected() {
        let mut arena = Arena::new();
        let e = engine();
        let mut observer = NullObserver;
        let result = e.build(&mut arena, vec![], &mut observer);
        assert!(matches!(result, Err(EngineError::NoInitialFormulas)));
    }

    #[test]
    fn resource_exhaustion_is_reported_rather_than_looping_forever() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let disj = arena.disjunction(p, q);
        let config = EngineConfig::default().with_max_branches(0);
        let e = Engine::new(crate::rules::cpl::registry(), config);
        let mut observer = NullObserver;
        let result = e.build(&mut arena, vec![SignedFormula::new(T, disj)], &mut observer);
        assert!(matches!(result, Err(EngineError::ResourceExhausted(0))));
    }

    #[test]
    fn new_engine_rejects_unknown_logic_names() {
        assert!(matches!(new_engine("modal-s5"), Err(EngineError::UnknownLogic(_))));
    }

    #[test]
    fn new_engine_dispatches_to_the_right_variant() {
        let any = new_engine("wkrq").unwrap();
        assert_eq!(any.logic_name(), "wkrq");
        assert!(any.as_wkrq().is_some());
        assert!(any.as_cpl().is_none());
    }

    #[test]
    fn wk3_undefined_atom_never_closes_against_a_defined_one() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let e = Engine::wk3(EngineConfig::default());
        let mut observer = NullObserver;
        let outcome = e
            .build(&mut arena, vec![SignedFormula::new(Wk3Sign::U, p)], &mut observer)
            .unwrap();
        assert!(outcome.satisfiable);
        let model = crate::model::extract_wk3(&outcome.open_branches[0], &arena).unwrap();
        assert_eq!(model.get("p"), Some(crate::model::Value::Undefined));
    }

    #[test]
    fn wk3_contradiction_between_t3_and_f3_is_unsatisfiable() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let e = Engine::wk3(EngineConfig::default());
        let mut observer = NullObserver;
        let outcome = e
            .build(
                &mut arena,
                vec![SignedFormula::new(Wk3Sign::T3, p), SignedFormula::new(Wk3Sign::F3, p)],
                &mut observer,
            )
            .unwrap();
        assert!(!outcome.satisfiable);
    }

    #[test]
    fn wkrq_m_and_n_on_the_same_atom_coexist_without_closing() {
        let mut arena = Arena::new();
        let p = arena.atom("p");
        let e = Engine::wkrq(EngineConfig::default());
        let mut observer = NullObserver;
        let outcome = e
            .build(
                &mut arena,
                vec![SignedFormula::new(WkrqSign::M, p), SignedFormula::new(WkrqSign::N, p)],
                &mut observer,
            )
            .unwrap();
        assert!(outcome.satisfiable);
        assert_eq!(outcome.open_branches.len(), 1);
        assert!(!outcome.open_branches[0].is_closed());
    }

    #[test]
    fn wkrq_restricted_exists_is_satisfiable_with_a_fresh_witness() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let guard = arena.predicate("G", vec![x]);
        let body = arena.predicate("B", vec![x]);
        let exists = arena.restricted_exists("x", guard, body);
        let e = Engine::wkrq(EngineConfig::default());
        let mut observer = NullObserver;
        let outcome = e
            .build(&mut arena, vec![SignedFormula::new(WkrqSign::T, exists)], &mut observer)
            .unwrap();
        assert!(outcome.satisfiable);
    }

    #[test]
    fn observer_sees_rule_name_and_produced_signed_formulas_on_a_beta_application() {
        #[derive(Default)]
        struct Recorder {
            calls: Vec<(u64, u64, String)>,
        }
        impl EngineObserver for Recorder {
            fn on_rule_applied(
                &mut self,
                branch_id: u64,
                parent_branch_id: u64,
                rule_name: &str,
                _triggering: &str,
                _produced: &[String],
            ) {
                self.calls.push((branch_id, parent_branch_id, rule_name.to_string()));
            }
        }

        let mut arena = Arena::new();
        let p = arena.atom("p");
        let q = arena.atom("q");
        let disj = arena.disjunction(p, q);
        let e = engine();
        let mut observer = Recorder::default();
        let outcome = e
            .build(&mut arena, vec![SignedFormula::new(T, disj)], &mut observer)
            .unwrap();
        assert!(outcome.satisfiable);
        assert_eq!(observer.calls.len(), 2, "a β-rule notifies the observer once per child");
        for (branch_id, parent_branch_id, rule_name) in &observer.calls {
            assert_eq!(rule_name, "t_disjunction");
            assert_eq!(*parent_branch_id, 0);
            assert_ne!(*branch_id, 0, "children get fresh ids distinct from the parent");
        }
    }

    #[test]
    fn fde_branch_with_both_t_and_f_on_the_same_atom_stays_open() {
        use crate::sign::FdeSign;

        let mut arena = Arena::new();
        let p = arena.atom("p");
        let e = Engine::fde(EngineConfig::default());
        let mut observer = NullObserver;
        let outcome = e
            .build(
                &mut arena,
                vec![SignedFormula::new(FdeSign::T, p), SignedFormula::new(FdeSign::F, p)],
                &mut observer,
            )
            .unwrap();
        assert!(outcome.satisfiable);
        let model = crate::model::extract_fde(&outcome.open_branches[0], &arena).unwrap();
        assert_eq!(model.get("p"), Some(crate::model::Value::Both));
    }
}
