//! The closed error taxonomy exposed across the engine's API boundary.

use thiserror::Error;

/// Every fallible operation on [`crate::engine::Engine`] returns one of these kinds.
///
/// `NoApplicableRule` and `ModelExtractionFromClosedBranch` are programming errors: if the
/// engine or a caller ever triggers them, that indicates a bug rather than an operational
/// outcome, but we still return them instead of panicking so that embedding applications can
/// decide how to surface the failure. `ResourceExhausted` and `Cancelled` are genuine
/// operational outcomes and are returned with whatever partial results the engine has at the
/// time they are raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// [`crate::engine::Engine::build`] was called with an empty list of initial signed formulas.
    #[error("build() called with no initial signed formulas")]
    NoInitialFormulas,

    /// [`crate::engine::Engine::new`] was given a logic name that has no registered [`crate::rule::RuleRegistry`].
    #[error("unknown logic: {0}")]
    UnknownLogic(String),

    /// The engine selected a signed formula for which the registry returned no applicable rule.
    ///
    /// This should be unreachable given a correctly constructed registry, since
    /// [`crate::branch::Branch::next_expandable`] only ever returns signed formulas that an
    /// applicability predicate has already confirmed are expandable.
    #[error("no applicable rule for a signed formula the branch reported as expandable (internal engine bug)")]
    NoApplicableRule,

    /// The number of live branches exceeded [`crate::engine::EngineConfig::max_branches`].
    #[error("resource exhausted: exceeded max_branches ({0})")]
    ResourceExhausted(usize),

    /// An external cancellation flag tripped between rule applications.
    #[error("build cancelled")]
    Cancelled,

    /// A caller attempted to extract a model from a closed branch.
    #[error("cannot extract a model from a closed branch (id {0})")]
    ModelExtractionFromClosedBranch(u64),

    /// A quantifier rule could not avoid variable capture while generating a fresh name.
    ///
    /// Unreachable in practice: fresh names are branch-scoped counters (see
    /// [`crate::branch::Branch::fresh_constant`]) that can never collide with a name already in
    /// use, but the variant is kept so the taxonomy stays closed if a future rule set needs it.
    #[error("substitution could not avoid variable capture for variable {0}")]
    SubstitutionCapture(String),
}
