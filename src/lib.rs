//! A signed semantic tableau engine deciding satisfiability of propositional and restricted
//! quantifier first-order formulas across several logics.
//!
//! The engine is generic over a [`Sign`] implementation rather than tied to one logic: classical
//! propositional logic ([`CplSign`]), weak Kleene three-valued logic ([`Wk3Sign`]), Ferguson's
//! four-signed epistemic wKrQ ([`WkrqSign`]), and first-degree entailment ([`FdeSign`]) all share
//! the same [`Engine`] control loop and [`Branch`] bookkeeping; only the [`Sign`] implementation
//! and the rule table built for it differ.
//!
//! A typical run: build formulas in an [`Arena`], pair the ones you want to commit to with signs
//! into [`SignedFormula`]s, hand them to [`Engine::build`], then read [`BuildOutcome::satisfiable`]
//! and extract a [`Model`] from any of `BuildOutcome::open_branches` with the matching `extract_*`
//! function.
//!
//! ```
//! use tableaux::{Arena, CplSign, Engine, EngineConfig, NullObserver, SignedFormula, extract_cpl};
//!
//! let mut arena = Arena::new();
//! let p = arena.atom("p");
//! let q = arena.atom("q");
//! let disj = arena.disjunction(p, q);
//!
//! let engine = Engine::cpl(EngineConfig::default());
//! let outcome = engine
//!     .build(&mut arena, vec![SignedFormula::new(CplSign::T, disj)], &mut NullObserver)
//!     .unwrap();
//!
//! assert!(outcome.satisfiable);
//! let model = extract_cpl(&outcome.open_branches[0], &arena).unwrap();
//! // The model is a total assignment: both atoms appear, and whichever one the branch never
//! // asserted defaults to false rather than being omitted.
//! assert!(model.get("p") == Some(tableaux::Value::True) || model.get("q") == Some(tableaux::Value::True));
//! assert_ne!(model.get("p"), None);
//! assert_ne!(model.get("q"), None);
//! ```

mod branch;
mod engine;
mod error;
mod formula;
mod model;
mod rule;
mod rules;
mod sign;
mod signed_formula;
mod term;

pub use branch::Branch;
pub use engine::{
    new_engine, new_engine_with_config, AnyEngine, BuildOutcome, Engine, EngineConfig,
    EngineObserver, NullObserver, Statistics,
};
pub use error::EngineError;
pub use formula::{Arena, FormulaId};
pub use model::{extract_cpl, extract_fde, extract_wk3, extract_wkrq, Model, Value};
pub use rule::{priority, Expansion, QuantifierContext, Rule, RuleRegistry};
pub use sign::{CplSign, FdeSign, Sign, Wk3Sign, WkrqSign};
pub use signed_formula::SignedFormula;
pub use term::TermId;
