//! The wKrQ (weak Kleene restricted quantifier) rule set.
//!
//! `T`/`F` mirror CPL exactly. `M` ("may hold") and `N` ("need not hold") are epistemic signs
//! that never contradict anything, so their rules case-split over a connective's truth conditions
//! while preserving that weaker commitment rather than asserting either disjunct outright. The
//! table below is the systematic `T↦M, F↦N` dual of the CPL table, swapping each rule's α/β shape
//! to match — see the per-rule comments for the derivation actually used.
//!
//! Restricted quantifiers are only defined for `T`: `T:[∃x G(x)]B(x)` introduces a fresh witness
//! constant, and `T:[∀x G(x)]B(x)` instantiates the guarded implication over every constant
//! currently in the branch's domain. The latter is implemented by synthesizing `T:(G(c)→B(c))`
//! for each constant and letting the ordinary implication rule branch on it, rather than
//! duplicating that branching logic here.

use crate::formula::{Arena, FormulaNode};
use crate::rule::{priority, Expansion, QuantifierContext, Rule, RuleRegistry};
use crate::sign::WkrqSign;
use crate::signed_formula::SignedFormula;

use WkrqSign::{F, M, N, T};

fn node(sf: SignedFormula<WkrqSign>, arena: &Arena) -> FormulaNode {
    arena.node(sf.formula).clone()
}

pub(crate) fn registry() -> RuleRegistry<WkrqSign> {
    let mut r = RuleRegistry::new();

    r.register(Rule {
        name: "double_negation",
        priority: priority::IMMEDIATE,
        applies: |sf, arena| {
            sf.sign == T
                && matches!(
                    node(sf, arena),
                    FormulaNode::Negation(inner) if matches!(arena.node(inner), FormulaNode::Negation(_))
                )
        },
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            let FormulaNode::Negation(grandchild) = arena.node(inner).clone() else {
                unreachable!()
            };
            Expansion::alpha(vec![SignedFormula::new(T, grandchild)])
        },
    });

    r.register(Rule {
        name: "t_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == T && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(F, inner)])
        },
    });

    r.register(Rule {
        name: "f_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == F && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(T, inner)])
        },
    });

    // M:¬A and N:¬A flip sign across the negation, the epistemic dual of t_negation/f_negation.
    r.register(Rule {
        name: "m_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == M && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(N, inner)])
        },
    });

    r.register(Rule {
        name: "n_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(M, inner)])
        },
    });

    r.register(Rule {
        name: "t_conjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == T && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(T, l), SignedFormula::new(T, r)])
        },
    });

    r.register(Rule {
        name: "f_disjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == F && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(F, l), SignedFormula::new(F, r)])
        },
    });

    r.register(Rule {
        name: "f_implication",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == F && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(T, l), SignedFormula::new(F, r)])
        },
    });

    // "Possibly A∧B" commits to both conjuncts possibly holding together: the M analogue of
    // t_conjunction's α shape.
    r.register(Rule {
        name: "m_conjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == M && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(M, l), SignedFormula::new(M, r)])
        },
    });

    // "Need not A∨B" is the N analogue of f_disjunction's α shape: neither disjunct need hold.
    r.register(Rule {
        name: "n_disjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(N, l), SignedFormula::new(N, r)])
        },
    });

    // "Need not A→B" is the N analogue of f_implication's α shape: A may hold while B need not.
    r.register(Rule {
        name: "n_implication",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(M, l), SignedFormula::new(N, r)])
        },
    });

    r.register(Rule {
        name: "f_conjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == F && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(F, l)], vec![SignedFormula::new(F, r)]])
        },
    });

    r.register(Rule {
        name: "t_disjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == T && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(T, l)], vec![SignedFormula::new(T, r)]])
        },
    });

    r.register(Rule {
        name: "t_implication",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == T && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(F, l)], vec![SignedFormula::new(T, r)]])
        },
    });

    // "Need not A∧B" is the N analogue of f_conjunction's β shape: either conjunct may fail.
    r.register(Rule {
        name: "n_conjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(N, l)], vec![SignedFormula::new(N, r)]])
        },
    });

    // "Possibly A∨B" is the M analogue of t_disjunction's β shape: either disjunct may carry it.
    r.register(Rule {
        name: "m_disjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == M && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(M, l)], vec![SignedFormula::new(M, r)]])
        },
    });

    // "Possibly A→B" is the M analogue of t_implication's β shape: either the antecedent need
    // not hold, or the consequent may.
    r.register(Rule {
        name: "m_implication",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == M && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(N, l)], vec![SignedFormula::new(M, r)]])
        },
    });

    r.register(Rule {
        name: "t_restricted_exists",
        priority: priority::QUANTIFIER,
        applies: |sf, arena| sf.sign == T && matches!(node(sf, arena), FormulaNode::RestrictedExists(_, _, _)),
        expand: |sf, arena, ctx| {
            let FormulaNode::RestrictedExists(var, guard, body) = node(sf, arena) else {
                unreachable!()
            };
            let witness = ctx.fresh_constant(arena);
            let guard = arena.substitute(guard, &var, witness);
            let body = arena.substitute(body, &var, witness);
            Expansion::alpha(vec![SignedFormula::new(T, guard), SignedFormula::new(T, body)])
        },
    });

    // Instantiates the restriction over every constant currently in the branch's domain (plus a
    // fresh one if the domain is empty, so a vacuous universal still witnesses one world) by
    // synthesizing a guarded implication per constant; the already-registered t_implication rule
    // performs the actual case split once each synthesized formula is itself processed. The
    // branch reactivates this signed formula's processed status whenever its domain grows (see
    // `Branch::grow_domain`), so later-introduced constants still get instantiated.
    r.register(Rule {
        name: "t_restricted_forall",
        priority: priority::QUANTIFIER,
        applies: |sf, arena| sf.sign == T && matches!(node(sf, arena), FormulaNode::RestrictedForall(_, _, _)),
        expand: |sf, arena, ctx| {
            let FormulaNode::RestrictedForall(var, guard, body) = node(sf, arena) else {
                unreachable!()
            };
            let mut domain = ctx.domain_constants();
            if domain.is_empty() {
                domain.push(ctx.fresh_constant(arena));
            }
            let instances = domain
                .into_iter()
                .map(|c| {
                    let guard_c = arena.substitute(guard, &var, c);
                    let body_c = arena.substitute(body, &var, c);
                    let implication = arena.implication(guard_c, body_c);
                    SignedFormula::new(T, implication)
                })
                .collect();
            Expansion::alpha(instances)
        },
    });

    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::NullQuantifierContext;

    #[test]
    fn m_and_n_never_contradict_anything() {
        use crate::sign::Sign;
        for a in [T, F, M, N] {
            assert!(!M.contradicts(a));
            assert!(!N.contradicts(a));
        }
    }

    #[test]
    fn m_implication_is_the_epistemic_dual_of_t_implication() {
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let b = arena.atom("b");
        let imp = arena.implication(a, b);
        let sf = SignedFormula::new(M, imp);
        let rule = registry.rule_for(sf, &arena).unwrap();
        assert_eq!(rule.priority, priority::BETA);
        let mut ctx = NullQuantifierContext;
        let expansion = (rule.expand)(sf, &mut arena, &mut ctx);
        assert_eq!(
            expansion.branches,
            vec![vec![SignedFormula::new(N, a)], vec![SignedFormula::new(M, b)]]
        );
    }

    #[test]
    fn t_restricted_exists_introduces_a_fresh_witness() {
        use crate::branch::Branch;

        let registry = registry();
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let guard = arena.predicate("G", vec![x]);
        let body = arena.predicate("B", vec![x]);
        let exists = arena.restricted_exists("x", guard, body);
        let sf = SignedFormula::new(T, exists);
        let rule = registry.rule_for(sf, &arena).unwrap();
        let mut branch = Branch::<WkrqSign>::new(0, None);
        let expansion = (rule.expand)(sf, &mut arena, &mut branch);
        assert!(expansion.is_linear);
        assert_eq!(expansion.branches[0].len(), 2);
    }
}
