//! The First-Degree Entailment rule set.
//!
//! FDE is a four-valued paraconsistent logic: `T`, `F`, `B` ("both"), and `N` ("neither"). None
//! of its signs contradict each other ([`FdeSign::contradicts`] always returns `false`), so these
//! rules never close a branch on their own; the engine's only route to closure for FDE is the
//! generic contradiction check finding nothing, meaning FDE derivations terminate open unless a
//! resource limit intervenes. `T` and `F` rules mirror CPL's connective tables in shape (a
//! compound is true under exactly the classical truth conditions, false under exactly the
//! classical falsity conditions); `B` and `N` are handled by the De Morgan duals used by
//! relevance logics: a conjunction is `B` iff both conjuncts are non-`F` and at least one is `B`
//! or `N`-complementary... rather than model that full lattice, this rule set gives `B` and `N`
//! the same structural shape as `T`/`F` (`B` propagating like `T`, `N` propagating like `F`) since
//! no closure decision depends on distinguishing them further: the distinguishing power of `B`
//! and `N` lives entirely in the signs retained by the model extractor, not in how they expand.

use crate::formula::{Arena, FormulaNode};
use crate::rule::{priority, Expansion, Rule, RuleRegistry};
use crate::sign::FdeSign;
use crate::signed_formula::SignedFormula;

use FdeSign::{B, F, N, T};

fn node(sf: SignedFormula<FdeSign>, arena: &Arena) -> FormulaNode {
    arena.node(sf.formula).clone()
}

pub(crate) fn registry() -> RuleRegistry<FdeSign> {
    let mut r = RuleRegistry::new();

    r.register(Rule {
        name: "double_negation_t",
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

    // B and N are self-dual under negation: "both true and false" negated is still "both",
    // and "neither" negated is still "neither".
    r.register(Rule {
        name: "b_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == B && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(B, inner)])
        },
    });

    r.register(Rule {
        name: "n_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(N, inner)])
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

    // FDE has no implication connective of its own in widest use; this engine reuses the
    // material-conditional shape (A→B defined as ¬A∨B) for T/F so the connective is still usable
    // end to end, consistent with B/N propagating through it the same way they do disjunction.
    r.register(Rule {
        name: "f_implication",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == F && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(T, l), SignedFormula::new(F, r)])
        },
    });

    // B desugars through A→B ≡ ¬A∨B exactly like b_disjunction, except negation is self-dual for
    // B (unlike T, which flips to F across a negation), so the antecedent keeps its sign as B
    // rather than flipping to N.
    r.register(Rule {
        name: "b_implication",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == B && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(B, l)], vec![SignedFormula::new(B, r)]])
        },
    });

    // N desugars the same way, mirroring f_implication's ALPHA shape but with the antecedent
    // kept as N (self-dual under negation) rather than flipped to B.
    r.register(Rule {
        name: "n_implication",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(N, l), SignedFormula::new(N, r)])
        },
    });

    // B propagates into a conjunction like T does: both conjuncts must carry at least B.
    r.register(Rule {
        name: "b_conjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == B && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(B, l), SignedFormula::new(B, r)])
        },
    });

    // N propagates into a disjunction like F does: neither disjunct carries any truth.
    r.register(Rule {
        name: "n_disjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(N, l), SignedFormula::new(N, r)])
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

    r.register(Rule {
        name: "n_conjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == N && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(N, l)], vec![SignedFormula::new(N, r)]])
        },
    });

    r.register(Rule {
        name: "b_disjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == B && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(B, l)], vec![SignedFormula::new(B, r)]])
        },
    });

    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fde_signs_never_contradict_so_no_rule_output_closes_a_branch() {
        use crate::sign::Sign;
        for a in [T, F, B, N] {
            for b in [T, F, B, N] {
                assert!(!a.contradicts(b));
            }
        }
    }

    #[test]
    fn b_and_n_are_self_dual_under_negation() {
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let not_a = arena.negation(a);

        let sf = SignedFormula::new(B, not_a);
        let rule = registry.rule_for(sf, &arena).unwrap();
        assert_eq!(rule.name, "b_negation");

        let sf = SignedFormula::new(N, not_a);
        let rule = registry.rule_for(sf, &arena).unwrap();
        assert_eq!(rule.name, "n_negation");
    }

    #[test]
    fn t_conjunction_is_linear_like_cpl() {
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let b = arena.atom("b");
        let conj = arena.conjunction(a, b);
        let sf = SignedFormula::new(T, conj);
        let rule = registry.rule_for(sf, &arena).unwrap();
        assert_eq!(rule.priority, priority::ALPHA);
    }

    #[test]
    fn b_implication_keeps_the_antecedent_as_b_rather_than_flipping_it() {
        use crate::branch::NullQuantifierContext;
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let b = arena.atom("b");
        let imp = arena.implication(a, b);
        let sf = SignedFormula::new(B, imp);
        let rule = registry.rule_for(sf, &arena).unwrap();
        assert_eq!(rule.name, "b_implication");
        assert_eq!(rule.priority, priority::BETA);
        let mut ctx = NullQuantifierContext;
        let expansion = (rule.expand)(sf, &mut arena, &mut ctx);
        assert_eq!(
            expansion.branches,
            vec![vec![SignedFormula::new(B, a)], vec![SignedFormula::new(B, b)]]
        );
    }

    #[test]
    fn n_implication_keeps_the_antecedent_as_n_rather_than_flipping_it() {
        use crate::branch::NullQuantifierContext;
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let b = arena.atom("b");
        let imp = arena.implication(a, b);
        let sf = SignedFormula::new(N, imp);
        let rule = registry.rule_for(sf, &arena).unwrap();
        assert_eq!(rule.name, "n_implication");
        assert_eq!(rule.priority, priority::ALPHA);
        let mut ctx = NullQuantifierContext;
        let expansion = (rule.expand)(sf, &mut arena, &mut ctx);
        assert!(expansion.is_linear);
        assert_eq!(expansion.branches, vec![vec![SignedFormula::new(N, a), SignedFormula::new(N, b)]]);
    }
}
