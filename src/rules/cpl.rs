//! The Classical Propositional Logic rule set.

use crate::formula::{Arena, FormulaNode};
use crate::rule::{priority, Expansion, Rule, RuleRegistry};
use crate::sign::CplSign;
use crate::signed_formula::SignedFormula;

use CplSign::{F, T};

fn node(sf: SignedFormula<CplSign>, arena: &Arena) -> FormulaNode {
    arena.node(sf.formula).clone()
}

/// Builds the CPL rule registry: one rule per (sign, connective) pair, plus the priority-0
/// double-negation simplification.
pub(crate) fn registry() -> RuleRegistry<CplSign> {
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

    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::NullQuantifierContext;

    #[test]
    fn double_negation_outranks_generic_negation_rule() {
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let not_a = arena.negation(a);
        let not_not_a = arena.negation(not_a);
        let sf = SignedFormula::new(T, not_not_a);
        let rule = registry.rule_for(sf, &arena).expect("a rule should apply");
        assert_eq!(rule.name, "double_negation");
        let mut ctx = NullQuantifierContext;
        let expansion = (rule.expand)(sf, &mut arena, &mut ctx);
        assert!(expansion.is_linear);
        assert_eq!(expansion.branches, vec![vec![SignedFormula::new(T, a)]]);
    }

    #[test]
    fn f_conjunction_is_a_branching_rule() {
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let b = arena.atom("b");
        let conj = arena.conjunction(a, b);
        let sf = SignedFormula::new(F, conj);
        let rule = registry.rule_for(sf, &arena).unwrap();
        assert_eq!(rule.priority, priority::BETA);
        let mut ctx = NullQuantifierContext;
        let expansion = (rule.expand)(sf, &mut arena, &mut ctx);
        assert!(!expansion.is_linear);
        assert_eq!(expansion.branches.len(), 2);
    }

    #[test]
    fn atoms_have_no_applicable_rule() {
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        assert!(registry.rule_for(SignedFormula::new(T, a), &arena).is_none());
    }
}
