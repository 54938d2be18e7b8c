//! The Weak Kleene three-valued logic rule set.
//!
//! `T3`/`F3` rules mirror CPL's `T`/`F` rules exactly. `U`-signed rules instead propagate
//! undefinedness: under weak-Kleene semantics any connective with an undefined operand is itself
//! undefined, regardless of the other operand's value, so a `U`-signed compound branches over
//! "which operand is the undefined one" rather than enumerating a truth table.

use crate::formula::{Arena, FormulaNode};
use crate::rule::{priority, Expansion, Rule, RuleRegistry};
use crate::sign::Wk3Sign;
use crate::signed_formula::SignedFormula;

use Wk3Sign::{F3, T3, U};

fn node(sf: SignedFormula<Wk3Sign>, arena: &Arena) -> FormulaNode {
    arena.node(sf.formula).clone()
}

pub(crate) fn registry() -> RuleRegistry<Wk3Sign> {
    let mut r = RuleRegistry::new();

    r.register(Rule {
        name: "double_negation_t3",
        priority: priority::IMMEDIATE,
        applies: |sf, arena| {
            sf.sign == T3
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
            Expansion::alpha(vec![SignedFormula::new(T3, grandchild)])
        },
    });

    r.register(Rule {
        name: "t3_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == T3 && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(F3, inner)])
        },
    });

    r.register(Rule {
        name: "f3_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == F3 && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(T3, inner)])
        },
    });

    r.register(Rule {
        name: "u_negation",
        priority: priority::NEGATION,
        applies: |sf, arena| sf.sign == U && matches!(node(sf, arena), FormulaNode::Negation(_)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Negation(inner) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(U, inner)])
        },
    });

    r.register(Rule {
        name: "t3_conjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == T3 && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(T3, l), SignedFormula::new(T3, r)])
        },
    });

    r.register(Rule {
        name: "f3_disjunction",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == F3 && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(F3, l), SignedFormula::new(F3, r)])
        },
    });

    r.register(Rule {
        name: "f3_implication",
        priority: priority::ALPHA,
        applies: |sf, arena| sf.sign == F3 && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::alpha(vec![SignedFormula::new(T3, l), SignedFormula::new(F3, r)])
        },
    });

    r.register(Rule {
        name: "f3_conjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == F3 && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(F3, l)], vec![SignedFormula::new(F3, r)]])
        },
    });

    r.register(Rule {
        name: "t3_disjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == T3 && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(T3, l)], vec![SignedFormula::new(T3, r)]])
        },
    });

    r.register(Rule {
        name: "t3_implication",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == T3 && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(F3, l)], vec![SignedFormula::new(T3, r)]])
        },
    });

    // U propagates unconditionally through any binary connective under weak-Kleene semantics:
    // the compound is undefined iff at least one operand is, regardless of the other's value.
    r.register(Rule {
        name: "u_conjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == U && matches!(node(sf, arena), FormulaNode::Conjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Conjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(U, l)], vec![SignedFormula::new(U, r)]])
        },
    });

    r.register(Rule {
        name: "u_disjunction",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == U && matches!(node(sf, arena), FormulaNode::Disjunction(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Disjunction(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(U, l)], vec![SignedFormula::new(U, r)]])
        },
    });

    r.register(Rule {
        name: "u_implication",
        priority: priority::BETA,
        applies: |sf, arena| sf.sign == U && matches!(node(sf, arena), FormulaNode::Implication(_, _)),
        expand: |sf, arena, _ctx| {
            let FormulaNode::Implication(l, r) = node(sf, arena) else { unreachable!() };
            Expansion::beta(vec![vec![SignedFormula::new(U, l)], vec![SignedFormula::new(U, r)]])
        },
    });

    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::NullQuantifierContext;

    #[test]
    fn u_conjunction_branches_over_which_operand_is_undefined() {
        let registry = registry();
        let mut arena = Arena::new();
        let a = arena.atom("a");
        let b = arena.atom("b");
        let conj = arena.conjunction(a, b);
        let sf = SignedFormula::new(U, conj);
        let rule = registry.rule_for(sf, &arena).unwrap();
        let mut ctx = NullQuantifierContext;
        let expansion = (rule.expand)(sf, &mut arena, &mut ctx);
        assert!(!expansion.is_linear);
        assert_eq!(
            expansion.branches,
            vec![vec![SignedFormula::new(U, a)], vec![SignedFormula::new(U, b)]]
        );
    }

    #[test]
    fn u_never_contradicts_t3_or_f3_on_the_same_atom() {
        use crate::sign::Sign;
        assert!(!U.contradicts(T3));
        assert!(!U.contradicts(F3));
    }
}
