//! Non-compositional functions: these inspect the shape of a sub-expression
//! before deciding how to recurse, via the classifier.
use tracing::trace;

use crate::expr::{add, lit, neg, ExprFev, ExprMatchExt};

/// `Some(x)` iff `e` is the literal `x`
pub fn as_lit(e: &ExprFev) -> Option<i64> {
    e.classify().on_shape(Some, |_| None, |_, _| None)
}

/// `Some(inner)` iff `e` is a negation
pub fn as_neg(e: &ExprFev) -> Option<ExprFev> {
    e.classify().on_shape(|_| None, Some, |_, _| None)
}

/// `Some((a, b))` iff `e` is a sum
pub fn as_add(e: &ExprFev) -> Option<(ExprFev, ExprFev)> {
    e.classify()
        .on_shape(|_| None, |_| None, |a, b| Some((a, b)))
}

/// Push negations inward until they only apply to literals.
///
/// Double negations cancel and a negated sum becomes the sum of the negated
/// operands. Every recursive call is on a strictly smaller expression, so the
/// recursion depth is bounded by the size of `e`.
pub fn push_neg(e: &ExprFev) -> ExprFev {
    e.classify().on_shape(
        lit,
        |inner| {
            inner.classify().on_shape(
                |x| neg(lit(x)),
                |x| {
                    trace!("cancelling double negation");
                    push_neg(&x)
                },
                |a, b| {
                    trace!("distributing negation over sum");
                    add(push_neg(&neg(a)), push_neg(&neg(b)))
                },
            )
        },
        |a, b| add(push_neg(&a), push_neg(&b)),
    )
}

/// True iff every negation in `e` applies directly to a literal.
pub fn is_negation_normal(e: &ExprFev) -> bool {
    if let Some((a, b)) = as_add(e) {
        is_negation_normal(&a) && is_negation_normal(&b)
    } else if let Some(inner) = as_neg(e) {
        as_lit(&inner).is_some()
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::eval::{eval, write};
    use crate::expr::naive::{arb_expr, from_fev, to_fev};
    use proptest::proptest;

    #[test]
    fn push_neg_examples() {
        assert_eq!(write(&push_neg(&neg(neg(lit(1))))), "1");
        assert_eq!(
            write(&push_neg(&neg(add(neg(lit(1)), lit(2))))),
            "(1+(-2))"
        );
        assert_eq!(write(&push_neg(&neg(lit(1)))), "(-1)");
        assert_eq!(
            write(&push_neg(&neg(neg(neg(add(lit(1), neg(lit(2)))))))),
            "((-1)+2)"
        );
    }

    #[test]
    fn extractors() {
        assert_eq!(as_lit(&lit(4)), Some(4));
        assert_eq!(as_lit(&neg(lit(4))), None);

        let inner = as_neg(&neg(add(lit(1), lit(2)))).map(|e| write(&e));
        assert_eq!(inner.as_deref(), Some("(1+2)"));

        let (a, b) = match as_add(&add(neg(lit(1)), lit(2))) {
            Some(parts) => parts,
            None => panic!("expected a sum"),
        };
        // nested sub-pattern: the left operand is itself a negated literal
        assert_eq!(as_neg(&a).and_then(|x| as_lit(&x)), Some(1));
        assert_eq!(as_lit(&b), Some(2));
    }

    #[test]
    fn negation_normal_form() {
        assert!(is_negation_normal(&add(neg(lit(1)), lit(2))));
        assert!(!is_negation_normal(&neg(neg(lit(1)))));
        assert!(!is_negation_normal(&add(lit(0), neg(add(lit(1), lit(2))))));
    }

    proptest! {
        #[test]
        fn classify_then_rebuild_is_identity(expr in arb_expr()) {
            let e = to_fev(&expr);

            assert_eq!(from_fev(&e.classify().rebuild()), expr);
            assert_eq!(from_fev(&e.classify().on_shape(lit, neg, add)), expr);
        }

        #[test]
        fn exactly_one_extractor_matches(expr in arb_expr()) {
            let e = to_fev(&expr);
            let matched = [
                as_lit(&e).is_some(),
                as_neg(&e).is_some(),
                as_add(&e).is_some(),
            ];

            assert_eq!(matched.iter().filter(|m| **m).count(), 1);
        }

        #[test]
        fn push_neg_normalizes_and_preserves_value(expr in arb_expr()) {
            let e = to_fev(&expr);
            let pushed = push_neg(&e);

            assert!(is_negation_normal(&pushed));
            assert_eq!(eval(&pushed), eval(&e));
            // already normal, so a second pass changes nothing
            assert_eq!(from_fev(&push_neg(&pushed)), from_fev(&pushed));
        }
    }
}
