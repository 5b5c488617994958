//! Compositional interpreters: each one is a single instantiation, with one
//! handler per shape combining already-computed sub-results.
use crate::expr::{ExprFev, ExprFevExt, ExprFrame};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("negating {0} overflows i64")]
    NegOverflow(i64),
    #[error("{0} + {1} overflows i64")]
    AddOverflow(i64, i64),
}

/// One evaluation step, for use with frame-at-a-time traversals.
#[inline(always)]
pub fn eval_layer(frame: ExprFrame<i64>) -> i64 {
    match frame {
        ExprFrame::Lit(x) => x,
        ExprFrame::Neg(a) => a.wrapping_neg(),
        ExprFrame::Add(a, b) => a.wrapping_add(b),
    }
}

/// Checked counterpart of [`eval_layer`].
pub fn eval_layer_checked(frame: ExprFrame<i64>) -> Result<i64, EvalError> {
    match frame {
        ExprFrame::Lit(x) => Ok(x),
        ExprFrame::Neg(a) => a.checked_neg().ok_or(EvalError::NegOverflow(a)),
        ExprFrame::Add(a, b) => a.checked_add(b).ok_or(EvalError::AddOverflow(a, b)),
    }
}

/// Evaluate with wrapping arithmetic.
pub fn eval(e: &ExprFev) -> i64 {
    e.instantiate(|x| x, |a: i64| a.wrapping_neg(), |a: i64, b| a.wrapping_add(b))
}

/// Evaluate, failing on the innermost operation that overflows.
pub fn eval_checked(e: &ExprFev) -> Result<i64, EvalError> {
    e.try_fold(eval_layer_checked)
}

/// Fully parenthesized printed form, eg `(1+(-2))`. [`crate::expr::parse::parse`] reads it back.
pub fn write(e: &ExprFev) -> String {
    e.instantiate(
        |x| x.to_string(),
        |a| format!("(-{})", a),
        |a, b| format!("({}+{})", a, b),
    )
}

pub fn depth(e: &ExprFev) -> usize {
    e.instantiate(|_| 1, |a| a + 1, |a: usize, b| a.max(b) + 1)
}

pub fn size(e: &ExprFev) -> usize {
    e.instantiate(|_| 1, |a| a + 1, |a, b| a + b + 1)
}
