pub mod eval;
pub mod naive;
pub mod parse;
pub mod pattern;

use std::fmt;

use fold_encoding::{Fev, MappableFrame, Match, PartiallyApplied};

/// Simple expression language over integers: literals, negation and sums
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprFrame<A> {
    Lit(i64),
    Neg(A),
    Add(A, A),
}

impl MappableFrame for ExprFrame<PartiallyApplied> {
    type Frame<X> = ExprFrame<X>;

    #[inline(always)]
    fn map_frame<A, B>(input: Self::Frame<A>, mut f: impl FnMut(A) -> B) -> Self::Frame<B> {
        match input {
            ExprFrame::Lit(x) => ExprFrame::Lit(x),
            ExprFrame::Neg(a) => ExprFrame::Neg(f(a)),
            ExprFrame::Add(a, b) => ExprFrame::Add(f(a), f(b)),
        }
    }
}

impl fmt::Display for ExprFrame<()> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprFrame::Lit(x) => write!(f, "{}", x),
            ExprFrame::Neg(()) => write!(f, "-_"),
            ExprFrame::Add((), ()) => write!(f, "_ + _"),
        }
    }
}

/// A fold-encoded arithmetic expression.
pub type ExprFev = Fev<ExprFrame<PartiallyApplied>>;

/// One level of an [`ExprFev`], with its immediate sub-expressions left unreduced.
pub type ExprMatch = Match<ExprFrame<PartiallyApplied>>;

pub fn lit(x: i64) -> ExprFev {
    Fev::embed(ExprFrame::Lit(x))
}

pub fn neg(e: ExprFev) -> ExprFev {
    Fev::embed(ExprFrame::Neg(e))
}

pub fn add(a: ExprFev, b: ExprFev) -> ExprFev {
    Fev::embed(ExprFrame::Add(a, b))
}

pub fn match_lit(x: i64) -> ExprMatch {
    Match::layer(ExprFrame::Lit(x))
}

pub fn match_neg(m: ExprMatch) -> ExprMatch {
    Match::layer(ExprFrame::Neg(m))
}

pub fn match_add(a: ExprMatch, b: ExprMatch) -> ExprMatch {
    Match::layer(ExprFrame::Add(a, b))
}

/// Instantiate an [`ExprFev`] with one handler per shape.
pub trait ExprFevExt {
    /// `neg` and `add` receive the already-reduced results of their sub-expressions.
    fn instantiate<R>(
        &self,
        lit: impl FnMut(i64) -> R,
        neg: impl FnMut(R) -> R,
        add: impl FnMut(R, R) -> R,
    ) -> R;
}

impl ExprFevExt for ExprFev {
    fn instantiate<R>(
        &self,
        mut lit: impl FnMut(i64) -> R,
        mut neg: impl FnMut(R) -> R,
        mut add: impl FnMut(R, R) -> R,
    ) -> R {
        self.fold(|frame| match frame {
            ExprFrame::Lit(x) => lit(x),
            ExprFrame::Neg(r) => neg(r),
            ExprFrame::Add(a, b) => add(a, b),
        })
    }
}

/// Instantiate an [`ExprMatch`] with one handler per shape.
pub trait ExprMatchExt {
    /// Exactly one of the handlers is called. `dneg` and `dadd` receive raw sub-expressions.
    fn on_shape<W>(
        &self,
        dlit: impl FnOnce(i64) -> W,
        dneg: impl FnOnce(ExprFev) -> W,
        dadd: impl FnOnce(ExprFev, ExprFev) -> W,
    ) -> W;
}

impl ExprMatchExt for ExprMatch {
    fn on_shape<W>(
        &self,
        dlit: impl FnOnce(i64) -> W,
        dneg: impl FnOnce(ExprFev) -> W,
        dadd: impl FnOnce(ExprFev, ExprFev) -> W,
    ) -> W {
        self.on(|frame| match frame {
            ExprFrame::Lit(x) => dlit(x),
            ExprFrame::Neg(e) => dneg(e),
            ExprFrame::Add(a, b) => dadd(a, b),
        })
    }
}
