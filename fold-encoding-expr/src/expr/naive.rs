use crate::expr::*;
use fold_encoding::{Collapsible, Expandable, Fev, MappableFrame, PartiallyApplied};
use proptest::prelude::*;

/// simple naive tagged representation of a recursive expression AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    LiteralInt(i64),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
}

pub fn mk_lit(x: i64) -> Expr {
    Expr::LiteralInt(x)
}

pub fn mk_neg(e: Expr) -> Expr {
    Expr::Neg(Box::new(e))
}

pub fn mk_add(a: Expr, b: Expr) -> Expr {
    Expr::Add(Box::new(a), Box::new(b))
}

impl<'a> Collapsible for &'a Expr {
    type FrameToken = ExprFrame<PartiallyApplied>;

    #[inline(always)]
    fn into_frame(self) -> <Self::FrameToken as MappableFrame>::Frame<Self> {
        match self {
            Expr::LiteralInt(x) => ExprFrame::Lit(*x),
            Expr::Neg(a) => ExprFrame::Neg(a),
            Expr::Add(a, b) => ExprFrame::Add(a, b),
        }
    }
}

impl Expandable for Expr {
    type FrameToken = ExprFrame<PartiallyApplied>;

    fn from_frame(val: <Self::FrameToken as MappableFrame>::Frame<Self>) -> Self {
        match val {
            ExprFrame::Lit(x) => mk_lit(x),
            ExprFrame::Neg(a) => mk_neg(a),
            ExprFrame::Add(a, b) => mk_add(a, b),
        }
    }
}

/// Rebuild a fold-encoded value from the tagged tree, driven by the tree's own
/// structural recursion with the smart constructors as targets.
pub fn to_fev(expr: &Expr) -> ExprFev {
    Fev::from_collapsible(expr)
}

/// Instantiate against the tagged constructors.
pub fn from_fev(e: &ExprFev) -> Expr {
    e.instantiate(mk_lit, mk_neg, mk_add)
}

pub fn naive_eval(expr: &Expr) -> i64 {
    match expr {
        Expr::LiteralInt(x) => *x,
        Expr::Neg(a) => naive_eval(a).wrapping_neg(),
        Expr::Add(a, b) => naive_eval(a).wrapping_add(naive_eval(b)),
    }
}

pub fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![any::<i8>().prop_map(|x| mk_lit(x as i64)),];
    leaf.prop_recursive(
        8,   // 8 levels deep
        256, // Shoot for maximum size of 256 nodes
        10,  // We put up to 10 items per collection
        |inner| {
            prop_oneof![
                inner.clone().prop_map(mk_neg),
                (inner.clone(), inner).prop_map(|(a, b)| mk_add(a, b)),
            ]
        },
    )
}
