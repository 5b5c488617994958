//! Reader for the printed form produced by [`crate::expr::eval::write`].
//!
//! ```text
//! expr := int | '(' expr '+' expr ')' | '(' '-' expr ')'
//! int  := '-'? digit+
//! ```
//!
//! Whitespace is allowed between tokens. Inside parentheses the sum is tried
//! first, so `(-3+4)` is a sum whose left operand is the literal `-3`, while
//! `(-3)` and `(--3)` are negations.
use chumsky::{error::RichReason, prelude::*};
use tracing::debug;

use crate::expr::{add, lit, neg, ExprFev};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input at offset {offset}, expected {}", .expected.join(" or "))]
    UnexpectedEnd { offset: usize, expected: Vec<String> },
    #[error("unexpected '{found}' at offset {offset}, expected {}", .expected.join(" or "))]
    Unexpected {
        found: char,
        offset: usize,
        expected: Vec<String>,
    },
    #[error("integer literal '{literal}' at offset {offset} does not fit in i64")]
    IntOutOfRange { literal: String, offset: usize },
}

impl ParseError {
    /// byte offset into the input where the error was detected
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedEnd { offset, .. }
            | ParseError::Unexpected { offset, .. }
            | ParseError::IntOutOfRange { offset, .. } => *offset,
        }
    }

    fn from_rich(input: &str, err: &Rich<'_, char>) -> Self {
        let span = err.span();
        if let RichReason::Custom(_) = err.reason() {
            return ParseError::IntOutOfRange {
                literal: input[span.start..span.end].to_string(),
                offset: span.start,
            };
        }

        let expected = err.expected().map(|p| p.to_string()).collect();
        match err.found() {
            Some(found) => ParseError::Unexpected {
                found: *found,
                offset: span.start,
                expected,
            },
            None => ParseError::UnexpectedEnd {
                offset: span.start,
                expected,
            },
        }
    }
}

type Extra<'src> = extra::Err<Rich<'src, char>>;

fn int<'src>() -> impl Parser<'src, &'src str, i64, Extra<'src>> + Clone {
    just('-')
        .or_not()
        .then(text::digits(10))
        .to_slice()
        .validate(|literal: &str, extra, emit| match literal.parse::<i64>() {
            Ok(x) => x,
            Err(_) => {
                emit.emit(Rich::custom(
                    extra.span(),
                    format!("integer literal {} does not fit in i64", literal),
                ));
                0
            }
        })
        .labelled("integer")
}

fn expr<'src>() -> impl Parser<'src, &'src str, ExprFev, Extra<'src>> {
    recursive(|expr| {
        let sum = expr
            .clone()
            .then_ignore(just('+').padded())
            .then(expr.clone())
            .map(|(a, b)| add(a, b));

        let negation = just('-').padded().ignore_then(expr).map(neg);

        let parenthesized = sum
            .or(negation)
            .delimited_by(just('(').padded(), just(')').padded())
            .labelled("parenthesized expression");

        int().padded().map(lit).or(parenthesized)
    })
}

pub fn parse(input: &str) -> Result<ExprFev, ParseError> {
    let parsed = expr()
        .then_ignore(end())
        .parse(input)
        .into_result()
        .map_err(|errs| match errs.first() {
            Some(err) => ParseError::from_rich(input, err),
            None => ParseError::UnexpectedEnd {
                offset: input.len(),
                expected: Vec::new(),
            },
        })?;
    debug!(len = input.len(), "parsed expression");
    Ok(parsed)
}
