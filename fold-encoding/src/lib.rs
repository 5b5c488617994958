//! Recursive data represented by the functions that consume it.
//!
//! An [`Fev`] is a fold-encoded (Boehm-Berarducci) value: the only thing you can
//! do with one is instantiate it against a handler set, one handler per
//! constructor shape. The shapes themselves are described by a [`MappableFrame`]
//! token, so the same machinery works for any list of shapes and arities.
//!
//! Compositional functions (evaluators, printers) are a single [`Fev::fold`].
//! Functions that need to look at the shape of a sub-value before recursing go
//! through [`Fev::classify`], which yields a one-level [`Match`] whose handler
//! receives the raw sub-values.
//!
//! The [`Collapsible`] and [`Expandable`] traits connect fold-encoded values to
//! ordinary tagged trees, using a stack-safe traversal.
mod deconstruct;
mod fold;
mod frame;
mod recursive;

pub use deconstruct::Match;
pub use fold::Fev;
pub use frame::{expand_and_collapse, try_expand_and_collapse, MappableFrame, PartiallyApplied};
pub use recursive::{Collapsible, CollapsibleExt, Expandable, ExpandableExt};
