//! Support for collapsing and expanding concrete recursive structures by
//! repeatedly expanding or collapsing them one frame at a time.
//!
//! These traits are the bridge between tagged, heap-allocated trees and
//! fold-encoded values: anything `Collapsible` can be turned into an [`crate::Fev`],
//! and an [`crate::Fev`] can be materialized into anything `Expandable`.
use crate::frame::{expand_and_collapse, try_expand_and_collapse, MappableFrame};

/// The ability to recursively collapse some type into some output type, frame by frame.
/// For example:
///
/// ```rust
/// use fold_encoding::{Collapsible, CollapsibleExt, MappableFrame, PartiallyApplied};
///
/// enum IntTreeFrame<A> {
///     Leaf { value: usize },
///     Node { left: A, right: A },
/// }
/// impl MappableFrame for IntTreeFrame<PartiallyApplied> {
///     type Frame<X> = IntTreeFrame<X>;
///
///     fn map_frame<A, B>(input: Self::Frame<A>, mut f: impl FnMut(A) -> B) -> Self::Frame<B> {
///         match input {
///             IntTreeFrame::Leaf { value } => IntTreeFrame::Leaf { value },
///             IntTreeFrame::Node { left, right } => IntTreeFrame::Node {
///                 left: f(left),
///                 right: f(right),
///             },
///         }
///     }
/// }
///
/// enum IntTree {
///     Leaf { value: usize },
///     Node { left: Box<Self>, right: Box<Self> },
/// }
///
/// impl<'a> Collapsible for &'a IntTree {
///     type FrameToken = IntTreeFrame<PartiallyApplied>;
///
///     fn into_frame(self) -> <Self::FrameToken as MappableFrame>::Frame<Self> {
///         match self {
///             IntTree::Leaf { value } => IntTreeFrame::Leaf { value: *value },
///             IntTree::Node { left, right } => IntTreeFrame::Node {
///                 left: left.as_ref(),
///                 right: right.as_ref(),
///             },
///         }
///     }
/// }
///
/// let tree = IntTree::Node {
///     left: Box::new(IntTree::Leaf { value: 1 }),
///     right: Box::new(IntTree::Leaf { value: 2 }),
/// };
///
/// let sum = (&tree).collapse_frames(|frame| match frame {
///     IntTreeFrame::Leaf { value } => value,
///     IntTreeFrame::Node { left, right } => left + right,
/// });
///
/// assert_eq!(sum, 3);
/// ```
pub trait Collapsible
where
    Self: Sized,
{
    type FrameToken: MappableFrame;

    /// Given an instance of this type, generate a frame holding the data owned by it,
    /// with any recursive instances of 'Self' owned by this node as the frame elements
    fn into_frame(self) -> <Self::FrameToken as MappableFrame>::Frame<Self>;
}

pub trait CollapsibleExt: Collapsible
where
    Self: Sized,
{
    /// Given an instance of this type, collapse it into a single value of type 'Out' by
    /// traversing the recursive structure of 'self', generating frames, and collapsing
    /// those frames using some function from 'Frame<Out> -> Out'
    fn collapse_frames<Out>(
        self,
        collapse_frame: impl FnMut(<Self::FrameToken as MappableFrame>::Frame<Out>) -> Out,
    ) -> Out;

    /// Fallible version of `collapse_frames`. Stops at the first error.
    fn try_collapse_frames<Out, E>(
        self,
        collapse_frame: impl FnMut(<Self::FrameToken as MappableFrame>::Frame<Out>) -> Result<Out, E>,
    ) -> Result<Out, E>;
}

impl<X> CollapsibleExt for X
where
    X: Collapsible,
{
    fn collapse_frames<Out>(
        self,
        collapse_frame: impl FnMut(<Self::FrameToken as MappableFrame>::Frame<Out>) -> Out,
    ) -> Out {
        expand_and_collapse::<Self::FrameToken, Self, Out>(self, Self::into_frame, collapse_frame)
    }

    fn try_collapse_frames<Out, E>(
        self,
        collapse_frame: impl FnMut(<Self::FrameToken as MappableFrame>::Frame<Out>) -> Result<Out, E>,
    ) -> Result<Out, E> {
        try_expand_and_collapse::<Self::FrameToken, Self, Out, E>(
            self,
            |x| Ok(Self::into_frame(x)),
            collapse_frame,
        )
    }
}

/// The ability to build some type from a single frame whose recursive positions
/// already hold instances of that type.
pub trait Expandable
where
    Self: Sized,
{
    type FrameToken: MappableFrame;

    /// Given a frame holding instances of `Self`, construct an instance of `Self`
    fn from_frame(val: <Self::FrameToken as MappableFrame>::Frame<Self>) -> Self;
}

pub trait ExpandableExt: Expandable {
    /// Given a value of type 'In', expand it to generate a value of type 'Self' by
    /// repeatedly expanding seeds into frames via some function 'In -> Frame<In>'
    fn expand_frames<In>(
        input: In,
        expand_frame: impl FnMut(In) -> <Self::FrameToken as MappableFrame>::Frame<In>,
    ) -> Self;
}

impl<X> ExpandableExt for X
where
    X: Expandable,
{
    fn expand_frames<In>(
        input: In,
        expand_frame: impl FnMut(In) -> <Self::FrameToken as MappableFrame>::Frame<In>,
    ) -> Self {
        expand_and_collapse::<Self::FrameToken, In, Self>(input, expand_frame, Self::from_frame)
    }
}
