use std::fmt;
use std::rc::Rc;

use crate::deconstruct::Match;
use crate::frame::MappableFrame;
use crate::recursive::{Collapsible, CollapsibleExt, Expandable};

/// Opaque handle to a result produced by a handler during one instantiation.
///
/// An `Fev` never sees the result type its caller picked; it only ever receives
/// slots from the handler set and hands them back inside frames. Since nothing
/// outside this crate can mint a `Slot`, every slot an `Fev` passes along was
/// produced by the handler set of the current instantiation.
pub(crate) struct Slot(pub(crate) usize);

type Instantiate<F> = dyn Fn(&mut dyn FnMut(<F as MappableFrame>::Frame<Slot>) -> Slot) -> Slot;

/// Results produced during one instantiation, waiting to be handed to their parent frame.
///
/// Each result is consumed exactly once, by the frame that encloses it, so freed
/// positions are recycled and the store only ever holds the current frontier.
struct SlotStore<R> {
    vals: Vec<Option<R>>,
    free: Vec<usize>,
}

impl<R> SlotStore<R> {
    fn new() -> Self {
        Self {
            vals: Vec::new(),
            free: Vec::new(),
        }
    }

    fn put(&mut self, val: R) -> Slot {
        match self.free.pop() {
            Some(idx) => {
                self.vals[idx] = Some(val);
                Slot(idx)
            }
            None => {
                self.vals.push(Some(val));
                Slot(self.vals.len() - 1)
            }
        }
    }

    fn take(&mut self, Slot(idx): Slot) -> R {
        let val = self.vals[idx]
            .take()
            .expect("fold results are consumed exactly once");
        self.free.push(idx);
        val
    }
}

/// A fold-encoded (Boehm-Berarducci) value over the shapes described by `F`.
///
/// Conceptually `∀R. (F::Frame<R> -> R) -> R`: given a handler set producing
/// some caller-chosen `R`, it produces exactly one `R`. There is no tag and no
/// field access; everything about a value is learned by instantiating it with
/// [`Fev::fold`], and shape inspection goes through [`Fev::classify`].
///
/// Values are immutable and cheap to clone. Instantiation borrows the value, so
/// the same `Fev` (or a shared sub-value) can be instantiated any number of times.
///
/// Instantiation recurses on the call stack, one level per level of nesting.
pub struct Fev<F: MappableFrame>(Rc<Instantiate<F>>);

impl<F: MappableFrame> Clone for Fev<F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<F: MappableFrame> fmt::Debug for Fev<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fev").finish_non_exhaustive()
    }
}

impl<F: MappableFrame> Fev<F> {
    /// Instantiate this value against a handler set.
    ///
    /// The handler set sees one frame per constructor in the value, innermost first,
    /// with recursive positions already reduced to `R`.
    pub fn fold<R>(&self, mut alg: impl FnMut(F::Frame<R>) -> R) -> R {
        let mut store = SlotStore::new();
        let root = (self.0)(&mut |frame: F::Frame<Slot>| {
            let frame = F::map_frame(frame, |slot| store.take(slot));
            let out = alg(frame);
            store.put(out)
        });
        store.take(root)
    }

    /// Fallible instantiation. Once a handler returns an error no further handler
    /// is called, and that first error is returned.
    pub fn try_fold<R, E>(&self, mut alg: impl FnMut(F::Frame<R>) -> Result<R, E>) -> Result<R, E> {
        let mut store = SlotStore::new();
        let mut failed = None;
        let root = (self.0)(&mut |frame: F::Frame<Slot>| {
            if failed.is_some() {
                // the slot is never read once an error has been recorded
                return Slot(usize::MAX);
            }
            let frame = F::map_frame(frame, |slot| store.take(slot));
            match alg(frame) {
                Ok(out) => store.put(out),
                Err(e) => {
                    failed = Some(e);
                    Slot(usize::MAX)
                }
            }
        });
        match failed {
            Some(e) => Err(e),
            None => Ok(store.take(root)),
        }
    }

    /// Materialize this value as some concrete recursive type, by instantiating it
    /// against that type's constructors.
    pub fn into_expandable<T: Expandable<FrameToken = F>>(&self) -> T {
        self.fold(T::from_frame)
    }
}

impl<F> Fev<F>
where
    F: MappableFrame + 'static,
    F::Frame<Fev<F>>: Clone + 'static,
{
    /// The generic smart constructor: wrap one shape whose recursive positions
    /// hold other `Fev`s.
    ///
    /// Instantiating the result threads the same handler set through every
    /// sub-value first, then applies it once to the frame of reduced results.
    pub fn embed(frame: F::Frame<Fev<F>>) -> Self {
        Fev(Rc::new(move |alg: &mut dyn FnMut(F::Frame<Slot>) -> Slot| {
            let reduced = F::map_frame(frame.clone(), |sub| (sub.0)(&mut *alg));
            alg(reduced)
        }))
    }

    /// Instantiate this value against [`Fev::embed`], producing an extensionally
    /// equal value.
    pub fn rebuild(&self) -> Self {
        self.fold(Fev::embed)
    }

    /// Turn this value into its one-level deconstruction encoding.
    ///
    /// This is itself a single instantiation, using the [`Match`] smart
    /// constructor as the handler set. The whole value is traversed, so
    /// classifying is linear in the size of `self`.
    pub fn classify(&self) -> Match<F> {
        self.fold(Match::layer)
    }

    /// Convert a concrete recursive structure using its own structural recursion,
    /// with [`Fev::embed`] as the target of each frame.
    pub fn from_collapsible<T: Collapsible<FrameToken = F>>(t: T) -> Self {
        t.collapse_frames(Fev::embed)
    }
}

impl<F> Expandable for Fev<F>
where
    F: MappableFrame + 'static,
    F::Frame<Fev<F>>: Clone + 'static,
{
    type FrameToken = F;

    fn from_frame(val: <Self::FrameToken as MappableFrame>::Frame<Self>) -> Self {
        Fev::embed(val)
    }
}

/// Frame-by-frame collapse of an `Fev` goes through [`Fev::classify`], so each
/// step re-traverses the remaining value. Prefer [`Fev::fold`] for anything
/// compositional.
impl<F> Collapsible for Fev<F>
where
    F: MappableFrame + 'static,
    F::Frame<Fev<F>>: Clone + 'static,
{
    type FrameToken = F;

    fn into_frame(self) -> <Self::FrameToken as MappableFrame>::Frame<Self> {
        self.classify().on(|frame| frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExpandableExt, PartiallyApplied};

    // a second shape list, unrelated to arithmetic: a nullary shape and a shape with one recursive field
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ListFrame<A> {
        Nil,
        Cons(i64, A),
    }

    impl MappableFrame for ListFrame<PartiallyApplied> {
        type Frame<X> = ListFrame<X>;

        fn map_frame<A, B>(input: Self::Frame<A>, mut f: impl FnMut(A) -> B) -> Self::Frame<B> {
            match input {
                ListFrame::Nil => ListFrame::Nil,
                ListFrame::Cons(x, tail) => ListFrame::Cons(x, f(tail)),
            }
        }
    }

    type List = Fev<ListFrame<PartiallyApplied>>;

    fn nil() -> List {
        Fev::embed(ListFrame::Nil)
    }

    fn cons(x: i64, tail: List) -> List {
        Fev::embed(ListFrame::Cons(x, tail))
    }

    impl<'a> Collapsible for &'a [i64] {
        type FrameToken = ListFrame<PartiallyApplied>;

        fn into_frame(self) -> <Self::FrameToken as MappableFrame>::Frame<Self> {
            match self.split_first() {
                Some((x, rest)) => ListFrame::Cons(*x, rest),
                None => ListFrame::Nil,
            }
        }
    }

    fn to_vec(list: &List) -> Vec<i64> {
        list.fold(|frame: ListFrame<Vec<i64>>| match frame {
            ListFrame::Nil => Vec::new(),
            ListFrame::Cons(x, mut tail) => {
                tail.insert(0, x);
                tail
            }
        })
    }

    #[test]
    fn fold_reduces_innermost_first() {
        let list = cons(1, cons(2, cons(3, nil())));

        let mut seen = Vec::new();
        let sum = list.fold(|frame| match frame {
            ListFrame::Nil => 0,
            ListFrame::Cons(x, tail) => {
                seen.push(x);
                x + tail
            }
        });

        assert_eq!(sum, 6);
        assert_eq!(seen, vec![3, 2, 1]);
    }

    #[test]
    fn instantiation_is_reentrant() {
        let shared = cons(2, nil());
        let list = cons(1, shared.clone());

        assert_eq!(to_vec(&list), vec![1, 2]);
        assert_eq!(to_vec(&list), vec![1, 2]);
        assert_eq!(to_vec(&shared), vec![2]);
    }

    #[test]
    fn fold_result_need_not_be_static() {
        let label = String::from("len");
        let described: (&str, usize) = cons(1, cons(2, nil())).fold(|frame| match frame {
            ListFrame::Nil => (label.as_str(), 0),
            ListFrame::Cons(_, (l, n)) => (l, n + 1),
        });
        assert_eq!(described, ("len", 2));
    }

    #[test]
    fn try_fold_stops_at_first_error() {
        let list = cons(1, cons(-2, cons(3, cons(-4, nil()))));

        let mut calls = 0;
        let res: Result<i64, i64> = list.try_fold(|frame| {
            calls += 1;
            match frame {
                ListFrame::Nil => Ok(0),
                ListFrame::Cons(x, _) if x < 0 => Err(x),
                ListFrame::Cons(x, tail) => Ok(x + tail),
            }
        });

        // innermost negative element fails first
        assert_eq!(res, Err(-4));
        assert_eq!(calls, 2);

        let ok: Result<i64, ()> = cons(1, cons(2, nil())).try_fold(|frame| match frame {
            ListFrame::Nil => Ok(0),
            ListFrame::Cons(x, tail) => Ok(x + tail),
        });
        assert_eq!(ok, Ok(3));
    }

    #[test]
    fn from_collapsible_and_expand_frames_agree() {
        let xs = [4, 5, 6];
        let from_slice = List::from_collapsible(&xs[..]);
        let unfolded = List::expand_frames(4, |n: i64| {
            if n > 6 {
                ListFrame::Nil
            } else {
                ListFrame::Cons(n, n + 1)
            }
        });

        assert_eq!(to_vec(&from_slice), vec![4, 5, 6]);
        assert_eq!(to_vec(&unfolded), vec![4, 5, 6]);
        assert_eq!(to_vec(&from_slice.rebuild()), vec![4, 5, 6]);
    }

    #[test]
    fn classify_exposes_one_level() {
        let list = cons(1, cons(2, nil()));

        let (head, tail) = list.classify().on(|frame| match frame {
            ListFrame::Cons(x, tail) => (Some(x), to_vec(&tail)),
            ListFrame::Nil => (None, Vec::new()),
        });
        assert_eq!(head, Some(1));
        assert_eq!(tail, vec![2]);

        assert_eq!(to_vec(&list.classify().rebuild()), vec![1, 2]);
        assert!(nil().classify().on(|frame| matches!(frame, ListFrame::Nil)));
    }

    #[test]
    fn collapse_frames_through_classifier() {
        let list = cons(7, cons(8, nil()));
        let len = list.collapse_frames(|frame| match frame {
            ListFrame::Nil => 0,
            ListFrame::Cons(_, n) => n + 1,
        });
        assert_eq!(len, 2);
    }
}
