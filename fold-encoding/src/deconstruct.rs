use std::fmt;
use std::rc::Rc;

use crate::fold::{Fev, Slot};
use crate::frame::MappableFrame;

type Inspect<F> =
    dyn Fn(&mut dyn FnMut(<F as MappableFrame>::Frame<Fev<F>>) -> Slot) -> Slot;

/// The one-level deconstruction encoding of an [`Fev`].
///
/// Conceptually `∀W. (F::Frame<Fev<F>> -> W) -> W`. It has the same handler
/// shape as an `Fev`, but is not recursive: the handler receives the raw,
/// unreduced sub-values, so a consumer can classify those in turn before
/// deciding how (or whether) to recurse.
///
/// A `Match` is normally produced by [`Fev::classify`] and consumed right away
/// with [`Match::on`].
pub struct Match<F: MappableFrame>(Rc<Inspect<F>>);

impl<F: MappableFrame> Clone for Match<F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<F: MappableFrame> fmt::Debug for Match<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match").finish_non_exhaustive()
    }
}

impl<F: MappableFrame> Match<F> {
    /// Instantiate against a single handler that sees the shape and its immediate
    /// sub-values. Exactly one handler call happens per instantiation.
    pub fn on<W>(&self, handler: impl FnOnce(F::Frame<Fev<F>>) -> W) -> W {
        let mut handler = Some(handler);
        let mut out = None;
        (self.0)(&mut |frame: F::Frame<Fev<F>>| {
            if let Some(handler) = handler.take() {
                out = Some(handler(frame));
            }
            Slot(0)
        });
        out.expect("a match fires exactly one handler")
    }
}

impl<F> Match<F>
where
    F: MappableFrame + 'static,
    F::Frame<Fev<F>>: Clone + 'static,
{
    /// The generic `Match` smart constructor.
    ///
    /// The recursive positions arrive as `Match`es (this is what the classifier's
    /// fold hands back for sub-values), so each is first rebuilt into an `Fev`
    /// and the resulting frame of `Fev`s is what the handler will later receive.
    pub fn layer(frame: F::Frame<Match<F>>) -> Self {
        let frame = F::map_frame(frame, |sub| sub.rebuild());
        Match(Rc::new(
            move |handler: &mut dyn FnMut(F::Frame<Fev<F>>) -> Slot| handler(frame.clone()),
        ))
    }

    /// Instantiate against [`Fev::embed`]: reconstructs the value this `Match`
    /// was classified from.
    pub fn rebuild(&self) -> Fev<F> {
        self.on(Fev::embed)
    }
}
