/// A single 'frame' holding one constructor shape of some recursive type, with its
/// recursive positions filled by values of type `X`.
///
/// # Motivation
///
/// A frame token is how this crate is made generic over the list of constructor shapes.
/// The number of shapes and their arity live entirely in `Frame<X>`: a handler set for
/// some result type `R` is just a function `Frame<R> -> R`, and a fold-encoded value
/// ([`crate::Fev`]) is parameterized by the token.
///
/// # Implementing this trait
///
/// This trait is usually implemented for some marker token, because rust does not
/// allow for implementing a trait for a partially applied type. That is, we can implement
/// a trait for `ListFrame<usize>` but we can't implement a trait for just `ListFrame`.
///
/// For this reason, a common convention is to implement this trait using the uninhabited
///  [`PartiallyApplied`] enum marker, eg
///
/// ```rust
/// # use fold_encoding::{MappableFrame, PartiallyApplied};
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// enum ListFrame<A> {
///     Cons(u32, A),
///     Nil,
/// }
///
/// impl MappableFrame for ListFrame<PartiallyApplied> {
///     type Frame<X> = ListFrame<X>;
///
///     fn map_frame<A, B>(input: Self::Frame<A>, mut f: impl FnMut(A) -> B) -> Self::Frame<B> {
///         match input {
///             ListFrame::Cons(x, tail) => ListFrame::Cons(x, f(tail)),
///             ListFrame::Nil => ListFrame::Nil,
///         }
///     }
/// }
///
/// let frame = ListFrame::Cons(7, "tail");
/// let mapped = ListFrame::<PartiallyApplied>::map_frame(frame, |s| s.len());
///
/// assert_eq!(mapped, ListFrame::Cons(7, 4));
/// ```
pub trait MappableFrame {
    /// the frame type that is mapped over by `map_frame`
    type Frame<X>;

    /// Apply some function `f` to each recursive position inside a frame.
    ///
    /// For any two frames with identical structure, `f` must be applied to recursive
    /// positions in the same order each time. Traversals in this crate rely on it.
    fn map_frame<A, B>(input: Self::Frame<A>, f: impl FnMut(A) -> B) -> Self::Frame<B>;
}

/// "An uninhabited type used to define [`MappableFrame`] instances for partially-applied types."
///
/// For example: the MappableFrame instance for `MyFrame<A>` cannot be written over the
/// partially-applied type `MyFrame`, so instead we write it over `MyFrame<PartiallyApplied>`
#[derive(Clone, Debug)]
pub enum PartiallyApplied {}

/// This function generates a stack machine for some frame `F::Frame`,
/// expanding some seed value `Seed` into frames via a function `Seed -> Frame<Seed>`
/// and collapsing those values via a function `Frame<Out> -> Out`.
///
/// This function performs a depth-first traversal, expanding and collapsing each branch in turn
///
/// This function is stack safe (it does not use the call stack), but it
/// does use an internal stack data structure and is thus, technically,
/// susceptible to stack overflows if said stack expands
pub fn expand_and_collapse<F: MappableFrame, Seed, Out>(
    seed: Seed,
    mut expand_frame: impl FnMut(Seed) -> F::Frame<Seed>,
    mut collapse_frame: impl FnMut(F::Frame<Out>) -> Out,
) -> Out {
    enum State<Seed, CollapsibleInternal> {
        Expand(usize, Seed),
        Collapse(usize, CollapsibleInternal),
    }

    let mut vals: Vec<Option<Out>> = vec![None];
    let mut stack = vec![State::Expand(0, seed)];

    while let Some(item) = stack.pop() {
        match item {
            State::Expand(val_idx, seed) => {
                let node = expand_frame(seed);
                let mut seeds = Vec::new();
                let node = F::map_frame(node, |seed| {
                    vals.push(None);
                    let idx = vals.len() - 1;
                    seeds.push(State::Expand(idx, seed));
                    idx
                });

                stack.push(State::Collapse(val_idx, node));
                stack.extend(seeds);
            }
            State::Collapse(val_idx, node) => {
                let node = F::map_frame(node, |k| vals[k].take().unwrap());
                vals[val_idx] = Some(collapse_frame(node));
            }
        };
    }
    vals[0].take().unwrap()
}

/// Fallible version of [`expand_and_collapse`]: expansion and collapse may both fail,
/// and the first error aborts the traversal.
pub fn try_expand_and_collapse<F: MappableFrame, Seed, Out, E>(
    seed: Seed,
    mut expand_frame: impl FnMut(Seed) -> Result<F::Frame<Seed>, E>,
    mut collapse_frame: impl FnMut(F::Frame<Out>) -> Result<Out, E>,
) -> Result<Out, E> {
    enum State<Seed, CollapsibleInternal> {
        Expand(usize, Seed),
        Collapse(usize, CollapsibleInternal),
    }

    let mut vals: Vec<Option<Out>> = vec![None];
    let mut stack = vec![State::Expand(0, seed)];

    while let Some(item) = stack.pop() {
        match item {
            State::Expand(val_idx, seed) => {
                let node = expand_frame(seed)?;
                let mut seeds = Vec::new();
                let node = F::map_frame(node, |seed| {
                    vals.push(None);
                    let idx = vals.len() - 1;
                    seeds.push(State::Expand(idx, seed));
                    idx
                });

                stack.push(State::Collapse(val_idx, node));
                stack.extend(seeds);
            }
            State::Collapse(val_idx, node) => {
                let node = F::map_frame(node, |k| vals[k].take().unwrap());
                vals[val_idx] = Some(collapse_frame(node)?);
            }
        };
    }
    Ok(vals[0].take().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TreeFrame<A> {
        Leaf(u32),
        Node(A, A),
    }

    impl MappableFrame for TreeFrame<PartiallyApplied> {
        type Frame<X> = TreeFrame<X>;

        fn map_frame<A, B>(input: Self::Frame<A>, mut f: impl FnMut(A) -> B) -> Self::Frame<B> {
            match input {
                TreeFrame::Leaf(x) => TreeFrame::Leaf(x),
                TreeFrame::Node(a, b) => TreeFrame::Node(f(a), f(b)),
            }
        }
    }

    // full binary tree of the given depth, leaves numbered by depth
    fn count_leaves(depth: u32) -> u64 {
        expand_and_collapse::<TreeFrame<PartiallyApplied>, u32, u64>(
            depth,
            |d| {
                if d == 0 {
                    TreeFrame::Leaf(d)
                } else {
                    TreeFrame::Node(d - 1, d - 1)
                }
            },
            |frame| match frame {
                TreeFrame::Leaf(_) => 1,
                TreeFrame::Node(a, b) => a + b,
            },
        )
    }

    #[test]
    fn expand_and_collapse_full_tree() {
        assert_eq!(count_leaves(0), 1);
        assert_eq!(count_leaves(10), 1024);
    }

    #[test]
    fn expand_and_collapse_is_stack_safe() {
        // a degenerate left spine deep enough to blow the call stack if recursion were used
        let depth = 200_000u32;
        let res = expand_and_collapse::<TreeFrame<PartiallyApplied>, u32, u64>(
            depth,
            |d| {
                if d == 0 {
                    TreeFrame::Leaf(0)
                } else {
                    TreeFrame::Node(d - 1, 0)
                }
            },
            |frame| match frame {
                TreeFrame::Leaf(_) => 1,
                TreeFrame::Node(a, b) => a + b,
            },
        );
        assert_eq!(res, depth as u64 + 1);
    }

    #[test]
    fn try_expand_and_collapse_short_circuits() {
        let mut collapsed = 0;
        let res = try_expand_and_collapse::<TreeFrame<PartiallyApplied>, u32, u32, String>(
            3,
            |d| {
                if d == 0 {
                    Ok(TreeFrame::Leaf(d))
                } else {
                    Ok(TreeFrame::Node(d - 1, d - 1))
                }
            },
            |frame| {
                collapsed += 1;
                match frame {
                    TreeFrame::Leaf(_) => Err("leaf rejected".to_string()),
                    TreeFrame::Node(a, b) => Ok(a + b),
                }
            },
        );
        assert_eq!(res, Err("leaf rejected".to_string()));
        assert_eq!(collapsed, 1);
    }
}
