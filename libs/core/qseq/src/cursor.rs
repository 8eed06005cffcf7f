//! Pull-based cursor with one element of lookahead.
//!
//! Every sequence combinator is built from a single capability, [`Advance`],
//! whose `step` either yields a value, asks to be called again, or stops for good.
//! [`Cursor`] turns such a step function into a peekable [`Iterator`].
mod adapters;

use std::{cell::RefCell, fmt, iter::FusedIterator, mem, rc::Rc};

use crate::op::{Cond, Fun};

pub use adapters::{
    Filter, Flatten, FromFn, Join, Skip, SkipWhile, Take, TakeWhile, Transform, Wrap,
};

// -----------------------------------------------------------------------------
// Step
// Advance
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<T> {
    /// The next element.
    Yield(T),
    /// Nothing produced in this round; the step function is called again.
    Skip,
    /// No more elements. Terminal: the step function is never called again.
    Stop,
}

pub trait Advance {
    type Item;

    fn step(&mut self) -> Step<Self::Item>;
}

impl<A: Advance + ?Sized> Advance for Box<A> {
    type Item = A::Item;

    #[inline]
    fn step(&mut self) -> Step<A::Item> {
        (**self).step()
    }
}

// -----------------------------------------------------------------------------
// Cursor
// -----------------------------------------------------------------------------
pub type BoxedCursor<T> = Cursor<Box<dyn Advance<Item = T>>>;

enum Slot<T> {
    Pending,
    Ready(T),
    Exhausted,
}

/// Iterator over a step function with a buffered lookahead element.
///
/// Once the step function returns [`Step::Stop`] the cursor is exhausted permanently.
pub struct Cursor<A: Advance> {
    inner: A,
    slot: Slot<A::Item>,
}

//
// ctors
//
impl<A: Advance> Cursor<A> {
    #[inline]
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            slot: Slot::Pending,
        }
    }
}

impl<I: Iterator> Cursor<Wrap<I>> {
    /// Adapt a plain iterator. Elements are pulled from `iter` as they are requested.
    #[inline]
    pub fn wrap<T>(iter: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Cursor::new(Wrap::new(iter.into_iter()))
    }
}

impl<T, F: FnMut() -> Step<T>> Cursor<FromFn<F>> {
    #[inline]
    pub fn from_fn(f: F) -> Self {
        Cursor::new(FromFn::new(f))
    }
}

//
// methods
//
impl<A: Advance> Cursor<A> {
    fn fill(&mut self) {
        if !matches!(self.slot, Slot::Pending) {
            return;
        }
        self.slot = loop {
            match self.inner.step() {
                Step::Yield(v) => break Slot::Ready(v),
                Step::Skip => continue,
                Step::Stop => break Slot::Exhausted,
            }
        };
    }

    /// Look at the next element without consuming it.
    ///
    /// Calling this repeatedly advances the underlying step function at most once.
    #[inline]
    pub fn peek(&mut self) -> Option<&A::Item> {
        self.fill();
        match &self.slot {
            Slot::Ready(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    /// Consume the next element, returning whether there was one.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.next().is_some()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.slot, Slot::Exhausted)
    }

    #[inline]
    pub fn boxed(self) -> BoxedCursor<A::Item>
    where
        A: 'static,
    {
        let inner: Box<dyn Advance<Item = A::Item>> = Box::new(self);
        Cursor::new(inner)
    }
}

//
// adapters
//
impl<A: Advance> Cursor<A> {
    #[inline]
    pub fn filtered(self, cond: Cond<A::Item>) -> Cursor<Filter<A>> {
        Cursor::new(Filter::new(self, cond))
    }

    #[inline]
    pub fn transformed<B>(self, fun: Fun<A::Item, B>) -> Cursor<Transform<A, B>> {
        Cursor::new(Transform::new(self, fun))
    }

    /// At most `n` elements. With `n == 0` the inner cursor is never pulled.
    #[inline]
    pub fn taken(self, n: usize) -> Cursor<Take<A>> {
        Cursor::new(Take::new(self, n))
    }

    #[inline]
    pub fn taken_while(self, cond: Cond<A::Item>) -> Cursor<TakeWhile<A>> {
        Cursor::new(TakeWhile::new(self, cond))
    }

    /// Drop the first `n` elements. With `n == 0` no element is pulled in advance.
    #[inline]
    pub fn skipped(self, n: usize) -> Cursor<Skip<A>> {
        Cursor::new(Skip::new(self, n))
    }

    #[inline]
    pub fn skipped_while(self, cond: Cond<A::Item>) -> Cursor<SkipWhile<A>> {
        Cursor::new(SkipWhile::new(self, cond))
    }

    /// Concatenate the sub-sequences produced by `fun`; `None` contributes nothing.
    #[inline]
    pub fn flattened<I>(self, fun: Fun<A::Item, Option<I>>) -> Cursor<Flatten<A, I>>
    where
        I: IntoIterator,
    {
        Cursor::new(Flatten::new(self, fun))
    }

    /// Interleave `separator` between consecutive elements.
    #[inline]
    pub fn joined(self, separator: A::Item) -> Cursor<Join<A>>
    where
        A::Item: Clone,
    {
        Cursor::new(Join::new(self, separator))
    }
}

impl<A: Advance> Iterator for Cursor<A> {
    type Item = A::Item;

    #[inline]
    fn next(&mut self) -> Option<A::Item> {
        self.fill();
        if let Slot::Exhausted = self.slot {
            return None;
        }
        match mem::replace(&mut self.slot, Slot::Pending) {
            Slot::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl<A: Advance> FusedIterator for Cursor<A> {}

impl<A: Advance> Advance for Cursor<A> {
    type Item = A::Item;

    #[inline]
    fn step(&mut self) -> Step<A::Item> {
        self.next().map_or(Step::Stop, Step::Yield)
    }
}

impl<A: Advance> fmt::Debug for Cursor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot {
            Slot::Pending => "pending",
            Slot::Ready(_) => "ready",
            Slot::Exhausted => "exhausted",
        };
        f.debug_struct("Cursor").field("state", &state).finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// SharedCursor
// -----------------------------------------------------------------------------
/// Handle to a cursor pulled from several places in turn.
///
/// Not re-entrant: pulling through one handle while another is in the middle
/// of a pull panics.
pub(crate) struct SharedCursor<T>(Rc<RefCell<BoxedCursor<T>>>);

impl<T> Clone for SharedCursor<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> SharedCursor<T> {
    #[inline]
    pub(crate) fn new(cursor: BoxedCursor<T>) -> Self {
        Self(Rc::new(RefCell::new(cursor)))
    }

    #[inline]
    pub(crate) fn has_next(&self) -> bool {
        self.0.borrow_mut().has_next()
    }

    /// Consume everything that is left.
    pub(crate) fn drain(&self) {
        while self.0.borrow_mut().advance() {}
    }
}

impl<T> Iterator for SharedCursor<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.0.borrow_mut().next()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::rstest;

    use super::*;

    fn counting(n: usize, pulls: Rc<Cell<usize>>) -> Cursor<Wrap<impl Iterator<Item = usize>>> {
        Cursor::wrap((0..n).inspect(move |_| pulls.set(pulls.get() + 1)))
    }

    #[test]
    fn test_peek_is_idempotent() {
        let pulls = Rc::new(Cell::new(0));
        let mut cursor = counting(3, pulls.clone());

        assert_eq!(pulls.get(), 0);
        assert_eq!(cursor.peek(), Some(&0));
        assert_eq!(cursor.peek(), Some(&0));
        assert!(cursor.has_next());
        assert_eq!(pulls.get(), 1);

        assert_eq!(cursor.next(), Some(0));
        assert_eq!(pulls.get(), 1);
        assert_eq!(cursor.peek(), Some(&1));
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut calls = 0;
        let mut cursor = Cursor::from_fn(|| {
            calls += 1;
            match calls {
                1 => Step::Yield(1),
                2 => Step::Skip,
                3 => Step::Yield(3),
                4 => Step::Stop,
                // would resume, but must never be asked
                _ => Step::Yield(99),
            }
        });

        assert_eq!(cursor.by_ref().collect::<Vec<_>>(), vec![1, 3]);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next(), None);
        assert!(!cursor.has_next());
        assert!(!cursor.advance());
    }

    #[rstest]
    #[case::none(0, 5, vec![])]
    #[case::some(2, 5, vec![0, 1])]
    #[case::all(5, 5, vec![0, 1, 2, 3, 4])]
    #[case::more(9, 5, vec![0, 1, 2, 3, 4])]
    fn test_taken(#[case] n: usize, #[case] len: usize, #[case] expected: Vec<usize>) {
        let pulls = Rc::new(Cell::new(0));
        let tested: Vec<_> = counting(len, pulls.clone()).taken(n).collect();

        assert_eq!(tested, expected);
        if n == 0 {
            assert_eq!(pulls.get(), 0);
        }
    }

    #[rstest]
    #[case::none(0, 4, vec![0, 1, 2, 3])]
    #[case::some(2, 4, vec![2, 3])]
    #[case::all(4, 4, vec![])]
    #[case::more(7, 4, vec![])]
    fn test_skipped(#[case] n: usize, #[case] len: usize, #[case] expected: Vec<usize>) {
        let pulls = Rc::new(Cell::new(0));
        let mut cursor = counting(len, pulls.clone()).skipped(n);

        assert_eq!(pulls.get(), 0);
        if n == 0 && len > 0 {
            assert_eq!(cursor.peek(), Some(&0));
            assert_eq!(pulls.get(), 1);
        }
        assert_eq!(cursor.collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_filtered_and_transformed() {
        let tested: Vec<_> = Cursor::wrap(1..=6)
            .filtered(Cond::pure(|x: &i32| x % 2 == 0))
            .transformed(Fun::pure(|x: i32| x * 10))
            .collect();

        assert_eq!(tested, vec![20, 40, 60]);
    }

    #[test]
    fn test_taken_while_and_skipped_while() {
        let taken: Vec<_> = Cursor::wrap([1, 2, 5, 1, 2])
            .taken_while(Cond::pure(|x: &i32| *x < 3))
            .collect();
        let skipped: Vec<_> = Cursor::wrap([1, 2, 5, 1, 2])
            .skipped_while(Cond::pure(|x: &i32| *x < 3))
            .collect();

        assert_eq!(taken, vec![1, 2]);
        assert_eq!(skipped, vec![5, 1, 2]);
    }

    #[test]
    fn test_flattened_skips_absent() {
        let tested: Vec<_> = Cursor::wrap(0..4)
            .flattened(Fun::pure(|x: i32| (x != 2).then(|| vec![x; x as usize])))
            .collect();

        assert_eq!(tested, vec![1, 3, 3, 3]);
    }

    #[rstest]
    #[case::empty(vec![], vec![])]
    #[case::single(vec!["a"], vec!["a"])]
    #[case::many(vec!["a", "b", "c"], vec!["a", ",", "b", ",", "c"])]
    fn test_joined(#[case] input: Vec<&'static str>, #[case] expected: Vec<&'static str>) {
        let tested: Vec<_> = Cursor::wrap(input).joined(",").collect();

        assert_eq!(tested, expected);
    }

    #[test]
    fn test_boxed_keeps_lookahead() {
        let mut cursor = Cursor::wrap(0..3);
        assert_eq!(cursor.peek(), Some(&0));

        let boxed = cursor.boxed();
        assert_eq!(boxed.collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_shared_cursor_interleaves() {
        let shared = SharedCursor::new(Cursor::wrap(0..6).boxed());
        let mut head = Cursor::wrap(shared.clone()).taken(2);

        assert_eq!(head.next(), Some(0));
        // the remainder of `head` is drained through the other handle
        let mut rest = shared.clone();
        assert_eq!(rest.next(), Some(1));
        assert_eq!(head.next(), Some(2));
        assert_eq!(head.next(), None);

        shared.drain();
        assert!(!shared.has_next());
    }

    #[test]
    fn test_debug() {
        let mut cursor = Cursor::wrap(0..1);
        assert_eq!(format!("{:?}", cursor), "Cursor { state: \"pending\", .. }");
        cursor.peek();
        assert_eq!(format!("{:?}", cursor), "Cursor { state: \"ready\", .. }");
        cursor.next();
        cursor.peek();
        assert_eq!(format!("{:?}", cursor), "Cursor { state: \"exhausted\", .. }");
    }
}
