use derivative::Derivative;

use super::{Advance, Cursor, Step};
use crate::op::{Cond, Fun};

// -----------------------------------------------------------------------------
// Wrap
// FromFn
// -----------------------------------------------------------------------------
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Wrap<I> {
    #[derivative(Debug = "ignore")]
    iter: I,
}

impl<I> Wrap<I> {
    #[inline]
    pub(super) fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: Iterator> Advance for Wrap<I> {
    type Item = I::Item;

    #[inline]
    fn step(&mut self) -> Step<I::Item> {
        self.iter.next().map_or(Step::Stop, Step::Yield)
    }
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct FromFn<F> {
    #[derivative(Debug = "ignore")]
    f: F,
}

impl<F> FromFn<F> {
    #[inline]
    pub(super) fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T, F: FnMut() -> Step<T>> Advance for FromFn<F> {
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        (self.f)()
    }
}

// -----------------------------------------------------------------------------
// Filter
// Transform
// -----------------------------------------------------------------------------
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Filter<A: Advance> {
    inner: Cursor<A>,
    cond: Cond<A::Item>,
}

impl<A: Advance> Filter<A> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, cond: Cond<A::Item>) -> Self {
        Self { inner, cond }
    }
}

impl<A: Advance> Advance for Filter<A> {
    type Item = A::Item;

    #[inline]
    fn step(&mut self) -> Step<A::Item> {
        match self.inner.next() {
            Some(e) if self.cond.test(&e) => Step::Yield(e),
            Some(_) => Step::Skip,
            None => Step::Stop,
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Transform<A: Advance, B> {
    inner: Cursor<A>,
    fun: Fun<A::Item, B>,
}

impl<A: Advance, B> Transform<A, B> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, fun: Fun<A::Item, B>) -> Self {
        Self { inner, fun }
    }
}

impl<A: Advance, B> Advance for Transform<A, B> {
    type Item = B;

    #[inline]
    fn step(&mut self) -> Step<B> {
        match self.inner.next() {
            Some(e) => Step::Yield(self.fun.call(e)),
            None => Step::Stop,
        }
    }
}

// -----------------------------------------------------------------------------
// Take
// TakeWhile
// -----------------------------------------------------------------------------
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Take<A: Advance> {
    inner: Cursor<A>,
    remaining: usize,
}

impl<A: Advance> Take<A> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, remaining: usize) -> Self {
        Self { inner, remaining }
    }
}

impl<A: Advance> Advance for Take<A> {
    type Item = A::Item;

    #[inline]
    fn step(&mut self) -> Step<A::Item> {
        if self.remaining == 0 {
            return Step::Stop;
        }
        self.remaining -= 1;
        match self.inner.next() {
            Some(e) => Step::Yield(e),
            None => Step::Stop,
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct TakeWhile<A: Advance> {
    inner: Cursor<A>,
    cond: Cond<A::Item>,
}

impl<A: Advance> TakeWhile<A> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, cond: Cond<A::Item>) -> Self {
        Self { inner, cond }
    }
}

impl<A: Advance> Advance for TakeWhile<A> {
    type Item = A::Item;

    #[inline]
    fn step(&mut self) -> Step<A::Item> {
        match self.inner.next() {
            Some(e) if self.cond.test(&e) => Step::Yield(e),
            _ => Step::Stop,
        }
    }
}

// -----------------------------------------------------------------------------
// Skip
// SkipWhile
// -----------------------------------------------------------------------------
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Skip<A: Advance> {
    inner: Cursor<A>,
    pending: usize,
}

impl<A: Advance> Skip<A> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, pending: usize) -> Self {
        Self { inner, pending }
    }
}

impl<A: Advance> Advance for Skip<A> {
    type Item = A::Item;

    fn step(&mut self) -> Step<A::Item> {
        while self.pending > 0 {
            self.pending -= 1;
            if !self.inner.advance() {
                self.pending = 0;
                return Step::Stop;
            }
        }
        match self.inner.next() {
            Some(e) => Step::Yield(e),
            None => Step::Stop,
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct SkipWhile<A: Advance> {
    inner: Cursor<A>,
    cond: Cond<A::Item>,
    skipping: bool,
}

impl<A: Advance> SkipWhile<A> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, cond: Cond<A::Item>) -> Self {
        Self {
            inner,
            cond,
            skipping: true,
        }
    }
}

impl<A: Advance> Advance for SkipWhile<A> {
    type Item = A::Item;

    #[inline]
    fn step(&mut self) -> Step<A::Item> {
        let Some(e) = self.inner.next() else {
            return Step::Stop;
        };
        if self.skipping {
            if self.cond.test(&e) {
                return Step::Skip;
            }
            self.skipping = false;
        }
        Step::Yield(e)
    }
}

// -----------------------------------------------------------------------------
// Flatten
// -----------------------------------------------------------------------------
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Flatten<A: Advance, I: IntoIterator> {
    inner: Cursor<A>,
    fun: Fun<A::Item, Option<I>>,
    #[derivative(Debug = "ignore")]
    current: Option<I::IntoIter>,
}

impl<A: Advance, I: IntoIterator> Flatten<A, I> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, fun: Fun<A::Item, Option<I>>) -> Self {
        Self {
            inner,
            fun,
            current: None,
        }
    }
}

impl<A: Advance, I: IntoIterator> Advance for Flatten<A, I> {
    type Item = I::Item;

    fn step(&mut self) -> Step<I::Item> {
        if let Some(e) = self.current.as_mut().and_then(Iterator::next) {
            return Step::Yield(e);
        }
        let Some(outer) = self.inner.next() else {
            self.current = None;
            return Step::Stop;
        };
        self.current = self.fun.call(outer).map(IntoIterator::into_iter);
        Step::Skip
    }
}

// -----------------------------------------------------------------------------
// Join
// -----------------------------------------------------------------------------
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Join<A: Advance> {
    inner: Cursor<A>,
    #[derivative(Debug = "ignore")]
    separator: A::Item,
    emit_item: bool,
}

impl<A: Advance> Join<A> {
    #[inline]
    pub(super) fn new(inner: Cursor<A>, separator: A::Item) -> Self {
        Self {
            inner,
            separator,
            emit_item: true,
        }
    }
}

impl<A: Advance> Advance for Join<A>
where
    A::Item: Clone,
{
    type Item = A::Item;

    fn step(&mut self) -> Step<A::Item> {
        if !self.inner.has_next() {
            return Step::Stop;
        }
        let emit_item = self.emit_item;
        self.emit_item = !emit_item;
        if emit_item {
            self.inner.next().map_or(Step::Stop, Step::Yield)
        } else {
            Step::Yield(self.separator.clone())
        }
    }
}
