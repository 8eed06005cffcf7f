use std::{cell::RefCell, fmt, rc::Rc};

use itertools::Itertools;

use crate::{
    cursor::{BoxedCursor, Cursor, Step},
    op::Fun,
    Error,
};

// -----------------------------------------------------------------------------
// Seq
// -----------------------------------------------------------------------------
pub(super) enum Repr<E> {
    Empty,
    Items(Rc<[E]>),
    Lazy(Rc<dyn Fn() -> Result<BoxedCursor<E>, Error>>),
}

/// Lazy, re-iterable sequence.
///
/// A `Seq` holds a recipe for building cursors, never the cursors themselves.
/// Every combinator returns a new `Seq` and leaves its receiver untouched,
/// and nothing is evaluated until a collector or an iterator pulls elements.
///
/// # Example
/// ```
/// use qseq::Seq;
///
/// let odd_squares = Seq::of(1..=10).filter(|x| x % 2 == 1).map(|x| x * x);
///
/// assert_eq!(odd_squares.to_vec(), vec![1, 9, 25, 49, 81]);
/// assert_eq!(odd_squares.take(2).to_vec(), vec![1, 9]);
/// ```
pub struct Seq<E> {
    pub(super) repr: Repr<E>,
}

//
// ctors
//
impl<E> Seq<E> {
    #[inline]
    pub fn empty() -> Self {
        Self { repr: Repr::Empty }
    }

    #[inline]
    pub fn is_empty_singleton(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }
}

impl<E: Clone + 'static> Seq<E> {
    /// Sequence over a fixed collection of elements, collected eagerly.
    pub fn of(elements: impl IntoIterator<Item = E>) -> Self {
        let items: Rc<[E]> = elements.into_iter().collect();
        if items.is_empty() {
            Self::empty()
        } else {
            Self {
                repr: Repr::Items(items),
            }
        }
    }

    #[inline]
    pub fn of_option(element: Option<E>) -> Self {
        Self::of(element)
    }

    /// Sequence over a re-iterable source.
    ///
    /// `source` is cloned at the start of every pass and its elements are
    /// pulled one by one, so a cheap-to-clone source is expected.
    pub fn from_iterable<I>(source: I) -> Self
    where
        I: IntoIterator<Item = E> + Clone + 'static,
        I::IntoIter: 'static,
    {
        Self::lazy(move || Ok(Cursor::wrap(source.clone()).boxed()))
    }

    /// Sequence whose elements come from a fresh call to `supplier` on every pass.
    pub fn create<I>(supplier: impl Fn() -> I + 'static) -> Self
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: 'static,
    {
        Self::lazy(move || Ok(Cursor::wrap(supplier()).boxed()))
    }

    /// One-shot sequence over an iterator.
    ///
    /// The first pass consumes `elements`. Any later pass fails with
    /// [`Error::UnsupportedOperation`].
    pub fn once<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: 'static,
    {
        let slot = RefCell::new(Some(elements.into_iter()));
        Self::lazy(move || match slot.borrow_mut().take() {
            Some(iter) => Ok(Cursor::wrap(iter).boxed()),
            None => {
                log::warn!("one-shot sequence is iterated more than once");
                Err(Error::UnsupportedOperation(
                    "one-shot sequence can be iterated only once",
                ))
            }
        })
    }

    /// Sequence `seed, step(seed), step(step(seed)), ...` ending at the first `None`.
    ///
    /// `step` is called only when the next element is requested.
    pub fn generate(seed: E, step: impl Fn(&E) -> Option<E> + 'static) -> Self {
        Self::generate_with(seed, Fun::pure(move |e: E| step(&e)))
    }

    /// Same as [`Seq::generate`] with a possibly stateful step, copied per pass.
    pub fn generate_with(seed: E, step: Fun<E, Option<E>>) -> Self {
        Self::lazy(move || {
            let mut first = Some(seed.clone());
            let mut prev: Option<E> = None;
            let mut step = step.copy();
            let cursor = Cursor::from_fn(move || {
                let cur = match first.take() {
                    Some(e) => Some(e),
                    None => prev.take().and_then(|e| step.call(e)),
                };
                match cur {
                    Some(e) => {
                        prev = Some(e.clone());
                        Step::Yield(e)
                    }
                    None => Step::Stop,
                }
            });
            Ok(cursor.boxed())
        })
    }

    /// Two-term recurrence: `first, second, step(first, second), ...`.
    ///
    /// Without `second` the sequence holds `first` only.
    pub fn generate_pair(
        first: E,
        second: Option<E>,
        step: impl Fn(&E, &E) -> Option<E> + 'static,
    ) -> Self {
        let step = Rc::new(step);
        Self::lazy(move || {
            let first = first.clone();
            let second = second.clone();
            let step = Rc::clone(&step);
            let mut yielded = 0usize;
            let mut prev: Option<E> = None;
            let mut last: Option<E> = None;
            let cursor = Cursor::from_fn(move || {
                let cur = match yielded {
                    0 => Some(first.clone()),
                    1 => second.clone(),
                    _ => match (&prev, &last) {
                        (Some(a), Some(b)) => step(a, b),
                        _ => None,
                    },
                };
                match cur {
                    Some(e) => {
                        yielded = yielded.saturating_add(1);
                        prev = last.replace(e.clone());
                        Step::Yield(e)
                    }
                    None => Step::Stop,
                }
            });
            Ok(cursor.boxed())
        })
    }

    #[inline]
    pub(super) fn lazy(f: impl Fn() -> Result<BoxedCursor<E>, Error> + 'static) -> Self {
        Self {
            repr: Repr::Lazy(Rc::new(f)),
        }
    }
}

//
// iteration
//
impl<E: Clone + 'static> Seq<E> {
    /// Start a new pass over the sequence.
    pub fn try_iter(&self) -> Result<BoxedCursor<E>, Error> {
        match &self.repr {
            Repr::Empty => Ok(Cursor::wrap(std::iter::empty()).boxed()),
            Repr::Items(items) => {
                let items = Rc::clone(items);
                Ok(Cursor::wrap((0..items.len()).map(move |i| items[i].clone())).boxed())
            }
            Repr::Lazy(f) => f(),
        }
    }

    /// Start a new pass over the sequence.
    ///
    /// # Panics
    /// Panics when the sequence is one-shot and has already been iterated.
    /// Use [`Seq::try_iter`] to handle that case.
    pub fn iter(&self) -> BoxedCursor<E> {
        match self.try_iter() {
            Ok(cursor) => cursor,
            Err(e) => panic!("{}", e),
        }
    }

    /// Compose a transformation over the cursor of every pass.
    ///
    /// The empty singleton maps to the empty singleton without calling `f`.
    pub(super) fn intercept_cursor<T: Clone + 'static>(
        &self,
        f: impl Fn(BoxedCursor<E>) -> BoxedCursor<T> + 'static,
    ) -> Seq<T> {
        if self.is_empty_singleton() {
            return Seq::empty();
        }
        let source = self.clone();
        Seq::lazy(move || source.try_iter().map(&f))
    }

    /// The most general transformation: every pass of the result is `f` applied
    /// to a fresh pass of `self`.
    pub fn intercept<T, I>(&self, f: impl Fn(BoxedCursor<E>) -> I + 'static) -> Seq<T>
    where
        T: Clone + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        self.intercept_cursor(move |cursor| Cursor::wrap(f(cursor)).boxed())
    }
}

impl<E> Clone for Seq<E> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Empty => Repr::Empty,
            Repr::Items(items) => Repr::Items(Rc::clone(items)),
            Repr::Lazy(f) => Repr::Lazy(Rc::clone(f)),
        };
        Self { repr }
    }
}

impl<E> Default for Seq<E> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: Clone + 'static> From<Vec<E>> for Seq<E> {
    #[inline]
    fn from(items: Vec<E>) -> Self {
        Self::of(items)
    }
}

impl<E: Clone + 'static> FromIterator<E> for Seq<E> {
    #[inline]
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        Self::of(iter)
    }
}

impl<E: Clone + 'static> IntoIterator for Seq<E> {
    type Item = E;
    type IntoIter = BoxedCursor<E>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Clone + 'static> IntoIterator for &Seq<E> {
    type Item = E;
    type IntoIter = BoxedCursor<E>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: fmt::Debug> fmt::Debug for Seq<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Empty => f.write_str("Seq([])"),
            Repr::Items(items) => f.debug_tuple("Seq").field(items).finish(),
            Repr::Lazy(_) => f.write_str("Seq(..)"),
        }
    }
}

/// Collection-backed sequences print their elements, lazy ones print `Seq(..)`.
impl<E: fmt::Display> fmt::Display for Seq<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Empty => f.write_str("[]"),
            Repr::Items(items) => write!(f, "[{}]", items.iter().join(", ")),
            Repr::Lazy(_) => f.write_str("Seq(..)"),
        }
    }
}
