use std::{fmt, rc::Rc};

use dyn_clone::DynClone;

// -----------------------------------------------------------------------------
// StatefulCond
// StatefulFun
// -----------------------------------------------------------------------------
/// Predicate carrying mutable state which lives for one iteration pass.
///
/// A fresh duplicate is taken with [`DynClone`] every time a cursor is built,
/// so two passes over the same sequence never observe each other's mutations.
pub trait StatefulCond<E>: DynClone {
    fn test(&mut self, e: &E) -> bool;
}

dyn_clone::clone_trait_object!(<E> StatefulCond<E>);

/// Function carrying mutable state which lives for one iteration pass.
///
/// See [`StatefulCond`] for the duplication contract.
pub trait StatefulFun<A, B>: DynClone {
    fn call(&mut self, arg: A) -> B;
}

dyn_clone::clone_trait_object!(<A, B> StatefulFun<A, B>);

// state and closure pair behind `Cond::stateful` and `Fun::stateful`
struct WithState<S, F> {
    state: S,
    f: Rc<F>,
}

impl<S: Clone, F> Clone for WithState<S, F> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            f: Rc::clone(&self.f),
        }
    }
}

impl<E, S, F> StatefulCond<E> for WithState<S, F>
where
    S: Clone,
    F: Fn(&mut S, &E) -> bool,
{
    #[inline]
    fn test(&mut self, e: &E) -> bool {
        (self.f)(&mut self.state, e)
    }
}

impl<A, B, S, F> StatefulFun<A, B> for WithState<S, F>
where
    S: Clone,
    F: Fn(&mut S, A) -> B,
{
    #[inline]
    fn call(&mut self, arg: A) -> B {
        (self.f)(&mut self.state, arg)
    }
}

// -----------------------------------------------------------------------------
// Cond
// -----------------------------------------------------------------------------
/// Predicate over sequence elements.
///
/// A [`Cond::Pure`] predicate has no state and is shared between iterators as is.
/// A [`Cond::Stateful`] predicate is duplicated by [`Cond::copy`] whenever a new
/// cursor is built.
pub enum Cond<E> {
    Pure(Rc<dyn Fn(&E) -> bool>),
    Stateful(Box<dyn StatefulCond<E>>),
}

//
// ctors
//
impl<E: 'static> Cond<E> {
    #[inline]
    pub fn pure(f: impl Fn(&E) -> bool + 'static) -> Self {
        Cond::Pure(Rc::new(f))
    }

    /// Create a stateful predicate from an initial state and a closure updating it.
    ///
    /// # Example
    /// ```
    /// use qseq::{Cond, Seq};
    ///
    /// // keeps every second element
    /// let every_second = Cond::stateful(false, |odd: &mut bool, _: &i32| {
    ///     *odd = !*odd;
    ///     !*odd
    /// });
    /// let seq = Seq::of(1..=6).filter_with(every_second);
    ///
    /// assert_eq!(seq.to_vec(), vec![2, 4, 6]);
    /// assert_eq!(seq.to_vec(), vec![2, 4, 6]);
    /// ```
    #[inline]
    pub fn stateful<S>(init: S, f: impl Fn(&mut S, &E) -> bool + 'static) -> Self
    where
        S: Clone + 'static,
    {
        Cond::Stateful(Box::new(WithState {
            state: init,
            f: Rc::new(f),
        }))
    }

    #[inline]
    pub fn from_stateful(op: impl StatefulCond<E> + 'static) -> Self {
        Cond::Stateful(Box::new(op))
    }
}

//
// methods
//
impl<E> Cond<E> {
    #[inline]
    pub fn is_stateful(&self) -> bool {
        matches!(self, Cond::Stateful(_))
    }

    /// Instance to be owned by a single iterator.
    #[inline]
    pub fn copy(&self) -> Self {
        match self {
            Cond::Pure(f) => Cond::Pure(Rc::clone(f)),
            Cond::Stateful(op) => Cond::Stateful(dyn_clone::clone_box(&**op)),
        }
    }

    #[inline]
    pub fn test(&mut self, e: &E) -> bool {
        match self {
            Cond::Pure(f) => f(e),
            Cond::Stateful(op) => op.test(e),
        }
    }
}

impl<E> Clone for Cond<E> {
    #[inline]
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<E> fmt::Debug for Cond<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cond::Pure(_) => f.write_str("Cond::Pure"),
            Cond::Stateful(_) => f.write_str("Cond::Stateful"),
        }
    }
}

// -----------------------------------------------------------------------------
// Fun
// -----------------------------------------------------------------------------
/// Function from `A` to `B`, either pure or stateful.
///
/// Same duplication contract as [`Cond`].
pub enum Fun<A, B> {
    Pure(Rc<dyn Fn(A) -> B>),
    Stateful(Box<dyn StatefulFun<A, B>>),
}

//
// ctors
//
impl<A: 'static, B: 'static> Fun<A, B> {
    #[inline]
    pub fn pure(f: impl Fn(A) -> B + 'static) -> Self {
        Fun::Pure(Rc::new(f))
    }

    #[inline]
    pub fn stateful<S>(init: S, f: impl Fn(&mut S, A) -> B + 'static) -> Self
    where
        S: Clone + 'static,
    {
        Fun::Stateful(Box::new(WithState {
            state: init,
            f: Rc::new(f),
        }))
    }

    #[inline]
    pub fn from_stateful(op: impl StatefulFun<A, B> + 'static) -> Self {
        Fun::Stateful(Box::new(op))
    }
}

//
// methods
//
impl<A, B> Fun<A, B> {
    #[inline]
    pub fn is_stateful(&self) -> bool {
        matches!(self, Fun::Stateful(_))
    }

    /// Instance to be owned by a single iterator.
    #[inline]
    pub fn copy(&self) -> Self {
        match self {
            Fun::Pure(f) => Fun::Pure(Rc::clone(f)),
            Fun::Stateful(op) => Fun::Stateful(dyn_clone::clone_box(&**op)),
        }
    }

    #[inline]
    pub fn call(&mut self, arg: A) -> B {
        match self {
            Fun::Pure(f) => f(arg),
            Fun::Stateful(op) => op.call(arg),
        }
    }
}

impl<A, B> Clone for Fun<A, B> {
    #[inline]
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<A, B> fmt::Debug for Fun<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fun::Pure(_) => f.write_str("Fun::Pure"),
            Fun::Stateful(_) => f.write_str("Fun::Stateful"),
        }
    }
}
