use std::{any::Any, collections::HashSet, hash::Hash, rc::Rc};

use crate::op::{Cond, Fun};

use super::Seq;

//
// append
//
impl<E: Clone + 'static> Seq<E> {
    /// Elements of `self` followed by elements of `other`.
    pub fn append(&self, other: &Seq<E>) -> Seq<E> {
        if other.is_empty_singleton() {
            return self.clone();
        }
        if self.is_empty_singleton() {
            return other.clone();
        }
        Seq::of([self.clone(), other.clone()]).flatten(Some)
    }

    #[inline]
    pub fn append_item(&self, e: E) -> Seq<E> {
        self.append(&Seq::of([e]))
    }

    #[inline]
    pub fn append_option(&self, e: Option<E>) -> Seq<E> {
        self.append(&Seq::of_option(e))
    }

    #[inline]
    pub fn append_all(&self, elements: impl IntoIterator<Item = E>) -> Seq<E> {
        self.append(&Seq::of(elements))
    }

    /// Elements of `self` followed by the concatenation of `f` over `other`.
    pub fn append_flat<S, I>(&self, other: &Seq<S>, f: impl Fn(S) -> I + 'static) -> Seq<E>
    where
        S: Clone + 'static,
        I: IntoIterator<Item = E> + 'static,
        I::IntoIter: 'static,
    {
        self.append(&other.flat_map(f))
    }

    /// `n` repetitions of `self`, each one a separate pass.
    pub fn repeat(&self, n: usize) -> Seq<E> {
        if n == 0 || self.is_empty_singleton() {
            return Seq::empty();
        }
        Seq::generate(self.clone(), |s| Some(s.clone()))
            .take(n)
            .flatten(Some)
    }
}

//
// filter
//
impl<E: Clone + 'static> Seq<E> {
    #[inline]
    pub fn filter(&self, f: impl Fn(&E) -> bool + 'static) -> Seq<E> {
        self.filter_with(Cond::pure(f))
    }

    /// Keep elements satisfying `cond`. A stateful `cond` is copied for every pass.
    pub fn filter_with(&self, cond: Cond<E>) -> Seq<E> {
        self.intercept_cursor(move |cursor| cursor.filtered(cond.copy()).boxed())
    }

    pub fn filter_map<T: Clone + 'static>(&self, f: impl Fn(E) -> Option<T> + 'static) -> Seq<T> {
        self.flatten(move |e| Some(f(e)))
    }

    /// Keep elements satisfying `identity(e)` seen for the first time.
    ///
    /// The set of seen identities belongs to a single pass and is allocated
    /// on the first element of that pass.
    pub fn unique_by<K>(&self, identity: impl Fn(&E) -> K + 'static) -> Seq<E>
    where
        K: Eq + Hash + Clone + 'static,
    {
        self.filter_with(Cond::stateful(
            None::<HashSet<K>>,
            move |seen, e: &E| seen.get_or_insert_with(HashSet::new).insert(identity(e)),
        ))
    }

    #[inline]
    pub fn unique(&self) -> Seq<E>
    where
        E: Eq + Hash,
    {
        self.unique_by(E::clone)
    }
}

impl Seq<Rc<dyn Any>> {
    /// Keep elements whose concrete type is `T`.
    pub fn filter_type<T: Any>(&self) -> Seq<Rc<T>> {
        self.filter_map(|e| e.downcast::<T>().ok())
    }
}

//
// map
// flatten
//
impl<E: Clone + 'static> Seq<E> {
    #[inline]
    pub fn map<T: Clone + 'static>(&self, f: impl Fn(E) -> T + 'static) -> Seq<T> {
        self.map_with(Fun::pure(f))
    }

    pub fn map_with<T: Clone + 'static>(&self, fun: Fun<E, T>) -> Seq<T> {
        self.intercept_cursor(move |cursor| cursor.transformed(fun.copy()).boxed())
    }

    /// Concatenate the sub-sequences produced by `f`. `None` contributes nothing.
    #[inline]
    pub fn flatten<T, I>(&self, f: impl Fn(E) -> Option<I> + 'static) -> Seq<T>
    where
        T: Clone + 'static,
        I: IntoIterator<Item = T> + 'static,
        I::IntoIter: 'static,
    {
        self.flatten_with(Fun::pure(f))
    }

    pub fn flatten_with<T, I>(&self, fun: Fun<E, Option<I>>) -> Seq<T>
    where
        T: Clone + 'static,
        I: IntoIterator<Item = T> + 'static,
        I::IntoIter: 'static,
    {
        self.intercept_cursor(move |cursor| cursor.flattened(fun.copy()).boxed())
    }

    #[inline]
    pub fn flat_map<T, I>(&self, f: impl Fn(E) -> I + 'static) -> Seq<T>
    where
        T: Clone + 'static,
        I: IntoIterator<Item = T> + 'static,
        I::IntoIter: 'static,
    {
        self.flatten(move |e| Some(f(e)))
    }
}

//
// take
// skip
// join
//
impl<E: Clone + 'static> Seq<E> {
    pub fn take(&self, n: usize) -> Seq<E> {
        self.intercept_cursor(move |cursor| cursor.taken(n).boxed())
    }

    #[inline]
    pub fn take_while(&self, f: impl Fn(&E) -> bool + 'static) -> Seq<E> {
        self.take_while_with(Cond::pure(f))
    }

    pub fn take_while_with(&self, cond: Cond<E>) -> Seq<E> {
        self.intercept_cursor(move |cursor| cursor.taken_while(cond.copy()).boxed())
    }

    pub fn skip(&self, n: usize) -> Seq<E> {
        if n == 0 {
            return self.clone();
        }
        self.intercept_cursor(move |cursor| cursor.skipped(n).boxed())
    }

    #[inline]
    pub fn skip_while(&self, f: impl Fn(&E) -> bool + 'static) -> Seq<E> {
        self.skip_while_with(Cond::pure(f))
    }

    pub fn skip_while_with(&self, cond: Cond<E>) -> Seq<E> {
        self.intercept_cursor(move |cursor| cursor.skipped_while(cond.copy()).boxed())
    }

    /// Interleave `separator` between consecutive elements.
    pub fn join(&self, separator: E) -> Seq<E> {
        self.intercept_cursor(move |cursor| cursor.joined(separator.clone()).boxed())
    }
}
