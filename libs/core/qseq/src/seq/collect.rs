use std::hash::Hash;

use indexmap::{map::Entry, IndexMap, IndexSet};

use super::{seq_impl::Repr, Seq};

// Collectors force evaluation and start a new pass each time they are called.
// All of them panic on a one-shot sequence that has been iterated before;
// `Seq::try_iter` reports that case as `Error::UnsupportedOperation` instead.

//
// to collection
//
impl<E: Clone + 'static> Seq<E> {
    pub fn to_vec(&self) -> Vec<E> {
        match &self.repr {
            Repr::Empty => Vec::new(),
            Repr::Items(items) => items.to_vec(),
            Repr::Lazy(_) => self.iter().collect(),
        }
    }

    /// Distinct elements in the order of their first occurrence.
    pub fn to_set(&self) -> IndexSet<E>
    where
        E: Eq + Hash,
    {
        self.iter().collect()
    }

    /// Map from each distinct element to `value(e)`, in order of first occurrence.
    ///
    /// `value` is called once per distinct element.
    pub fn to_map<V>(&self, value: impl Fn(&E) -> V) -> IndexMap<E, V>
    where
        E: Eq + Hash,
    {
        let mut res = IndexMap::new();
        for e in self.iter() {
            if let Entry::Vacant(entry) = res.entry(e) {
                let v = value(entry.key());
                entry.insert(v);
            }
        }
        res
    }

    /// Map from `key(e)` to the first element with that key.
    pub fn to_reverse_map<K>(&self, key: impl Fn(&E) -> K) -> IndexMap<K, E>
    where
        K: Eq + Hash,
    {
        let mut res = IndexMap::new();
        for e in self.iter() {
            res.entry(key(&e)).or_insert(e);
        }
        res
    }

    #[inline]
    pub fn extend_into<C: Extend<E>>(&self, mut collection: C) -> C {
        collection.extend(self.iter());
        collection
    }

    /// Random-access copy of the sequence; collection-backed sequences are returned as is.
    pub fn materialize(&self) -> Seq<E> {
        match &self.repr {
            Repr::Lazy(_) => Seq::of(self.iter()),
            _ => self.clone(),
        }
    }
}

//
// element access
//
impl<E: Clone + 'static> Seq<E> {
    /// Strict left fold.
    #[inline]
    pub fn reduce<A>(&self, seed: A, f: impl FnMut(A, E) -> A) -> A {
        self.iter().fold(seed, f)
    }

    pub fn first(&self) -> Option<E> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Items(items) => items.first().cloned(),
            Repr::Lazy(_) => self.iter().next(),
        }
    }

    pub fn last(&self) -> Option<E> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Items(items) => items.last().cloned(),
            Repr::Lazy(_) => self.iter().last(),
        }
    }

    /// The only element, or `None` when there are zero or several.
    pub fn single(&self) -> Option<E> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Items(items) if items.len() == 1 => Some(items[0].clone()),
            Repr::Items(_) => None,
            Repr::Lazy(_) => {
                let mut it = self.iter();
                match (it.next(), it.has_next()) {
                    (Some(e), false) => Some(e),
                    _ => None,
                }
            }
        }
    }

    /// Element at `index`; same as `self.skip(index).first()`.
    pub fn get(&self, index: usize) -> Option<E> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Items(items) => items.get(index).cloned(),
            Repr::Lazy(_) => self.skip(index).first(),
        }
    }

    pub fn find(&self, f: impl Fn(&E) -> bool) -> Option<E> {
        self.iter().find(|e| f(e))
    }

    pub fn index_of(&self, f: impl Fn(&E) -> bool) -> Option<usize> {
        self.iter().position(|e| f(&e))
    }
}

//
// queries
//
impl<E: Clone + 'static> Seq<E> {
    pub fn size(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Items(items) => items.len(),
            Repr::Lazy(_) => self.iter().count(),
        }
    }

    pub fn contains(&self, e: &E) -> bool
    where
        E: PartialEq,
    {
        match &self.repr {
            Repr::Empty => false,
            Repr::Items(items) => items.contains(e),
            Repr::Lazy(_) => self.iter().any(|x| x == *e),
        }
    }

    /// Pulls at most one element.
    pub fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::Empty => true,
            Repr::Items(_) => false,
            Repr::Lazy(_) => !self.iter().has_next(),
        }
    }

    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }
}

//
// traversal
//
impl<E: Clone + 'static> Seq<E> {
    /// Feed elements to `f` until it returns `false`.
    ///
    /// Returns `true` when every element has been processed.
    #[inline]
    pub fn process_each(&self, f: impl FnMut(E) -> bool) -> bool {
        self.iter().all(f)
    }

    #[inline]
    pub fn for_each(&self, f: impl FnMut(E)) {
        self.iter().for_each(f)
    }
}
