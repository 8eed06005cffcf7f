use crate::{
    cursor::{Cursor, SharedCursor, Step},
    Error,
};

use super::Seq;

impl<E: Clone + 'static> Seq<E> {
    /// Consecutive chunks of `size` elements; the last one may be shorter.
    ///
    /// All chunks of a pass share the cursor of `self`. Each chunk is one-shot,
    /// and moving on to the next chunk skips whatever is left of the current one.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `size` is zero.
    ///
    /// # Example
    /// ```
    /// use qseq::Seq;
    ///
    /// let chunks = Seq::of(1..=5).chunks(2).unwrap();
    /// let sizes: Vec<_> = chunks.map(|chunk| chunk.size()).to_vec();
    ///
    /// assert_eq!(sizes, vec![2, 2, 1]);
    /// ```
    pub fn chunks(&self, size: usize) -> Result<Seq<Seq<E>>, Error> {
        if size == 0 {
            return Err(Error::InvalidArgument {
                name: "size",
                reason: format!("{} <= 0", size),
            });
        }
        log::debug!("chunking sequence by {}", size);

        Ok(self.intercept_cursor(move |cursor| {
            let source = SharedCursor::new(cursor);
            let mut current: Option<SharedCursor<E>> = None;
            Cursor::from_fn(move || {
                if let Some(prev) = current.take() {
                    prev.drain();
                }
                if !source.has_next() {
                    return Step::Stop;
                }
                let chunk = SharedCursor::new(Cursor::wrap(source.clone()).taken(size).boxed());
                current = Some(chunk.clone());
                Step::Yield(Seq::once(chunk))
            })
            .boxed()
        }))
    }

    /// Same as [`Seq::chunks`] with every chunk collected into a `Vec`.
    ///
    /// With `strict`, a trailing chunk shorter than `size` is dropped.
    pub fn chunk_vecs(&self, size: usize, strict: bool) -> Result<Seq<Vec<E>>, Error> {
        let chunks = self.chunks(size)?;
        Ok(chunks.filter_map(move |chunk| {
            let items = chunk.to_vec();
            (!strict || items.len() == size).then_some(items)
        }))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::loose(false, vec![vec![1, 2], vec![3, 4], vec![5]])]
    #[case::strict(true, vec![vec![1, 2], vec![3, 4]])]
    fn test_chunk_vecs(#[case] strict: bool, #[case] expected: Vec<Vec<i32>>) {
        let seq = Seq::of(1..=5).chunk_vecs(2, strict).unwrap();

        assert_eq!(seq.to_vec(), expected);
        assert_eq!(seq.to_vec(), expected);
    }

    #[rstest]
    #[case::exact(6, 3, vec![vec![0, 1, 2], vec![3, 4, 5]])]
    #[case::larger(2, 5, vec![vec![0, 1]])]
    #[case::unit(3, 1, vec![vec![0], vec![1], vec![2]])]
    #[case::empty(0, 2, vec![])]
    fn test_chunks(#[case] len: i32, #[case] size: usize, #[case] expected: Vec<Vec<i32>>) {
        let seq = Seq::from_iterable(0..len).chunks(size).unwrap();

        assert_eq!(seq.map(|chunk| chunk.to_vec()).to_vec(), expected);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let err = Seq::of([1, 2]).chunks(0).unwrap_err();

        assert_eq!(
            err,
            Error::InvalidArgument {
                name: "size",
                reason: "0 <= 0".to_string()
            }
        );
        assert!(Seq::of([1, 2]).chunk_vecs(0, true).is_err());
    }

    #[test]
    fn test_next_chunk_drains_previous() {
        let chunks = Seq::of(1..=5).chunks(2).unwrap();
        let mut it = chunks.iter();

        let first = it.next().unwrap();
        let second = it.next().unwrap();
        assert_eq!(second.to_vec(), vec![3, 4]);
        // skipped over when the second chunk was requested
        assert_eq!(first.to_vec(), Vec::<i32>::new());

        let mut third = it.next().unwrap().iter();
        assert_eq!(third.next(), Some(5));
        assert!(it.next().is_none());
        assert_eq!(third.next(), None);
    }

    #[test]
    fn test_partially_read_chunk_is_drained() {
        let chunks = Seq::of(1..=7).chunks(3).unwrap();
        let mut it = chunks.iter();

        let first = it.next().unwrap();
        let mut first_iter = first.iter();
        assert_eq!(first_iter.next(), Some(1));

        let second = it.next().unwrap();
        assert_eq!(second.to_vec(), vec![4, 5, 6]);
        assert_eq!(first_iter.collect::<Vec<_>>(), Vec::<i32>::new());
        assert_eq!(it.next().map(|chunk| chunk.to_vec()), Some(vec![7]));
    }

    #[test]
    fn test_chunk_is_one_shot() {
        let chunks = Seq::of(1..=4).chunks(2).unwrap();
        let first = chunks.first().unwrap();

        assert_eq!(first.to_vec(), vec![1, 2]);
        assert!(first.try_iter().is_err());
    }
}
