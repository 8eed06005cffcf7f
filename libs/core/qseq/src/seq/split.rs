use std::{cell::RefCell, rc::Rc};

use crate::{
    cursor::{Cursor, SharedCursor, Step},
    op::Cond,
};

use super::Seq;

// -----------------------------------------------------------------------------
// Split
// -----------------------------------------------------------------------------
/// Where separator elements go when a sequence is split into groups.
///
/// For the source `v1 s1 v2 s2 v3`, where `s*` are separators:
///
/// | mode     | groups                                |
/// |----------|---------------------------------------|
/// | `Off`    | `[v1] [v2] [v3]`                      |
/// | `Before` | `[v1] [s1 v2] [s2 v3]`                |
/// | `After`  | `[v1 s1] [v2 s2] [v3]`                |
/// | `Around` | `[v1] [v2] [v3]`                      |
/// | `Group`  | `[v1] [s1] [v2] [s2] [v3]`            |
///
/// `Off` and `Around` drop separators. Only `Around` yields empty groups:
/// one for every separator directly following another separator or the
/// start of the source, and one for a separator ending the source.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)
)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Split {
    /// A separator closes the current group.
    After,
    /// A separator opens the next group.
    Before,
    /// Separators are dropped and delimit groups, empty ones included.
    Around,
    /// Separators are dropped; groups are the runs of values.
    Off,
    /// Groups are the maximal runs of elements of the same class.
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Value,
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    SepToSep,
    ValueToSep,
    SepToValue,
    ValueToValue,
}

impl Transition {
    #[inline]
    fn new(prev: Class, cur: Class) -> Self {
        match (prev, cur) {
            (Class::Separator, Class::Separator) => Transition::SepToSep,
            (Class::Value, Class::Separator) => Transition::ValueToSep,
            (Class::Separator, Class::Value) => Transition::SepToValue,
            (Class::Value, Class::Value) => Transition::ValueToValue,
        }
    }
}

impl Split {
    /// Whether an element continues the current group.
    #[inline]
    fn extends(self, t: Transition) -> bool {
        use Transition::*;
        match self {
            Split::Off | Split::Around | Split::Before => matches!(t, SepToValue | ValueToValue),
            Split::After => matches!(t, ValueToSep | ValueToValue),
            Split::Group => matches!(t, SepToSep | ValueToValue),
        }
    }

    /// Whether the element ending a group becomes the head of the next one.
    #[inline]
    fn carries_boundary(self) -> bool {
        !matches!(self, Split::Off | Split::Around)
    }

    #[inline]
    fn keeps_empty(self) -> bool {
        matches!(self, Split::Around)
    }
}

// -----------------------------------------------------------------------------
// Boundary
// -----------------------------------------------------------------------------
// state of a single split pass, shared by the group cursors
struct Boundary<E> {
    mode: Split,
    separator: Cond<E>,
    last: Option<Class>,
    stored: Option<E>,
}

impl<E: Clone> Boundary<E> {
    fn new(mode: Split, separator: Cond<E>) -> Self {
        Self {
            mode,
            separator,
            last: None,
            stored: None,
        }
    }

    #[inline]
    fn classify(&mut self, e: &E) -> Class {
        if self.separator.test(e) {
            Class::Separator
        } else {
            Class::Value
        }
    }

    /// Classify `e` and decide whether it belongs to the open group.
    fn extends(&mut self, e: &E) -> bool {
        let cur = self.classify(e);
        let Some(prev) = self.last.replace(cur) else {
            return true;
        };
        let extends = self.mode.extends(Transition::new(prev, cur));
        if !extends && self.mode.carries_boundary() {
            self.stored = Some(e.clone());
        }
        extends
    }
}

enum Head<E> {
    Open(E),
    Empty,
    End,
}

// -----------------------------------------------------------------------------
// Seq::split
// -----------------------------------------------------------------------------
impl<E: Clone + 'static> Seq<E> {
    /// Split into groups delimited by elements satisfying `f`.
    ///
    /// See [`Split`] for the placement of separators.
    #[inline]
    pub fn split(&self, mode: Split, f: impl Fn(&E) -> bool + 'static) -> Seq<Seq<E>> {
        self.split_with(mode, Cond::pure(f))
    }

    /// Same as [`Seq::split`] with a possibly stateful separator predicate.
    ///
    /// Every element is tested exactly once per pass. Groups are one-shot and
    /// share the cursor of `self`: moving on to the next group skips whatever
    /// is left of the current one.
    pub fn split_with(&self, mode: Split, separator: Cond<E>) -> Seq<Seq<E>> {
        log::debug!("splitting sequence with mode {}", mode);

        self.intercept_cursor(move |cursor| {
            let mut source = SharedCursor::new(cursor);
            let boundary = Rc::new(RefCell::new(Boundary::new(mode, separator.copy())));
            let mut current: Option<SharedCursor<E>> = None;
            let mut opened = 0usize;
            Cursor::from_fn(move || {
                if let Some(prev) = current.take() {
                    prev.drain();
                }
                let head = match next_head(&mut source, &mut boundary.borrow_mut()) {
                    Head::Open(head) => head,
                    Head::Empty => {
                        opened += 1;
                        log::trace!("split({}) opened empty group #{}", mode, opened);
                        return Step::Yield(Seq::empty());
                    }
                    Head::End => return Step::Stop,
                };
                opened += 1;
                log::trace!("split({}) opened group #{}", mode, opened);

                let cond = {
                    let boundary = Rc::clone(&boundary);
                    Cond::pure(move |e: &E| boundary.borrow_mut().extends(e))
                };
                let rest = SharedCursor::new(Cursor::wrap(source.clone()).taken_while(cond).boxed());
                current = Some(rest.clone());
                Step::Yield(Seq::once(std::iter::once(head).chain(rest)))
            })
            .boxed()
        })
    }
}

fn next_head<E: Clone>(source: &mut SharedCursor<E>, boundary: &mut Boundary<E>) -> Head<E> {
    if let Some(head) = boundary.stored.take() {
        return Head::Open(head);
    }
    loop {
        let Some(e) = source.next() else {
            if boundary.mode.keeps_empty() && boundary.last == Some(Class::Separator) {
                boundary.last = None;
                return Head::Empty;
            }
            return Head::End;
        };
        let class = boundary.classify(&e);
        boundary.last = Some(class);
        match (boundary.mode, class) {
            (Split::Off, Class::Separator) => continue,
            (Split::Around, Class::Separator) => return Head::Empty,
            _ => return Head::Open(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::Error;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn groups(input: &[&'static str], mode: Split) -> Vec<Vec<&'static str>> {
        Seq::of(input.iter().copied())
            .split(mode, |e| e.starts_with('s'))
            .map(|group| group.to_vec())
            .to_vec()
    }

    #[rstest]
    #[case::off(Split::Off, vec![vec!["v1"], vec!["v2"], vec!["v3"]])]
    #[case::before(Split::Before, vec![vec!["v1"], vec!["s1", "v2"], vec!["s2", "v3"]])]
    #[case::after(Split::After, vec![vec!["v1", "s1"], vec!["v2", "s2"], vec!["v3"]])]
    #[case::around(Split::Around, vec![vec!["v1"], vec!["v2"], vec!["v3"]])]
    #[case::group(
        Split::Group,
        vec![vec!["v1"], vec!["s1"], vec!["v2"], vec!["s2"], vec!["v3"]]
    )]
    fn test_split_modes(#[case] mode: Split, #[case] expected: Vec<Vec<&'static str>>) {
        init();
        assert_eq!(groups(&["v1", "s1", "v2", "s2", "v3"], mode), expected);
    }

    #[rstest]
    #[case::off(Split::Off, vec![vec!["v1"]])]
    #[case::before(Split::Before, vec![vec!["s1", "v1"]])]
    #[case::after(Split::After, vec![vec!["s1"], vec!["v1"]])]
    #[case::around(Split::Around, vec![vec![], vec!["v1"]])]
    #[case::group(Split::Group, vec![vec!["s1"], vec!["v1"]])]
    fn test_leading_separator(#[case] mode: Split, #[case] expected: Vec<Vec<&'static str>>) {
        init();
        assert_eq!(groups(&["s1", "v1"], mode), expected);
    }

    #[rstest]
    #[case::off(Split::Off, vec![vec!["v1"]])]
    #[case::before(Split::Before, vec![vec!["v1"], vec!["s1"]])]
    #[case::after(Split::After, vec![vec!["v1", "s1"]])]
    #[case::around(Split::Around, vec![vec!["v1"], vec![]])]
    #[case::group(Split::Group, vec![vec!["v1"], vec!["s1"]])]
    fn test_trailing_separator(#[case] mode: Split, #[case] expected: Vec<Vec<&'static str>>) {
        init();
        assert_eq!(groups(&["v1", "s1"], mode), expected);
    }

    #[rstest]
    #[case::off(Split::Off, vec![])]
    #[case::before(Split::Before, vec![vec!["s1"], vec!["s2"]])]
    #[case::after(Split::After, vec![vec!["s1"], vec!["s2"]])]
    #[case::around(Split::Around, vec![vec![], vec![], vec![]])]
    #[case::group(Split::Group, vec![vec!["s1", "s2"]])]
    fn test_all_separators(#[case] mode: Split, #[case] expected: Vec<Vec<&'static str>>) {
        init();
        assert_eq!(groups(&["s1", "s2"], mode), expected);
    }

    #[rstest]
    #[case::off(Split::Off, vec![vec!["v1"], vec!["v2"]])]
    #[case::before(Split::Before, vec![vec!["v1"], vec!["s1"], vec!["s2", "v2"]])]
    #[case::after(Split::After, vec![vec!["v1", "s1"], vec!["s2"], vec!["v2"]])]
    #[case::around(Split::Around, vec![vec!["v1"], vec![], vec!["v2"]])]
    #[case::group(Split::Group, vec![vec!["v1"], vec!["s1", "s2"], vec!["v2"]])]
    fn test_adjacent_separators(#[case] mode: Split, #[case] expected: Vec<Vec<&'static str>>) {
        init();
        assert_eq!(groups(&["v1", "s1", "s2", "v2"], mode), expected);
    }

    #[test]
    fn test_single_element() {
        init();
        for mode in Split::iter() {
            assert_eq!(groups(&["v1"], mode), vec![vec!["v1"]], "{}", mode);
            assert!(groups(&[], mode).is_empty(), "{}", mode);
        }
        assert_eq!(groups(&["s1"], Split::Off), Vec::<Vec<&str>>::new());
        assert_eq!(groups(&["s1"], Split::Around), vec![Vec::<&str>::new(); 2]);
        assert_eq!(groups(&["s1"], Split::Before), vec![vec!["s1"]]);
    }

    #[test]
    fn test_separator_is_tested_once_per_element() {
        init();
        let seq = Seq::of(["v1", "s1", "v2", "s2", "v3"]);
        for mode in Split::iter() {
            let tested = Rc::new(RefCell::new(Vec::new()));
            let split = {
                let tested = tested.clone();
                seq.split(mode, move |e| {
                    tested.borrow_mut().push(*e);
                    e.starts_with('s')
                })
            };
            split.for_each(|group| group.for_each(|_| ()));

            assert_eq!(*tested.borrow(), vec!["v1", "s1", "v2", "s2", "v3"], "{}", mode);
        }
    }

    #[test]
    fn test_unconsumed_groups_are_skipped() {
        init();
        let seq = Seq::of(["v1", "v2", "s1", "v3", "v4"]).split(Split::Before, |e| e.starts_with('s'));
        let heads: Vec<_> = seq.map(|group| group.first()).to_vec();

        assert_eq!(heads, vec![Some("v1"), Some("s1")]);
        assert_eq!(seq.size(), 2);
    }

    #[test]
    fn test_partially_read_group_is_drained() {
        init();
        let seq = Seq::of(["v1", "v2", "v3", "s1", "v4"]).split(Split::After, |e| e.starts_with('s'));
        let mut groups = seq.iter();

        let first = groups.next().unwrap();
        let mut first_iter = first.iter();
        assert_eq!(first_iter.next(), Some("v1"));
        assert_eq!(first_iter.next(), Some("v2"));

        let second = groups.next().unwrap();
        assert_eq!(second.to_vec(), vec!["v4"]);
        assert_eq!(first_iter.collect::<Vec<_>>(), Vec::<&str>::new());
        assert!(groups.next().is_none());
    }

    #[test]
    fn test_group_is_one_shot() {
        init();
        let seq = Seq::of(["v1", "v2", "s1", "v3"]).split(Split::Before, |e| e.starts_with('s'));
        let first = seq.first().unwrap();

        assert_eq!(first.to_vec(), vec!["v1", "v2"]);
        assert!(matches!(
            first.try_iter(),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_stateful_separator_per_pass() {
        init();
        // every third element is a separator
        let seq = Seq::of(1..=7).split_with(
            Split::Off,
            Cond::stateful(0, |n: &mut usize, _: &i32| {
                *n += 1;
                *n % 3 == 0
            }),
        );
        let expected = vec![vec![1, 2], vec![4, 5], vec![7]];

        assert_eq!(seq.map(|group| group.to_vec()).to_vec(), expected);
        assert_eq!(seq.map(|group| group.to_vec()).to_vec(), expected);
    }

    #[test]
    fn test_empty_singleton() {
        assert!(Seq::<i32>::empty()
            .split(Split::Around, |_| true)
            .is_empty_singleton());
    }

    #[rstest]
    #[case(Split::After, "after")]
    #[case(Split::Before, "before")]
    #[case(Split::Around, "around")]
    #[case(Split::Off, "off")]
    #[case(Split::Group, "group")]
    fn test_split_name(#[case] mode: Split, #[case] name: &str) {
        assert_eq!(mode.to_string(), name);
        assert_eq!(name.parse::<Split>(), Ok(mode));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case(Split::Around, "\"around\"")]
    #[case(Split::Group, "\"group\"")]
    fn test_split_serde(#[case] mode: Split, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&mode).unwrap(), json);
        assert_eq!(serde_json::from_str::<Split>(json).unwrap(), mode);
    }

    #[rstest]
    #[case(Split::Off, [false, false, true, true])]
    #[case(Split::Around, [false, false, true, true])]
    #[case(Split::Before, [false, false, true, true])]
    #[case(Split::After, [false, true, false, true])]
    #[case(Split::Group, [true, false, false, true])]
    fn test_transition_table(#[case] mode: Split, #[case] expected: [bool; 4]) {
        let tested = [
            Transition::SepToSep,
            Transition::ValueToSep,
            Transition::SepToValue,
            Transition::ValueToValue,
        ]
        .map(|t| mode.extends(t));

        assert_eq!(tested, expected);
    }
}
