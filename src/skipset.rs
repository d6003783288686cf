//! An always-ordered set of unique values.

use std::{fmt, hash, hash::Hash, iter, mem, ops::Bound};

use smallvec::{SmallVec, smallvec};

use crate::{
    MAX_LEVEL,
    arena::{Arena, Handle, NodeId},
    comparator::{Ascending, Comparator},
    level_generator::{Geometric, LevelGenerator},
    skipnode::{Link, SkipNode},
};

// ////////////////////////////////////////////////////////////////////////////
// Cursor
// ////////////////////////////////////////////////////////////////////////////

/// A position in a [`SkipSet`]: either an element or the end of the set.
///
/// Cursors are plain copyable values; they do not borrow the set. Two cursors
/// are equal if and only if they denote the same node, or are both the end.
///
/// Erasing an element invalidates only the cursors denoting that element. An
/// invalidated cursor never aliases another element: [`SkipSet::get`] returns
/// `None` for it, [`SkipSet::advance`] returns the end, and
/// [`SkipSet::erase`] leaves the set untouched. The same holds for a cursor
/// presented to a set other than the one that issued it. After
/// [`SkipSet::swap`] a cursor follows its element into the other set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    node: Option<Handle>,
}

impl Cursor {
    /// The end-of-set cursor, shared by every set.
    pub const END: Cursor = Cursor { node: None };

    /// Returns `true` if this is the end-of-set cursor.
    #[inline]
    #[must_use]
    pub fn is_end(self) -> bool {
        self.node.is_none()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// SkipSet
// ////////////////////////////////////////////////////////////////////////////

/// Where a traversal stands: on the head, or on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Head,
    Node(NodeId),
}

/// The per-level predecessors of a position: the splice points used by
/// insertion and erasure.
type Update = SmallVec<[Anchor; MAX_LEVEL + 1]>;

/// The skip set stores unique values such that they are always sorted, and
/// provides `O(log(n))` expected lookup, insertion and removal.
///
/// Ordering is decided by a [`Comparator`], [`Ascending`] by default. Two
/// values are considered the same element when they are *equivalent* under
/// the comparator (neither is less than the other); inserting a value
/// equivalent to one already present leaves the set unchanged.
///
/// Positions in the set are expressed as [`Cursor`]s, returned by
/// [`find`](SkipSet::find), [`lower_bound`](SkipSet::lower_bound) and friends,
/// and consumed by [`get`](SkipSet::get), [`advance`](SkipSet::advance) and
/// [`erase`](SkipSet::erase).
///
/// # Examples
///
/// ```
/// use skipset::SkipSet;
///
/// let mut set = SkipSet::new();
/// set.insert(5);
/// set.insert(3);
/// set.insert(7);
/// assert!(set.iter().copied().eq([3, 5, 7]));
///
/// let (cursor, inserted) = set.insert(5);
/// assert!(!inserted);
/// assert_eq!(set.get(cursor), Some(&5));
///
/// let next = set.erase(cursor);
/// assert_eq!(set.get(next), Some(&7));
/// assert!(set.iter().copied().eq([3, 7]));
/// ```
pub struct SkipSet<T, C = Ascending, G = Geometric> {
    // head[i] is the first node reaching level i. Always `level_generator.total()`
    // long, even when the set is empty.
    head: Box<[Link]>,
    nodes: Arena<T>,
    // Highest level with at least one node; 0 when empty.
    level: usize,
    len: usize,
    // Last node at level 0.
    tail: Link,
    comparator: C,
    level_generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> SkipSet<T> {
    /// Create a new skip set ordered by `T`'s [`Ord`] implementation, with
    /// [`MAX_LEVEL`] + 1 levels and a promotion probability of one half.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<i64> = SkipSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Ascending, Geometric::default())
    }
}

impl<T, C> SkipSet<T, C> {
    /// Create a new skip set ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{Descending, SkipSet};
    ///
    /// let mut set = SkipSet::with_comparator(Descending);
    /// set.extend([5, 3, 7, 1, 9]);
    /// assert!(set.iter().copied().eq([9, 7, 5, 3, 1]));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_level_generator(comparator, Geometric::default())
    }

    /// Build a skip set ordered by `comparator` from the values of `iter`.
    /// Values equivalent to an earlier one are dropped.
    #[inline]
    pub fn from_iter_with<I>(iter: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = T>,
        C: Comparator<T>,
    {
        let mut set = Self::with_comparator(comparator);
        set.extend(iter);
        set
    }
}

impl<T, C, G> SkipSet<T, C, G>
where
    G: LevelGenerator,
{
    /// Create a new skip set ordered by `comparator`, drawing node heights
    /// from `level_generator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{Ascending, Geometric, SkipSet};
    ///
    /// let generator = Geometric::with_seed(8, 0.25, 42).unwrap();
    /// let mut set = SkipSet::with_level_generator(Ascending, generator);
    /// set.extend(0..100);
    /// assert_eq!(set.len(), 100);
    /// ```
    #[inline]
    pub fn with_level_generator(comparator: C, level_generator: G) -> Self {
        let total = level_generator.total().max(1);
        SkipSet {
            head: iter::repeat_n(None, total).collect(),
            nodes: Arena::new(),
            level: 0,
            len: 0,
            tail: None,
            comparator,
            level_generator,
        }
    }

    /// Move the contents out of the set, leaving it empty but usable. The
    /// returned set keeps the comparator and level generator state; the
    /// emptied set gets copies of both.
    ///
    /// This is `O(1)` in the number of elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut a: SkipSet<_> = [3, 5, 7].into();
    /// let b = a.take();
    /// assert!(a.is_empty());
    /// assert_eq!(a.begin(), a.end());
    /// assert!(b.iter().copied().eq([3, 5, 7]));
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self
    where
        C: Clone,
        G: Clone,
    {
        let empty = Self::with_level_generator(self.comparator.clone(), self.level_generator.clone());
        mem::replace(self, empty)
    }
}

impl<T, C, G> SkipSet<T, C, G> {
    /// Clears the set, removing all values. Cursors into the set are all
    /// invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set: SkipSet<_> = (0..10).collect();
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.begin(), set.end());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(len = self.len, "clearing skip set");
        self.nodes.clear();
        self.head.fill(None);
        self.level = 0;
        self.len = 0;
        self.tail = None;
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The ordering strategy used by the set.
    #[inline]
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Exchange the entire contents of two sets, including comparator and
    /// level generator state, in `O(1)`.
    ///
    /// Cursors follow their elements: a cursor obtained from `self` before the
    /// swap denotes the same element in `other` afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut a: SkipSet<_> = [1, 3, 5].into();
    /// let mut b: SkipSet<_> = [2, 4, 6].into();
    /// let three = a.find(&3);
    /// a.swap(&mut b);
    /// assert!(a.iter().copied().eq([2, 4, 6]));
    /// assert_eq!(b.get(three), Some(&3));
    /// ```
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// A cursor to the smallest element, or the end if the set is empty.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.cursor_at(self.head[0])
    }

    /// The end-of-set cursor.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    /// The element a cursor denotes, or `None` for the end or an invalidated
    /// cursor.
    #[inline]
    #[must_use]
    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        self.resolve(cursor).map(|node| &node.value)
    }

    /// The cursor following `cursor`. Advancing the end, or an invalidated
    /// cursor, yields the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [10, 20].into();
    /// let first = set.begin();
    /// let second = set.advance(first);
    /// assert_eq!(set.get(second), Some(&20));
    /// assert_eq!(set.advance(second), set.end());
    /// ```
    #[inline]
    #[must_use]
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        self.resolve(cursor)
            .map_or(Cursor::END, |node| self.cursor_at(node.next()))
    }

    /// Provides a reference to the smallest element, or `None` if the set is
    /// empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.head[0].map(|id| &self.nodes[id].value)
    }

    /// Provides a reference to the greatest element, or `None` if the set is
    /// empty. This is `O(1)`.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tail.map(|id| &self.nodes[id].value)
    }

    /// Creates an iterator over the elements of the set, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [5, 3, 7, 2, 8].into();
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [2, 3, 5, 7, 8]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            next: self.head[0],
            remaining: self.len,
        }
    }

    /// Iterates over the half-open cursor range `[first, last)`.
    ///
    /// `last` must be reachable from `first`; if it is not (or was
    /// invalidated), iteration continues to the end of the set. An invalidated
    /// `first` yields nothing.
    #[inline]
    pub fn between(&self, first: Cursor, last: Cursor) -> Range<'_, T> {
        Range {
            nodes: &self.nodes,
            next: self.link_of(first),
            end: self.link_of(last),
        }
    }

    fn resolve(&self, cursor: Cursor) -> Option<&SkipNode<T>> {
        cursor.node.and_then(|handle| self.nodes.resolve(handle))
    }

    fn link_of(&self, cursor: Cursor) -> Link {
        cursor
            .node
            .filter(|&handle| self.nodes.resolve(handle).is_some())
            .map(|handle| handle.id)
    }

    fn cursor_at(&self, link: Link) -> Cursor {
        Cursor {
            node: link.map(|id| self.nodes.handle(id)),
        }
    }

    fn forward(&self, at: Anchor, level: usize) -> Link {
        match at {
            Anchor::Head => self.head[level],
            Anchor::Node(id) => self.nodes[id].links[level],
        }
    }

    fn forward_mut(&mut self, at: Anchor, level: usize) -> &mut Link {
        match at {
            Anchor::Head => &mut self.head[level],
            Anchor::Node(id) => &mut self.nodes[id].links[level],
        }
    }

    /// Keep moving along `level` while `pred` holds for the next value.
    fn advance_while_at_level(
        &self,
        mut current: Anchor,
        level: usize,
        mut pred: impl FnMut(&T) -> bool,
    ) -> Anchor {
        while let Some(next) = self.forward(current, level) {
            if !pred(&self.nodes[next].value) {
                break;
            }
            current = Anchor::Node(next);
        }
        current
    }

    /// Descend from the head at the active height down to level 0, moving
    /// sideways at each level while `pred` holds for the next value.
    ///
    /// Returns where the descent stopped at level 0. If `update` is given, the
    /// last anchor visited at each level is recorded into it; slots above the
    /// active height are left untouched.
    fn descend(&self, mut pred: impl FnMut(&T) -> bool, mut update: Option<&mut Update>) -> Anchor {
        let mut current = Anchor::Head;
        for level in (0..=self.level).rev() {
            current = self.advance_while_at_level(current, level, &mut pred);
            if let Some(update) = update.as_deref_mut() {
                update[level] = current;
            }
        }
        current
    }
}

impl<T, C, G> SkipSet<T, C, G>
where
    C: Comparator<T>,
{
    /// First node not ordered before `value`.
    fn lower_link(&self, value: &T) -> Link {
        let at = self.descend(|next| self.comparator.less(next, value), None);
        self.forward(at, 0)
    }

    /// First node ordered after `value`.
    fn upper_link(&self, value: &T) -> Link {
        let at = self.descend(|next| !self.comparator.less(value, next), None);
        self.forward(at, 0)
    }

    fn find_link(&self, value: &T) -> Link {
        self.lower_link(value)
            .filter(|&id| self.comparator.equivalent(&self.nodes[id].value, value))
    }

    /// Returns a cursor to the element equivalent to `value`, or the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [3, 5, 7].into();
    /// assert_eq!(set.get(set.find(&3)), Some(&3));
    /// assert_eq!(set.find(&10), set.end());
    /// ```
    #[inline]
    pub fn find(&self, value: &T) -> Cursor {
        self.cursor_at(self.find_link(value))
    }

    /// Returns 1 if an element equivalent to `value` is present, 0 otherwise.
    #[inline]
    pub fn count(&self, value: &T) -> usize {
        usize::from(self.contains(value))
    }

    /// Returns `true` if an element equivalent to `value` is present.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.find_link(value).is_some()
    }

    /// A cursor to the first element not ordered before `value`, or the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [10, 20, 30, 40, 50].into();
    /// assert_eq!(set.get(set.lower_bound(&25)), Some(&30));
    /// assert_eq!(set.get(set.lower_bound(&30)), Some(&30));
    /// assert_eq!(set.lower_bound(&60), set.end());
    /// ```
    #[inline]
    pub fn lower_bound(&self, value: &T) -> Cursor {
        self.cursor_at(self.lower_link(value))
    }

    /// A cursor to the first element ordered after `value`, or the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [10, 20, 30, 40, 50].into();
    /// assert_eq!(set.get(set.upper_bound(&30)), Some(&40));
    /// assert_eq!(set.upper_bound(&50), set.end());
    /// ```
    #[inline]
    pub fn upper_bound(&self, value: &T) -> Cursor {
        self.cursor_at(self.upper_link(value))
    }

    /// The range of elements equivalent to `value`, as a pair of cursors.
    /// Since the set holds no duplicates the range has at most one element;
    /// when empty, both cursors are the lower bound of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = ["a", "b", "b", "c"].into();
    /// assert_eq!(set.len(), 3);
    /// let (first, last) = set.equal_range(&"b");
    /// assert!(set.between(first, last).eq(&["b"]));
    /// ```
    pub fn equal_range(&self, value: &T) -> (Cursor, Cursor) {
        let lower = self.lower_link(value);
        match lower {
            Some(id) if !self.comparator.less(value, &self.nodes[id].value) => {
                (self.cursor_at(lower), self.cursor_at(self.nodes[id].next()))
            }
            _ => {
                let cursor = self.cursor_at(lower);
                (cursor, cursor)
            }
        }
    }

    /// Constructs an iterator over a sub-range of elements in the set,
    /// starting at `min` and ending at `max`. An `Unbounded` end is treated as
    /// "negative infinity" or "positive infinity" respectively, so
    /// `range(Unbounded, Unbounded)` yields the whole set. An inverted range
    /// yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    /// use std::ops::Bound::{Excluded, Included, Unbounded};
    ///
    /// let set: SkipSet<_> = (0..10).collect();
    /// assert!(set.range(Included(&3), Excluded(&7)).copied().eq(3..7));
    /// assert_eq!(Some(&4), set.range(Included(&4), Unbounded).next());
    /// ```
    pub fn range(&self, min: Bound<&T>, max: Bound<&T>) -> Range<'_, T> {
        let first = match min {
            Bound::Included(value) => self.lower_link(value),
            Bound::Excluded(value) => self.upper_link(value),
            Bound::Unbounded => self.head[0],
        };
        let last = match max {
            Bound::Included(value) => self.upper_link(value),
            Bound::Excluded(value) => self.lower_link(value),
            Bound::Unbounded => None,
        };
        let first = match (first, last) {
            (Some(first), Some(last))
                if self
                    .comparator
                    .less(&self.nodes[last].value, &self.nodes[first].value) =>
            {
                None
            }
            _ => first,
        };
        Range {
            nodes: &self.nodes,
            next: first,
            end: last,
        }
    }
}

impl<T, C, G> SkipSet<T, C, G>
where
    C: Comparator<T>,
    G: LevelGenerator,
{
    /// Insert `value` into the set.
    ///
    /// Returns a cursor to the element and `true` if the value was inserted.
    /// If an equivalent element is already present, the set is left unchanged
    /// and the cursor denotes the existing element, paired with `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// let (cursor, inserted) = set.insert(2);
    /// assert!(inserted);
    /// assert_eq!(set.get(cursor), Some(&2));
    ///
    /// let (_, inserted) = set.insert(2);
    /// assert!(!inserted);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> (Cursor, bool) {
        // Levels above the active height keep the head as their predecessor.
        let mut update: Update = smallvec![Anchor::Head; self.head.len()];
        let at = self.descend(|next| self.comparator.less(next, &value), Some(&mut update));

        if let Some(existing) = self.forward(at, 0) {
            if self
                .comparator
                .equivalent(&self.nodes[existing].value, &value)
            {
                return (self.cursor_at(Some(existing)), false);
            }
        }

        let level = self.level_generator.level().min(self.head.len() - 1);
        if level > self.level {
            #[cfg(feature = "tracing")]
            tracing::trace!(from = self.level, to = level, "raising skip set height");
            self.level = level;
        }

        let links: SmallVec<[Link; MAX_LEVEL + 1]> = (0..=level)
            .map(|i| self.forward(update[i], i))
            .collect();
        let id = self.nodes.insert(SkipNode::new(value, links));
        debug_assert_eq!(self.nodes[id].level(), level);
        for (i, &anchor) in update.iter().take(level + 1).enumerate() {
            *self.forward_mut(anchor, i) = Some(id);
        }

        if self.nodes[id].next().is_none() {
            self.tail = Some(id);
        }
        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        (self.cursor_at(Some(id)), true)
    }

    /// Insert `value`, with `hint` as a suggestion of where it belongs.
    ///
    /// The hint is accepted for interface compatibility and does not affect
    /// the result or the complexity. Returns a cursor to the inserted element,
    /// or to the existing equivalent element.
    #[inline]
    pub fn insert_with_hint(&mut self, _hint: Cursor, value: T) -> Cursor {
        self.insert(value).0
    }

    /// Replace the contents of the set with the values of `iter`, keeping the
    /// comparator.
    #[inline]
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(iter);
    }
}

impl<T, C, G> SkipSet<T, C, G>
where
    C: Comparator<T>,
{
    /// Erase the element `cursor` denotes and return a cursor to the element
    /// that followed it.
    ///
    /// Erasing the end, or a cursor that no longer denotes an element of this
    /// set, does nothing and returns the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set: SkipSet<_> = [3, 5, 7].into();
    /// let five = set.find(&5);
    /// let next = set.erase(five);
    /// assert_eq!(set.get(next), Some(&7));
    /// assert_eq!(set.len(), 2);
    ///
    /// // The cursor is now stale.
    /// assert_eq!(set.erase(five), set.end());
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn erase(&mut self, cursor: Cursor) -> Cursor {
        match self.unlink(cursor) {
            Some((_, next)) => self.cursor_at(next),
            None => Cursor::END,
        }
    }

    /// Erase the element equivalent to `value`, returning how many elements
    /// were removed (0 or 1).
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set: SkipSet<_> = [3, 5, 7].into();
    /// assert_eq!(set.remove(&3), 1);
    /// assert_eq!(set.remove(&10), 0);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove(&mut self, value: &T) -> usize {
        let cursor = self.find(value);
        if cursor.is_end() {
            0
        } else {
            self.erase(cursor);
            1
        }
    }

    /// Erase every element of the cursor range `[first, last)`, returning
    /// `last`.
    ///
    /// Stops early at the end of the set, or if `first` is invalidated.
    pub fn erase_range(&mut self, mut first: Cursor, last: Cursor) -> Cursor {
        while first != last && !first.is_end() {
            first = self.erase(first);
        }
        first
    }

    /// Removes the smallest element and returns it, or `None` if the set is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set: SkipSet<_> = [1, 2].into();
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(2));
    /// assert!(set.pop_first().is_none());
    /// ```
    #[inline]
    pub fn pop_first(&mut self) -> Option<T> {
        let first = self.begin();
        self.unlink(first).map(|(value, _)| value)
    }

    /// Removes the greatest element and returns it, or `None` if the set is
    /// empty.
    #[inline]
    pub fn pop_last(&mut self) -> Option<T> {
        let last = self.cursor_at(self.tail);
        self.unlink(last).map(|(value, _)| value)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set: SkipSet<_> = (0..10).collect();
    /// set.retain(|&x| x % 2 == 0);
    /// assert!(set.iter().copied().eq([0, 2, 4, 6, 8]));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.begin();
        while let Some(value) = self.get(cursor) {
            cursor = if f(value) {
                self.advance(cursor)
            } else {
                self.erase(cursor)
            };
        }
    }

    /// Detach the node `cursor` denotes, returning its value and successor.
    ///
    /// The predecessors are found again by a search keyed on the node's own
    /// value. If that search does not lead back to the very same node, the
    /// set is left untouched.
    fn unlink(&mut self, cursor: Cursor) -> Option<(T, Link)> {
        let handle = cursor.node?;
        let Some(node) = self.nodes.resolve(handle) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(?cursor, "erase of an invalidated cursor ignored");
            return None;
        };
        let target = handle.id;

        let mut update: Update = smallvec![Anchor::Head; self.head.len()];
        let at = self.descend(
            |next| self.comparator.less(next, &node.value),
            Some(&mut update),
        );
        if self.forward(at, 0) != Some(target) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?cursor, "node not found under its own value; erase ignored");
            return None;
        }

        for level in 0..=self.level {
            if self.forward(update[level], level) != Some(target) {
                break;
            }
            let next = self.nodes[target].links[level];
            *self.forward_mut(update[level], level) = next;
        }

        if self.tail == Some(target) {
            self.tail = match update[0] {
                Anchor::Head => None,
                Anchor::Node(id) => Some(id),
            };
        }

        let removed = self.nodes.remove(target);
        while self.level > 0 && self.head[self.level].is_none() {
            self.level -= 1;
        }
        #[cfg(feature = "tracing")]
        if removed.level() > self.level {
            tracing::trace!(to = self.level, "lowered skip set height");
        }
        self.len -= 1;

        let next = removed.next();
        Some((removed.into_inner(), next))
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

#[cfg(test)]
impl<T, C, G> SkipSet<T, C, G>
where
    C: Comparator<T>,
{
    /// Checks the integrity of the set.
    fn check(&self) {
        assert_eq!(self.nodes.len(), self.len, "arena and length disagree");
        let top = (0..self.head.len())
            .rev()
            .find(|&level| self.head[level].is_some())
            .unwrap_or(0);
        assert_eq!(self.level, top, "active height is stale");

        let mut bottom = Vec::with_capacity(self.len);
        let mut link = self.head[0];
        while let Some(id) = link {
            assert!(bottom.len() < self.len, "level 0 is longer than the set");
            bottom.push(id);
            link = self.nodes[id].next();
        }
        assert_eq!(bottom.len(), self.len);
        assert_eq!(bottom.last().copied(), self.tail, "tail is stale");

        for level in 0..self.head.len() {
            // Every node reaching this level, in level-0 order.
            let expected: Vec<_> = bottom
                .iter()
                .copied()
                .filter(|&id| self.nodes[id].level() >= level)
                .collect();
            let mut actual = Vec::with_capacity(expected.len());
            let mut link = self.head[level];
            while let Some(id) = link {
                assert!(actual.len() < expected.len(), "level {level} is too long");
                actual.push(id);
                link = self.nodes[id].links[level];
            }
            assert_eq!(actual, expected, "level {level} is not threaded correctly");
            for pair in actual.windows(2) {
                assert!(
                    self.comparator
                        .less(&self.nodes[pair[0]].value, &self.nodes[pair[1]].value),
                    "level {level} is not strictly increasing"
                );
            }
        }
    }
}

#[cfg(test)]
impl<T, C, G> SkipSet<T, C, G>
where
    T: fmt::Debug,
{
    /// Renders the levels of the set, highest first, one line per level.
    fn debug_structure(&self) -> String {
        let mut rows = Vec::with_capacity(self.level + 1);
        for level in (0..=self.level).rev() {
            let mut row = format!("L{level}:");
            let mut link = self.head[level];
            while let Some(id) = link {
                row.push_str(&format!(" {:?}", self.nodes[id].value));
                link = self.nodes[id].links[level];
            }
            rows.push(row);
        }
        rows.join("\n")
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<T, C, G> Default for SkipSet<T, C, G>
where
    C: Default,
    G: LevelGenerator + Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_level_generator(C::default(), G::default())
    }
}

/// Cloning re-inserts every element, in order, into a fresh structure: the
/// copy shares no nodes with the original and draws its own node heights.
impl<T, C, G> Clone for SkipSet<T, C, G>
where
    T: Clone,
    C: Comparator<T> + Clone,
    G: LevelGenerator + Clone,
{
    fn clone(&self) -> Self {
        let mut copy =
            Self::with_level_generator(self.comparator.clone(), self.level_generator.clone());
        copy.extend(self.iter().cloned());
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.comparator = source.comparator.clone();
        self.extend(source.iter().cloned());
    }
}

/// This implementation of `PartialEq` only checks that the *values* are equal,
/// in order; it does not compare comparators or node levels. It uses `T`'s
/// implementation of `PartialEq` and *not* the set's comparator.
impl<A, B, CA, CB, GA, GB> PartialEq<SkipSet<B, CB, GB>> for SkipSet<A, CA, GA>
where
    A: PartialEq<B>,
{
    #[inline]
    fn eq(&self, other: &SkipSet<B, CB, GB>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, C, G> Eq for SkipSet<T, C, G> where T: Eq {}

impl<T, C, G> Extend<T> for SkipSet<T, C, G>
where
    C: Comparator<T>,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
        for element in iterable {
            self.insert(element);
        }
    }
}

impl<'a, T, C, G> Extend<&'a T> for SkipSet<T, C, G>
where
    T: Copy + 'a,
    C: Comparator<T>,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iterable: I) {
        self.extend(iterable.into_iter().copied());
    }
}

impl<T, C, G> iter::FromIterator<T> for SkipSet<T, C, G>
where
    C: Comparator<T> + Default,
    G: LevelGenerator + Default,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, C, G, const N: usize> From<[T; N]> for SkipSet<T, C, G>
where
    C: Comparator<T> + Default,
    G: LevelGenerator + Default,
{
    #[inline]
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, C, G> fmt::Debug for SkipSet<T, C, G>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Hash, C, G> Hash for SkipSet<T, C, G> {
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T, C, G> IntoIterator for SkipSet<T, C, G> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            next: self.head[0],
            remaining: self.len,
            nodes: self.nodes,
        }
    }
}

impl<'a, T, C, G> IntoIterator for &'a SkipSet<T, C, G> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// /////////////////////////////////
// Iterators
// /////////////////////////////////

/// Iterator over the elements of a [`SkipSet`], in order.
pub struct Iter<'a, T> {
    nodes: &'a Arena<T>,
    next: Link,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = &self.nodes[self.next?];
        self.next = node.next();
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> iter::FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// Iterator over a contiguous part of a [`SkipSet`], created by
/// [`SkipSet::range`] and [`SkipSet::between`].
pub struct Range<'a, T> {
    nodes: &'a Arena<T>,
    next: Link,
    // Exclusive; `None` runs to the end of the set.
    end: Link,
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.next == self.end {
            self.next = None;
            return None;
        }
        let node = &self.nodes[self.next?];
        self.next = node.next();
        Some(&node.value)
    }
}

impl<T> iter::FusedIterator for Range<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range { ..*self }
    }
}

/// Owning iterator over the elements of a [`SkipSet`], in order.
pub struct IntoIter<T> {
    nodes: Arena<T>,
    next: Link,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let node = self.nodes.remove(self.next?);
        self.next = node.next();
        self.remaining -= 1;
        Some(node.into_inner())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> iter::FusedIterator for IntoIter<T> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
