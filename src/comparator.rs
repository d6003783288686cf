//! Ordering strategies for [`SkipSet`][crate::SkipSet].
//!
//! A comparator answers a single question: is `a` strictly less than `b`? It
//! **must** be a strict weak order:
//!
//! - Irreflexive: `less(a, a)` is always `false`.
//! - Asymmetric: if `less(a, b)` then `!less(b, a)`.
//! - Transitive: if `less(a, b)` and `less(b, c)` then `less(a, c)`.
//!
//! Two values are *equivalent* when neither is less than the other. The set
//! uses equivalence, not [`PartialEq`], to decide whether a value is already
//! present. A comparator that is not a strict weak order will not cause memory
//! unsafety, but lookups, insertions and erasures may then give arbitrary
//! results.

use std::cmp::Ordering;
use std::fmt;

/// A strict weak order over `T`.
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `a` is ordered strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;

    /// Returns `true` if neither value is ordered before the other.
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// Any `Fn(&T, &T) -> bool` closure is a comparator, where the closure plays
/// the role of the "less than" predicate.
///
/// ```
/// use skipset::SkipSet;
///
/// let mut set = SkipSet::with_comparator(|a: &i32, b: &i32| a > b);
/// set.extend([5, 3, 7, 1, 9]);
/// assert!(set.iter().copied().eq([9, 7, 5, 3, 1]));
/// ```
impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// The natural order of `T`, as given by [`Ord`]. This is the default.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ascending;

impl<T: Ord + ?Sized> Comparator<T> for Ascending {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// The reverse of the natural order of `T`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descending;

impl<T: Ord + ?Sized> Comparator<T> for Descending {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        b < a
    }
}

/// Adapts a three-way comparison function `Fn(&T, &T) -> Ordering` into a
/// comparator.
///
/// ```
/// use skipset::{ByOrdering, SkipSet};
///
/// // Even numbers first, then odd numbers, each group ascending.
/// let mut set = SkipSet::with_comparator(ByOrdering(|a: &u64, b: &u64| {
///     (a % 2).cmp(&(b % 2)).then(a.cmp(b))
/// }));
/// set.extend(0..6);
/// assert!(set.iter().copied().eq([0, 2, 4, 1, 3, 5]));
/// ```
#[derive(Clone, Copy, Default)]
pub struct ByOrdering<F>(pub F);

impl<T: ?Sized, F> Comparator<T> for ByOrdering<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b) == Ordering::Less
    }

    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b) == Ordering::Equal
    }
}

impl<F> fmt::Debug for ByOrdering<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByOrdering(..)")
    }
}
