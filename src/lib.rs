//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has references to nodes further down the list,
//! allowing the algorithm to effectively skip ahead.
//!
//! This crate provides [`SkipSet`], a set of unique values kept in the order
//! given by a [`Comparator`]. Positions are expressed as [`Cursor`]s, which
//! can be used to read, step through and erase elements:
//!
//! ```
//! use skipset::SkipSet;
//!
//! let mut set: SkipSet<_> = [10, 20, 30, 40, 50].into();
//! let (first, last) = (set.lower_bound(&15), set.upper_bound(&40));
//! assert!(set.between(first, last).copied().eq([20, 30, 40]));
//!
//! let next = set.erase(first);
//! assert_eq!(set.get(next), Some(&30));
//! ```
//!
//! The comparator **must** be a strict weak order; see the [`comparator`]
//! module. Failure to satisfy this will not cause memory unsafety, but the set
//! may then return arbitrary results.
//!
//! With the `tracing` feature enabled, structural events (height changes,
//! ignored erasures of invalidated cursors) are emitted through the
//! [`tracing`](https://docs.rs/tracing) crate.

pub mod comparator;
pub mod level_generator;

mod arena;
mod skipnode;
mod skipset;

/// Highest level a node can reach with the default level generator. The head
/// of a set has `MAX_LEVEL + 1` links.
pub const MAX_LEVEL: usize = 16;

/// Chance that a node present at one level is also present at the next, with
/// the default level generator.
pub const PROMOTION_PROBABILITY: f64 = 0.5;

pub use comparator::{Ascending, ByOrdering, Comparator, Descending};
pub use level_generator::{Geometric, GeometricError, LevelGenerator};
pub use skipset::{Cursor, IntoIter, Iter, Range, SkipSet};
