use crate::arena::NodeId;

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// A forward link at one level: the next node that also reaches that level, or
/// `None` at the end of the level.
pub(crate) type Link = Option<NodeId>;

/// SkipNodes make up the SkipSet. The set owns every node through its arena;
/// nodes only refer to each other through [`NodeId`]s, so there are no
/// back-references and no ownership cycles.
///
/// The node has a `level` which corresponds to how 'high' the node reaches. A
/// node of level `n` has `n + 1` forward links, one per level `0..=n`. The
/// link at level 0 is the immediate successor in sorted order.
///
/// The head of the set is not a `SkipNode`; it is a bare slice of links owned
/// by the set itself.
#[derive(Clone, Debug)]
pub(crate) struct SkipNode<T> {
    pub value: T,
    // Links to the next node at the respective level. Sized once, at
    // insertion, to `level + 1` and never resized.
    pub links: Box<[Link]>,
}

impl<T> SkipNode<T> {
    /// Create a node holding `value` whose links are taken from `links`.
    pub fn new(value: T, links: impl IntoIterator<Item = Link>) -> Self {
        let links: Box<[Link]> = links.into_iter().collect();
        debug_assert!(!links.is_empty(), "a node reaches at least level 0");
        SkipNode { value, links }
    }

    /// How high the node reaches.
    #[inline]
    pub fn level(&self) -> usize {
        self.links.len() - 1
    }

    /// The immediate successor.
    #[inline]
    pub fn next(&self) -> Link {
        self.links[0]
    }

    /// Consumes the node returning the value it contains.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}
