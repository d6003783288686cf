//! Slot storage for skip nodes.
//!
//! Nodes are addressed by [`NodeId`], a non-zero index, so that a link
//! `Option<NodeId>` costs no more than the index itself. Removing a node frees
//! its slot for reuse. Each allocation is tagged with a stamp taken from a
//! counter that only ever increases, and a [`Handle`] pairs an id with that
//! stamp: once a node is removed, no later node can be mistaken for it, even
//! if it reuses the same slot or the arena was cleared in between. Handles also
//! carry the identity of the arena that issued them, so a handle presented to
//! another arena never resolves.

use std::num::NonZeroUsize;
use std::ops;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::skipnode::SkipNode;

/// Stable address of a live node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(NonZeroUsize);

impl NodeId {
    #[inline]
    fn from_slot(slot: usize) -> Self {
        NodeId(NonZeroUsize::MIN.saturating_add(slot))
    }

    #[inline]
    fn slot(self) -> usize {
        self.0.get() - 1
    }
}

/// A [`NodeId`] together with the stamp of the allocation it refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Handle {
    pub id: NodeId,
    owner: u64,
    stamp: u64,
}

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
enum Slot<T> {
    Occupied { stamp: u64, node: SkipNode<T> },
    Vacant,
}

#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    // Vacant slots, most recently freed last.
    free: Vec<usize>,
    owner: u64,
    next_stamp: u64,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            next_stamp: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Store `node`, reusing a vacant slot if there is one.
    pub fn insert(&mut self, node: SkipNode<T>) -> NodeId {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        let occupied = Slot::Occupied { stamp, node };
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = occupied;
                NodeId::from_slot(slot)
            }
            None => {
                self.slots.push(occupied);
                NodeId::from_slot(self.slots.len() - 1)
            }
        }
    }

    /// Take the node out of its slot, leaving the slot vacant.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already vacant; links never point at vacant
    /// slots, so this would be a bug in the set.
    pub fn remove(&mut self, id: NodeId) -> SkipNode<T> {
        let slot = id.slot();
        match std::mem::replace(&mut self.slots[slot], Slot::Vacant) {
            Slot::Occupied { node, .. } => {
                self.free.push(slot);
                node
            }
            Slot::Vacant => panic!("removed vacant slot {slot}"),
        }
    }

    /// Drop every node. Stamps keep increasing so that handles issued before
    /// the call never match a node allocated after it.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// The handle for the node currently stored under `id`.
    pub fn handle(&self, id: NodeId) -> Handle {
        match &self.slots[id.slot()] {
            Slot::Occupied { stamp, .. } => Handle {
                id,
                owner: self.owner,
                stamp: *stamp,
            },
            Slot::Vacant => panic!("handle to vacant slot {}", id.slot()),
        }
    }

    /// The node `handle` was issued for, if it is still alive.
    pub fn resolve(&self, handle: Handle) -> Option<&SkipNode<T>> {
        if handle.owner != self.owner {
            return None;
        }
        match self.slots.get(handle.id.slot()) {
            Some(Slot::Occupied { stamp, node }) if *stamp == handle.stamp => Some(node),
            _ => None,
        }
    }
}

impl<T> ops::Index<NodeId> for Arena<T> {
    type Output = SkipNode<T>;

    fn index(&self, id: NodeId) -> &SkipNode<T> {
        match &self.slots[id.slot()] {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant => panic!("link to vacant slot {}", id.slot()),
        }
    }
}

impl<T> ops::IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut SkipNode<T> {
        match &mut self.slots[id.slot()] {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant => panic!("link to vacant slot {}", id.slot()),
        }
    }
}
