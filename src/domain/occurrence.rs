//! Occurrence tracking.
//!
//! Maps each tracked identity to the node that represents it *now*. Every
//! re-resolution allocates a fresh node, so a variable shows up as a chain of
//! nodes (one per point in time) rather than as a single mutable vertex.

use crate::domain::edge::Edge;
use crate::domain::ids::{IdAllocator, Identity, NodeId};
use std::collections::HashMap;

/// Result of [`OccurrenceTracker::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// The new current node for the identity.
    pub node: NodeId,
    /// Dotted previous -> new edge the caller must record, if the identity
    /// had been seen before.
    pub continuity: Option<Edge>,
}

#[derive(Debug, Default)]
pub struct OccurrenceTracker {
    current: HashMap<Identity, NodeId>,
}

impl OccurrenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new occurrence of `identity`.
    pub fn resolve(&mut self, identity: Identity, ids: &mut IdAllocator) -> Resolved {
        let node = ids.fetch_add();
        let continuity = self
            .current
            .insert(identity, node)
            .map(|prev| Edge::dotted(prev, node));
        Resolved { node, continuity }
    }

    /// Current node of `identity`, without creating a new occurrence.
    pub fn peek_current(&self, identity: Identity) -> Option<NodeId> {
        self.current.get(&identity).copied()
    }

    /// Number of distinct identities seen.
    pub fn identities(&self) -> usize {
        self.current.len()
    }
}
