//! vigil DOM - Page Model
//!
//! Arena-based page model for frame inspection: nodes, elements and
//! attributes, per-frame content documents with a same-origin capability
//! probe, rendered geometry, and a poll-based mutation journal.

mod node;
mod tree;
mod document;
mod page;
mod mutation;

pub use node::{Attr, ElementData, Node, NodeData, TextData};
pub use tree::{ChildIter, DomError, DomResult, DomTree};
pub use document::Document;
pub use page::{FrameAccess, FrameCandidate, FrameRect, Page};
pub use mutation::{MutationJournal, MutationRecord, MutationType};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Absent-node sentinel
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this id refers to a node slot
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
