//! Mutation Journal
//!
//! Poll-based record of DOM changes, drained by the scanner.

use crate::NodeId;

/// Mutation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
}

/// Poll-based mutation journal
#[derive(Debug, Default)]
pub struct MutationJournal {
    pending_records: Vec<MutationRecord>,
}

impl MutationJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation
    pub fn record(&mut self, mutation: MutationRecord) {
        self.pending_records.push(mutation);
    }

    /// Take pending records
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending_records)
    }

    /// Has pending records
    pub fn has_pending(&self) -> bool {
        !self.pending_records.is_empty()
    }

    /// Record a child list change
    pub fn notify_child_change(
        &mut self,
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    ) {
        self.record(MutationRecord {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            attribute_name: None,
        });
    }

    /// Record an attribute change
    pub fn notify_attribute_change(&mut self, target: NodeId, name: &str) {
        self.record(MutationRecord {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_drain() {
        let mut journal = MutationJournal::new();
        journal.notify_child_change(NodeId(1), vec![NodeId(2)], Vec::new());
        journal.notify_attribute_change(NodeId(2), "src");

        assert!(journal.has_pending());
        let records = journal.take_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mutation_type, MutationType::ChildList);
        assert_eq!(records[0].added_nodes, vec![NodeId(2)]);
        assert_eq!(records[1].attribute_name.as_deref(), Some("src"));
        assert!(!journal.has_pending());
    }
}
