//! Page - the live frame source
//!
//! The hosted page as the scanner sees it: top document, rendered frame
//! geometry, per-frame content documents behind a same-origin capability
//! probe, and journaled mutations.

use std::collections::HashMap;

use crate::{Document, DomResult, MutationJournal, MutationRecord, NodeId};

/// Rendered frame rectangle (device pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameRect {
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Outcome of probing a frame's content document
pub enum FrameAccess<'a> {
    /// Same-origin document, markup readable
    Accessible(&'a Document),
    /// Cross-origin, detached, or no content document
    NotAccessible,
}

impl FrameAccess<'_> {
    pub fn is_accessible(&self) -> bool {
        matches!(self, FrameAccess::Accessible(_))
    }
}

/// Snapshot of one frame element for a classification pass
#[derive(Debug, Clone)]
pub struct FrameCandidate {
    pub id: NodeId,
    pub src: Option<String>,
    pub width: f64,
    pub height: f64,
}

/// Frame content document state
enum FrameContent {
    SameOrigin(Document),
    CrossOrigin,
}

/// The hosted page
pub struct Page {
    document: Document,
    geometry: HashMap<NodeId, FrameRect>,
    content: HashMap<NodeId, FrameContent>,
    journal: MutationJournal,
}

impl Page {
    /// Create a page with a fresh document
    pub fn new(url: &str) -> Self {
        Self::from_document(Document::new(url))
    }

    /// Wrap an existing document
    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            geometry: HashMap::new(),
            content: HashMap::new(),
            journal: MutationJournal::new(),
        }
    }

    /// Page URL
    pub fn url(&self) -> &str {
        self.document.url()
    }

    /// Access the top document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Access the top document mutably (bypasses the journal)
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Set a frame's rendered size
    pub fn set_rendered_size(&mut self, frame: NodeId, width: f64, height: f64) {
        self.geometry.insert(frame, FrameRect::new(width, height));
    }

    /// Rendered size of a frame (zero when never laid out)
    pub fn rendered_size(&self, frame: NodeId) -> FrameRect {
        self.geometry.get(&frame).copied().unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Frame content documents
    // ------------------------------------------------------------------

    /// Attach a same-origin content document to a frame
    pub fn attach_frame_document(&mut self, frame: NodeId, doc: Document) {
        if !self.is_live_frame(frame) {
            tracing::debug!(?frame, "attaching content to a node that is not a live frame");
        }
        self.content.insert(frame, FrameContent::SameOrigin(doc));
    }

    /// Mark a frame's content as cross-origin (opaque)
    pub fn mark_frame_opaque(&mut self, frame: NodeId) {
        self.content.insert(frame, FrameContent::CrossOrigin);
    }

    /// Drop a frame's content document (the frame navigated or was
    /// neutralized; whatever it showed is gone)
    pub fn reset_frame_content(&mut self, frame: NodeId) {
        self.content.remove(&frame);
    }

    /// Probe a frame's content document.
    ///
    /// Detached frames, frames without content, and cross-origin frames
    /// all answer `NotAccessible`; the probe never fails.
    pub fn probe_frame(&self, frame: NodeId) -> FrameAccess<'_> {
        if !self.is_live_frame(frame) {
            return FrameAccess::NotAccessible;
        }
        match self.content.get(&frame) {
            Some(FrameContent::SameOrigin(doc)) => FrameAccess::Accessible(doc),
            Some(FrameContent::CrossOrigin) | None => FrameAccess::NotAccessible,
        }
    }

    fn is_live_frame(&self, frame: NodeId) -> bool {
        let tree = self.document.tree();
        tree.get(frame)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.is_frame())
            && tree.is_connected(frame)
    }

    // ------------------------------------------------------------------
    // Candidates
    // ------------------------------------------------------------------

    /// Snapshot one frame for classification (None when stale or not a frame)
    pub fn candidate(&self, frame: NodeId) -> Option<FrameCandidate> {
        if !self.is_live_frame(frame) {
            return None;
        }
        let src = self
            .document
            .tree()
            .attribute(frame, "src")
            .map(String::from);
        let rect = self.rendered_size(frame);
        Some(FrameCandidate {
            id: frame,
            src,
            width: rect.width,
            height: rect.height,
        })
    }

    /// Snapshot every connected frame in document order
    pub fn frame_candidates(&self) -> Vec<FrameCandidate> {
        self.document
            .frames()
            .into_iter()
            .filter_map(|id| self.candidate(id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Journaled mutations
    // ------------------------------------------------------------------

    /// Append a child, recording the insertion
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.document.tree_mut().append_child(parent, child)?;
        self.journal
            .notify_child_change(parent, vec![child], Vec::new());
        Ok(child)
    }

    /// Insert before a reference child, recording the insertion
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.document
            .tree_mut()
            .insert_before(parent, child, reference)?;
        self.journal
            .notify_child_change(parent, vec![child], Vec::new());
        Ok(child)
    }

    /// Detach a node, recording the removal
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        let parent = self
            .document
            .tree()
            .get(node)
            .map(|n| n.parent)
            .unwrap_or(NodeId::NONE);
        self.document.tree_mut().detach(node)?;
        if parent.is_valid() {
            self.journal
                .notify_child_change(parent, Vec::new(), vec![node]);
        }
        Ok(())
    }

    /// Set an attribute, recording the change
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.document.tree_mut().set_attribute(element, name, value)?;
        self.journal.notify_attribute_change(element, name);
        Ok(())
    }

    /// Drain pending mutation records
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        self.journal.take_records()
    }
}
