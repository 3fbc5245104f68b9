//! Document - High-level document API

use crate::{DomTree, NodeId};

/// A document: DOM tree plus its URL
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with the basic html/head/body structure
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html).ok();
        tree.append_child(html, head).ok();
        tree.append_child(html, body).ok();

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Frame-type elements in document order
    pub fn frames(&self) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&id| {
                self.tree
                    .get(id)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.is_frame())
            })
            .collect()
    }

    /// Inline scripts (script elements without src) with their text
    pub fn inline_scripts(&self) -> Vec<(NodeId, String)> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&id| {
                self.tree
                    .get(id)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.tag == "script" && !e.has_attr("src"))
            })
            .map(|id| (id, self.tree.text_content(id)))
            .collect()
    }

    /// Full serialized markup of the document
    pub fn markup(&self) -> String {
        self.tree.serialize(self.tree.root())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
