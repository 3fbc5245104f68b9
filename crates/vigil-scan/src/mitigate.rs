//! Mitigator
//!
//! Disables a flagged frame and surfaces an in-page notice. Trusts the
//! caller's verdict completely; performs no classification of its own.

use vigil_dom::{NodeId, Page};

use crate::verdict::DetectionKind;

/// Neutral value a blocked frame's src is replaced with
pub const NEUTRAL_SRC: &str = "about:blank";

/// Marker attribute stamped on mitigated frames; suppresses duplicate
/// notices when overlapping scan passes act on the same frame
pub const BLOCKED_MARKER_ATTR: &str = "data-vigil-blocked";

/// Class prefix of the inserted notice element
pub const NOTICE_CLASS: &str = "vigil-notice";

pub struct Mitigator;

impl Mitigator {
    /// Neutralize a frame: replace its src, hide it, and insert one
    /// notice element immediately before it.
    ///
    /// Returns false when the frame is stale or already mitigated; both
    /// are no-ops.
    pub fn block(
        page: &mut Page,
        frame: NodeId,
        kind: DetectionKind,
        reason: &str,
        now_ms: u64,
    ) -> bool {
        if page.candidate(frame).is_none() {
            tracing::debug!(?frame, "skipping mitigation of a stale frame");
            return false;
        }
        if page
            .document()
            .tree()
            .attribute(frame, BLOCKED_MARKER_ATTR)
            .is_some()
        {
            return false;
        }

        page.set_attribute(frame, "src", NEUTRAL_SRC).ok();
        page.set_attribute(frame, "style", "display: none").ok();
        page.set_attribute(frame, BLOCKED_MARKER_ATTR, kind.sub_type())
            .ok();
        // Replacing src unloads whatever the frame was showing
        page.reset_frame_content(frame);

        let parent = match page.document().tree().get(frame) {
            Some(node) if node.parent.is_valid() => node.parent,
            _ => return true,
        };
        let notice = Self::build_notice(page, kind, reason, now_ms);
        page.insert_before(parent, notice, Some(frame)).ok();

        tracing::info!(?frame, kind = kind.sub_type(), "frame neutralized");
        true
    }

    fn build_notice(page: &mut Page, kind: DetectionKind, reason: &str, now_ms: u64) -> NodeId {
        let (variant, style) = match kind {
            DetectionKind::GameEngine => (
                "content",
                "background: #fdecea; border: 1px solid #b71c1c; padding: 8px;",
            ),
            _ => (
                "technique",
                "background: #fff8e1; border: 1px solid #e65100; padding: 8px;",
            ),
        };

        let tree = page.document_mut().tree_mut();
        let notice = tree.create_element("div");
        tree.set_attribute(notice, "class", &format!("{NOTICE_CLASS} {NOTICE_CLASS}--{variant}"))
            .ok();
        tree.set_attribute(notice, "style", style).ok();
        let text = tree.create_text(format!("Content blocked: {reason} (at {now_ms} ms)"));
        tree.append_child(notice, text).ok();
        notice
    }
}
