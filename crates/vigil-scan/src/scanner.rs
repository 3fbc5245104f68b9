//! Scanner/Observer
//!
//! Frame discovery and the classification pipeline: a level-triggered
//! periodic reconciliation scan plus edge-triggered scans of inserted
//! frames, both feeding the same classification routine. Host-driven and
//! single-threaded; the embedder calls `poll` with its clock.

use vigil_dom::{MutationType, NodeId, Page};
use vigil_rules::SignatureRegistry;

use crate::classify;
use crate::config::ScanConfig;
use crate::mitigate::Mitigator;
use crate::report::{Reporter, ReportSink, ViolationEvent};
use crate::verdict::Verdict;

/// Why a scan was scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTrigger {
    /// Page became ready (one-shot, delayed)
    PageReady,
    /// Periodic reconciliation
    Interval,
    /// A frame-type element was inserted (one-shot, settle-delayed)
    FrameInserted(NodeId),
    /// One-shot inline-script sweep
    PayloadSweep,
}

#[derive(Debug)]
struct ScheduledScan {
    due_ms: u64,
    trigger: ScanTrigger,
}

/// Scanner driving the detection pipeline for one page
pub struct Scanner {
    config: ScanConfig,
    registry: SignatureRegistry,
    reporter: Reporter,
    schedule: Vec<ScheduledScan>,
    next_interval_ms: Option<u64>,
}

impl Scanner {
    pub fn new(config: ScanConfig, registry: SignatureRegistry, reporter: Reporter) -> Self {
        Self {
            config,
            registry,
            reporter,
            schedule: Vec::new(),
            next_interval_ms: None,
        }
    }

    /// Scanner with the built-in rules and default thresholds
    pub fn with_defaults(sink: Box<dyn ReportSink>) -> Self {
        Self::new(
            ScanConfig::default(),
            SignatureRegistry::builtin(),
            Reporter::new(sink),
        )
    }

    /// Active configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Begin the scan session. Schedules the delayed page-ready scan,
    /// the indefinite reconciliation interval, and the one-shot
    /// inline-script sweep. The session has no stop operation; it lives
    /// as long as the scanner value.
    pub fn attach(&mut self, now_ms: u64) {
        self.schedule.push(ScheduledScan {
            due_ms: now_ms + self.config.ready_delay_ms,
            trigger: ScanTrigger::PageReady,
        });
        self.schedule.push(ScheduledScan {
            due_ms: now_ms + self.config.payload_sweep_delay_ms,
            trigger: ScanTrigger::PayloadSweep,
        });
        self.next_interval_ms = Some(now_ms + self.config.scan_interval_ms);
        tracing::debug!("scan session attached");
    }

    /// Drive the session: drain page mutations, then run every due scan.
    pub fn poll(&mut self, page: &mut Page, now_ms: u64) {
        self.drain_mutations(page, now_ms);

        if let Some(due) = self.next_interval_ms {
            if now_ms >= due {
                self.schedule.push(ScheduledScan {
                    due_ms: now_ms,
                    trigger: ScanTrigger::Interval,
                });
                self.next_interval_ms = Some(now_ms + self.config.scan_interval_ms);
            }
        }

        let mut pending = Vec::new();
        let mut due = Vec::new();
        for entry in self.schedule.drain(..) {
            if entry.due_ms <= now_ms {
                due.push(entry);
            } else {
                pending.push(entry);
            }
        }
        self.schedule = pending;

        for entry in due {
            match entry.trigger {
                ScanTrigger::PageReady | ScanTrigger::Interval => self.scan_document(page, now_ms),
                ScanTrigger::FrameInserted(frame) => self.classify_and_act(page, frame, now_ms),
                ScanTrigger::PayloadSweep => self.sweep_inline_scripts(page, now_ms),
            }
        }
    }

    /// Schedule a settle-delayed scan for every inserted frame element
    fn drain_mutations(&mut self, page: &mut Page, now_ms: u64) {
        for record in page.take_mutations() {
            if record.mutation_type != MutationType::ChildList {
                continue;
            }
            for added in record.added_nodes {
                let is_frame = page
                    .document()
                    .tree()
                    .get(added)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.is_frame());
                if is_frame {
                    self.schedule.push(ScheduledScan {
                        due_ms: now_ms + self.config.settle_delay_ms,
                        trigger: ScanTrigger::FrameInserted(added),
                    });
                }
            }
        }
    }

    /// Full-document reconciliation pass, frames in document order
    fn scan_document(&mut self, page: &mut Page, now_ms: u64) {
        for candidate in page.frame_candidates() {
            self.classify_and_act(page, candidate.id, now_ms);
        }
    }

    /// Fixed pipeline per frame: blob URL, embedded signature, worker
    /// proxy. The first blocking verdict short-circuits the rest.
    fn classify_and_act(&mut self, page: &mut Page, frame: NodeId, now_ms: u64) {
        // The frame may have been removed between discovery and now
        let Some(candidate) = page.candidate(frame) else {
            return;
        };

        if let Some(verdict) = classify::classify_blob_url(&candidate, &self.config) {
            self.act(page, frame, verdict, self.config.enable_blob_blocking, now_ms);
            return;
        }
        if let Some(verdict) = classify::classify_embedded_signature(page, frame, &self.registry) {
            self.act(
                page,
                frame,
                verdict,
                self.config.enable_signature_blocking,
                now_ms,
            );
            return;
        }
        if let Some(verdict) = classify::classify_worker_proxy(&candidate, &self.registry) {
            // Lower-confidence category: report, never mitigate
            self.act(page, frame, verdict, false, now_ms);
        }
    }

    /// Report-only sweep over the hosted page's own inline scripts
    fn sweep_inline_scripts(&mut self, page: &mut Page, now_ms: u64) {
        let url = page.url().to_string();
        for (script, text) in page.document().inline_scripts() {
            if let Some(verdict) = classify::classify_encoded_payload(&text, &self.registry) {
                tracing::info!(?script, "encoded payload in inline script");
                self.reporter
                    .report(&ViolationEvent::new(verdict.kind, &url, now_ms, verdict.evidence));
            }
        }
    }

    fn act(&mut self, page: &mut Page, frame: NodeId, verdict: Verdict, mitigate: bool, now_ms: u64) {
        let url = page.url().to_string();
        if mitigate && verdict.kind.is_blocking() {
            Mitigator::block(
                page,
                frame,
                verdict.kind,
                &verdict.evidence.summary(),
                now_ms,
            );
        }
        self.reporter
            .report(&ViolationEvent::new(verdict.kind, &url, now_ms, verdict.evidence));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ChannelSink;
    use std::sync::mpsc;

    fn scanner_with_channel() -> (Scanner, mpsc::Receiver<String>) {
        let (sink, rx) = ChannelSink::channel();
        (Scanner::with_defaults(Box::new(sink)), rx)
    }

    fn blob_page() -> (Page, NodeId) {
        let mut page = Page::new("https://example.com/host");
        let body = page.document().body();
        let frame = page.document_mut().tree_mut().create_element("iframe");
        page.append_child(body, frame).unwrap();
        page.set_attribute(frame, "src", "blob:https://example.com/abc")
            .unwrap();
        page.set_rendered_size(frame, 500.0, 500.0);
        page.take_mutations();
        (page, frame)
    }

    #[test]
    fn test_no_scan_before_ready_delay() {
        let (mut scanner, rx) = scanner_with_channel();
        let (mut page, _) = blob_page();

        scanner.attach(0);
        scanner.poll(&mut page, 500);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_ready_scan_fires_after_delay() {
        let (mut scanner, rx) = scanner_with_channel();
        let (mut page, frame) = blob_page();

        scanner.attach(0);
        scanner.poll(&mut page, 1000);
        assert!(rx.try_recv().is_ok());
        assert_eq!(
            page.document().tree().attribute(frame, "src"),
            Some("about:blank")
        );
    }

    #[test]
    fn test_interval_rescans() {
        let (mut scanner, rx) = scanner_with_channel();
        let mut page = Page::new("https://example.com/host");

        scanner.attach(0);
        scanner.poll(&mut page, 1000);
        assert!(rx.try_recv().is_err());

        // Frame appears without a journaled insertion (e.g. the host
        // mutated the tree directly); the level-triggered interval scan
        // still reconciles it.
        let body = page.document().body();
        let frame = page.document_mut().tree_mut().create_element("iframe");
        page.document_mut()
            .tree_mut()
            .append_child(body, frame)
            .unwrap();
        page.document_mut()
            .tree_mut()
            .set_attribute(frame, "src", "blob:https://example.com/x")
            .unwrap();
        page.set_rendered_size(frame, 800.0, 600.0);

        scanner.poll(&mut page, 2000);
        let payload = rx.try_recv().unwrap();
        assert!(payload.contains("BLOB_URL_DETECTED"));
    }

    #[test]
    fn test_mutation_scan_waits_for_settle() {
        let (mut scanner, rx) = scanner_with_channel();
        let mut page = Page::new("https://example.com/host");
        scanner.attach(0);
        scanner.poll(&mut page, 1000);

        let body = page.document().body();
        let frame = page.document_mut().tree_mut().create_element("iframe");
        page.append_child(body, frame).unwrap();
        page.set_attribute(frame, "src", "blob:https://example.com/y")
            .unwrap();
        page.set_rendered_size(frame, 500.0, 500.0);

        // Insertion observed here; scan deferred by the settle delay
        scanner.poll(&mut page, 1100);
        assert!(rx.try_recv().is_err());

        scanner.poll(&mut page, 1600);
        let payload = rx.try_recv().unwrap();
        assert!(payload.contains("BLOB_URL_DETECTED"));
    }

    #[test]
    fn test_overlapping_passes_stay_idempotent() {
        let (mut scanner, rx) = scanner_with_channel();
        let (mut page, frame) = blob_page();

        scanner.attach(0);
        scanner.poll(&mut page, 1000);
        // Interval passes keep observing the neutralized frame
        scanner.poll(&mut page, 2000);
        scanner.poll(&mut page, 4000);

        let events: Vec<String> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);

        let tree = page.document().tree();
        let notices = tree
            .descendants(tree.root())
            .into_iter()
            .filter(|&id| {
                tree.attribute(id, "class")
                    .is_some_and(|c| c.starts_with("vigil-notice"))
            })
            .count();
        assert_eq!(notices, 1);
        assert!(tree.attribute(frame, "data-vigil-blocked").is_some());
    }

    #[test]
    fn test_blocking_disabled_still_reports() {
        let (sink, rx) = ChannelSink::channel();
        let config = ScanConfig {
            enable_blob_blocking: false,
            ..ScanConfig::default()
        };
        let mut scanner = Scanner::new(
            config,
            SignatureRegistry::builtin(),
            Reporter::new(Box::new(sink)),
        );
        let (mut page, frame) = blob_page();

        scanner.attach(0);
        scanner.poll(&mut page, 1000);

        assert!(rx.try_recv().is_ok());
        assert_eq!(
            page.document().tree().attribute(frame, "src"),
            Some("blob:https://example.com/abc")
        );
    }

    #[test]
    fn test_frame_removed_between_discovery_and_scan() {
        let (mut scanner, rx) = scanner_with_channel();
        let mut page = Page::new("https://example.com/host");
        scanner.attach(0);
        scanner.poll(&mut page, 1000);

        let body = page.document().body();
        let frame = page.document_mut().tree_mut().create_element("iframe");
        page.append_child(body, frame).unwrap();
        page.set_attribute(frame, "src", "blob:https://example.com/z")
            .unwrap();
        page.set_rendered_size(frame, 500.0, 500.0);

        scanner.poll(&mut page, 1100);
        page.remove(frame).unwrap();

        // The deferred scan finds a stale reference and skips it
        scanner.poll(&mut page, 1600);
        assert!(rx.try_recv().is_err());
    }
}
