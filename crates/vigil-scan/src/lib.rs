//! vigil Scan - Frame Inspection Engine
//!
//! Heuristic classification of embedded frames on a hosted page, with
//! mitigation of positive verdicts and fire-and-forget violation
//! reporting.
//!
//! # Components
//! - Signature registry via vigil-rules
//! - Page model and mutation journal via vigil-dom
//! - Four classifiers: blob URL, embedded signature, worker proxy,
//!   encoded payload
//! - Mitigator: neutralize a frame and surface an in-page notice
//! - Reporter: one-way violation events for an external collector
//! - Scanner: periodic reconciliation plus mutation-driven scans

pub mod classify;
pub mod config;
pub mod mitigate;
pub mod report;
pub mod scanner;
pub mod verdict;

pub use config::ScanConfig;
pub use mitigate::{Mitigator, BLOCKED_MARKER_ATTR, NEUTRAL_SRC, NOTICE_CLASS};
pub use report::{
    ChannelSink, NullSink, Reporter, ReportSink, SinkError, StdoutSink, ViolationEvent,
    VIOLATION_MESSAGE_TYPE,
};
pub use scanner::{ScanTrigger, Scanner};
pub use verdict::{DetectionKind, Evidence, Verdict};
