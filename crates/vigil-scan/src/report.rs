//! Reporter
//!
//! Fire-and-forget delivery of violation events to the report sink. The
//! sink is external and best-effort; its availability must never gate
//! scanning or mitigation.

use std::sync::mpsc;

use serde::Serialize;

use crate::verdict::{DetectionKind, Evidence};

/// Constant wire discriminator for violation messages
pub const VIOLATION_MESSAGE_TYPE: &str = "content-violation";

/// A violation event, immutable once constructed
#[derive(Debug, Clone, Serialize)]
pub struct ViolationEvent {
    #[serde(rename = "type")]
    pub message_type: &'static str,
    #[serde(rename = "subType")]
    pub sub_type: &'static str,
    /// The hosted page's address
    pub url: String,
    /// Client-side timestamp, milliseconds
    pub timestamp: u64,
    /// Category-specific evidence
    pub details: Evidence,
}

impl ViolationEvent {
    pub fn new(kind: DetectionKind, page_url: &str, timestamp: u64, details: Evidence) -> Self {
        Self {
            message_type: VIOLATION_MESSAGE_TYPE,
            sub_type: kind.sub_type(),
            url: page_url.to_string(),
            timestamp,
            details,
        }
    }
}

/// Sink delivery errors
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Receiving end is gone
    #[error("sink closed")]
    Closed,
    /// Sink rejected or could not take the message
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// One-way message consumer; no acknowledgement is awaited
pub trait ReportSink {
    fn deliver(&self, payload: &str) -> Result<(), SinkError>;
}

/// Serializes events and hands them to the sink
pub struct Reporter {
    sink: Box<dyn ReportSink>,
}

impl Reporter {
    pub fn new(sink: Box<dyn ReportSink>) -> Self {
        Self { sink }
    }

    /// Report an event. Failures are logged and swallowed; no retry, no
    /// buffering.
    pub fn report(&self, event: &ViolationEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(%err, "violation event serialization failed");
                return;
            }
        };
        if let Err(err) = self.sink.deliver(&payload) {
            tracing::debug!(%err, sub_type = event.sub_type, "violation report dropped");
        }
    }
}

/// Sink that discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn deliver(&self, _payload: &str) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that prints events to stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn deliver(&self, payload: &str) -> Result<(), SinkError> {
        println!("{payload}");
        Ok(())
    }
}

/// Channel-backed sink for embedders and tests
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    /// Create a sink and its receiving end
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl ReportSink for ChannelSink {
    fn deliver(&self, payload: &str) -> Result<(), SinkError> {
        self.tx
            .send(payload.to_string())
            .map_err(|_| SinkError::Closed)
    }
}
