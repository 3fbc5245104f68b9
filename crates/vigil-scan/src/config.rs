//! Scan configuration
//!
//! One immutable value, built at startup and passed by reference.

/// Tunable thresholds and switches for the detection pipeline
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Minimum rendered width and height (device pixels) for a frame to
    /// count as a full interactive surface
    pub min_suspicious_frame_size: f64,
    /// Period of the reconciliation scan
    pub scan_interval_ms: u64,
    /// Delay between page readiness and the first scan, so frames can
    /// begin loading before content access
    pub ready_delay_ms: u64,
    /// Settle delay after a frame insertion before it is scanned
    pub settle_delay_ms: u64,
    /// Delay before the one-shot inline-script sweep
    pub payload_sweep_delay_ms: u64,
    /// Mitigate positive blob-URL verdicts
    pub enable_blob_blocking: bool,
    /// Mitigate positive embedded-signature verdicts
    pub enable_signature_blocking: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_suspicious_frame_size: 400.0,
            scan_interval_ms: 2000,
            ready_delay_ms: 1000,
            settle_delay_ms: 500,
            payload_sweep_delay_ms: 3000,
            enable_blob_blocking: true,
            enable_signature_blocking: true,
        }
    }
}
