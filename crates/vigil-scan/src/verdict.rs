//! Classification verdicts and evidence

use serde::Serialize;

/// What a classifier recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionKind {
    /// Frame loaded from an ephemeral object URL
    BlobUrl,
    /// Frame document carries a known engine/emulator signature
    GameEngine,
    /// Frame served from a machine-named serverless-edge host
    WorkerProxy,
    /// Inline script smuggling an encoded payload
    EncodedPayload,
}

impl DetectionKind {
    /// Wire discriminator for the report sink
    pub fn sub_type(self) -> &'static str {
        match self {
            Self::BlobUrl => "BLOB_URL_DETECTED",
            Self::GameEngine => "GAME_ENGINE_DETECTED",
            Self::WorkerProxy => "WORKER_PROXY_DETECTED",
            Self::EncodedPayload => "ENCODED_PAYLOAD_DETECTED",
        }
    }

    /// Blocking kinds trigger mitigation; the rest only report
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::BlobUrl | Self::GameEngine)
    }
}

/// Category-specific evidence map
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Evidence {
    #[serde(rename_all = "camelCase")]
    BlobUrl { url: String, width: f64, height: f64 },
    #[serde(rename_all = "camelCase")]
    Signature { pattern: String },
    #[serde(rename_all = "camelCase")]
    WorkerProxy { src: String },
    #[serde(rename_all = "camelCase")]
    EncodedPayload { run_length: usize },
}

impl Evidence {
    /// Human-readable summary for the in-page notice
    pub fn summary(&self) -> String {
        match self {
            Evidence::BlobUrl { width, height, .. } => {
                format!("object URL frame ({width}x{height} px)")
            }
            Evidence::Signature { pattern } => {
                format!("recognized content signature \"{pattern}\"")
            }
            Evidence::WorkerProxy { src } => format!("worker-proxy address {src}"),
            Evidence::EncodedPayload { run_length } => {
                format!("inline encoded payload ({run_length} chars)")
            }
        }
    }
}

/// Result of one classifier run on one candidate
#[derive(Debug, Clone)]
pub struct Verdict {
    pub kind: DetectionKind,
    pub evidence: Evidence,
}

impl Verdict {
    pub fn new(kind: DetectionKind, evidence: Evidence) -> Self {
        Self { kind, evidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_types() {
        assert_eq!(DetectionKind::BlobUrl.sub_type(), "BLOB_URL_DETECTED");
        assert_eq!(DetectionKind::GameEngine.sub_type(), "GAME_ENGINE_DETECTED");
        assert_eq!(DetectionKind::WorkerProxy.sub_type(), "WORKER_PROXY_DETECTED");
        assert_eq!(
            DetectionKind::EncodedPayload.sub_type(),
            "ENCODED_PAYLOAD_DETECTED"
        );
    }

    #[test]
    fn test_blocking_split() {
        assert!(DetectionKind::BlobUrl.is_blocking());
        assert!(DetectionKind::GameEngine.is_blocking());
        assert!(!DetectionKind::WorkerProxy.is_blocking());
        assert!(!DetectionKind::EncodedPayload.is_blocking());
    }

    #[test]
    fn test_evidence_wire_form() {
        let evidence = Evidence::EncodedPayload { run_length: 1200 };
        let json = serde_json::to_value(&evidence).unwrap();
        assert_eq!(json["runLength"], 1200);
    }
}
