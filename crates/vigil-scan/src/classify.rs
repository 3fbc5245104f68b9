//! Frame Classifiers
//!
//! Pure decision functions over frame candidates and the signature
//! registry. Absence of a verdict is the normal outcome; none of these
//! ever fails.

use url::Url;
use vigil_dom::{FrameAccess, FrameCandidate, NodeId, Page};
use vigil_rules::{SignatureCategory, SignatureRegistry};

use crate::config::ScanConfig;
use crate::verdict::{DetectionKind, Evidence, Verdict};

/// Display truncation for matched signature evidence
const MAX_SIGNATURE_EVIDENCE: usize = 120;

/// Longest hostname label still considered human-chosen
const MAX_PLAIN_LABEL_LEN: usize = 8;

/// Flag frames loaded from an ephemeral object URL.
///
/// Small frames (ads, widgets) are common and usually benign; rendered
/// size stands in for "intended as a full interactive surface".
pub fn classify_blob_url(candidate: &FrameCandidate, config: &ScanConfig) -> Option<Verdict> {
    let src = candidate.src.as_deref()?;
    let url = Url::parse(src).ok()?;
    if url.scheme() != "blob" {
        return None;
    }
    if candidate.width < config.min_suspicious_frame_size
        || candidate.height < config.min_suspicious_frame_size
    {
        return None;
    }
    Some(Verdict::new(
        DetectionKind::BlobUrl,
        Evidence::BlobUrl {
            url: src.to_string(),
            width: candidate.width,
            height: candidate.height,
        },
    ))
}

/// Test a same-origin frame document's markup against the engine
/// signatures. Cross-origin and detached frames are not classifiable and
/// silently yield no verdict.
pub fn classify_embedded_signature(
    page: &Page,
    frame: NodeId,
    registry: &SignatureRegistry,
) -> Option<Verdict> {
    let doc = match page.probe_frame(frame) {
        FrameAccess::Accessible(doc) => doc,
        FrameAccess::NotAccessible => return None,
    };
    let markup = doc.markup();
    let signature = registry.match_text(&markup, SignatureCategory::Engine)?;
    Some(Verdict::new(
        DetectionKind::GameEngine,
        Evidence::Signature {
            pattern: truncate(signature.pattern(), MAX_SIGNATURE_EVIDENCE),
        },
    ))
}

/// Flag frames served from a serverless-edge host under a machine-named
/// subdomain. Both stages must hold: known hosting suffix AND a long,
/// lowercase-alphanumeric leading label.
pub fn classify_worker_proxy(
    candidate: &FrameCandidate,
    registry: &SignatureRegistry,
) -> Option<Verdict> {
    let src = candidate.src.as_deref()?;
    let url = Url::parse(src).ok()?;
    let host = url.host_str()?;
    registry.match_text(host, SignatureCategory::WorkerProxy)?;

    let label = host.split('.').next()?;
    if label.len() <= MAX_PLAIN_LABEL_LEN {
        return None;
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return None;
    }
    Some(Verdict::new(
        DetectionKind::WorkerProxy,
        Evidence::WorkerProxy {
            src: src.to_string(),
        },
    ))
}

/// Flag inline scripts that carry a kilobyte-scale base64 run together
/// with a decode call and an object-URL creation call.
pub fn classify_encoded_payload(
    script_text: &str,
    registry: &SignatureRegistry,
) -> Option<Verdict> {
    let mut run_length = 0usize;
    let mut rules = 0usize;
    for signature in registry.category(SignatureCategory::EncodedPayload) {
        rules += 1;
        // Every marker must match. The run rule dwarfs the short call
        // markers, so the longest match is the run length.
        run_length = run_length.max(signature.find_len(script_text)?);
    }
    if rules == 0 {
        return None;
    }
    Some(Verdict::new(
        DetectionKind::EncodedPayload,
        Evidence::EncodedPayload { run_length },
    ))
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_dom::Document;

    fn candidate(src: Option<&str>, width: f64, height: f64) -> FrameCandidate {
        FrameCandidate {
            id: NodeId::NONE,
            src: src.map(String::from),
            width,
            height,
        }
    }

    fn blob_candidate(width: f64, height: f64) -> FrameCandidate {
        candidate(Some("blob:https://example.com/abc"), width, height)
    }

    #[test]
    fn test_blob_requires_blob_scheme() {
        let config = ScanConfig::default();
        let https = candidate(Some("https://example.com/game"), 1000.0, 1000.0);
        assert!(classify_blob_url(&https, &config).is_none());

        let absent = candidate(None, 1000.0, 1000.0);
        assert!(classify_blob_url(&absent, &config).is_none());
    }

    #[test]
    fn test_blob_size_boundary() {
        let config = ScanConfig::default();
        // Exactly at threshold counts as suspicious
        assert!(classify_blob_url(&blob_candidate(400.0, 400.0), &config).is_some());
        // Below threshold in either dimension does not
        assert!(classify_blob_url(&blob_candidate(399.0, 400.0), &config).is_none());
        assert!(classify_blob_url(&blob_candidate(400.0, 399.0), &config).is_none());
    }

    #[test]
    fn test_blob_evidence() {
        let config = ScanConfig::default();
        let verdict = classify_blob_url(&blob_candidate(500.0, 500.0), &config).unwrap();
        assert_eq!(verdict.kind, DetectionKind::BlobUrl);
        match verdict.evidence {
            Evidence::BlobUrl { url, width, height } => {
                assert_eq!(url, "blob:https://example.com/abc");
                assert_eq!((width, height), (500.0, 500.0));
            }
            other => panic!("unexpected evidence: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_src_is_negative() {
        let config = ScanConfig::default();
        let bad = candidate(Some("not a url"), 1000.0, 1000.0);
        assert!(classify_blob_url(&bad, &config).is_none());
        assert!(classify_worker_proxy(&bad, &SignatureRegistry::builtin()).is_none());
    }

    #[test]
    fn test_worker_proxy_two_stage() {
        let registry = SignatureRegistry::builtin();

        // 10-char machine label on a known suffix: positive
        let hit = candidate(Some("https://xk29dq81jz.workers.dev/p"), 0.0, 0.0);
        assert!(classify_worker_proxy(&hit, &registry).is_some());

        // Suffix matches but the label is short: negative
        let short = candidate(Some("https://mygame.workers.dev/p"), 0.0, 0.0);
        assert!(classify_worker_proxy(&short, &registry).is_none());

        // Long label but not lowercase-alphanumeric: negative
        let hyphen = candidate(Some("https://my-proxy-0001.workers.dev/p"), 0.0, 0.0);
        assert!(classify_worker_proxy(&hyphen, &registry).is_none());

        // Long machine label on an unknown suffix: negative
        let unknown = candidate(Some("https://xk29dq81jz.example.com/p"), 0.0, 0.0);
        assert!(classify_worker_proxy(&unknown, &registry).is_none());
    }

    #[test]
    fn test_embedded_signature_positive() {
        let registry = SignatureRegistry::builtin();
        let mut page = Page::new("https://example.com/host");
        let body = page.document().body();
        let frame = page.document_mut().tree_mut().create_element("iframe");
        page.append_child(body, frame).unwrap();

        let mut inner = Document::new("https://example.com/inner");
        let inner_body = inner.body();
        let script = inner.tree_mut().create_element("script");
        inner
            .tree_mut()
            .set_attribute(script, "src", "https://cdn.example.com/UnityLoader.js")
            .unwrap();
        inner.tree_mut().append_child(inner_body, script).unwrap();
        page.attach_frame_document(frame, inner);

        let verdict = classify_embedded_signature(&page, frame, &registry).unwrap();
        assert_eq!(verdict.kind, DetectionKind::GameEngine);
        match verdict.evidence {
            Evidence::Signature { pattern } => assert!(pattern.contains("UnityLoader")),
            other => panic!("unexpected evidence: {other:?}"),
        }
    }

    #[test]
    fn test_embedded_signature_cross_origin_silent() {
        let registry = SignatureRegistry::builtin();
        let mut page = Page::new("https://example.com/host");
        let body = page.document().body();
        let frame = page.document_mut().tree_mut().create_element("iframe");
        page.append_child(body, frame).unwrap();
        page.mark_frame_opaque(frame);

        assert!(classify_embedded_signature(&page, frame, &registry).is_none());
    }

    #[test]
    fn test_embedded_signature_clean_document() {
        let registry = SignatureRegistry::builtin();
        let mut page = Page::new("https://example.com/host");
        let body = page.document().body();
        let frame = page.document_mut().tree_mut().create_element("iframe");
        page.append_child(body, frame).unwrap();
        page.attach_frame_document(frame, Document::new("https://example.com/widget"));

        assert!(classify_embedded_signature(&page, frame, &registry).is_none());
    }

    #[test]
    fn test_encoded_payload_requires_all_markers() {
        let registry = SignatureRegistry::builtin();
        let run = "A".repeat(1200);

        let complete = format!(
            "var p = \"{run}\"; var b = atob(p); var u = URL.createObjectURL(new Blob([b]));"
        );
        let verdict = classify_encoded_payload(&complete, &registry).unwrap();
        match verdict.evidence {
            Evidence::EncodedPayload { run_length } => assert_eq!(run_length, 1200),
            other => panic!("unexpected evidence: {other:?}"),
        }

        let no_decode = format!("var p = \"{run}\"; URL.createObjectURL(p);");
        assert!(classify_encoded_payload(&no_decode, &registry).is_none());

        let short_run = format!(
            "var p = \"{}\"; atob(p); URL.createObjectURL(p);",
            "A".repeat(999)
        );
        assert!(classify_encoded_payload(&short_run, &registry).is_none());
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        let text = "aé".repeat(80);
        let cut = truncate(&text, MAX_SIGNATURE_EVIDENCE);
        assert!(cut.len() <= MAX_SIGNATURE_EVIDENCE);
        assert!(text.starts_with(&cut));
    }
}
