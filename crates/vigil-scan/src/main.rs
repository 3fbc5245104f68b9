//! vigil Scan - Demo Entry Point
//!
//! Builds a synthetic hosted page with one frame per detection category,
//! attaches a scanner and drives it against the wall clock, printing
//! violation events to stdout.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use vigil_dom::{Document, Page};
use vigil_scan::{Scanner, StdoutSink};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn build_demo_page() -> Page {
    let mut page = Page::new("https://example.com/hosted");
    let body = page.document().body();

    // A full-surface frame smuggled in through an object URL
    let blob_frame = page.document_mut().tree_mut().create_element("iframe");
    page.append_child(body, blob_frame).ok();
    page.set_attribute(blob_frame, "src", "blob:https://example.com/5f2d")
        .ok();
    page.set_rendered_size(blob_frame, 960.0, 600.0);

    // A same-origin frame whose document loads a known engine
    let engine_frame = page.document_mut().tree_mut().create_element("iframe");
    page.append_child(body, engine_frame).ok();
    page.set_attribute(engine_frame, "src", "/embeds/arcade.html")
        .ok();
    page.set_rendered_size(engine_frame, 800.0, 600.0);
    let mut inner = Document::new("https://example.com/embeds/arcade.html");
    let inner_body = inner.body();
    let script = inner.tree_mut().create_element("script");
    inner
        .tree_mut()
        .set_attribute(script, "src", "https://cdn.example.com/UnityLoader.js")
        .ok();
    inner.tree_mut().append_child(inner_body, script).ok();
    page.attach_frame_document(engine_frame, inner);

    // A frame proxied through a machine-named edge host
    let proxy_frame = page.document_mut().tree_mut().create_element("iframe");
    page.append_child(body, proxy_frame).ok();
    page.set_attribute(proxy_frame, "src", "https://xk29dq81jz.workers.dev/p")
        .ok();
    page.set_rendered_size(proxy_frame, 640.0, 480.0);

    // An inline script smuggling an encoded payload
    let smuggler = page.document_mut().tree_mut().create_element("script");
    let payload = "Q".repeat(1400);
    let text = page.document_mut().tree_mut().create_text(format!(
        "var packed = \"{payload}\"; \
         var bytes = atob(packed); \
         var url = URL.createObjectURL(new Blob([bytes]));"
    ));
    page.document_mut()
        .tree_mut()
        .append_child(smuggler, text)
        .ok();
    page.append_child(body, smuggler).ok();

    page
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("starting vigil scan demo");

    let mut page = build_demo_page();
    let mut scanner = Scanner::with_defaults(Box::new(StdoutSink));

    let start = now_ms();
    scanner.attach(start);

    // Run past the payload sweep and a couple of reconciliation passes
    let horizon = scanner.config().payload_sweep_delay_ms + 2 * scanner.config().scan_interval_ms;
    while now_ms() - start < horizon {
        scanner.poll(&mut page, now_ms());
        std::thread::sleep(Duration::from_millis(100));
    }

    tracing::info!("demo complete");
}
