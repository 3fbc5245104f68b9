//! Built-in rule tables
//!
//! Ordering matters: the first matching pattern is the one reported as
//! evidence, so the most specific markers come first.

/// Known game engine, emulator and game-proxy markers
pub(crate) const ENGINE_PATTERNS: &[&str] = &[
    // Unity web players
    r"UnityLoader\.js",
    r"createUnityInstance",
    r"\.unityweb",
    r"UnityProgress",
    // Godot exports
    r"godot\.js",
    r"GodotEngine",
    // Emulators and ROM players
    r"emulatorjs",
    r"EJS_player",
    r"jsnes",
    r"retroarch",
    // Flash emulation
    r"ruffle",
    r"swfobject",
    // HTML5 game runtimes
    r"phaser(?:\.min)?\.js",
    r"c3runtime",
    r"construct3",
    // Textual indicators on proxy/mirror pages
    r"unblocked",
    r"unblocker",
    r"game[-_ ]?proxy",
];

/// Serverless-edge hosting domain suffixes (matched against the hostname)
pub(crate) const WORKER_PROXY_HOSTS: &[&str] = &[
    r"(?:^|\.)workers\.dev$",
    r"(?:^|\.)pages\.dev$",
    r"(?:^|\.)glitch\.me$",
];

/// Inline encoded-payload markers; a script is flagged only when every
/// marker matches. The run pattern's match length is the reported evidence.
pub(crate) const ENCODED_PAYLOAD_MARKERS: &[&str] = &[
    r"[A-Za-z0-9+/=]{1000,}",
    r"atob\s*\(",
    r"createObjectURL\s*\(",
];
