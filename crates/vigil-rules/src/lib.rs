//! vigil Rules - Signature Registry
//!
//! Static, versionable pattern rules consulted by the frame classifiers.
//! Patterns are case-insensitive; the registry is append-only at runtime
//! and read-only while a scan pass is running.

mod builtin;

use regex::RegexBuilder;

/// Signature category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureCategory {
    /// Known game engines, emulators, ROM/Flash markers, proxy indicators
    Engine,
    /// Serverless-edge hosting domain suffixes
    WorkerProxy,
    /// Inline encoded-payload markers
    EncodedPayload,
}

/// Rule errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// User-supplied pattern did not compile
    #[error("invalid pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// An immutable pattern rule
#[derive(Debug, Clone)]
pub struct Signature {
    pattern: String,
    regex: regex::Regex,
    category: SignatureCategory,
}

impl Signature {
    /// Compile a case-insensitive signature
    pub fn new(pattern: &str, category: SignatureCategory) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                pattern: pattern.to_string(),
                source: Box::new(source),
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            category,
        })
    }

    /// Display form of the pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Category tag
    pub fn category(&self) -> SignatureCategory {
        self.category
    }

    /// Test the signature against a text
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Length of the first match, if any
    pub fn find_len(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.len())
    }
}

/// Append-only signature registry
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    signatures: Vec<Signature>,
}

impl SignatureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in rule set
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (patterns, category) in [
            (builtin::ENGINE_PATTERNS, SignatureCategory::Engine),
            (builtin::WORKER_PROXY_HOSTS, SignatureCategory::WorkerProxy),
            (builtin::ENCODED_PAYLOAD_MARKERS, SignatureCategory::EncodedPayload),
        ] {
            for &pattern in patterns {
                // Built-in patterns are known-valid
                if let Ok(sig) = Signature::new(pattern, category) {
                    registry.signatures.push(sig);
                }
            }
        }
        registry
    }

    /// Append a rule (the only runtime mutation)
    pub fn push_rule(
        &mut self,
        pattern: &str,
        category: SignatureCategory,
    ) -> Result<(), RuleError> {
        self.signatures.push(Signature::new(pattern, category)?);
        Ok(())
    }

    /// First matching signature of a category, in registry order
    pub fn match_text(&self, text: &str, category: SignatureCategory) -> Option<&Signature> {
        self.category(category).find(|sig| sig.is_match(text))
    }

    /// Iterate signatures of one category in registry order
    pub fn category(
        &self,
        category: SignatureCategory,
    ) -> impl Iterator<Item = &Signature> {
        self.signatures
            .iter()
            .filter(move |sig| sig.category == category)
    }

    /// Iterate all signatures
    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    /// Number of signatures
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Check if the registry has no rules
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
