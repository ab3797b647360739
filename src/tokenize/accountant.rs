//! Token accountant
//!
//! Computes token counts for single segments and whole documents. Every
//! tokenizer is counted independently: one that fails reports
//! `TokenCount::Unavailable` and the others carry on.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use super::registry::TokenizerRegistry;
use super::Tokenizer;
use crate::document::{Document, Segment};
use crate::error::Result;

/// Count for one tokenizer over some text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCount {
    Counted(usize),
    /// The tokenizer could not produce a count; holds the reason
    Unavailable(String),
}

impl TokenCount {
    /// The count, if available
    pub fn value(&self) -> Option<usize> {
        match self {
            TokenCount::Counted(n) => Some(*n),
            TokenCount::Unavailable(_) => None,
        }
    }

    /// Add two counts; unavailable on either side wins
    fn combine(self, other: &TokenCount) -> TokenCount {
        match (self, other) {
            (TokenCount::Counted(a), TokenCount::Counted(b)) => TokenCount::Counted(a + b),
            (TokenCount::Unavailable(reason), _) => TokenCount::Unavailable(reason),
            (_, TokenCount::Unavailable(reason)) => TokenCount::Unavailable(reason.clone()),
        }
    }
}

impl fmt::Display for TokenCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenCount::Counted(n) => write!(f, "{n}"),
            TokenCount::Unavailable(_) => write!(f, "N/A"),
        }
    }
}

/// Tokenizer name -> count
pub type TokenCounts = BTreeMap<String, TokenCount>;

/// Render counts as `name: n, name: n`
pub fn summary(counts: &TokenCounts) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{name}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which tokenizers are counted when a segment is edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveScope {
    /// Every registered tokenizer
    All,
    /// A single named tokenizer
    Only(String),
}

/// Number of tokens `tokenizer` produces for `text`
pub fn count(text: &str, tokenizer: &dyn Tokenizer) -> Result<usize> {
    Ok(tokenizer.encode(text)?.len())
}

/// Count `text` with one named tokenizer, folding failure into the result
fn count_named(text: &str, name: &str, registry: &TokenizerRegistry) -> TokenCount {
    match registry.get(name).and_then(|tokenizer| count(text, tokenizer)) {
        Ok(n) => TokenCount::Counted(n),
        Err(err) => {
            warn!(tokenizer = %name, %err, "token count unavailable");
            TokenCount::Unavailable(err.to_string())
        }
    }
}

/// Counts for one segment under every registered tokenizer
///
/// Counting uses the trimmed text, which is what gets saved.
pub fn recompute_segment(segment: &Segment, registry: &TokenizerRegistry) -> TokenCounts {
    count_all(segment.text(), registry)
}

fn count_all(text: &str, registry: &TokenizerRegistry) -> TokenCounts {
    let text = text.trim();
    registry
        .names()
        .map(|name| (name.to_string(), count_named(text, name, registry)))
        .collect()
}

/// Per-tokenizer totals over every segment of `document`
pub fn aggregate(document: &Document, registry: &TokenizerRegistry) -> TokenCounts {
    let mut totals: TokenCounts = registry
        .names()
        .map(|name| (name.to_string(), TokenCount::Counted(0)))
        .collect();

    for segment in document.segments() {
        for (name, count) in recompute_segment(segment, registry) {
            if let Some(total) = totals.remove(&name) {
                totals.insert(name, total.combine(&count));
            }
        }
    }

    totals
}

/// Registry plus the live-count policy used on every edit
pub struct TokenAccountant {
    registry: TokenizerRegistry,
    live: LiveScope,
}

impl TokenAccountant {
    /// Create an accountant; `live` names the tokenizer counted per edit
    ///
    /// A live name that is not registered falls back to counting every
    /// tokenizer.
    pub fn new(registry: TokenizerRegistry, live: Option<&str>) -> Self {
        let live = match live {
            Some(name) if registry.contains(name) => LiveScope::Only(name.to_string()),
            Some(name) => {
                warn!(tokenizer = %name, "live tokenizer not registered, counting all tokenizers");
                LiveScope::All
            }
            None => LiveScope::All,
        };
        Self { registry, live }
    }

    pub fn registry(&self) -> &TokenizerRegistry {
        &self.registry
    }

    pub fn live_scope(&self) -> &LiveScope {
        &self.live
    }

    /// Cheap per-edit counts, restricted to the live scope
    pub fn segment_counts(&self, text: &str) -> TokenCounts {
        match &self.live {
            LiveScope::All => count_all(text, &self.registry),
            LiveScope::Only(name) => {
                let mut counts = TokenCounts::new();
                counts.insert(name.clone(), count_named(text.trim(), name, &self.registry));
                debug!(tokenizer = %name, "live count");
                counts
            }
        }
    }

    /// Counts for one segment under every registered tokenizer
    pub fn recompute_segment(&self, segment: &Segment) -> TokenCounts {
        recompute_segment(segment, &self.registry)
    }

    /// Per-tokenizer totals over a whole document
    pub fn aggregate(&self, document: &Document) -> TokenCounts {
        aggregate(document, &self.registry)
    }
}
