//! Segment representation - one role-tagged turn of a conversation

use std::fmt;

use super::analyzer::Analyzer;
use crate::highlight::AnnotationSpan;
use crate::tokenize::TokenCounts;

/// Stable identifier of a segment within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) u64);

impl SegmentId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Speaker tag of a segment
///
/// Roles are free-form: files may carry any string and it is written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role(String);

impl Role {
    pub const SYSTEM: &'static str = "system";
    pub const HUMAN: &'static str = "human";
    pub const GPT: &'static str = "gpt";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Role name with its first letter upper-cased and the rest lower-cased,
    /// for labels
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::new(s)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role(s)
    }
}

/// Role and text of one turn, without any derived state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: impl Into<Role>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }
}

/// A single role-tagged text unit with its derived highlight spans and
/// token counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    id: SegmentId,
    role: Role,
    text: String,
    spans: Vec<AnnotationSpan>,
    token_counts: TokenCounts,
}

impl Segment {
    /// Create a segment with derived state already computed
    pub(crate) fn new(id: SegmentId, turn: Turn, analyzer: &Analyzer) -> Self {
        let mut segment = Self {
            id,
            role: turn.role,
            text: turn.text,
            spans: Vec::new(),
            token_counts: TokenCounts::new(),
        };
        segment.refresh(analyzer);
        segment
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Highlight spans for the current text
    pub fn spans(&self) -> &[AnnotationSpan] {
        &self.spans
    }

    /// Live token counts for the current text
    pub fn token_counts(&self) -> &TokenCounts {
        &self.token_counts
    }

    /// Snapshot of role and text
    pub fn turn(&self) -> Turn {
        Turn::new(self.role.clone(), self.text.clone())
    }

    /// Replace the text and recompute derived state
    pub(crate) fn set_text(&mut self, text: String, analyzer: &Analyzer) {
        self.text = text;
        self.refresh(analyzer);
    }

    /// Recompute spans and counts from the current text
    pub(crate) fn refresh(&mut self, analyzer: &Analyzer) {
        self.spans = analyzer.annotate(&self.text);
        self.token_counts = analyzer.live_counts(&self.text);
    }
}
