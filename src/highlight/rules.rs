//! Pattern rules for highlighting
//!
//! A `PatternSet` is the ordered list of compiled rules handed to the
//! annotation engine. It is built once from configuration and never
//! changes afterwards.

use regex::Regex;
use tracing::warn;

use super::style::{Color, Style};
use crate::config::HighlightConfig;
use crate::error::{EditorError, Result};

/// A single highlight rule
///
/// Matches a regex pattern and assigns a style to every match.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Style assigned to matches
    pub style: Style,
}

impl PatternRule {
    /// Compile a new pattern rule
    pub fn new(pattern: &str, style: Style) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| EditorError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: regex,
            style,
        })
    }

    /// Compile a rule from its configuration entry
    pub fn from_config(entry: &HighlightConfig) -> Result<Self> {
        let color = Color::from_name(&entry.color).unwrap_or_else(|| {
            warn!(color = %entry.color, pattern = %entry.pattern, "unknown highlight color, using default");
            Color::Default
        });
        let style = Style::fg(color);
        let style = if entry.bold { style.with_bold() } else { style };
        Self::new(&entry.pattern, style)
    }

    /// The pattern source text
    pub fn source(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Ordered collection of highlight rules
#[derive(Debug, Default)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
    /// Rules that failed to compile, in config order
    rejected: Vec<EditorError>,
}

impl PatternSet {
    /// Create an empty pattern set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern set from configuration entries
    ///
    /// A rule whose pattern does not compile is skipped and recorded;
    /// the remaining rules still load.
    pub fn from_config(entries: &[HighlightConfig]) -> Self {
        let mut set = Self::new();
        for entry in entries {
            match PatternRule::from_config(entry) {
                Ok(rule) => set.rules.push(rule),
                Err(err) => {
                    warn!(%err, "skipping highlight rule");
                    set.rejected.push(err);
                }
            }
        }
        set
    }

    /// Append a compiled rule
    pub fn push(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    /// Rules in application order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Errors for rules rejected at load time
    pub fn rejected(&self) -> &[EditorError] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
