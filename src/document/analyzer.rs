//! Derived-state computation shared by every segment of a document

use tracing::info;

use crate::config::Config;
use crate::highlight::{self, AnnotationSpan, PatternSet};
use crate::tokenize::{TokenAccountant, TokenCounts, TokenizerRegistry};

/// Pattern set and token accountant a document recomputes with
pub struct Analyzer {
    patterns: PatternSet,
    accountant: TokenAccountant,
}

impl Analyzer {
    pub fn new(patterns: PatternSet, accountant: TokenAccountant) -> Self {
        Self {
            patterns,
            accountant,
        }
    }

    /// Build highlight rules and tokenizers from configuration
    pub fn from_config(config: &Config) -> Self {
        let patterns = PatternSet::from_config(&config.highlights);
        let registry = TokenizerRegistry::from_config(&config.tokenizers);
        info!(
            rules = patterns.len(),
            rejected = patterns.rejected().len(),
            tokenizers = registry.len(),
            "analyzer ready"
        );
        let accountant = TokenAccountant::new(registry, config.live_tokenizer_name());
        Self::new(patterns, accountant)
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn accountant(&self) -> &TokenAccountant {
        &self.accountant
    }

    pub fn annotate(&self, text: &str) -> Vec<AnnotationSpan> {
        highlight::annotate(text, &self.patterns)
    }

    pub fn live_counts(&self, text: &str) -> TokenCounts {
        self.accountant.segment_counts(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ALL_TOKENIZERS;
    use crate::tokenize::LiveScope;

    #[test]
    fn test_live_scope_from_config() {
        let mut config = Config::default();
        config
            .tokenizers
            .insert("chars".to_string(), vec!["builtin:chars".to_string()]);

        let analyzer = Analyzer::from_config(&config);
        assert_eq!(
            analyzer.accountant().live_scope(),
            &LiveScope::Only("default".to_string())
        );
        assert_eq!(analyzer.live_counts("a b").len(), 1);

        config.live_tokenizer = ALL_TOKENIZERS.to_string();
        let analyzer = Analyzer::from_config(&config);
        assert_eq!(analyzer.accountant().live_scope(), &LiveScope::All);
        assert_eq!(analyzer.live_counts("a b").len(), 2);
    }
}
