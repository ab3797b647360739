//! Named tokenizer registry
//!
//! Maps tokenizer names to loaded backends. A name whose backends all
//! failed to load stays registered as unavailable so that counts can
//! report it instead of silently dropping it.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use super::backends::{CharTokenizer, HuggingFaceTokenizer, WhitespaceTokenizer};
use super::Tokenizer;
use crate::error::{EditorError, Result};

/// Prefix for backends compiled into the binary
const BUILTIN_PREFIX: &str = "builtin:";

/// A registered tokenizer: either loaded, or the reason it is not
pub enum TokenizerEntry {
    Loaded(Box<dyn Tokenizer>),
    Unavailable(String),
}

/// Named set of tokenizers
#[derive(Default)]
pub struct TokenizerRegistry {
    entries: BTreeMap<String, TokenizerEntry>,
}

impl TokenizerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every configured tokenizer
    ///
    /// Each name's backend identifiers are loaded in order and the last
    /// one that loads is used. Earlier failures are only logged.
    pub fn from_config(config: &BTreeMap<String, Vec<String>>) -> Self {
        let mut registry = Self::new();

        for (name, backends) in config {
            let mut failures = Vec::new();
            let mut loaded = None;

            for backend in backends {
                match load_backend(backend) {
                    Ok(tokenizer) => loaded = Some(tokenizer),
                    Err(err) => {
                        warn!(tokenizer = %name, %backend, %err, "tokenizer backend failed to load");
                        failures.push(format!("{backend}: {err}"));
                    }
                }
            }

            match loaded {
                Some(tokenizer) => {
                    info!(tokenizer = %name, backend = %tokenizer.describe(), "registered tokenizer");
                    registry.register(name, tokenizer);
                }
                None => {
                    let reason = if failures.is_empty() {
                        "no backends configured".to_string()
                    } else {
                        failures.join("; ")
                    };
                    registry.mark_unavailable(name, reason);
                }
            }
        }

        registry
    }

    /// Register a loaded tokenizer, replacing any previous entry
    pub fn register(&mut self, name: &str, tokenizer: Box<dyn Tokenizer>) {
        self.entries
            .insert(name.to_string(), TokenizerEntry::Loaded(tokenizer));
    }

    /// Record that a named tokenizer could not be loaded
    pub fn mark_unavailable(&mut self, name: &str, reason: impl Into<String>) {
        self.entries
            .insert(name.to_string(), TokenizerEntry::Unavailable(reason.into()));
    }

    /// Look up a tokenizer by name
    ///
    /// Fails with `TokenizerUnavailable` for unknown names and for names
    /// whose backends failed to load.
    pub fn get(&self, name: &str) -> Result<&dyn Tokenizer> {
        match self.entries.get(name) {
            Some(TokenizerEntry::Loaded(tokenizer)) => Ok(tokenizer.as_ref()),
            Some(TokenizerEntry::Unavailable(reason)) => Err(EditorError::tokenizer(name, reason)),
            None => Err(EditorError::tokenizer(name, "not registered")),
        }
    }

    /// Whether `name` is registered at all (loaded or not)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve one backend identifier to a tokenizer
fn load_backend(id: &str) -> Result<Box<dyn Tokenizer>> {
    if let Some(kind) = id.strip_prefix(BUILTIN_PREFIX) {
        return match kind {
            "whitespace" => Ok(Box::new(WhitespaceTokenizer)),
            "chars" => Ok(Box::new(CharTokenizer)),
            other => Err(EditorError::tokenizer(id, format!("unknown builtin `{other}`"))),
        };
    }
    Ok(Box::new(HuggingFaceTokenizer::from_path(Path::new(id))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(name, ids)| (name.to_string(), ids.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_builtin_backends() {
        let registry = TokenizerRegistry::from_config(&config(&[
            ("default", &["builtin:whitespace"]),
            ("chars", &["builtin:chars"]),
        ]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("default").unwrap().encode("a b").unwrap().len(), 2);
        assert_eq!(registry.get("chars").unwrap().encode("a b").unwrap().len(), 3);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["chars", "default"]);
    }

    #[test]
    fn test_last_loadable_backend_wins() {
        let registry = TokenizerRegistry::from_config(&config(&[
            ("both", &["builtin:chars", "builtin:whitespace"]),
            (
                "trailing_failure",
                &["builtin:whitespace", "builtin:chars", "/definitely/not/here/tokenizer.json"],
            ),
        ]));

        assert_eq!(registry.get("both").unwrap().describe(), "builtin:whitespace");
        assert_eq!(registry.get("trailing_failure").unwrap().describe(), "builtin:chars");
    }

    #[test]
    fn test_failed_load_is_registered_unavailable() {
        let registry = TokenizerRegistry::from_config(&config(&[
            ("broken", &["builtin:nonsense"]),
            ("empty", &[]),
            ("ok", &["builtin:whitespace"]),
        ]));

        assert!(registry.contains("broken"));
        assert!(matches!(
            registry.get("broken").err(),
            Some(EditorError::TokenizerUnavailable { .. })
        ));
        assert!(registry.get("empty").is_err());
        assert!(registry.get("ok").is_ok());
    }

    #[test]
    fn test_unknown_name() {
        let registry = TokenizerRegistry::new();
        assert!(!registry.contains("default"));
        assert!(registry.get("default").is_err());
    }
}
