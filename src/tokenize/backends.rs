//! Tokenizer backends
//!
//! Two built-in estimators plus Hugging Face `tokenizer.json` files loaded
//! through the `tokenizers` crate.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Tokenizer;
use crate::error::{EditorError, Result};

/// One token per whitespace-separated word
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text
            .split_whitespace()
            .map(|word| {
                let mut hasher = DefaultHasher::new();
                word.hash(&mut hasher);
                hasher.finish() as u32
            })
            .collect())
    }

    fn describe(&self) -> String {
        "builtin:whitespace".to_string()
    }
}

/// One token per Unicode scalar value
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.chars().map(u32::from).collect())
    }

    fn describe(&self) -> String {
        "builtin:chars".to_string()
    }
}

/// A pretrained tokenizer read from a `tokenizer.json` file
pub struct HuggingFaceTokenizer {
    inner: tokenizers::Tokenizer,
    path: PathBuf,
}

impl HuggingFaceTokenizer {
    /// Load from a `tokenizer.json` file or a directory containing one
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = if path.is_dir() {
            path.join("tokenizer.json")
        } else {
            path.to_path_buf()
        };

        if !file.exists() {
            return Err(EditorError::NotFound(file.display().to_string()));
        }

        debug!(path = %file.display(), "loading tokenizer.json");
        let inner = tokenizers::Tokenizer::from_file(&file)
            .map_err(|e| EditorError::tokenizer(&file.display().to_string(), e))?;

        Ok(Self { inner, path: file })
    }
}

impl Tokenizer for HuggingFaceTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| EditorError::tokenizer(&self.path.display().to_string(), e))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
