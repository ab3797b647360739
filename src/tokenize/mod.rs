//! Token accounting
//!
//! Tokenizers are opaque backends behind the `Tokenizer` trait. The
//! registry loads them by name from configuration; the accountant turns
//! their encodings into per-segment and per-document counts.

mod accountant;
mod backends;
mod registry;

pub use accountant::{
    aggregate, count, recompute_segment, summary, LiveScope, TokenAccountant, TokenCount,
    TokenCounts,
};
pub use backends::{CharTokenizer, HuggingFaceTokenizer, WhitespaceTokenizer};
pub use registry::{TokenizerEntry, TokenizerRegistry};

use crate::error::Result;

/// A backend converting text into token ids
///
/// Implementations must encode raw text only: no BOS/EOS or other special
/// tokens are added, so the length of the result is the user-facing count.
pub trait Tokenizer {
    /// Encode `text` into a sequence of token ids
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Short description of the backend, for logs and listings
    fn describe(&self) -> String;
}
