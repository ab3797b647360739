//! convo-edit - editor engine for role-tagged conversation documents
//!
//! A document is an ordered list of segments (system / human / gpt turns
//! or any other role). Each segment carries highlight spans and token
//! counts that are recomputed whenever its text changes.

pub mod config;
pub mod document;
pub mod error;
pub mod highlight;
pub mod render;
pub mod serializer;
pub mod tokenize;

pub use config::Config;
pub use document::{Analyzer, Document, Role, Segment, SegmentId, Turn};
pub use error::{EditorError, Result};
