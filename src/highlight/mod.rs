//! Highlighting module
//!
//! This module provides the pattern rules loaded from configuration and
//! the annotation engine that turns segment text into styled spans.

mod engine;
mod rules;
mod style;

pub use engine::annotate;
pub use rules::{PatternRule, PatternSet};
pub use style::{AnnotationSpan, Color, Style};
