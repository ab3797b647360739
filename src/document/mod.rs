//! Document representation - an ordered sequence of role-tagged segments
//!
//! Every mutation goes through `Document` so that a segment's spans and
//! token counts are recomputed before the call returns.

mod analyzer;
mod segment;

pub use analyzer::Analyzer;
pub use segment::{Role, Segment, SegmentId, Turn};

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::error::{EditorError, Result};
use crate::tokenize::TokenCounts;

/// Window title shown for every document
pub const APP_TITLE: &str = "JSON Text Editor";

/// Documents at or below this many segments cannot lose a pair
const MIN_PAIR_REMOVAL_LEN: usize = 3;

/// An editable conversation document
pub struct Document {
    /// Segments in conversation order; never empty
    segments: Vec<Segment>,
    /// File this document was loaded from or last saved to
    source_path: Option<PathBuf>,
    /// Whether there are unsaved changes
    modified: bool,
    next_id: u64,
    analyzer: Rc<Analyzer>,
}

impl Document {
    /// Create the default layout: a system prompt plus one human/gpt pair
    pub fn create_default(analyzer: Rc<Analyzer>) -> Self {
        Self::from_turns(default_turns(), analyzer)
    }

    /// Create a document holding `turns`
    ///
    /// An empty list gives the default layout.
    pub fn from_turns(turns: Vec<Turn>, analyzer: Rc<Analyzer>) -> Self {
        let mut doc = Self {
            segments: Vec::new(),
            source_path: None,
            modified: false,
            next_id: 0,
            analyzer,
        };
        doc.replace_all(turns);
        doc
    }

    /// Append an empty pair of segments, returning their ids
    pub fn append_pair(
        &mut self,
        role_a: impl Into<Role>,
        role_b: impl Into<Role>,
    ) -> (SegmentId, SegmentId) {
        let first = self.push_segment(Turn::new(role_a, ""));
        let second = self.push_segment(Turn::new(role_b, ""));
        self.modified = true;
        (first, second)
    }

    /// Whether `remove_trailing_pair` would remove anything
    pub fn can_remove_pair(&self) -> bool {
        self.segments.len() > MIN_PAIR_REMOVAL_LEN
    }

    /// Remove the last two segments
    ///
    /// Returns false, leaving the document untouched, when it has three
    /// segments or fewer.
    pub fn remove_trailing_pair(&mut self) -> bool {
        if !self.can_remove_pair() {
            return false;
        }
        let len = self.segments.len();
        self.segments.truncate(len - 2);
        self.modified = true;
        true
    }

    /// Replace one segment's text and recompute only that segment
    pub fn set_segment_text(&mut self, id: SegmentId, text: impl Into<String>) -> Result<()> {
        let analyzer = Rc::clone(&self.analyzer);
        let segment = self
            .segments
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(EditorError::NoSuchSegment(id.get()))?;

        segment.set_text(text.into(), &analyzer);
        debug!(segment = %id, spans = segment.spans().len(), "segment recomputed");
        self.modified = true;
        Ok(())
    }

    /// Discard every segment and install `turns` in their place
    ///
    /// An empty list installs the default layout instead.
    pub fn replace_all(&mut self, turns: Vec<Turn>) {
        let turns = if turns.is_empty() { default_turns() } else { turns };
        self.segments = self.build_segments(turns);
        self.modified = false;
    }

    /// Reset to the default layout with no associated file
    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
        self.source_path = None;
    }

    /// Swap in a new analyzer and recompute every segment
    pub fn reanalyze(&mut self, analyzer: Rc<Analyzer>) {
        self.analyzer = analyzer;
        for segment in &mut self.segments {
            segment.refresh(&self.analyzer);
        }
    }

    /// Totals under every registered tokenizer
    pub fn aggregate_tokens(&self) -> TokenCounts {
        self.analyzer.accountant().aggregate(self)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id() == id)
    }

    /// Role and text of every segment, in order
    pub fn turns(&self) -> Vec<Turn> {
        self.segments.iter().map(Segment::turn).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn set_source_path(&mut self, path: impl Into<PathBuf>) {
        self.source_path = Some(path.into());
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag after a successful save
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Window title, naming the file when there is one
    pub fn title(&self) -> String {
        let name = self
            .source_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned());
        match name {
            Some(name) => format!("{APP_TITLE} - {name}"),
            None => APP_TITLE.to_string(),
        }
    }

    /// Display label for the segment at `index`
    ///
    /// A leading system segment is the "System Prompt"; everything else is
    /// its role followed by its ordinal among segments of that role.
    pub fn label(&self, index: usize) -> Option<String> {
        let segment = self.segments.get(index)?;
        if index == 0 && segment.role().as_str() == Role::SYSTEM {
            return Some("System Prompt".to_string());
        }
        let ordinal = self.segments[..=index]
            .iter()
            .filter(|s| s.role() == segment.role())
            .count();
        Some(format!("{} {}", segment.role().display_name(), ordinal))
    }

    fn push_segment(&mut self, turn: Turn) -> SegmentId {
        let id = self.allocate_id();
        self.segments.push(Segment::new(id, turn, &self.analyzer));
        id
    }

    fn build_segments(&mut self, turns: Vec<Turn>) -> Vec<Segment> {
        turns
            .into_iter()
            .map(|turn| {
                let id = self.allocate_id();
                Segment::new(id, turn, &self.analyzer)
            })
            .collect()
    }

    fn allocate_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn default_turns() -> Vec<Turn> {
    vec![
        Turn::new(Role::SYSTEM, ""),
        Turn::new(Role::HUMAN, ""),
        Turn::new(Role::GPT, ""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::highlight::{Color, PatternRule, PatternSet, Style};
    use crate::tokenize::{TokenAccountant, TokenCount, TokenizerRegistry, WhitespaceTokenizer};
    use std::collections::HashSet;

    fn analyzer() -> Rc<Analyzer> {
        let mut patterns = PatternSet::new();
        patterns.push(PatternRule::new(r"\*(.+?)\*", Style::fg(Color::Red)).unwrap());
        let mut registry = TokenizerRegistry::new();
        registry.register("words", Box::new(WhitespaceTokenizer));
        Rc::new(Analyzer::new(patterns, TokenAccountant::new(registry, Some("words"))))
    }

    fn sample() -> Document {
        Document::from_turns(
            vec![
                Turn::new("system", "hi"),
                Turn::new("human", "hey"),
                Turn::new("gpt", "yo"),
            ],
            analyzer(),
        )
    }

    #[test]
    fn test_default_layout() {
        let doc = Document::create_default(analyzer());
        let roles: Vec<_> = doc.segments().iter().map(|s| s.role().as_str()).collect();
        assert_eq!(roles, vec!["system", "human", "gpt"]);
        assert!(doc.segments().iter().all(|s| s.text().is_empty()));
        assert!(!doc.is_modified());
        assert!(!doc.can_remove_pair());
    }

    #[test]
    fn test_from_turns_numbers_ids_from_zero() {
        let doc = sample();
        let ids: Vec<u64> = doc.segments().iter().map(|s| s.id().get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let doc = Document::from_turns(Vec::new(), analyzer());
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.segments()[0].id().get(), 0);
    }

    #[test]
    fn test_append_then_remove_restores_size() {
        let mut doc = sample();
        doc.append_pair("human", "gpt");
        assert_eq!(doc.len(), 5);

        doc.append_pair("human", "gpt");
        assert!(doc.remove_trailing_pair());
        assert_eq!(doc.len(), 5);

        assert!(doc.remove_trailing_pair());
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_remove_floor_is_noop() {
        let mut doc = sample();
        let before = doc.turns();

        assert!(!doc.remove_trailing_pair());
        assert!(!doc.remove_trailing_pair());
        assert_eq!(doc.turns(), before);
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_remove_on_short_document_is_noop() {
        let mut doc = Document::from_turns(vec![Turn::new("system", "only")], analyzer());
        assert_eq!(doc.len(), 1);
        assert!(!doc.remove_trailing_pair());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_set_text_is_local() {
        let mut doc = sample();
        let (a, _) = doc.append_pair("human", "gpt");
        let before: Vec<Segment> = doc.segments().to_vec();

        doc.set_segment_text(a, "hello *world* bye").unwrap();

        let after = doc.segments();
        for (old, new) in before.iter().zip(after) {
            if old.id() == a {
                assert_eq!(new.text(), "hello *world* bye");
                assert_eq!(new.spans().len(), 1);
                assert_eq!((new.spans()[0].start, new.spans()[0].end), (6, 13));
                assert_eq!(new.token_counts()["words"], TokenCount::Counted(3));
            } else {
                assert_eq!(old, new);
            }
        }
        assert!(doc.is_modified());
    }

    #[test]
    fn test_set_text_unknown_id() {
        let mut doc = sample();
        let before = doc.turns();
        let err = doc.set_segment_text(SegmentId(999), "x").unwrap_err();
        assert!(matches!(err, EditorError::NoSuchSegment(999)));
        assert_eq!(doc.turns(), before);
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let mut doc = sample();
        let first = doc.segments()[0].id();
        doc.append_pair("human", "gpt");
        doc.remove_trailing_pair();
        let (a, b) = doc.append_pair("human", "gpt");

        assert_eq!(doc.segments()[0].id(), first);
        let ids: HashSet<_> = doc.segments().iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), 5);
        assert_ne!(a, b);
    }

    #[test]
    fn test_replace_all_discards_old_segments() {
        let mut doc = sample();
        let old_id = doc.segments()[1].id();
        doc.replace_all(vec![Turn::new("narrator", "once *upon*")]);

        assert_eq!(doc.len(), 1);
        assert!(doc.segment(old_id).is_none());
        assert_eq!(doc.segments()[0].spans().len(), 1);

        doc.replace_all(Vec::new());
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_aggregate_tokens() {
        let mut doc = Document::from_turns(
            vec![Turn::new("human", "a b"), Turn::new("gpt", "c d e")],
            analyzer(),
        );
        assert_eq!(doc.aggregate_tokens()["words"], TokenCount::Counted(5));

        let id = doc.segments()[0].id();
        doc.set_segment_text(id, "").unwrap();
        assert_eq!(doc.aggregate_tokens()["words"], TokenCount::Counted(3));
    }

    #[test]
    fn test_labels() {
        let mut doc = Document::create_default(analyzer());
        doc.append_pair("human", "gpt");
        assert_eq!(doc.label(0).as_deref(), Some("System Prompt"));
        assert_eq!(doc.label(1).as_deref(), Some("Human 1"));
        assert_eq!(doc.label(4).as_deref(), Some("Gpt 2"));
        assert_eq!(doc.label(5), None);

        let doc = Document::from_turns(vec![Turn::new("human", "x")], analyzer());
        assert_eq!(doc.label(0).as_deref(), Some("Human 1"));
    }

    #[test]
    fn test_title_and_clear() {
        let mut doc = sample();
        assert_eq!(doc.title(), "JSON Text Editor");
        doc.set_source_path("/tmp/chats/first.json");
        assert_eq!(doc.title(), "JSON Text Editor - first.json");

        doc.clear();
        assert!(doc.source_path().is_none());
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_reanalyze_recomputes_everything() {
        let mut doc = sample();
        let id = doc.segments()[0].id();
        doc.set_segment_text(id, "call *Sicarius*").unwrap();
        assert_eq!(doc.segments()[0].spans().len(), 1);

        doc.reanalyze(Rc::new(Analyzer::from_config(&Config::default())));
        // The default config adds a name rule that overlaps the emphasis span
        assert_eq!(doc.segments()[0].spans().len(), 2);
        assert!(doc.segments()[0].token_counts().contains_key("default"));
    }
}
