//! Conversation document persistence
//!
//! The on-disk form is a JSON array whose first element holds the turns:
//!
//! ```text
//! [ { "conversations": [ { "from": "system", "value": "..." }, ... ] } ]
//! ```
//!
//! Values are trimmed both on load and on save. Derived state (spans,
//! token counts) is never written.

use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::info;

use crate::document::{Analyzer, Document, Turn};
use crate::error::{EditorError, Result};

#[derive(Debug, Serialize)]
struct Record {
    conversations: Vec<Entry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    from: String,
    value: String,
}

fn malformed(reason: impl Into<String>) -> EditorError {
    EditorError::MalformedDocument(reason.into())
}

/// Parse persisted bytes into turns
///
/// All-or-nothing: any structural problem fails the whole parse.
pub fn parse(bytes: &[u8]) -> Result<Vec<Turn>> {
    let root: Value =
        serde_json::from_slice(bytes).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| malformed("top level is not an array"))?;
    let first = records
        .first()
        .ok_or_else(|| malformed("top-level array is empty"))?;
    let conversations = first
        .get("conversations")
        .ok_or_else(|| malformed("first element has no `conversations` field"))?;

    let entries = conversations
        .as_array()
        .ok_or_else(|| malformed("`conversations` is not an array"))?;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let entry = Entry::deserialize(entry)
                .map_err(|e| malformed(format!("conversation entry {idx}: {e}")))?;
            Ok(Turn::new(entry.from, entry.value.trim()))
        })
        .collect()
}

/// Load a document from persisted bytes
pub fn load(bytes: &[u8], analyzer: Rc<Analyzer>) -> Result<Document> {
    let turns = parse(bytes)?;
    Ok(Document::from_turns(turns, analyzer))
}

/// Serialize a document's roles and texts as pretty-printed JSON
pub fn save(document: &Document) -> Result<Vec<u8>> {
    let record = Record {
        conversations: document
            .segments()
            .iter()
            .map(|segment| Entry {
                from: segment.role().as_str().to_string(),
                value: segment.text().trim().to_string(),
            })
            .collect(),
    };

    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    vec![record].serialize(&mut ser).map_err(io::Error::from)?;
    Ok(out)
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => EditorError::NotFound(path.display().to_string()),
        _ => EditorError::Io(e),
    })
}

/// Read a document from `path`
///
/// The document remembers `path` as its source.
pub fn load_path(path: &Path, analyzer: Rc<Analyzer>) -> Result<Document> {
    let bytes = read_source(path)?;
    let mut document = load(&bytes, analyzer)?;
    document.set_source_path(path);
    info!(path = %path.display(), segments = document.len(), "loaded document");
    Ok(document)
}

/// Load `path` into an existing document
///
/// On failure the document is left exactly as it was.
pub fn reload_into(document: &mut Document, path: &Path) -> Result<()> {
    let bytes = read_source(path)?;
    let turns = parse(&bytes)?;

    document.replace_all(turns);
    document.set_source_path(path);
    info!(path = %path.display(), segments = document.len(), "loaded document");
    Ok(())
}

/// Write `document` to `path` and make it the document's source
pub fn save_path(document: &mut Document, path: &Path) -> Result<()> {
    let bytes = save(document)?;
    fs::write(path, bytes)?;
    document.set_source_path(path);
    document.mark_saved();
    info!(path = %path.display(), segments = document.len(), "saved document");
    Ok(())
}
