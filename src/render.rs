//! Terminal rendering of documents
//!
//! Spans from different rules may overlap. A terminal can only paint one
//! color per character, so here the rule applied last wins.

use std::io::Write;
use std::ops::Range;

use crossterm::queue;
use crossterm::style::{self, Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use unicode_width::UnicodeWidthStr;

use crate::config::ViewSettings;
use crate::document::Document;
use crate::error::Result;
use crate::highlight::{AnnotationSpan, Color, Style};
use crate::tokenize::{summary, TokenCounts};

/// Convert a highlight color to a terminal color
fn to_terminal(color: Color) -> Option<style::Color> {
    let color = match color {
        Color::Default => return None,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::Grey => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
        Color::Rgb(r, g, b) => style::Color::Rgb { r, g, b },
    };
    Some(color)
}

/// Split `text` into runs that each carry a single style
///
/// Where spans overlap, the one appearing last in `spans` wins.
pub fn resolve_styles(text: &str, spans: &[AnnotationSpan]) -> Vec<(Range<usize>, Option<Style>)> {
    let mut cuts: Vec<usize> = vec![0, text.len()];
    for span in spans {
        cuts.push(span.start.min(text.len()));
        cuts.push(span.end.min(text.len()));
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut runs: Vec<(Range<usize>, Option<Style>)> = Vec::new();
    for pair in cuts.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let style = spans
            .iter()
            .rev()
            .find(|span| span.start <= start && end <= span.end)
            .map(|span| span.style);

        // Merge with the previous run when the style does not change
        if let Some((range, prev)) = runs.last_mut() {
            if *prev == style {
                range.end = end;
                continue;
            }
        }
        runs.push((start..end, style));
    }
    runs
}

/// Label shown next to a segment for its live counts
fn live_label(counts: &TokenCounts) -> String {
    match counts.values().next() {
        Some(count) if counts.len() == 1 => count.to_string(),
        _ => summary(counts),
    }
}

/// Write one segment's text with its highlight colors
fn render_text<W: Write>(out: &mut W, text: &str, spans: &[AnnotationSpan]) -> Result<()> {
    for (range, style) in resolve_styles(text, spans) {
        let piece = &text[range];
        match style {
            Some(style) => {
                if let Some(color) = to_terminal(style.fg) {
                    queue!(out, SetForegroundColor(color))?;
                }
                if style.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                queue!(out, Print(piece), SetAttribute(Attribute::Reset), ResetColor)?;
            }
            None => queue!(out, Print(piece))?,
        }
    }
    Ok(())
}

/// Write every segment of `document` with a header line
pub fn render_document<W: Write>(out: &mut W, document: &Document, view: &ViewSettings) -> Result<()> {
    queue!(out, Print(format!("{}\n\n", document.title())))?;

    for (idx, segment) in document.segments().iter().enumerate() {
        let label = document.label(idx).unwrap_or_default();
        let header = format!("{} (Tokens: {})", label, live_label(segment.token_counts()));
        let rule_width = header.width().min(view.width as usize);

        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(&header),
            SetAttribute(Attribute::Reset),
            Print(format!("\n{}\n", "─".repeat(rule_width)))
        )?;
        render_text(out, segment.text(), segment.spans())?;
        queue!(out, Print("\n\n"))?;
    }

    out.flush()?;
    Ok(())
}

/// Write the document-wide totals line
pub fn render_counts<W: Write>(out: &mut W, counts: &TokenCounts) -> Result<()> {
    queue!(out, Print(format!("Token Counts: {}\n", summary(counts))))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::{Analyzer, Turn};
    use crate::tokenize::TokenCount;
    use std::rc::Rc;

    fn span(start: usize, end: usize, rule: usize, color: Color) -> AnnotationSpan {
        AnnotationSpan::new(start, end, rule, Style::fg(color))
    }

    #[test]
    fn test_resolve_plain_text() {
        let runs = resolve_styles("plain", &[]);
        assert_eq!(runs, vec![(0..5, None)]);
        assert!(resolve_styles("", &[]).is_empty());
    }

    #[test]
    fn test_resolve_last_rule_wins() {
        // "say *hi Sicarius* now"
        let spans = [span(4, 17, 0, Color::Red), span(8, 16, 1, Color::Green)];
        let runs = resolve_styles("say *hi Sicarius* now", &spans);

        assert_eq!(
            runs,
            vec![
                (0..4, None),
                (4..8, Some(Style::fg(Color::Red))),
                (8..16, Some(Style::fg(Color::Green))),
                (16..17, Some(Style::fg(Color::Red))),
                (17..21, None),
            ]
        );
    }

    #[test]
    fn test_live_label() {
        let mut counts = TokenCounts::new();
        counts.insert("default".to_string(), TokenCount::Counted(4));
        assert_eq!(live_label(&counts), "4");

        counts.insert("other".to_string(), TokenCount::Counted(9));
        assert_eq!(live_label(&counts), "default: 4, other: 9");
    }

    #[test]
    fn test_render_document() {
        let analyzer = Rc::new(Analyzer::from_config(&Config::default()));
        let doc = Document::from_turns(
            vec![Turn::new("system", "be *brief*"), Turn::new("human", "hi")],
            analyzer,
        );

        let mut out = Vec::new();
        render_document(&mut out, &doc, &ViewSettings::default()).unwrap();
        render_counts(&mut out, &doc.aggregate_tokens()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("JSON Text Editor\n"));
        assert!(text.contains("System Prompt (Tokens: 2)"));
        assert!(text.contains("Human 1 (Tokens: 1)"));
        assert!(text.contains("*brief*"));
        assert!(text.contains("Token Counts: default: 3"));
    }
}
