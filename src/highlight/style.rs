//! Style types for highlight rendering
//!
//! Rules carry a `Style`; the engine copies it onto every span a rule
//! produces. How overlapping spans are painted is left to the renderer.

/// Highlight colors (ANSI 16-color palette plus 24-bit RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a color from a config name (`red`, `bright-blue`, `#ff8800`)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(hex) = name.strip_prefix('#') {
            return parse_hex(hex);
        }

        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "default" => Some(Color::Default),
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "magenta" | "purple" => Some(Color::Magenta),
            "cyan" => Some(Color::Cyan),
            "white" => Some(Color::White),
            "grey" | "gray" | "brightblack" => Some(Color::Grey),
            "brightred" | "orange" => Some(Color::BrightRed),
            "brightgreen" => Some(Color::BrightGreen),
            "brightyellow" => Some(Color::BrightYellow),
            "brightblue" => Some(Color::BrightBlue),
            "brightmagenta" | "pink" => Some(Color::BrightMagenta),
            "brightcyan" => Some(Color::BrightCyan),
            "brightwhite" => Some(Color::BrightWhite),
            _ => None,
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Text style attributes attached to a highlight rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Bold text
    pub bold: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A styled range of a segment's text produced by one highlight rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSpan {
    /// Byte offset where this span starts (inclusive, on a char boundary)
    pub start: usize,
    /// Byte offset where this span ends (exclusive, on a char boundary)
    pub end: usize,
    /// Index of the producing rule within its `PatternSet`
    pub rule: usize,
    /// Style to apply to this span
    pub style: Style,
}

impl AnnotationSpan {
    /// Create a new span
    pub fn new(start: usize, end: usize, rule: usize, style: Style) -> Self {
        Self {
            start,
            end,
            rule,
            style,
        }
    }

    /// Convert the byte range into codepoint indices within `text`
    ///
    /// Widget toolkits that address text by character need this form.
    pub fn char_range(&self, text: &str) -> (usize, usize) {
        let start = text[..self.start].chars().count();
        let len = text[self.start..self.end].chars().count();
        (start, start + len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_name() {
        assert_eq!(Color::from_name("red"), Some(Color::Red));
        assert_eq!(Color::from_name("Green"), Some(Color::Green));
        assert_eq!(Color::from_name("bright-blue"), Some(Color::BrightBlue));
        assert_eq!(Color::from_name("grey"), Some(Color::Grey));
        assert_eq!(Color::from_name("#ff8800"), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(Color::from_name("#ff88"), None);
        assert_eq!(Color::from_name("chartreuse-ish"), None);
    }

    #[test]
    fn test_style_default() {
        let style = Style::default();
        assert!(style.is_default());
        assert!(!Style::fg(Color::Red).is_default());
        assert!(Style::fg(Color::Default).with_bold().bold);
    }

    #[test]
    fn test_char_range_multibyte() {
        let text = "héllo *wörld*";
        let start = text.find('*').unwrap();
        let span = AnnotationSpan::new(start, text.len(), 0, Style::default());
        assert_eq!(span.char_range(text), (6, 13));
    }
}
