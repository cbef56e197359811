// Lightweight content formatting
// Knowledge prose uses "- " bullets and **bold** markers; this turns it into
// lines of styled spans that any front end can render.


use fancy_regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static LINE_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\. -|\n").expect("valid regex"));

static BOLD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*[^*]+\*\*").expect("valid regex"));

static LEADING_DASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s*").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    #[inline]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    #[inline]
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// One bullet point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedLine {
    pub spans: Vec<Span>,
}

impl FormattedLine {
    #[inline]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Split on newlines and `". -"` separators, drop blank lines and leading
/// dashes, then mark up bold runs in each remaining line
#[inline]
pub fn format_content(text: &str) -> Vec<FormattedLine> {
    split_keeping_gaps(&LINE_BREAK_REGEX, text)
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = LEADING_DASH_REGEX.replace_all(line, "");
            FormattedLine {
                spans: format_inline(&line),
            }
        })
        .collect()
}

/// Bold markup only, no bullet handling
#[inline]
pub fn format_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for found in BOLD_REGEX.find_iter(text).flatten() {
        if let Some(gap) = text.get(cursor..found.start()).filter(|gap| !gap.is_empty()) {
            spans.push(Span::plain(gap));
        }

        let inner = found
            .as_str()
            .strip_prefix("**")
            .and_then(|s| s.strip_suffix("**"))
            .unwrap_or_default();
        spans.push(Span::bold(inner));

        cursor = found.end();
    }

    if let Some(rest) = text.get(cursor..).filter(|rest| !rest.is_empty()) {
        spans.push(Span::plain(rest));
    }

    spans
}

/// Text between matches of `separator`
fn split_keeping_gaps<'t>(separator: &Regex, text: &'t str) -> Vec<&'t str> {
    let mut parts = Vec::new();
    let mut cursor = 0;

    for found in separator.find_iter(text).flatten() {
        parts.extend(text.get(cursor..found.start()));
        cursor = found.end();
    }
    parts.extend(text.get(cursor..));

    parts
}
