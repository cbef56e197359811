#[cfg(test)]
mod tests;

use fancy_regex::{Regex, RegexBuilder};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::knowledge::KnowledgeCollection;
use crate::{PortalError, Result};

/// A run of prose, linked to an entity when it spells that entity's title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedSegment {
    pub text: String,
    #[serde(rename = "linkId", skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
}

impl LinkedSegment {
    #[inline]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link_id: None,
        }
    }

    #[inline]
    pub fn link(text: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link_id: Some(id.into()),
        }
    }

    #[inline]
    pub fn is_link(&self) -> bool {
        self.link_id.is_some()
    }
}

/// Turns entity titles found in prose into links.
///
/// Every title becomes a keyword; the longest keyword wins where several
/// match at the same position, so "Second Five Year Plan" is linked whole
/// rather than just "Plan". There is no minimum length or word-boundary
/// check.
#[derive(Debug, Clone)]
pub struct InlineLinker {
    keywords: HashMap<String, String>,
    pattern: Option<Regex>,
}

/// Compiled-program ceiling for the title alternation. Collections with
/// thousands of titles exceed the regex defaults.
const PATTERN_SIZE_LIMIT: usize = 1 << 28;

impl InlineLinker {
    /// Linker over `collection`'s titles, degrading to plain text when the
    /// title pattern cannot be compiled
    #[inline]
    pub fn new(collection: &KnowledgeCollection) -> Self {
        Self::from_titles(title_pairs(collection))
    }

    #[inline]
    pub fn try_new(collection: &KnowledgeCollection) -> Result<Self> {
        Self::try_from_titles(title_pairs(collection))
    }

    /// Build from `(title, id)` pairs. Later duplicates of a title (compared
    /// case-insensitively) replace earlier ones.
    ///
    /// A pattern that fails to compile is logged and the linker leaves all
    /// text unlinked.
    #[inline]
    pub fn from_titles<'a, I>(titles: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::with_size_limit(titles, PATTERN_SIZE_LIMIT)
    }

    /// Like [`from_titles`](Self::from_titles), but reports a pattern that
    /// fails to compile
    #[inline]
    pub fn try_from_titles<'a, I>(titles: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let keywords = collect_keywords(titles);
        let pattern = compile_pattern(&keywords, PATTERN_SIZE_LIMIT)?;
        Ok(Self { keywords, pattern })
    }

    fn with_size_limit<'a, I>(titles: I, size_limit: usize) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let keywords = collect_keywords(titles);
        match compile_pattern(&keywords, size_limit) {
            Ok(pattern) => Self { keywords, pattern },
            Err(e) => {
                warn!("Inline linking disabled: {}", e);
                Self {
                    keywords,
                    pattern: None,
                }
            }
        }
    }

    #[inline]
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Split `text` into plain and linked segments.
    ///
    /// Concatenating the segment texts reproduces `text` exactly. Empty input
    /// yields no segments.
    #[inline]
    pub fn link(&self, text: &str) -> Vec<LinkedSegment> {
        let mut segments = Vec::new();
        if text.is_empty() {
            return segments;
        }

        let Some(pattern) = &self.pattern else {
            segments.push(LinkedSegment::plain(text));
            return segments;
        };

        let mut cursor = 0;
        for found in pattern.find_iter(text) {
            let found = match found {
                Ok(found) => found,
                Err(e) => {
                    warn!("Title matching stopped early: {}", e);
                    break;
                }
            };

            if let Some(gap) = text.get(cursor..found.start()) {
                push_plain(&mut segments, gap);
            }

            let matched = found.as_str();
            match self.keywords.get(&matched.to_lowercase()) {
                Some(id) => segments.push(LinkedSegment::link(matched, id.as_str())),
                None => push_plain(&mut segments, matched),
            }
            cursor = found.end();
        }

        if let Some(rest) = text.get(cursor..) {
            push_plain(&mut segments, rest);
        }

        segments
    }
}

fn title_pairs(collection: &KnowledgeCollection) -> impl Iterator<Item = (&str, &str)> {
    collection
        .entities()
        .map(|entity| (entity.title.as_str(), entity.id.as_str()))
}

fn collect_keywords<'a, I>(titles: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    titles
        .into_iter()
        .filter(|(title, _)| !title.trim().is_empty())
        .map(|(title, id)| (title.to_lowercase(), id.to_string()))
        .collect()
}

/// One case-insensitive alternation, longest keyword first so it wins at a
/// shared starting position. `None` when there are no keywords.
fn compile_pattern(
    keywords: &HashMap<String, String>,
    size_limit: usize,
) -> Result<Option<Regex>> {
    if keywords.is_empty() {
        return Ok(None);
    }

    let mut ordered: Vec<&str> = keywords.keys().map(String::as_str).collect();
    ordered.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });

    let alternation = ordered
        .iter()
        .map(|keyword| fancy_regex::escape(keyword))
        .join("|");

    let pattern = RegexBuilder::new(&format!("(?i)(?:{})", alternation))
        .delegate_size_limit(size_limit)
        .delegate_dfa_size_limit(size_limit)
        .build()
        .map_err(|e| PortalError::Linker(format!("failed to compile title pattern: {}", e)))?;

    debug!("Inline linker compiled {} titles", keywords.len());
    Ok(Some(pattern))
}

/// Append plain text, merging with a preceding plain segment
fn push_plain(segments: &mut Vec<LinkedSegment>, text: &str) {
    if text.is_empty() {
        return;
    }

    match segments.last_mut() {
        Some(last) if !last.is_link() => last.text.push_str(text),
        _ => segments.push(LinkedSegment::plain(text)),
    }
}

/// One-shot linking of `text` against `collection`'s titles
#[inline]
pub fn link_content(text: &str, collection: &KnowledgeCollection) -> Vec<LinkedSegment> {
    InlineLinker::new(collection).link(text)
}
