
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Which UI surface is canonical for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryView {
    Map,
    Timeline,
    Vault,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
}

/// A single knowledge-base record.
///
/// Only `id` and `title` are guaranteed. Every other field is optional and a
/// missing value means "unknown", so accessors never invent defaults beyond an
/// empty slice for iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_view: Option<PrimaryView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_locations: Option<Vec<GeoLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_context: Option<HistoricalContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl KnowledgeEntity {
    #[inline]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            short_description: None,
            full_content: None,
            tags: None,
            related_ids: None,
            primary_view: None,
            geo_locations: None,
            historical_context: None,
            metadata: None,
        }
    }

    #[inline]
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    #[inline]
    pub fn geo_locations(&self) -> &[GeoLocation] {
        self.geo_locations.as_deref().unwrap_or_default()
    }

    #[inline]
    pub fn related_ids(&self) -> &[String] {
        self.related_ids.as_deref().unwrap_or_default()
    }

    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    #[inline]
    pub fn has_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.tags()
            .iter()
            .any(|t| tags.iter().any(|wanted| wanted.as_ref() == t.as_str()))
    }

    /// Title, short description and full content joined with spaces
    #[inline]
    pub fn prose(&self) -> String {
        [
            self.title.as_str(),
            self.short_description.as_deref().unwrap_or_default(),
            self.full_content.as_deref().unwrap_or_default(),
        ]
        .join(" ")
    }

    /// Case-insensitive substring match on title, descriptions and tags.
    /// `needle` must already be lowercased.
    fn matches_lowercase(&self, needle: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle);

        contains(&self.title)
            || self.short_description.as_deref().is_some_and(contains)
            || self.full_content.as_deref().is_some_and(contains)
            || self.tags().iter().any(|tag| contains(tag))
    }
}

/// Immutable snapshot of the knowledge base keyed by entity id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeCollection {
    entries: BTreeMap<String, KnowledgeEntity>,
}

impl KnowledgeCollection {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&KnowledgeEntity> {
        self.entries.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[inline]
    pub fn entities(&self) -> impl Iterator<Item = &KnowledgeEntity> {
        self.entries.values()
    }

    #[inline]
    pub fn by_tag(&self, tag: &str) -> Vec<&KnowledgeEntity> {
        self.entities().filter(|e| e.has_tag(tag)).collect()
    }

    /// Entities carrying at least one of `tags`
    #[inline]
    pub fn with_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&KnowledgeEntity> {
        self.entities().filter(|e| e.has_any_tag(tags)).collect()
    }

    #[inline]
    pub fn search(&self, query: &str) -> Vec<&KnowledgeEntity> {
        let needle = query.to_lowercase();
        self.entities()
            .filter(|e| e.matches_lowercase(&needle))
            .collect()
    }

    /// Resolve `relatedIds`, silently skipping ids missing from this snapshot
    #[inline]
    pub fn related_to(&self, entity: &KnowledgeEntity) -> Vec<&KnowledgeEntity> {
        entity
            .related_ids()
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }
}

impl FromIterator<KnowledgeEntity> for KnowledgeCollection {
    #[inline]
    fn from_iter<I: IntoIterator<Item = KnowledgeEntity>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .filter(|e| !e.id.is_empty())
                .map(|e| (e.id.clone(), e))
                .collect(),
        }
    }
}
