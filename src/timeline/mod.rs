//! Timeline view of history-related knowledge.


use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::error;

use crate::knowledge::{KnowledgeCollection, KnowledgeEntity};
use crate::links::TIMELINE_TAGS;

const MAX_KEY_POINTS: usize = 5;
const MAX_RELATED: usize = 6;
const MAX_FILTERED: usize = 10;
const CONTENT_PREVIEW_CHARS: usize = 200;

const DEFAULT_FACTS_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/default_timeline.json"
));

static DEFAULT_FACTS: LazyLock<Vec<TimelineFact>> = LazyLock::new(|| {
    serde_json::from_str(DEFAULT_FACTS_JSON).unwrap_or_else(|e| {
        error!("Bundled timeline facts are unreadable: {}", e);
        Vec::new()
    })
});

/// Curated facts shown after the knowledge-base entries on the default timeline
#[inline]
pub fn default_facts() -> &'static [TimelineFact] {
    &DEFAULT_FACTS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFact {
    /// Source entity; `None` for bundled facts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub topic: String,
    pub era: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub personalities: Vec<Personality>,
    #[serde(default)]
    pub significance: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub places: Vec<TimelinePlace>,
}

impl From<&KnowledgeEntity> for TimelineFact {
    fn from(entity: &KnowledgeEntity) -> Self {
        let full_content = entity.full_content.as_deref().unwrap_or_default();
        let content = entity
            .short_description
            .clone()
            .unwrap_or_else(|| full_content.chars().take(CONTENT_PREVIEW_CHARS).collect());

        Self {
            entity_id: Some(entity.id.clone()),
            topic: entity
                .tags()
                .first()
                .cloned()
                .unwrap_or_else(|| "History".to_string()),
            era: entity
                .historical_context
                .as_ref()
                .and_then(|c| c.era.clone())
                .unwrap_or_else(|| "Historical Era".to_string()),
            title: entity.title.clone(),
            content,
            key_points: key_points(full_content),
            personalities: Vec::new(),
            significance: entity.short_description.clone().unwrap_or_default(),
            year: entity.historical_context.as_ref().and_then(|c| c.year),
            places: entity
                .geo_locations()
                .iter()
                .map(|loc| TimelinePlace {
                    name: loc.state.clone(),
                    latitude: loc.lat.unwrap_or_default(),
                    longitude: loc.lng.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Dash-bulleted lines of `content`, with the bullet and emphasis markers removed
#[inline]
pub fn key_points(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('-'))
        .map(|line| {
            line.trim_start()
                .trim_start_matches('*')
                .trim_end_matches('*')
                .trim()
                .to_string()
        })
        .take(MAX_KEY_POINTS)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineSource {
    /// A specific entity was requested and leads the timeline
    Linked,
    /// Filtered by a tag
    Filtered,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub source: TimelineSource,
    pub focused: Option<String>,
    pub facts: Vec<TimelineFact>,
}

fn is_history(entity: &KnowledgeEntity) -> bool {
    entity.has_any_tag(TIMELINE_TAGS)
}

/// Choose the facts for the history timeline.
///
/// A requested entity that exists leads, followed by other history entities.
/// Otherwise a tag filter narrows the history entities; when it matches
/// nothing, or neither is given, the first history entities are shown
/// followed by the bundled [`default_facts`].
#[inline]
pub fn build_timeline(
    collection: &KnowledgeCollection,
    entity_id: Option<&str>,
    tag: Option<&str>,
) -> Timeline {
    if let Some(focused) = entity_id.and_then(|id| collection.get(id)) {
        let facts = std::iter::once(TimelineFact::from(focused))
            .chain(
                collection
                    .entities()
                    .filter(|e| is_history(e) && e.id != focused.id)
                    .take(MAX_RELATED)
                    .map(TimelineFact::from),
            )
            .collect();

        return Timeline {
            source: TimelineSource::Linked,
            focused: Some(focused.title.clone()),
            facts,
        };
    }

    if let Some(tag) = tag {
        let facts: Vec<TimelineFact> = collection
            .by_tag(tag)
            .into_iter()
            .filter(|e| is_history(e))
            .take(MAX_FILTERED)
            .map(TimelineFact::from)
            .collect();

        if !facts.is_empty() {
            return Timeline {
                source: TimelineSource::Filtered,
                focused: None,
                facts,
            };
        }
    }

    Timeline {
        source: TimelineSource::Default,
        focused: None,
        facts: collection
            .entities()
            .filter(|e| is_history(e))
            .take(MAX_RELATED)
            .map(TimelineFact::from)
            .chain(default_facts().iter().cloned())
            .collect(),
    }
}
