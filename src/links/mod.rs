//! Cross-navigation between the map, timeline and vault views.
//!
//! Actions are derived from an entity's structured fields plus state names
//! detected in its prose. They are recomputed on every call and never cached
//! apart from the entity they describe.

pub mod inline;

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use url::form_urlencoded;

use crate::geo::{detect_states, is_known_state};
use crate::knowledge::{KnowledgeEntity, KnowledgeStore, PrimaryView};

pub use inline::{InlineLinker, LinkedSegment};

/// Tags that make an entity relevant to the history timeline
pub const TIMELINE_TAGS: &[&str] = &["history", "mughal", "states"];
/// Tags that make an entity worth studying in the vault
pub const VAULT_TAGS: &[&str] = &["science", "concept", "biology"];

const MAP_PATH: &str = "/active-map";
const TIMELINE_PATH: &str = "/history";
const VAULT_PATH: &str = "/dynamic-vault";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewAction {
    NavigateMap {
        label: String,
        url: String,
        #[serde(rename = "stateName")]
        state_name: String,
    },
    NavigateTimeline {
        label: String,
        url: String,
    },
    NavigateVault {
        label: String,
        url: String,
    },
}

impl ViewAction {
    #[inline]
    pub fn label(&self) -> &str {
        match self {
            Self::NavigateMap { label, .. }
            | Self::NavigateTimeline { label, .. }
            | Self::NavigateVault { label, .. } => label,
        }
    }

    #[inline]
    pub fn url(&self) -> &str {
        match self {
            Self::NavigateMap { url, .. }
            | Self::NavigateTimeline { url, .. }
            | Self::NavigateVault { url, .. } => url,
        }
    }

    fn map(state: &str) -> Self {
        Self::NavigateMap {
            label: format!("View {}", state),
            url: map_url(state),
            state_name: state.to_string(),
        }
    }
}

fn with_query(path: &str, key: &str, value: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    format!("{}?{}", path, query)
}

#[inline]
pub fn map_url(state: &str) -> String {
    with_query(MAP_PATH, "state", state)
}

/// Navigation suggestions for `entity`.
///
/// Map actions come first: explicit geo locations, then states detected in
/// the title and descriptions, each state at most once and only when it is in
/// the state table. Then at most one timeline action and one vault action.
#[inline]
pub fn actions_for(entity: &KnowledgeEntity) -> Vec<ViewAction> {
    let mut actions = Vec::new();
    let mut added_states: HashSet<&str> = HashSet::new();

    let located = entity.geo_locations().iter().map(|loc| loc.state.as_str());
    let mentioned = detect_states(&entity.prose());

    for state in located.chain(mentioned) {
        if is_known_state(state) && added_states.insert(state) {
            actions.push(ViewAction::map(state));
        }
    }

    if entity.historical_context.is_some() || entity.has_any_tag(TIMELINE_TAGS) {
        actions.push(ViewAction::NavigateTimeline {
            label: "View in History".to_string(),
            url: with_query(TIMELINE_PATH, "entity", &entity.id),
        });
    }

    if entity.has_any_tag(VAULT_TAGS) {
        actions.push(ViewAction::NavigateVault {
            label: "Study in Vault".to_string(),
            url: with_query(VAULT_PATH, "entity", &entity.id),
        });
    }

    actions
}

/// The single canonical destination for `entity`
#[inline]
pub fn primary_link(entity: &KnowledgeEntity) -> String {
    match (entity.primary_view, entity.geo_locations().first()) {
        (Some(PrimaryView::Map), Some(location)) => map_url(&location.state),
        (Some(PrimaryView::Timeline), _) => TIMELINE_PATH.to_string(),
        _ => with_query(VAULT_PATH, "entity", &entity.id),
    }
}

/// Store-backed entry point for id-based lookups
#[derive(Debug, Clone)]
pub struct LinkResolver {
    store: Arc<KnowledgeStore>,
}

impl LinkResolver {
    #[inline]
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self { store }
    }

    #[inline]
    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Actions for the entity with `id`; empty when it does not exist
    #[inline]
    pub async fn actions_for_id(&self, id: &str) -> Vec<ViewAction> {
        self.store
            .get_all()
            .await
            .get(id)
            .map(actions_for)
            .unwrap_or_default()
    }

    /// Primary destination for `id`, or `#` when it does not exist
    #[inline]
    pub async fn primary_link_for_id(&self, id: &str) -> String {
        self.store
            .get_all()
            .await
            .get(id)
            .map_or_else(|| "#".to_string(), primary_link)
    }

    /// Entities carrying any of `tags`
    #[inline]
    pub async fn entities_by_tags<S: AsRef<str> + Sync>(
        &self,
        tags: &[S],
    ) -> Vec<KnowledgeEntity> {
        self.store.get_by_any_tag(tags).await
    }

    /// Entities located in `state`, either explicitly or by mention
    #[inline]
    pub async fn entities_for_state(&self, state: &str) -> Vec<KnowledgeEntity> {
        self.store
            .get_all()
            .await
            .entities()
            .filter(|entity| {
                entity
                    .geo_locations()
                    .iter()
                    .any(|loc| loc.state.eq_ignore_ascii_case(state))
                    || detect_states(&entity.prose())
                        .iter()
                        .any(|found| found.eq_ignore_ascii_case(state))
            })
            .cloned()
            .collect()
    }

    #[inline]
    pub fn detect_states(&self, text: &str) -> Vec<&'static str> {
        detect_states(text)
    }

    /// Linker over the current collection's titles
    #[inline]
    pub async fn inline_linker(&self) -> InlineLinker {
        let collection = self.store.get_all().await;
        InlineLinker::new(&collection)
    }
}
