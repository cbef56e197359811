use super::*;
use crate::knowledge::{
    GeoLocation, HistoricalContext, KnowledgeCollection, KnowledgeSource,
};
use async_trait::async_trait;

fn located(state: &str) -> GeoLocation {
    GeoLocation {
        state: state.to_string(),
        lat: None,
        lng: None,
    }
}

fn tagged(id: &str, title: &str, tags: &[&str]) -> KnowledgeEntity {
    KnowledgeEntity {
        tags: Some(tags.iter().map(|t| (*t).to_string()).collect()),
        ..KnowledgeEntity::new(id, title)
    }
}

#[test]
fn geo_location_plus_history_tag() {
    let entity = KnowledgeEntity {
        geo_locations: Some(vec![located("Kerala")]),
        ..tagged("spice-route", "The Spice Route", &["history"])
    };

    let actions = actions_for(&entity);
    assert_eq!(
        actions,
        vec![
            ViewAction::NavigateMap {
                label: "View Kerala".to_string(),
                url: "/active-map?state=Kerala".to_string(),
                state_name: "Kerala".to_string(),
            },
            ViewAction::NavigateTimeline {
                label: "View in History".to_string(),
                url: "/history?entity=spice-route".to_string(),
            },
        ]
    );
}

#[test]
fn detected_states_follow_explicit_locations_without_duplicates() {
    let entity = KnowledgeEntity {
        geo_locations: Some(vec![located("Tamil Nadu"), located("Tamil Nadu")]),
        short_description: Some("Temples of Madurai and the forts of Maharashtra".to_string()),
        full_content: Some("Also studied in Pune.".to_string()),
        ..KnowledgeEntity::new("temples", "Dravidian Architecture")
    };

    let actions = actions_for(&entity);
    let states: Vec<&str> = actions
        .iter()
        .filter_map(|action| match action {
            ViewAction::NavigateMap { state_name, .. } => Some(state_name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec!["Tamil Nadu", "Maharashtra"]);
}

#[test]
fn unknown_geo_states_are_skipped() {
    let entity = KnowledgeEntity {
        geo_locations: Some(vec![located("Atlantis"), located("Goa")]),
        ..KnowledgeEntity::new("coast", "Coastline")
    };

    let actions = actions_for(&entity);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].label(), "View Goa");
}

#[test]
fn historical_context_alone_enables_timeline() {
    let entity = KnowledgeEntity {
        historical_context: Some(HistoricalContext {
            year: Some(1857),
            era: None,
        }),
        ..KnowledgeEntity::new("revolt", "The Revolt")
    };

    let actions = actions_for(&entity);
    assert_eq!(actions.len(), 1);
    assert!(matches!(actions[0], ViewAction::NavigateTimeline { .. }));
}

#[test]
fn timeline_and_vault_are_emitted_once_each() {
    let entity = tagged(
        "dna",
        "Double Helix",
        &["history", "mughal", "states", "science", "biology", "concept"],
    );

    let actions = actions_for(&entity);
    assert_eq!(actions.len(), 2);
    assert!(matches!(actions[0], ViewAction::NavigateTimeline { .. }));
    assert_eq!(
        actions[1],
        ViewAction::NavigateVault {
            label: "Study in Vault".to_string(),
            url: "/dynamic-vault?entity=dna".to_string(),
        }
    );
}

#[test]
fn plain_entity_has_no_actions() {
    let entity = tagged("gst", "Goods and Services Tax", &["economy"]);
    assert!(actions_for(&entity).is_empty());
}

#[test]
fn map_urls_are_query_encoded() {
    assert_eq!(map_url("Tamil Nadu"), "/active-map?state=Tamil+Nadu");
    assert_eq!(
        map_url("Dadra and Nagar Haveli and Daman and Diu"),
        "/active-map?state=Dadra+and+Nagar+Haveli+and+Daman+and+Diu"
    );
}

#[test]
fn primary_link_rules() {
    let mapped = KnowledgeEntity {
        primary_view: Some(PrimaryView::Map),
        geo_locations: Some(vec![located("West Bengal")]),
        ..KnowledgeEntity::new("sundarbans", "Sundarbans")
    };
    assert_eq!(primary_link(&mapped), "/active-map?state=West+Bengal");

    let unmapped = KnowledgeEntity {
        primary_view: Some(PrimaryView::Map),
        ..KnowledgeEntity::new("nowhere", "Nowhere")
    };
    assert_eq!(primary_link(&unmapped), "/dynamic-vault?entity=nowhere");

    let timeline = KnowledgeEntity {
        primary_view: Some(PrimaryView::Timeline),
        ..KnowledgeEntity::new("quit-india", "Quit India")
    };
    assert_eq!(primary_link(&timeline), "/history");

    assert_eq!(
        primary_link(&KnowledgeEntity::new("x", "X")),
        "/dynamic-vault?entity=x"
    );
}

#[test]
fn view_actions_serialize_with_type_tag() {
    let json = serde_json::to_value(ViewAction::map("Assam")).expect("action serializes");
    assert_eq!(
        json,
        serde_json::json!({
            "type": "navigate_map",
            "label": "View Assam",
            "url": "/active-map?state=Assam",
            "stateName": "Assam"
        })
    );
}

struct FixtureSource;

#[async_trait]
impl KnowledgeSource for FixtureSource {
    async fn fetch_collection(&self) -> crate::Result<KnowledgeCollection> {
        Ok([
            tagged("akbar", "Akbar", &["mughal"]),
            tagged("photosynthesis", "Photosynthesis", &["biology"]),
            tagged("gst", "GST", &["economy"]),
            KnowledgeEntity {
                geo_locations: Some(vec![located("Karnataka")]),
                ..tagged("hampi", "Hampi", &["heritage"])
            },
            KnowledgeEntity {
                short_description: Some("Handloom silk from Mysore".to_string()),
                ..tagged("silk", "Silk weaving", &["economy"])
            },
        ]
        .into_iter()
        .collect())
    }
}

fn resolver() -> LinkResolver {
    LinkResolver::new(Arc::new(KnowledgeStore::new(Arc::new(FixtureSource))))
}

#[tokio::test]
async fn resolver_missing_entity_yields_nothing() {
    let resolver = resolver();
    assert!(resolver.actions_for_id("missing").await.is_empty());
    assert_eq!(resolver.primary_link_for_id("missing").await, "#");
}

#[tokio::test]
async fn resolver_actions_by_id() {
    let resolver = resolver();
    let actions = resolver.actions_for_id("akbar").await;
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].url(), "/history?entity=akbar");
}

#[tokio::test]
async fn resolver_entities_by_tags() {
    let resolver = resolver();
    let ids: Vec<String> = resolver
        .entities_by_tags(&["biology", "mughal"])
        .await
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["akbar", "photosynthesis"]);
    assert!(resolver.entities_by_tags(&["polity"]).await.is_empty());
}

#[tokio::test]
async fn resolver_builds_inline_linker() {
    let resolver = resolver();
    let linker = resolver.inline_linker().await;
    assert_eq!(linker.keyword_count(), 5);
    assert_eq!(resolver.detect_states("Trip to Shimla"), vec!["Himachal Pradesh"]);
}

#[tokio::test]
async fn resolver_entities_for_state() {
    let resolver = resolver();
    let ids: Vec<String> = resolver
        .entities_for_state("karnataka")
        .await
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["hampi", "silk"]);
    assert!(resolver.entities_for_state("Goa").await.is_empty());
}
