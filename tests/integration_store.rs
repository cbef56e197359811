#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

use futures::future::join_all;
use india_facts::config::ApiConfig;
use india_facts::knowledge::{
    KnowledgeStore, KnowledgeSubmission, SubmissionOutcome, submit_knowledge,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    }
}

fn knowledge_body() -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": [
            {
                "id": "battle-of-plassey",
                "title": "Battle of Plassey",
                "shortDescription": "1757 victory of the East India Company",
                "tags": ["history", "battles"],
                "geoLocations": [{"state": "West Bengal", "lat": 23.8, "lng": 88.25}],
                "historicalContext": {"year": 1757, "era": "Company Rule"}
            },
            {
                "id": "photosynthesis",
                "title": "Photosynthesis",
                "tags": ["biology"]
            }
        ]
    })
}

#[tokio::test]
async fn concurrent_readers_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(knowledge_body())
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = KnowledgeStore::from_config(&api_for(&server)).expect("store builds");

    let results = join_all((0..8).map(|_| store.get_all())).await;
    assert!(results.iter().all(|collection| collection.len() == 2));

    // Served from cache
    let entity = store
        .get_by_id("battle-of-plassey")
        .await
        .expect("entity should exist");
    assert_eq!(entity.historical_context.and_then(|c| c.year), Some(1757));
    assert_eq!(store.get_by_tag("biology").await.len(), 1);
    assert_eq!(store.search("east india").await.len(), 1);
}

#[tokio::test]
async fn server_failure_serves_fallback_without_caching_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let store = KnowledgeStore::from_config(&api_for(&server)).expect("store builds");

    let first = store.get_all().await;
    assert!(!first.is_empty());
    assert!(first.contains("ui-fallback-notice"));
    assert!(!store.is_cached());

    let second = store.get_all().await;
    assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn unreachable_backend_serves_fallback() {
    let api = ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 2,
    };
    let store = KnowledgeStore::from_config(&api).expect("store builds");

    let collection = store.get_all().await;
    assert!(collection.contains("ui-fallback-notice"));
}

#[tokio::test]
async fn submission_refreshes_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(knowledge_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge/validate-add"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let store = KnowledgeStore::from_config(&api).expect("store builds");

    store.get_all().await;
    assert!(store.is_cached());

    let submission =
        KnowledgeSubmission::new("Konark Sun Temple", "13th century temple", "History");
    let outcome = submit_knowledge(&api, &store, &submission)
        .await
        .expect("submission is valid");
    assert_eq!(outcome, SubmissionOutcome::Added);
    assert!(!store.is_cached());

    store.get_all().await;
    assert!(store.is_cached());
}

#[tokio::test]
async fn rejected_submission_keeps_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(knowledge_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge/validate-add"))
        .respond_with(ResponseTemplate::new(205))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let store = KnowledgeStore::from_config(&api).expect("store builds");
    store.get_all().await;

    let submission = KnowledgeSubmission::new("Moon made of cheese", "Obviously", "Science");
    let outcome = submit_knowledge(&api, &store, &submission)
        .await
        .expect("submission is valid");

    assert_eq!(outcome, SubmissionOutcome::Rejected);
    assert!(!outcome.is_success());
    assert!(store.is_cached());
}
