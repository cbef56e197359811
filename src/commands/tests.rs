use super::*;
use crate::config::ApiConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn failing_backend(expected_requests: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge"))
        .respond_with(ResponseTemplate::new(500))
        .expect(expected_requests)
        .mount(&server)
        .await;
    server
}

fn store_for(server: &MockServer) -> KnowledgeStore {
    let api = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    KnowledgeStore::from_config(&api).expect("store builds")
}

#[tokio::test]
async fn show_reads_one_snapshot() {
    let server = failing_backend(1).await;
    let store = store_for(&server);

    print_entity(&store, "ui-active-map")
        .await
        .expect("fallback entry should render");

    server.verify().await;
}

#[tokio::test]
async fn show_reports_missing_entry() {
    let server = failing_backend(1).await;
    let store = store_for(&server);

    let result = print_entity(&store, "no-such-entry").await;
    assert!(result.is_err_and(|e| e.to_string().contains("no-such-entry")));
}

#[tokio::test]
async fn actions_read_one_snapshot() {
    let server = failing_backend(1).await;
    let store = store_for(&server);

    print_entity_actions(&store, "ui-active-map").await;

    server.verify().await;
}
