use super::*;
use crate::knowledge::entity::{KnowledgeCollection, KnowledgeEntity};
use crate::knowledge::source::KnowledgeSource;
use async_trait::async_trait;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticSource;

#[async_trait]
impl KnowledgeSource for StaticSource {
    async fn fetch_collection(&self) -> Result<KnowledgeCollection> {
        Ok([KnowledgeEntity::new("a", "A")].into_iter().collect())
    }
}

fn api_for(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    }
}

fn submission() -> KnowledgeSubmission {
    KnowledgeSubmission::new("Rourkela Steel Plant", "Built with German help", "Economy")
}

async fn warm_store() -> KnowledgeStore {
    let store = KnowledgeStore::new(Arc::new(StaticSource));
    store.get_all().await;
    assert!(store.is_cached());
    store
}

#[test]
fn empty_fields_are_rejected_locally() {
    let missing = KnowledgeSubmission::new("Title", "  ", "Economy");
    assert!(matches!(
        missing.validate(),
        Err(PortalError::Submission(msg)) if msg.contains("description")
    ));
    assert!(submission().validate().is_ok());
}

#[tokio::test]
async fn success_invalidates_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge/validate-add"))
        .and(body_json(serde_json::json!({
            "title": "Rourkela Steel Plant",
            "description": "Built with German help",
            "category": "Economy"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = warm_store().await;
    let outcome = submit_knowledge(&api_for(&server), &store, &submission())
        .await
        .expect("submission should run");

    assert_eq!(outcome, SubmissionOutcome::Added);
    assert!(!store.is_cached());
}

#[tokio::test]
async fn reset_content_means_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge/validate-add"))
        .respond_with(ResponseTemplate::new(205))
        .mount(&server)
        .await;

    let store = warm_store().await;
    let outcome = submit_knowledge(&api_for(&server), &store, &submission())
        .await
        .expect("submission should run");

    assert_eq!(outcome, SubmissionOutcome::Rejected);
    assert_eq!(outcome.message(), REJECTED_MESSAGE);
    assert!(store.is_cached());
}

#[tokio::test]
async fn other_status_uses_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge/validate-add"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(serde_json::json!({"message": "Duplicate title"})),
        )
        .mount(&server)
        .await;

    let store = warm_store().await;
    let outcome = submit_knowledge(&api_for(&server), &store, &submission())
        .await
        .expect("submission should run");

    assert_eq!(outcome, SubmissionOutcome::Failed("Duplicate title".to_string()));
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn other_status_without_message_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge/validate-add"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = warm_store().await;
    let outcome = submit_knowledge(&api_for(&server), &store, &submission())
        .await
        .expect("submission should run");

    assert_eq!(outcome.message(), GENERIC_FAILURE);
}

#[tokio::test]
async fn unreachable_server_is_a_failed_outcome() {
    let api = ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 2,
    };
    let store = warm_store().await;
    let outcome = submit_knowledge(&api, &store, &submission())
        .await
        .expect("submission should run");

    assert_eq!(outcome.message(), CONNECTION_FAILURE);
    assert!(store.is_cached());
}
