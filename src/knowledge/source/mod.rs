
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;
use url::Url;

use super::entity::KnowledgeCollection;
use super::payload::parse_collection;
use crate::config::ApiConfig;
use crate::{PortalError, Result};

/// Where the knowledge collection comes from.
///
/// Implementations report failures as errors; deciding what to do about a
/// failure (fallback data, logging) is the store's job.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn fetch_collection(&self) -> Result<KnowledgeCollection>;
}

/// Fetches `GET {base}/api/knowledge` over HTTP
#[derive(Debug, Clone)]
pub struct HttpKnowledgeSource {
    url: Url,
    agent: Agent,
}

impl HttpKnowledgeSource {
    #[inline]
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let url = api.knowledge_url()?;
        Ok(Self::with_url(
            url,
            Duration::from_secs(api.timeout_seconds),
        ))
    }

    #[inline]
    pub fn with_url(url: Url, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self { url, agent }
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl KnowledgeSource for HttpKnowledgeSource {
    async fn fetch_collection(&self) -> Result<KnowledgeCollection> {
        let agent = self.agent.clone();
        let url = self.url.clone();

        let body = tokio::task::spawn_blocking(move || fetch_body(&agent, &url))
            .await
            .map_err(|e| PortalError::Network(format!("knowledge fetch task failed: {}", e)))??;

        parse_collection(&body)
    }
}

fn fetch_body(agent: &Agent, url: &Url) -> Result<String> {
    debug!("Making HTTP GET request to: {}", url);

    match agent.get(url.as_str()).call() {
        Ok(mut response) => {
            let text = response.body_mut().read_to_string().map_err(|e| {
                PortalError::Network(format!("failed to read response body from {}: {}", url, e))
            })?;
            debug!("Read {} bytes from {}", text.len(), url);
            Ok(text)
        }
        Err(ureq::Error::StatusCode(status)) => {
            Err(PortalError::Network(format!("HTTP error {} from {}", status, url)))
        }
        Err(e) => Err(PortalError::Network(format!(
            "request to {} failed: {}",
            url, e
        ))),
    }
}
