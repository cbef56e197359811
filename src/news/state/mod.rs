
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use ureq::Agent;
use url::Url;

use super::NewsResponse;
use crate::config::GeminiConfig;
use crate::geo::find_state;

const MISSING_KEY_HEADLINES: [&str; 2] = [
    "Gemini API Key not configured.",
    "Unable to fetch real-time news.",
];
const FAILED_HEADLINE: &str = "Failed to fetch updated news.";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Clone)]
struct CachedHeadlines {
    fetched_at: Instant,
    headlines: Vec<String>,
}

/// Asks a generative-language model for recent headlines about a state.
///
/// Successful answers are cached per state for the configured TTL. Known
/// states are keyed by canonical name, so "kerala" and "Kerala" share an
/// entry; expired entries are dropped whenever a new answer is stored.
#[derive(Debug)]
pub struct StateNewsClient {
    config: GeminiConfig,
    agent: Agent,
    cache: Mutex<HashMap<String, CachedHeadlines>>,
}

impl StateNewsClient {
    #[inline]
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            config: config.clone(),
            agent,
            cache: Mutex::new(HashMap::new()),
        }
    }

    #[inline]
    pub async fn headlines(&self, state: &str) -> NewsResponse<String> {
        let state = state.trim();
        if state.is_empty() {
            return NewsResponse::failed(Vec::new(), "State is required");
        }
        let state = find_state(state).map_or(state, |info| info.name);

        let Some(api_key) = self
            .config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
        else {
            return NewsResponse::failed(
                MISSING_KEY_HEADLINES.iter().map(|s| (*s).to_string()).collect(),
                "API Key missing",
            );
        };

        if let Some(cached) = self.cached(state) {
            debug!("Using cached headlines for {}", state);
            return NewsResponse::ok(cached);
        }

        match self.fetch(state, &api_key).await {
            Some(headlines) => {
                self.store(state, &headlines);
                NewsResponse::ok(headlines)
            }
            None => NewsResponse::ok(vec![FAILED_HEADLINE.to_string()]),
        }
    }

    /// Drop every cached answer
    #[inline]
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl_seconds)
    }

    fn cached(&self, state: &str) -> Option<Vec<String>> {
        let ttl = self.ttl();
        let cache = self.cache.lock().ok()?;
        cache
            .get(state)
            .filter(|entry| entry.fetched_at.elapsed() < ttl)
            .map(|entry| entry.headlines.clone())
    }

    fn store(&self, state: &str, headlines: &[String]) {
        let ttl = self.ttl();
        if let Ok(mut cache) = self.cache.lock() {
            cache.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
            cache.insert(
                state.to_string(),
                CachedHeadlines {
                    fetched_at: Instant::now(),
                    headlines: headlines.to_vec(),
                },
            );
        }
    }

    async fn fetch(&self, state: &str, api_key: &str) -> Option<Vec<String>> {
        let mut url = match self.config.generate_url() {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid generative-language endpoint: {}", e);
                return None;
            }
        };
        url.query_pairs_mut().append_pair("key", api_key);

        info!("Requesting headlines for {}", state);

        let agent = self.agent.clone();
        let body = json!({ "contents": [{ "parts": [{ "text": prompt(state) }] }] }).to_string();

        match tokio::task::spawn_blocking(move || generate(&agent, &url, &body)).await {
            Ok(Ok(headlines)) => {
                debug!("Received {} headlines for {}", headlines.len(), state);
                Some(headlines)
            }
            Ok(Err(e)) => {
                warn!("Headline request for {} failed: {}", state, e);
                None
            }
            Err(e) => {
                warn!("Headline task for {} failed: {}", state, e);
                None
            }
        }
    }
}

fn prompt(state: &str) -> String {
    format!(
        "Find and summarize 3 recent and important news headlines specifically for the Indian state of \"{}\" from the last week.\n\
         Focus on development, culture, or major events.\n\
         Return ONLY a JSON array of strings, e.g., [\"Headline 1\", \"Headline 2\", \"Headline 3\"].\n\
         Do not keep any markdown formatting.",
        state
    )
}

fn generate(agent: &Agent, url: &Url, body: &str) -> anyhow::Result<Vec<String>> {
    let mut response = agent
        .post(url.as_str())
        .header("Content-Type", "application/json")
        .send(body)?;
    let text = response.body_mut().read_to_string()?;
    let answer = serde_json::from_str::<GenerateResponse>(&text)?
        .first_text()
        .ok_or_else(|| anyhow::anyhow!("response carried no text"))?;

    parse_headlines(&answer)
}

/// Parse a model answer as a JSON string array, ignoring markdown code fences
pub(crate) fn parse_headlines(answer: &str) -> anyhow::Result<Vec<String>> {
    let cleaned = answer.replace("```json", "").replace("```", "");
    Ok(serde_json::from_str(cleaned.trim())?)
}
