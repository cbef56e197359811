
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::Agent;
use url::Url;

use super::NewsResponse;
use crate::config::NewsConfig;

const DEFAULT_KEYWORDS: &str = "india";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub source: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    status: Option<String>,
    message: Option<String>,
    articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<RawSource>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            description: raw.description,
            url: raw.url.unwrap_or_default(),
            source: raw
                .source
                .and_then(|s| s.name)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            published_at: raw.published_at,
        }
    }
}

/// Searches a news API for articles published on a given day
#[derive(Debug, Clone)]
pub struct HeadlineClient {
    endpoint: String,
    api_key: Option<String>,
    max_articles: usize,
    agent: Agent,
}

impl HeadlineClient {
    #[inline]
    pub fn new(config: &NewsConfig, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            max_articles: config.max_articles,
            agent,
        }
    }

    /// Articles about `keywords` (default "india") published on `date`
    #[inline]
    pub async fn search(&self, date: &str, keywords: Option<&str>) -> NewsResponse<Article> {
        let Some(api_key) = self.api_key.clone() else {
            return NewsResponse::failed(Vec::new(), "NEWS_API_KEY not configured");
        };

        let date = date.trim();
        if date.is_empty() {
            return NewsResponse::failed(Vec::new(), "Date is required");
        }
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return NewsResponse::failed(Vec::new(), "Date must be in YYYY-MM-DD format");
        }

        let keywords = keywords
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(DEFAULT_KEYWORDS);

        let url = match search_url(&self.endpoint, keywords, date, &api_key) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid news endpoint {}: {}", self.endpoint, e);
                return NewsResponse::failed(Vec::new(), "Failed to fetch news");
            }
        };

        info!("Searching news for \"{}\" on {}", keywords, date);

        let agent = self.agent.clone();
        let body = match tokio::task::spawn_blocking(move || fetch_search(&agent, &url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                warn!("News fetch failed: {}", e);
                return NewsResponse::failed(Vec::new(), "Failed to fetch news");
            }
            Err(e) => {
                warn!("News fetch task failed: {}", e);
                return NewsResponse::failed(Vec::new(), "Failed to fetch news");
            }
        };

        self.interpret(body)
    }

    fn interpret(&self, body: SearchBody) -> NewsResponse<Article> {
        if body.status.as_deref() == Some("error") {
            let message = body.message.unwrap_or_else(|| "API error".to_string());
            warn!("News API returned an error: {}", message);
            return NewsResponse::failed(Vec::new(), message);
        }

        match body.articles {
            Some(articles) => {
                let news: Vec<Article> = articles
                    .into_iter()
                    .take(self.max_articles)
                    .map(Article::from)
                    .collect();
                debug!("News API returned {} articles", news.len());
                NewsResponse::ok(news)
            }
            None => NewsResponse::failed(Vec::new(), "No articles found"),
        }
    }
}

fn search_url(
    endpoint: &str,
    keywords: &str,
    date: &str,
    api_key: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("q", keywords)
        .append_pair("from", date)
        .append_pair("to", date)
        .append_pair("sortBy", "relevancy")
        .append_pair("language", "en")
        .append_pair("apiKey", api_key);
    Ok(url)
}

fn fetch_search(agent: &Agent, url: &Url) -> anyhow::Result<SearchBody> {
    let mut response = agent.get(url.as_str()).call()?;
    let text = response.body_mut().read_to_string()?;
    Ok(serde_json::from_str(&text)?)
}
