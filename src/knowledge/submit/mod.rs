#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::Agent;
use url::Url;

use super::store::KnowledgeStore;
use crate::config::ApiConfig;
use crate::{PortalError, Result};

const REJECTED_MESSAGE: &str = "Invalid data provided. Your provided data is faulty.";
const GENERIC_FAILURE: &str = "Failed to add knowledge entry";
const CONNECTION_FAILURE: &str = "Failed to connect to server. Is the API running?";

/// Body of `POST /api/knowledge/validate-add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeSubmission {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl KnowledgeSubmission {
    #[inline]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// All three fields are required before anything is sent
    #[inline]
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(PortalError::Submission(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// HTTP 200; the store has been invalidated
    Added,
    /// HTTP 205; the backend's validator refused the entry
    Rejected,
    /// Any other status or a transport failure
    Failed(String),
}

impl SubmissionOutcome {
    /// User-facing notification text
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Self::Added => "Knowledge entry added successfully!",
            Self::Rejected => REJECTED_MESSAGE,
            Self::Failed(message) => message,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Added)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Send a new entry to the backend validator.
///
/// On success the store cache is invalidated so the next read includes the
/// new entry. Only local validation problems are returned as errors; every
/// server-side outcome is a [`SubmissionOutcome`].
#[inline]
pub async fn submit_knowledge(
    api: &ApiConfig,
    store: &KnowledgeStore,
    submission: &KnowledgeSubmission,
) -> Result<SubmissionOutcome> {
    submission.validate()?;

    let url = api.validate_add_url()?;
    let body = serde_json::to_string(submission)
        .map_err(|e| PortalError::Submission(format!("failed to encode submission: {}", e)))?;
    let timeout = Duration::from_secs(api.timeout_seconds);

    info!("Submitting knowledge entry \"{}\"", submission.title);

    let outcome = tokio::task::spawn_blocking(move || post_submission(&url, &body, timeout))
        .await
        .map_err(|e| PortalError::Network(format!("submission task failed: {}", e)))?;

    if outcome.is_success() {
        store.invalidate();
    }

    Ok(outcome)
}

fn post_submission(url: &Url, body: &str, timeout: Duration) -> SubmissionOutcome {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into();

    let mut response = match agent
        .post(url.as_str())
        .header("Content-Type", "application/json")
        .send(body)
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Knowledge submission to {} failed: {}", url, e);
            return SubmissionOutcome::Failed(CONNECTION_FAILURE.to_string());
        }
    };

    let status = response.status().as_u16();
    debug!("Knowledge submission answered with HTTP {}", status);

    match status {
        200 => SubmissionOutcome::Added,
        205 => SubmissionOutcome::Rejected,
        _ => {
            let message = response
                .body_mut()
                .read_to_string()
                .ok()
                .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
                .and_then(|body| body.message)
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!("Knowledge submission failed with HTTP {}: {}", status, message);
            SubmissionOutcome::Failed(message)
        }
    }
}
