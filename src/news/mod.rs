//! Clients for the third-party news services.
//!
//! Both clients degrade instead of failing: every outcome is a
//! [`NewsResponse`], with `error` set when something went wrong.

pub mod headlines;
pub mod state;

pub use headlines::{Article, HeadlineClient};
pub use state::StateNewsClient;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsResponse<T> {
    pub news: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> NewsResponse<T> {
    #[inline]
    pub fn ok(news: Vec<T>) -> Self {
        Self { news, error: None }
    }

    #[inline]
    pub fn failed(news: Vec<T>, error: impl Into<String>) -> Self {
        Self {
            news,
            error: Some(error.into()),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
