
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::entity::{KnowledgeCollection, KnowledgeEntity};
use super::fallback::fallback_collection;
use super::source::{HttpKnowledgeSource, KnowledgeSource};
use crate::Result;
use crate::config::ApiConfig;

#[derive(Debug, Clone)]
struct FetchOutcome {
    collection: Arc<KnowledgeCollection>,
    /// False when the source failed and the fallback was substituted
    from_source: bool,
}

type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct StoreState {
    cache: Option<Arc<KnowledgeCollection>>,
    in_flight: Option<InFlight>,
    next_fetch_id: u64,
}

/// Session-scoped cache in front of a [`KnowledgeSource`].
///
/// At most one fetch is outstanding at a time: callers arriving while a fetch
/// is running await the same shared result. A successful fetch is cached until
/// [`invalidate`](Self::invalidate) is called. A failed fetch resolves to the
/// fallback collection for everyone waiting on it, but is not cached.
pub struct KnowledgeStore {
    source: Arc<dyn KnowledgeSource>,
    fallback: Arc<KnowledgeCollection>,
    state: Mutex<StoreState>,
}

impl std::fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("KnowledgeStore")
            .field("cached", &state.cache.as_ref().map(|c| c.len()))
            .field("fetch_in_flight", &state.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl KnowledgeStore {
    #[inline]
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            source,
            fallback: Arc::new(fallback_collection()),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Store backed by the HTTP knowledge endpoint described by `api`
    #[inline]
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let source = HttpKnowledgeSource::new(api)?;
        Ok(Self::new(Arc::new(source)))
    }

    /// Replace the bundled fallback dataset
    #[inline]
    pub fn with_fallback(mut self, fallback: KnowledgeCollection) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The full collection, fetching it only when nothing is cached or in flight
    #[inline]
    pub async fn get_all(&self) -> Arc<KnowledgeCollection> {
        let (id, fetch) = {
            let mut state = self.lock_state();

            if let Some(in_flight) = &state.in_flight {
                debug!("Joining in-flight knowledge fetch {}", in_flight.id);
                (in_flight.id, in_flight.fetch.clone())
            } else if let Some(cache) = &state.cache {
                return Arc::clone(cache);
            } else {
                let id = state.next_fetch_id;
                state.next_fetch_id += 1;

                let fetch = self.start_fetch(id);
                state.in_flight = Some(InFlight {
                    id,
                    fetch: fetch.clone(),
                });
                (id, fetch)
            }
        };

        let outcome = fetch.await;
        self.complete_fetch(id, &outcome);
        outcome.collection
    }

    fn start_fetch(&self, id: u64) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let fallback = Arc::clone(&self.fallback);

        async move {
            info!("Fetching knowledge collection (fetch {})", id);
            match source.fetch_collection().await {
                Ok(collection) => {
                    info!("Loaded {} knowledge entries", collection.len());
                    FetchOutcome {
                        collection: Arc::new(collection),
                        from_source: true,
                    }
                }
                Err(e) => {
                    warn!("Failed to fetch knowledge, using fallback data: {}", e);
                    FetchOutcome {
                        collection: fallback,
                        from_source: false,
                    }
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Clear the in-flight marker and cache a successful result, unless the
    /// fetch was superseded by an invalidation in the meantime
    fn complete_fetch(&self, id: u64, outcome: &FetchOutcome) {
        let mut state = self.lock_state();

        let is_current = state.in_flight.as_ref().is_some_and(|f| f.id == id);
        if !is_current {
            return;
        }

        state.in_flight = None;
        if outcome.from_source {
            state.cache = Some(Arc::clone(&outcome.collection));
        }
    }

    #[inline]
    pub async fn get_by_id(&self, id: &str) -> Option<KnowledgeEntity> {
        self.get_all().await.get(id).cloned()
    }

    #[inline]
    pub async fn get_by_tag(&self, tag: &str) -> Vec<KnowledgeEntity> {
        self.get_all()
            .await
            .by_tag(tag)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Entities carrying any of `tags`
    #[inline]
    pub async fn get_by_any_tag<S: AsRef<str> + Sync>(
        &self,
        tags: &[S],
    ) -> Vec<KnowledgeEntity> {
        self.get_all()
            .await
            .with_any_tag(tags)
            .into_iter()
            .cloned()
            .collect()
    }

    #[inline]
    pub async fn search(&self, query: &str) -> Vec<KnowledgeEntity> {
        self.get_all()
            .await
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    #[inline]
    pub async fn all_entities(&self) -> Vec<KnowledgeEntity> {
        self.get_all().await.entities().cloned().collect()
    }

    /// Drop the cached collection and forget any in-flight fetch.
    ///
    /// Must be called after writing knowledge through another channel; the
    /// store has no push notification of changes.
    #[inline]
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        state.cache = None;
        state.in_flight = None;
        debug!("Knowledge cache invalidated");
    }

    /// Invalidate and fetch again
    #[inline]
    pub async fn refresh(&self) -> Arc<KnowledgeCollection> {
        self.invalidate();
        self.get_all().await
    }

    #[inline]
    pub fn is_cached(&self) -> bool {
        self.lock_state().cache.is_some()
    }
}
