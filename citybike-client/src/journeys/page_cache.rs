//! Journey page cache.
//!
//! Holds the last downloaded journey list together with the query key it
//! was fetched for. A page request for the same key is served from
//! memory; any other key replaces the list with a full download.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::{ApiError, Backend};
use crate::domain::{Journey, JourneyPage, JourneyView};
use crate::stations::StationDirectory;

use super::query::{PageRequest, QueryKey, clamp_page_index, page_bounds};

#[derive(Default)]
struct CacheState {
    journeys: Arc<Vec<Journey>>,
    key: Option<QueryKey>,
    count: u64,
    fetches: usize,
}

impl CacheState {
    fn needs_fetch(&self, key: &QueryKey) -> bool {
        match &self.key {
            None => true,
            Some(cached) => self.journeys.is_empty() || !cached.matches(key),
        }
    }
}

/// Exact-match cache over the journey listing.
pub struct JourneyPageCache<B> {
    backend: B,
    state: Mutex<CacheState>,
}

impl<B: Backend> JourneyPageCache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Serve one page of journeys, joined against the station directory.
    ///
    /// The journey list is downloaded only when the sort path or the
    /// effective months differ from the cached key, or when the cached list
    /// is empty. A page index past the end is pulled back to
    /// `len / page_size`. The backend count is fetched on every call.
    pub async fn get_page<S: Backend>(
        &self,
        request: &PageRequest,
        stations: &StationDirectory<S>,
    ) -> Result<JourneyPage, ApiError> {
        if request.page_size == 0 {
            return Err(ApiError::invalid_input("page size must be at least 1"));
        }

        let key = QueryKey::new(request.sort, &request.months);

        // Held across the download so identical concurrent requests fetch once
        let mut state = self.state.lock().await;

        if state.needs_fetch(&key) {
            let journeys = self.backend.journeys(request.sort, &key.months).await?;
            info!(
                path = %key.path,
                months = %key.months,
                journeys = journeys.len(),
                "fetched journey list"
            );
            state.journeys = Arc::new(journeys);
            state.key = Some(key);
            state.fetches += 1;
        } else {
            debug!(path = %key.path, months = %key.months, "journey list cache hit");
        }

        let journeys = state.journeys.clone();
        let len = journeys.len();
        let page_index = clamp_page_index(request.page_index, request.page_size, len);
        if page_index != request.page_index {
            debug!(requested = request.page_index, page_index, len, "clamped page index");
        }
        let (start, end) = page_bounds(page_index, request.page_size, len);

        let snapshot = stations.load_all().await?;
        let directory = snapshot.as_ref();
        let items = journeys[start..end]
            .iter()
            .map(|journey| JourneyView::resolve(journey, |id| directory.get(id)))
            .collect();

        let count = self.backend.journeys_count().await?;
        state.count = count;

        Ok(JourneyPage {
            count,
            page_index,
            available: len,
            items,
        })
    }

    /// Length of the cached journey list.
    pub async fn cached_len(&self) -> usize {
        self.state.lock().await.journeys.len()
    }

    /// Last count reported by the backend.
    pub async fn count(&self) -> u64 {
        self.state.lock().await.count
    }

    /// Number of journey-list downloads made so far.
    pub async fn fetch_count(&self) -> usize {
        self.state.lock().await.fetches
    }

    /// Forget the cached list; the next page request downloads again.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.journeys = Arc::new(Vec::new());
        state.key = None;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
