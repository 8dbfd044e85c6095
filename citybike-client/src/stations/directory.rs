//! In-memory station directory.
//!
//! The full station list is fetched once and kept for a staleness window
//! (24 hours by default). Journey listings resolve their station
//! references against this snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, info};

use crate::api::{ApiError, Backend};
use crate::domain::{Page, Station, StationId, StationKey};
use crate::journeys::page_bounds;

/// Stations per page in the station listing.
pub const STATION_PAGE_SIZE: usize = 25;

/// Default staleness window: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the station directory.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// How long a fetched station list stays valid.
    pub ttl: Duration,
}

impl DirectoryConfig {
    /// Set a custom staleness window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

/// One fetched station list with an index by external identifier.
#[derive(Debug, Clone, Default)]
pub struct StationSnapshot {
    stations: Vec<Station>,
    by_id: HashMap<StationId, usize>,
}

impl StationSnapshot {
    /// Build a snapshot; on duplicate identifiers the first station wins.
    pub fn new(stations: Vec<Station>) -> Self {
        let mut by_id = HashMap::with_capacity(stations.len());
        for (idx, station) in stations.iter().enumerate() {
            by_id.entry(station.station_id.clone()).or_insert(idx);
        }
        Self { stations, by_id }
    }

    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.by_id.get(id).map(|&idx| &self.stations[idx])
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Station directory backed by a single TTL-bound cache entry.
pub struct StationDirectory<B> {
    backend: B,
    snapshot: MokaCache<(), Arc<StationSnapshot>>,
}

impl<B: Backend> StationDirectory<B> {
    pub fn new(backend: B, config: &DirectoryConfig) -> Self {
        let snapshot = MokaCache::builder().time_to_live(config.ttl).build();

        Self { backend, snapshot }
    }

    /// The full station list, fetched at most once per staleness window.
    ///
    /// Concurrent callers that miss share a single fetch. A failed fetch is
    /// not cached; every waiting caller gets the same error.
    pub async fn load_all(&self) -> Result<Arc<StationSnapshot>, ApiError> {
        self.snapshot
            .try_get_with((), async {
                let stations = self.backend.stations().await?;
                let snapshot = Arc::new(StationSnapshot::new(stations));
                info!(stations = snapshot.len(), "loaded station directory");
                Ok::<_, ApiError>(snapshot)
            })
            .await
            .map_err(Arc::unwrap_or_clone)
    }

    /// Look up a station in the current snapshot without fetching.
    ///
    /// Returns `None` if nothing has been loaded yet or the identifier is
    /// unknown.
    pub async fn lookup_by_id(&self, id: &StationId) -> Option<Station> {
        let snapshot = self.snapshot.get(&()).await?;
        snapshot.get(id).cloned()
    }

    /// One page of the station listing, [`STATION_PAGE_SIZE`] per page.
    ///
    /// A page past the end is empty, not an error.
    pub async fn page(&self, page_index: usize) -> Result<Page<Station>, ApiError> {
        let snapshot = self.load_all().await?;
        let (start, end) = page_bounds(page_index, STATION_PAGE_SIZE, snapshot.len());
        debug!(page_index, start, end, "station page");

        Ok(Page {
            count: snapshot.len() as u64,
            items: snapshot.stations()[start..end].to_vec(),
        })
    }

    /// Fetch a single station by primary key. Always goes to the backend.
    pub async fn station(&self, key: StationKey) -> Result<Station, ApiError> {
        self.backend.station(key).await
    }

    /// Whether a snapshot is currently held.
    pub async fn is_loaded(&self) -> bool {
        self.snapshot.get(&()).await.is_some()
    }

    /// Drop the snapshot; the next [`load_all`](Self::load_all) refetches.
    pub fn invalidate(&self) {
        self.snapshot.invalidate_all();
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
