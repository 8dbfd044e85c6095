//! The backend seam.
//!
//! Caches and controllers are generic over [`Backend`] so they can run
//! against the real HTTP client or the in-memory [`MockBackend`].
//!
//! [`MockBackend`]: super::MockBackend

use crate::domain::{Journey, MonthSelection, Station, StationKey};
use crate::journeys::SortOrder;

use super::error::ApiError;

/// Which side of a station an aggregate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Journeys departing from the station
    From,
    /// Journeys returning to the station
    To,
}

impl Direction {
    pub fn total_path(&self) -> &'static str {
        match self {
            Direction::From => "totalJourneysFrom/",
            Direction::To => "totalJourneysTo/",
        }
    }

    pub fn average_path(&self) -> &'static str {
        match self {
            Direction::From => "averageDistanceFrom/",
            Direction::To => "averageDistanceTo/",
        }
    }

    /// For `From`, the most common return stations of journeys starting
    /// here; for `To`, the most common departure stations of journeys
    /// ending here.
    pub fn top5_path(&self) -> &'static str {
        match self {
            Direction::From => "top5ReturnStationsStartingFrom/",
            Direction::To => "top5DepartureStationsEndingAt/",
        }
    }
}

/// Source of journey and station data.
///
/// Month selections passed in are already effective (never empty).
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Total journey count as reported by the backend.
    async fn journeys_count(&self) -> Result<u64, ApiError>;

    /// Full journey list for a sort order and month filter.
    async fn journeys(
        &self,
        sort: Option<SortOrder>,
        months: &MonthSelection,
    ) -> Result<Vec<Journey>, ApiError>;

    /// A single journey by id.
    async fn journey(&self, id: u64) -> Result<Journey, ApiError>;

    /// Every station.
    async fn stations(&self) -> Result<Vec<Station>, ApiError>;

    /// A single station by primary key.
    async fn station(&self, key: StationKey) -> Result<Station, ApiError>;

    /// Number of journeys from or to a station.
    async fn total_journeys(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<u64, ApiError>;

    /// Average covered distance in kilometers (two decimals).
    async fn average_distance(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<f64, ApiError>;

    /// Up to five most popular counterpart stations.
    async fn top5_stations(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<Vec<Station>, ApiError>;
}

impl<T: Backend> Backend for &T {
    async fn journeys_count(&self) -> Result<u64, ApiError> {
        (**self).journeys_count().await
    }

    async fn journeys(
        &self,
        sort: Option<SortOrder>,
        months: &MonthSelection,
    ) -> Result<Vec<Journey>, ApiError> {
        (**self).journeys(sort, months).await
    }

    async fn journey(&self, id: u64) -> Result<Journey, ApiError> {
        (**self).journey(id).await
    }

    async fn stations(&self) -> Result<Vec<Station>, ApiError> {
        (**self).stations().await
    }

    async fn station(&self, key: StationKey) -> Result<Station, ApiError> {
        (**self).station(key).await
    }

    async fn total_journeys(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<u64, ApiError> {
        (**self).total_journeys(key, direction, months).await
    }

    async fn average_distance(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<f64, ApiError> {
        (**self).average_distance(key, direction, months).await
    }

    async fn top5_stations(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<Vec<Station>, ApiError> {
        (**self).top5_stations(key, direction, months).await
    }
}
