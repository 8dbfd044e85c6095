//! In-memory backend for testing without a running API.
//!
//! Serves journeys and stations from memory (or from JSON files on disk)
//! and mimics the backend's sorting, month filtering and aggregates. Every
//! call is counted per endpoint so tests can assert on fetch behaviour.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Datelike;

use crate::domain::{Journey, MonthSelection, Station, StationId, StationKey};
use crate::journeys::{SortColumn, SortOrder};

use super::backend::{Backend, Direction};
use super::error::ApiError;
use super::types::{JourneyDto, StationDto};

/// Endpoint names used for call counting and failure injection.
pub mod endpoint {
    pub const JOURNEYS_COUNT: &str = "journeysCount";
    pub const JOURNEYS: &str = "journeys";
    pub const JOURNEY: &str = "journey";
    pub const STATIONS: &str = "stations";
    pub const STATION: &str = "station";
    pub const TOTAL_JOURNEYS: &str = "totalJourneys";
    pub const AVERAGE_DISTANCE: &str = "averageDistance";
    pub const TOP5: &str = "top5";
}

#[derive(Default)]
struct MockState {
    calls: HashMap<&'static str, usize>,
    failing: HashSet<&'static str>,
    /// Length of the last journey list served; the count endpoint reports it.
    last_served: Option<usize>,
}

/// Mock backend holding its data in memory.
#[derive(Clone)]
pub struct MockBackend {
    stations: Arc<Vec<Station>>,
    journeys: Arc<Vec<Journey>>,
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new(stations: Vec<Station>, journeys: Vec<Journey>) -> Self {
        Self {
            stations: Arc::new(stations),
            journeys: Arc::new(journeys),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Load `stations.json` and `journeys.json` from a directory.
    ///
    /// Both files use the backend's wire format.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, ApiError> {
        let data_dir = data_dir.as_ref();

        let stations: Vec<StationDto> = read_json(&data_dir.join("stations.json"))?;
        let journeys: Vec<JourneyDto> = read_json(&data_dir.join("journeys.json"))?;

        Ok(Self::new(
            stations.into_iter().map(Station::from).collect(),
            journeys.into_iter().map(Journey::from).collect(),
        ))
    }

    /// Number of calls made to an endpoint (see [`endpoint`]).
    pub fn calls(&self, endpoint: &str) -> usize {
        self.lock().calls.get(endpoint).copied().unwrap_or(0)
    }

    /// Make every subsequent call to `endpoint` fail with a 503.
    pub fn set_failing(&self, endpoint: &'static str, failing: bool) {
        let mut state = self.lock();
        if failing {
            state.failing.insert(endpoint);
        } else {
            state.failing.remove(endpoint);
        }
    }

    pub fn station_list(&self) -> &[Station] {
        &self.stations
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test may poison the lock; the counters stay usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call and apply failure injection.
    fn enter(&self, endpoint: &'static str) -> Result<(), ApiError> {
        let mut state = self.lock();
        *state.calls.entry(endpoint).or_insert(0) += 1;

        if state.failing.contains(endpoint) {
            return Err(ApiError::Api {
                status: 503,
                message: format!("mock endpoint {} is failing", endpoint),
            });
        }

        Ok(())
    }

    fn find_station(&self, key: StationKey) -> Result<&Station, ApiError> {
        self.stations
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| ApiError::NotFound {
                message: format!("Cannot find Station with an id {}", key),
            })
    }

    fn station_by_id(&self, id: &StationId) -> Option<&Station> {
        self.stations.iter().find(|s| &s.station_id == id)
    }

    /// Journeys departing in one of the selected months. Three or more
    /// months means no filtering at all.
    fn in_months<'a>(&'a self, months: &'a MonthSelection) -> impl Iterator<Item = &'a Journey> + 'a {
        let numbers = months.numbers();
        let unfiltered = numbers.len() >= 3;
        self.journeys.iter().filter(move |j| {
            unfiltered
                || j.departure_date
                    .is_some_and(|d| numbers.contains(&(d.month() as u8)))
        })
    }

    fn compare_by_station(&self, a: &StationId, b: &StationId) -> Ordering {
        match (self.station_by_id(a), self.station_by_id(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.name.cmp(&y.name),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let json = std::fs::read_to_string(path).map_err(|e| ApiError::Api {
        status: 0,
        message: format!("Failed to read {:?}: {}", path, e),
    })?;

    serde_json::from_str(&json).map_err(|e| ApiError::Json {
        message: format!("Failed to parse {:?}: {}", path, e),
        body: None,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Backend for MockBackend {
    async fn journeys_count(&self) -> Result<u64, ApiError> {
        self.enter(endpoint::JOURNEYS_COUNT)?;
        let served = self.lock().last_served;
        Ok(served.unwrap_or(self.journeys.len()) as u64)
    }

    async fn journeys(
        &self,
        sort: Option<SortOrder>,
        months: &MonthSelection,
    ) -> Result<Vec<Journey>, ApiError> {
        self.enter(endpoint::JOURNEYS)?;

        let mut journeys: Vec<Journey> = self.in_months(months).cloned().collect();

        match sort {
            None => journeys.reverse(),
            Some(order) => {
                match order.column {
                    SortColumn::Departure => journeys.sort_by(|a, b| {
                        self.compare_by_station(&a.departure_station_id, &b.departure_station_id)
                    }),
                    SortColumn::Return => journeys.sort_by(|a, b| {
                        self.compare_by_station(&a.return_station_id, &b.return_station_id)
                    }),
                    SortColumn::Distance => {
                        journeys.sort_by(|a, b| a.covered_distance.total_cmp(&b.covered_distance))
                    }
                    SortColumn::Duration => journeys.sort_by_key(|j| j.journey_duration),
                }
                if order.descending {
                    journeys.reverse();
                }
            }
        }

        self.lock().last_served = Some(journeys.len());
        Ok(journeys)
    }

    async fn journey(&self, id: u64) -> Result<Journey, ApiError> {
        self.enter(endpoint::JOURNEY)?;
        self.journeys
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                message: format!("Cannot find BicycleJourney with an id {}", id),
            })
    }

    async fn stations(&self) -> Result<Vec<Station>, ApiError> {
        // Suspend once, like a real request, so overlapping callers interleave
        tokio::task::yield_now().await;
        self.enter(endpoint::STATIONS)?;
        Ok(self.stations.as_ref().clone())
    }

    async fn station(&self, key: StationKey) -> Result<Station, ApiError> {
        self.enter(endpoint::STATION)?;
        self.find_station(key).cloned()
    }

    async fn total_journeys(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<u64, ApiError> {
        self.enter(endpoint::TOTAL_JOURNEYS)?;
        let station = self.find_station(key)?;

        let total = self
            .in_months(months)
            .filter(|j| match direction {
                Direction::From => j.departure_station_id == station.station_id,
                Direction::To => j.return_station_id == station.station_id,
            })
            .count();

        Ok(total as u64)
    }

    async fn average_distance(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<f64, ApiError> {
        self.enter(endpoint::AVERAGE_DISTANCE)?;
        let station = self.find_station(key)?;

        let distances: Vec<f64> = self
            .in_months(months)
            .filter(|j| match direction {
                Direction::From => j.departure_station_id == station.station_id,
                Direction::To => j.return_station_id == station.station_id,
            })
            .map(|j| j.covered_distance)
            .collect();

        if distances.is_empty() {
            return Ok(0.0);
        }

        let mean = distances.iter().sum::<f64>() / distances.len() as f64;
        Ok(round2(mean / 1000.0))
    }

    async fn top5_stations(
        &self,
        key: StationKey,
        direction: Direction,
        months: &MonthSelection,
    ) -> Result<Vec<Station>, ApiError> {
        self.enter(endpoint::TOP5)?;
        let station = self.find_station(key)?;

        let mut counts: HashMap<&StationId, usize> = HashMap::new();
        for journey in self.in_months(months) {
            let counterpart = match direction {
                Direction::From if journey.departure_station_id == station.station_id => {
                    &journey.return_station_id
                }
                Direction::To if journey.return_station_id == station.station_id => {
                    &journey.departure_station_id
                }
                _ => continue,
            };
            *counts.entry(counterpart).or_insert(0) += 1;
        }

        // Only stations the directory knows about take part (inner join)
        let mut ranked: Vec<(&Station, usize)> = counts
            .into_iter()
            .filter_map(|(id, n)| self.station_by_id(id).map(|s| (s, n)))
            .collect();
        ranked.sort_by(|(a, na), (b, nb)| nb.cmp(na).then_with(|| a.name.cmp(&b.name)));

        Ok(ranked.into_iter().take(5).map(|(s, _)| s.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn station(key: u32, id: &str, name: &str) -> Station {
        Station {
            key: StationKey::new(key),
            station_id: StationId::new(id),
            name: name.to_string(),
            address: String::new(),
            x: 0.0,
            y: 0.0,
        }
    }

    fn journey(id: u64, month: u32, dep: &str, ret: &str, meters: f64, secs: u64) -> Journey {
        let date = NaiveDate::from_ymd_opt(2021, month, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Journey {
            id,
            departure_date: Some(date),
            return_date: Some(date),
            departure_station_id: StationId::new(dep),
            return_station_id: StationId::new(ret),
            covered_distance: meters,
            journey_duration: secs,
        }
    }

    fn backend() -> MockBackend {
        MockBackend::new(
            vec![
                station(1, "001", "Kaivopuisto"),
                station(2, "002", "Laivasillankatu"),
                station(3, "003", "Arabiankatu"),
            ],
            vec![
                journey(1, 5, "001", "002", 1000.0, 300),
                journey(2, 6, "001", "003", 3000.0, 100),
                journey(3, 7, "002", "001", 2000.0, 200),
                journey(4, 5, "001", "002", 2000.0, 400),
            ],
        )
    }

    #[tokio::test]
    async fn unsorted_is_reversed() {
        let mock = backend();
        let journeys = mock.journeys(None, &MonthSelection::all()).await.unwrap();
        let ids: Vec<u64> = journeys.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn sort_and_filter() {
        let mock = backend();
        let june_july = MonthSelection::from_numbers(&[6, 7]).unwrap();

        let journeys = mock
            .journeys(Some(SortOrder::desc(SortColumn::Distance)), &june_july)
            .await
            .unwrap();
        let ids: Vec<u64> = journeys.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let journeys = mock
            .journeys(Some(SortOrder::asc(SortColumn::Return)), &MonthSelection::all())
            .await
            .unwrap();
        let names: Vec<&str> = journeys
            .iter()
            .map(|j| j.return_station_id.as_str())
            .collect();
        // Arabiankatu, Kaivopuisto, Laivasillankatu, Laivasillankatu
        assert_eq!(names, vec!["003", "001", "002", "002"]);
    }

    #[tokio::test]
    async fn count_tracks_last_served_list() {
        let mock = backend();
        assert_eq!(mock.journeys_count().await.unwrap(), 4);

        let may = MonthSelection::from_numbers(&[5]).unwrap();
        mock.journeys(None, &may).await.unwrap();
        assert_eq!(mock.journeys_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn aggregates() {
        let mock = backend();
        let all = MonthSelection::all();
        let key = StationKey::new(1);

        assert_eq!(mock.total_journeys(key, Direction::From, &all).await.unwrap(), 3);
        assert_eq!(mock.total_journeys(key, Direction::To, &all).await.unwrap(), 1);
        assert_eq!(mock.average_distance(key, Direction::From, &all).await.unwrap(), 2.0);

        let top = mock.top5_stations(key, Direction::From, &all).await.unwrap();
        let names: Vec<&str> = top.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Laivasillankatu", "Arabiankatu"]);
    }

    #[tokio::test]
    async fn unknown_station_is_not_found() {
        let mock = backend();
        let err = mock.station(StationKey::new(99)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: Cannot find Station with an id 99");
    }

    #[tokio::test]
    async fn counts_calls_and_injects_failures() {
        let mock = backend();
        mock.stations().await.unwrap();
        mock.stations().await.unwrap();
        assert_eq!(mock.calls(endpoint::STATIONS), 2);
        assert_eq!(mock.calls(endpoint::JOURNEYS), 0);

        mock.set_failing(endpoint::STATIONS, true);
        assert!(mock.stations().await.is_err());
        assert_eq!(mock.calls(endpoint::STATIONS), 3);

        mock.set_failing(endpoint::STATIONS, false);
        assert!(mock.stations().await.is_ok());
    }

    #[tokio::test]
    async fn load_sample_data() {
        let mock = MockBackend::from_dir("data/mock").unwrap();
        assert!(!mock.station_list().is_empty());

        let journeys = mock.journeys(None, &MonthSelection::all()).await.unwrap();
        assert!(!journeys.is_empty());
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        assert!(MockBackend::from_dir("/nonexistent/mock").is_err());
    }
}
