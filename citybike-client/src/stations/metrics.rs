//! Per-station aggregate queries.
//!
//! Each query is one backend request; nothing here is cached.

use std::time::Duration;

use tracing::debug;

use crate::api::{ApiError, Backend, Direction};
use crate::domain::{MonthSelection, Station, StationKey, format_average_km};

/// Journey totals and average distances for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub total_from: u64,
    pub total_to: u64,
    /// Kilometers, two decimals
    pub avg_distance_from: f64,
    /// Kilometers, two decimals
    pub avg_distance_to: f64,
}

impl StationSummary {
    pub fn avg_from_display(&self) -> String {
        format_average_km(self.avg_distance_from)
    }

    pub fn avg_to_display(&self) -> String {
        format_average_km(self.avg_distance_to)
    }
}

/// Aggregate queries for a station, filtered by month.
///
/// Months are resolved to their effective value before being sent.
#[derive(Debug, Clone)]
pub struct StationMetrics<B> {
    backend: B,
}

impl<B: Backend> StationMetrics<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn total_journeys_from(
        &self,
        key: StationKey,
        months: &MonthSelection,
    ) -> Result<u64, ApiError> {
        self.backend
            .total_journeys(key, Direction::From, &months.effective())
            .await
    }

    pub async fn total_journeys_to(
        &self,
        key: StationKey,
        months: &MonthSelection,
    ) -> Result<u64, ApiError> {
        self.backend
            .total_journeys(key, Direction::To, &months.effective())
            .await
    }

    pub async fn avg_distance_from(
        &self,
        key: StationKey,
        months: &MonthSelection,
    ) -> Result<f64, ApiError> {
        self.backend
            .average_distance(key, Direction::From, &months.effective())
            .await
    }

    pub async fn avg_distance_to(
        &self,
        key: StationKey,
        months: &MonthSelection,
    ) -> Result<f64, ApiError> {
        self.backend
            .average_distance(key, Direction::To, &months.effective())
            .await
    }

    /// Most common return stations of journeys starting at `key`.
    pub async fn top5_return_stations_from(
        &self,
        key: StationKey,
        months: &MonthSelection,
    ) -> Result<Vec<Station>, ApiError> {
        self.backend
            .top5_stations(key, Direction::From, &months.effective())
            .await
    }

    /// Most common departure stations of journeys ending at `key`.
    pub async fn top5_departure_stations_to(
        &self,
        key: StationKey,
        months: &MonthSelection,
    ) -> Result<Vec<Station>, ApiError> {
        self.backend
            .top5_stations(key, Direction::To, &months.effective())
            .await
    }

    /// Fetch all four aggregates concurrently and combine them.
    ///
    /// Nothing is returned until every request has completed. The first
    /// error (in field order) fails the whole summary. With a `timeout`,
    /// waiting longer than that yields [`ApiError::Timeout`].
    pub async fn summary(
        &self,
        key: StationKey,
        months: &MonthSelection,
        timeout: Option<Duration>,
    ) -> Result<StationSummary, ApiError> {
        let fan_in = async {
            let (total_from, total_to, avg_from, avg_to) = futures::join!(
                self.total_journeys_from(key, months),
                self.total_journeys_to(key, months),
                self.avg_distance_from(key, months),
                self.avg_distance_to(key, months),
            );

            Ok::<_, ApiError>(StationSummary {
                total_from: total_from?,
                total_to: total_to?,
                avg_distance_from: avg_from?,
                avg_distance_to: avg_to?,
            })
        };

        let summary = match timeout {
            Some(limit) => tokio::time::timeout(limit, fan_in)
                .await
                .map_err(|_| ApiError::Timeout)??,
            None => fan_in.await?,
        };

        debug!(%key, months = %months.effective(), ?summary, "station summary");
        Ok(summary)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::api::mock::endpoint;
    use crate::domain::{Journey, StationId};
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

    fn journey(id: u64, month: u32, dep: &str, ret: &str, meters: f64) -> Journey {
        let date = NaiveDate::from_ymd_opt(2021, month, 3)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        Journey {
            id,
            departure_date: Some(date),
            return_date: Some(date),
            departure_station_id: StationId::new(dep),
            return_station_id: StationId::new(ret),
            covered_distance: meters,
            journey_duration: 600,
        }
    }

    fn metrics() -> (StationMetrics<MockBackend>, MockBackend) {
        let mock = MockBackend::new(
            vec![
                station(1, "010", "Töölöntori"),
                station(2, "020", "Ooppera"),
                station(3, "030", "Sibeliuksen puisto"),
            ],
            vec![
                journey(1, 5, "010", "020", 1500.0),
                journey(2, 6, "010", "020", 2500.0),
                journey(3, 6, "010", "030", 3000.0),
                journey(4, 7, "020", "010", 1234.0),
            ],
        );
        (StationMetrics::new(mock.clone()), mock)
    }

    #[tokio::test]
    async fn totals_and_averages() {
        let (metrics, _mock) = metrics();
        let key = StationKey::new(1);
        let all = MonthSelection::empty();

        assert_eq!(metrics.total_journeys_from(key, &all).await.unwrap(), 3);
        assert_eq!(metrics.total_journeys_to(key, &all).await.unwrap(), 1);
        assert_eq!(metrics.avg_distance_from(key, &all).await.unwrap(), 2.33);
        assert_eq!(metrics.avg_distance_to(key, &all).await.unwrap(), 1.23);
    }

    #[tokio::test]
    async fn month_filter_applies() {
        let (metrics, _mock) = metrics();
        let june = MonthSelection::from_numbers(&[6]).unwrap();
        let key = StationKey::new(1);

        assert_eq!(metrics.total_journeys_from(key, &june).await.unwrap(), 2);
        assert_eq!(metrics.avg_distance_from(key, &june).await.unwrap(), 2.75);
    }

    #[tokio::test]
    async fn top5_lists() {
        let (metrics, _mock) = metrics();
        let key = StationKey::new(1);
        let all = MonthSelection::all();

        let returns = metrics.top5_return_stations_from(key, &all).await.unwrap();
        let names: Vec<&str> = returns.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ooppera", "Sibeliuksen puisto"]);

        let departures = metrics.top5_departure_stations_to(key, &all).await.unwrap();
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].name, "Ooppera");
    }

    #[tokio::test]
    async fn each_query_is_one_request() {
        let (metrics, mock) = metrics();
        let key = StationKey::new(1);
        let all = MonthSelection::all();

        metrics.total_journeys_from(key, &all).await.unwrap();
        metrics.total_journeys_from(key, &all).await.unwrap();
        assert_eq!(mock.calls(endpoint::TOTAL_JOURNEYS), 2);
    }

    #[tokio::test]
    async fn summary_fans_in_all_four() {
        let (metrics, mock) = metrics();
        let summary = metrics
            .summary(StationKey::new(1), &MonthSelection::empty(), None)
            .await
            .unwrap();

        assert_eq!(
            summary,
            StationSummary {
                total_from: 3,
                total_to: 1,
                avg_distance_from: 2.33,
                avg_distance_to: 1.23,
            }
        );
        assert_eq!(summary.avg_from_display(), "2.33");
        assert_eq!(mock.calls(endpoint::TOTAL_JOURNEYS), 2);
        assert_eq!(mock.calls(endpoint::AVERAGE_DISTANCE), 2);
    }

    #[tokio::test]
    async fn summary_fails_if_any_request_fails() {
        let (metrics, mock) = metrics();
        mock.set_failing(endpoint::AVERAGE_DISTANCE, true);

        let result = metrics
            .summary(StationKey::new(1), &MonthSelection::all(), None)
            .await;

        assert!(matches!(result, Err(ApiError::Api { status: 503, .. })));
        // The other requests still ran
        assert_eq!(mock.calls(endpoint::TOTAL_JOURNEYS), 2);
    }

    #[tokio::test]
    async fn summary_within_timeout() {
        let (metrics, _mock) = metrics();
        let summary = metrics
            .summary(
                StationKey::new(2),
                &MonthSelection::all(),
                Some(Duration::from_secs(5)),
            )
            .await
            .unwrap();
        assert_eq!(summary.total_from, 1);
        assert_eq!(summary.total_to, 2);
    }

    #[tokio::test]
    async fn unknown_station_summary_is_not_found() {
        let (metrics, _mock) = metrics();
        let err = metrics
            .summary(StationKey::new(42), &MonthSelection::all(), None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
