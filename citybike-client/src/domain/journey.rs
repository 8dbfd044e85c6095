//! Journey types.
//!
//! A `Journey` is what the backend returns: station references are plain
//! identifiers. A `JourneyView` is the same journey joined against the
//! station directory, ready for display.

use chrono::NaiveDateTime;

use super::format::{format_kilometers, format_minutes};
use super::station::{Station, StationId};

/// A single bicycle journey as reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    pub id: u64,
    pub departure_date: Option<NaiveDateTime>,
    pub return_date: Option<NaiveDateTime>,
    pub departure_station_id: StationId,
    pub return_station_id: StationId,
    /// Meters
    pub covered_distance: f64,
    /// Seconds
    pub journey_duration: u64,
}

/// A journey with its station references resolved.
///
/// A station is `None` when the directory does not know its identifier;
/// the journey is still shown, with blank station fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyView {
    pub id: u64,
    pub departure_station: Option<Station>,
    pub return_station: Option<Station>,
    pub covered_distance: f64,
    pub journey_duration: u64,
}

impl JourneyView {
    /// Joins a journey against a station resolver.
    pub fn resolve<'a, F>(journey: &Journey, lookup: F) -> Self
    where
        F: Fn(&StationId) -> Option<&'a Station>,
    {
        Self {
            id: journey.id,
            departure_station: lookup(&journey.departure_station_id).cloned(),
            return_station: lookup(&journey.return_station_id).cloned(),
            covered_distance: journey.covered_distance,
            journey_duration: journey.journey_duration,
        }
    }

    /// Departure station name, or empty if unresolved.
    pub fn departure_name(&self) -> &str {
        self.departure_station
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("")
    }

    /// Return station name, or empty if unresolved.
    pub fn return_name(&self) -> &str {
        self.return_station
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("")
    }

    pub fn distance_km(&self) -> String {
        format_kilometers(self.covered_distance)
    }

    pub fn duration_minutes(&self) -> String {
        format_minutes(self.journey_duration)
    }
}

/// One page of a listing plus the total the backend reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            items: Vec::new(),
        }
    }
}

/// A page of resolved journeys.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyPage {
    /// Total reported by `journeysCount/`
    pub count: u64,
    /// Page actually served, after clamping
    pub page_index: usize,
    /// Length of the cached (filtered) journey list
    pub available: usize,
    pub items: Vec<JourneyView>,
}
