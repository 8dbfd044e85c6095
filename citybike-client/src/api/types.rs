//! Wire types for the journeys API.
//!
//! The backend serialises its entities with camelCase field names and
//! reports missing entities as `{"exceptionInfo": "..."}` with a 404.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Journey, Station, StationId, StationKey};

/// A station as sent by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub id: u32,
    pub station_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// A journey as sent by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyDto {
    pub id: u64,
    #[serde(default)]
    pub departure_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub return_date: Option<NaiveDateTime>,
    pub departure_station_id: String,
    pub return_station_id: String,
    pub covered_distance: f64,
    pub journey_duration: u64,
}

/// Error body returned with 404 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionInfo {
    pub exception_info: String,
}

impl From<StationDto> for Station {
    fn from(dto: StationDto) -> Self {
        Station {
            key: StationKey::new(dto.id),
            station_id: StationId::new(dto.station_id),
            name: dto.name,
            address: dto.address,
            x: dto.x,
            y: dto.y,
        }
    }
}

impl From<&Station> for StationDto {
    fn from(station: &Station) -> Self {
        StationDto {
            id: station.key.get(),
            station_id: station.station_id.as_str().to_string(),
            name: station.name.clone(),
            address: station.address.clone(),
            x: station.x,
            y: station.y,
        }
    }
}

impl From<JourneyDto> for Journey {
    fn from(dto: JourneyDto) -> Self {
        Journey {
            id: dto.id,
            departure_date: dto.departure_date,
            return_date: dto.return_date,
            departure_station_id: StationId::new(dto.departure_station_id),
            return_station_id: StationId::new(dto.return_station_id),
            covered_distance: dto.covered_distance,
            journey_duration: dto.journey_duration,
        }
    }
}

impl From<&Journey> for JourneyDto {
    fn from(journey: &Journey) -> Self {
        JourneyDto {
            id: journey.id,
            departure_date: journey.departure_date,
            return_date: journey.return_date,
            departure_station_id: journey.departure_station_id.as_str().to_string(),
            return_station_id: journey.return_station_id.as_str().to_string(),
            covered_distance: journey.covered_distance,
            journey_duration: journey.journey_duration,
        }
    }
}
