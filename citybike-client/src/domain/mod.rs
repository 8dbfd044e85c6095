//! Domain types for the city bicycle client.
//!
//! These types represent validated backend data and user input. All types
//! enforce their invariants at construction time, so code that receives
//! them can trust their validity.

mod error;
mod format;
mod journey;
mod months;
mod station;

pub use error::DomainError;
pub use format::{format_average_km, format_kilometers, format_minutes};
pub use journey::{Journey, JourneyPage, JourneyView, Page};
pub use months::{DEFAULT_MONTHS, Month, MonthSelection, sequences_equal};
pub use station::{InvalidStationKey, Station, StationId, StationKey};
