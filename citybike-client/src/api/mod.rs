//! Client for the city bicycle journeys REST API.
//!
//! The backend exposes journey listings (sorted and filtered by month on
//! the server), the station table, and per-station aggregates. Everything
//! is read-only.
//!
//! Key characteristics of the backend:
//! - The journey listing is returned in full; paging happens client side
//! - `journeysCount/` reports the size of the list it served last
//! - Missing entities come back as 404 with an `exceptionInfo` message

mod backend;
mod client;
mod error;
pub mod mock;
mod types;

pub use backend::{Backend, Direction};
pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use mock::MockBackend;
pub use types::{ExceptionInfo, JourneyDto, StationDto};
