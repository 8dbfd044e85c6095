//! Domain error types.
//!
//! These errors represent validation failures on values entered by the
//! user (month filters, route parameters). They are distinct from API
//! errors.

use super::station::InvalidStationKey;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Month is not a number from 1 to 12
    #[error("invalid month: {0}")]
    InvalidMonth(String),

    /// Station route parameter is not a numeric key
    #[error(transparent)]
    InvalidStationKey(#[from] InvalidStationKey),

    /// Sort segment not recognised
    #[error("invalid sort order: {0}")]
    InvalidSort(String),
}
