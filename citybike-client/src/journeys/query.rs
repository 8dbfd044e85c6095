//! Sort orders and cache keys for the journey listing.

use std::fmt;
use std::str::FromStr;

use crate::domain::{DomainError, MonthSelection};

/// A sortable journey column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Departure,
    Return,
    Distance,
    Duration,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Departure,
        SortColumn::Return,
        SortColumn::Distance,
        SortColumn::Duration,
    ];

    /// Path prefix used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Departure => "departure",
            SortColumn::Return => "return",
            SortColumn::Distance => "distance",
            SortColumn::Duration => "duration",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SortColumn::Departure => 0,
            SortColumn::Return => 1,
            SortColumn::Distance => 2,
            SortColumn::Duration => 3,
        }
    }
}

/// A column and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub descending: bool,
}

impl SortOrder {
    pub fn new(column: SortColumn, descending: bool) -> Self {
        Self { column, descending }
    }

    pub fn asc(column: SortColumn) -> Self {
        Self::new(column, false)
    }

    pub fn desc(column: SortColumn) -> Self {
        Self::new(column, true)
    }

    /// The URL segment, e.g. `distanceDesc/`.
    pub fn segment(&self) -> String {
        let direction = if self.descending { "Desc" } else { "Asc" };
        format!("{}{}/", self.column.as_str(), direction)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.descending { "Desc" } else { "Asc" };
        write!(f, "{}{}", self.column.as_str(), direction)
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    /// Accepts `distanceDesc`, `departureAsc/` and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        let (name, descending) = if let Some(name) = trimmed.strip_suffix("Desc") {
            (name, true)
        } else if let Some(name) = trimmed.strip_suffix("Asc") {
            (name, false)
        } else {
            return Err(DomainError::InvalidSort(s.to_string()));
        };

        SortColumn::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .map(|column| SortOrder::new(column, descending))
            .ok_or_else(|| DomainError::InvalidSort(s.to_string()))
    }
}

/// URL segment for an optional sort order; unsorted is the empty string.
pub fn sort_segment(sort: Option<SortOrder>) -> String {
    sort.map(|s| s.segment()).unwrap_or_default()
}

/// Backend path for a journey listing, e.g. `journeys/distanceDesc/`.
pub fn journeys_path(sort: Option<SortOrder>) -> String {
    format!("journeys/{}", sort_segment(sort))
}

/// Identifies the journey list currently held in cache.
///
/// Two keys match only when the path is identical and the months are
/// identical in the same order.
#[derive(Debug, Clone)]
pub struct QueryKey {
    pub path: String,
    pub months: MonthSelection,
}

impl QueryKey {
    /// Build the key for a request; empty months resolve to the default.
    pub fn new(sort: Option<SortOrder>, months: &MonthSelection) -> Self {
        Self {
            path: journeys_path(sort),
            months: months.effective(),
        }
    }

    pub fn matches(&self, other: &QueryKey) -> bool {
        self.path == other.path && self.months.same_as(&other.months)
    }
}

/// Parameters for one journey page.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page_size: usize,
    pub page_index: usize,
    pub sort: Option<SortOrder>,
    pub months: MonthSelection,
}

impl PageRequest {
    pub fn new(page_size: usize, page_index: usize) -> Self {
        Self {
            page_size,
            page_index,
            sort: None,
            months: MonthSelection::empty(),
        }
    }

    pub fn with_sort(mut self, sort: Option<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_months(mut self, months: MonthSelection) -> Self {
        self.months = months;
        self
    }
}

/// Clamp a page index so that `page_index * page_size` does not run past
/// `len`. Past the end, the index resets to `len / page_size`.
///
/// `page_size` must be non-zero.
pub fn clamp_page_index(page_index: usize, page_size: usize, len: usize) -> usize {
    if page_index.saturating_mul(page_size) > len {
        len / page_size
    } else {
        page_index
    }
}

/// Slice bounds for a page, clamped to `len`.
pub fn page_bounds(page_index: usize, page_size: usize, len: usize) -> (usize, usize) {
    let start = page_index.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    (start, end)
}
