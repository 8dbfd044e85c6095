//! Station directory and per-station statistics.

mod directory;
mod metrics;

pub use directory::{DirectoryConfig, STATION_PAGE_SIZE, StationDirectory, StationSnapshot};
pub use metrics::{StationMetrics, StationSummary};
