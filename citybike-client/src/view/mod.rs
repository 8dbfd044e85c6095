//! View controllers.
//!
//! Each controller owns the state one screen needs (page, sort, months,
//! loading flag) and drives the caches to fill it.

mod journey_list;
mod month_menu;
mod routes;
mod sort;
mod station_detail;
mod station_list;

pub use journey_list::{DEFAULT_PAGE_SIZE, JourneyListController};
pub use month_menu::MonthMenu;
pub use routes::Route;
pub use sort::SortState;
pub use station_detail::{StationDetailController, Top5Panel};
pub use station_list::StationListController;

use tracing::warn;

use crate::api::ApiError;

/// Loading flag and last error shared by every controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadState {
    loading: bool,
    last_error: Option<String>,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn begin(&mut self) {
        self.loading = true;
    }

    /// Clear the loading flag and record the outcome.
    fn finish<T>(&mut self, view: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.loading = false;
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                warn!(view, error = %e, "load failed");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }
}
