//! Journey list screen.

use tracing::debug;

use crate::api::{ApiError, Backend};
use crate::domain::{JourneyPage, MonthSelection, sequences_equal};
use crate::journeys::{JourneyPageCache, PageRequest, SortColumn, SortOrder};
use crate::stations::StationDirectory;

use super::LoadState;
use super::sort::SortState;

/// Journeys per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Paging, sorting and month filtering for the journey list.
pub struct JourneyListController<'a, B> {
    cache: &'a JourneyPageCache<B>,
    stations: &'a StationDirectory<B>,
    page_size: usize,
    page_index: usize,
    sort: SortState,
    months: MonthSelection,
    state: LoadState,
    last: Option<JourneyPage>,
}

impl<'a, B: Backend> JourneyListController<'a, B> {
    pub fn new(
        cache: &'a JourneyPageCache<B>,
        stations: &'a StationDirectory<B>,
        page_size: usize,
    ) -> Self {
        Self {
            cache,
            stations,
            page_size,
            page_index: 0,
            sort: SortState::new(),
            months: MonthSelection::empty(),
            state: LoadState::default(),
            last: None,
        }
    }

    /// Start from a sort order, as when entering through a sorted URL.
    pub fn with_sort(mut self, order: Option<SortOrder>) -> Self {
        self.sort = order.map(SortState::from).unwrap_or_default();
        self
    }

    /// Start from a month filter instead of the default.
    pub fn with_months(mut self, months: MonthSelection) -> Self {
        self.months = months;
        self
    }

    /// Fetch the current page.
    ///
    /// Afterwards the page index is pulled back if it lies past the
    /// backend's reported count.
    pub async fn load(&mut self) -> Result<JourneyPage, ApiError> {
        let request = PageRequest::new(self.page_size, self.page_index)
            .with_sort(self.sort.order())
            .with_months(self.months.clone());

        self.state.begin();
        let result = self.cache.get_page(&request, self.stations).await;
        let page = self.state.finish("journeys", result)?;

        self.clamp_to_count(page.count);
        self.last = Some(page.clone());
        Ok(page)
    }

    pub async fn change_page(
        &mut self,
        page_size: usize,
        page_index: usize,
    ) -> Result<JourneyPage, ApiError> {
        self.page_size = page_size;
        self.page_index = page_index;
        self.load().await
    }

    pub async fn sort_by(&mut self, column: SortColumn) -> Result<JourneyPage, ApiError> {
        self.sort.click(column);
        debug!(segment = %self.sort.segment(), "sort changed");
        self.load().await
    }

    /// Apply a month filter from the menu.
    ///
    /// Returns `None` without fetching when the selection is unchanged.
    pub async fn select_months(
        &mut self,
        months: MonthSelection,
    ) -> Result<Option<JourneyPage>, ApiError> {
        if sequences_equal(self.months.months(), months.months()) {
            return Ok(None);
        }

        self.months = months;
        self.load().await.map(Some)
    }

    /// Leave and re-enter the list: no sort, first page.
    pub fn reset(&mut self) {
        self.sort.clear();
        self.page_index = 0;
    }

    fn clamp_to_count(&mut self, count: u64) {
        let size = self.page_size as u64;
        if size > 0 && (self.page_index as u64).saturating_mul(size) > count {
            self.page_index = (count / size) as usize;
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn months(&self) -> &MonthSelection {
        &self.months
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn last_page(&self) -> Option<&JourneyPage> {
        self.last.as_ref()
    }
}
