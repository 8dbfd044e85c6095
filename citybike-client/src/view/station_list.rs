//! Station list screen.

use crate::api::{ApiError, Backend};
use crate::domain::{Page, Station};
use crate::stations::StationDirectory;

use super::LoadState;

pub struct StationListController<'a, B> {
    stations: &'a StationDirectory<B>,
    page_index: usize,
    state: LoadState,
    last: Option<Page<Station>>,
}

impl<'a, B: Backend> StationListController<'a, B> {
    pub fn new(stations: &'a StationDirectory<B>) -> Self {
        Self {
            stations,
            page_index: 0,
            state: LoadState::default(),
            last: None,
        }
    }

    pub async fn load(&mut self) -> Result<Page<Station>, ApiError> {
        self.state.begin();
        let result = self.stations.page(self.page_index).await;
        let page = self.state.finish("stations", result)?;
        self.last = Some(page.clone());
        Ok(page)
    }

    pub async fn change_page(&mut self, page_index: usize) -> Result<Page<Station>, ApiError> {
        self.page_index = page_index;
        self.load().await
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn last_page(&self) -> Option<&Page<Station>> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::api::mock::endpoint;
    use crate::stations::DirectoryConfig;

    #[tokio::test]
    async fn loads_and_pages() {
        let mock = MockBackend::from_dir("data/mock").unwrap();
        let directory = StationDirectory::new(mock.clone(), &DirectoryConfig::default());
        let mut list = StationListController::new(&directory);

        let page = list.load().await.unwrap();
        assert_eq!(page.count as usize, mock.station_list().len());
        assert_eq!(page.items[0].name, mock.station_list()[0].name);

        let page = list.change_page(1).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(list.page_index(), 1);
        assert_eq!(mock.calls(endpoint::STATIONS), 1);
    }

    #[tokio::test]
    async fn failure_is_recorded() {
        let mock = MockBackend::from_dir("data/mock").unwrap();
        mock.set_failing(endpoint::STATIONS, true);
        let directory = StationDirectory::new(mock.clone(), &DirectoryConfig::default());
        let mut list = StationListController::new(&directory);

        assert!(list.load().await.is_err());
        assert!(list.last_error().is_some());
        assert!(!list.is_loading());
        assert!(list.last_page().is_none());
    }
}
