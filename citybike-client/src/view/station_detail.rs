//! Single station screen: details, statistics and top-5 panels.

use std::time::Duration;

use tracing::debug;

use crate::api::{ApiError, Backend};
use crate::domain::{MonthSelection, Station, StationKey, sequences_equal};
use crate::stations::{StationDirectory, StationMetrics, StationSummary};

use super::LoadState;

/// A collapsible top-5 list.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Top5Panel {
    #[default]
    Hidden,
    Shown(Vec<Station>),
}

impl Top5Panel {
    pub fn is_shown(&self) -> bool {
        matches!(self, Top5Panel::Shown(_))
    }

    /// Label of the button that toggles the panel.
    pub fn button_label(&self) -> &'static str {
        match self {
            Top5Panel::Hidden => "Load",
            Top5Panel::Shown(_) => "Hide",
        }
    }

    pub fn stations(&self) -> &[Station] {
        match self {
            Top5Panel::Hidden => &[],
            Top5Panel::Shown(stations) => stations,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Top5Kind {
    Returns,
    Departures,
}

pub struct StationDetailController<'a, B> {
    stations: &'a StationDirectory<B>,
    metrics: StationMetrics<&'a B>,
    key: StationKey,
    months: MonthSelection,
    summary_timeout: Option<Duration>,
    state: LoadState,
    station: Option<Station>,
    summary: Option<StationSummary>,
    top5_returns: Top5Panel,
    top5_departures: Top5Panel,
}

impl<'a, B: Backend> StationDetailController<'a, B> {
    pub fn new(stations: &'a StationDirectory<B>, key: StationKey) -> Self {
        Self {
            stations,
            metrics: StationMetrics::new(stations.backend()),
            key,
            months: MonthSelection::all(),
            summary_timeout: None,
            state: LoadState::default(),
            station: None,
            summary: None,
            top5_returns: Top5Panel::Hidden,
            top5_departures: Top5Panel::Hidden,
        }
    }

    /// Give up on the statistics if they take longer than `timeout`.
    pub fn with_summary_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.summary_timeout = timeout;
        self
    }

    /// Fetch the station, then its four statistics concurrently.
    ///
    /// The summary is only set once all four have arrived.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        self.summary = None;
        let result = self.fetch().await;
        self.state.finish("station", result)
    }

    async fn fetch(&mut self) -> Result<(), ApiError> {
        let station = self.stations.station(self.key).await?;
        self.station = Some(station);

        let summary = self
            .metrics
            .summary(self.key, &self.months, self.summary_timeout)
            .await?;
        self.summary = Some(summary);
        Ok(())
    }

    /// Apply a month filter from the menu.
    ///
    /// An empty selection falls back to the default. Open top-5 panels are
    /// hidden first, then the summary reloads and the panels that were open
    /// are fetched again for the new months. If the reload fails they stay
    /// hidden. Returns `false` when nothing changed.
    pub async fn select_months(&mut self, months: MonthSelection) -> Result<bool, ApiError> {
        if !self.months.is_empty() && sequences_equal(self.months.months(), months.months()) {
            return Ok(false);
        }

        self.months = months.effective();
        debug!(key = %self.key, months = %self.months, "station months changed");

        let reopen_returns = std::mem::take(&mut self.top5_returns).is_shown();
        let reopen_departures = std::mem::take(&mut self.top5_departures).is_shown();

        self.load().await?;

        if reopen_returns {
            self.show_top5(Top5Kind::Returns).await?;
        }
        if reopen_departures {
            self.show_top5(Top5Kind::Departures).await?;
        }
        Ok(true)
    }

    /// Show or hide the most common return stations of journeys from here.
    pub async fn toggle_top5_returns(&mut self) -> Result<&Top5Panel, ApiError> {
        if self.top5_returns.is_shown() {
            self.top5_returns = Top5Panel::Hidden;
        } else {
            self.show_top5(Top5Kind::Returns).await?;
        }
        Ok(&self.top5_returns)
    }

    /// Show or hide the most common departure stations of journeys ending here.
    pub async fn toggle_top5_departures(&mut self) -> Result<&Top5Panel, ApiError> {
        if self.top5_departures.is_shown() {
            self.top5_departures = Top5Panel::Hidden;
        } else {
            self.show_top5(Top5Kind::Departures).await?;
        }
        Ok(&self.top5_departures)
    }

    async fn show_top5(&mut self, kind: Top5Kind) -> Result<(), ApiError> {
        self.state.begin();
        let result = match kind {
            Top5Kind::Returns => {
                self.metrics
                    .top5_return_stations_from(self.key, &self.months)
                    .await
            }
            Top5Kind::Departures => {
                self.metrics
                    .top5_departure_stations_to(self.key, &self.months)
                    .await
            }
        };
        let stations = self.state.finish("top5", result)?;

        match kind {
            Top5Kind::Returns => self.top5_returns = Top5Panel::Shown(stations),
            Top5Kind::Departures => self.top5_departures = Top5Panel::Shown(stations),
        }
        Ok(())
    }

    pub fn key(&self) -> StationKey {
        self.key
    }

    pub fn months(&self) -> &MonthSelection {
        &self.months
    }

    pub fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    pub fn summary(&self) -> Option<&StationSummary> {
        self.summary.as_ref()
    }

    pub fn top5_returns(&self) -> &Top5Panel {
        &self.top5_returns
    }

    pub fn top5_departures(&self) -> &Top5Panel {
        &self.top5_departures
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }
}
