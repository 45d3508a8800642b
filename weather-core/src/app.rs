//! Event handling and the search operation.
//!
//! A search is split in three steps so the view is never borrowed while
//! requests are in flight:
//! - [`WeatherApp::dispatch`] validates input and flips the view into loading,
//!   returning a [`PendingSearch`];
//! - [`PendingSearch::run`] issues both requests concurrently;
//! - [`WeatherApp::complete`] writes the [`SearchOutcome`] back.
//!
//! Each started search gets a generation number. Outcomes from anything but
//! the latest search are dropped, so overlapping searches resolve to the last
//! one started regardless of which finishes first.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::SearchError,
    model::{CurrentWeather, ForecastEntry},
    provider::{OpenWeatherProvider, WeatherProvider},
    view::WeatherView,
};

/// Discrete input events from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The city text field changed.
    CityEdited(String),
    /// Enter pressed in the text field.
    EnterPressed,
    /// The Search control was clicked. Ignored while loading.
    SearchClicked,
}

/// Owns the view and the provider the search operation talks to.
#[derive(Debug)]
pub struct WeatherApp {
    view: WeatherView,
    provider: Option<Arc<dyn WeatherProvider>>,
}

impl WeatherApp {
    /// Build from config. A missing API key is not an error here; searches
    /// report it instead.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        match OpenWeatherProvider::from_config(config) {
            Ok(provider) => Ok(Self::with_provider(Arc::new(provider))),
            Err(SearchError::MissingApiKey) => {
                warn!("API key is missing; searches will fail until one is configured");
                Ok(Self::unconfigured())
            }
            Err(e) => Err(e),
        }
    }

    pub fn with_provider(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            view: WeatherView::new(),
            provider: Some(provider),
        }
    }

    /// An app with no provider configured.
    pub fn unconfigured() -> Self {
        Self {
            view: WeatherView::new(),
            provider: None,
        }
    }

    pub fn view(&self) -> &WeatherView {
        &self.view
    }

    /// Apply a UI event. Returns the search to run, if the event started one.
    ///
    /// `Err(EmptyCity)` leaves the view untouched and should be shown as a
    /// prompt. `Err(MissingApiKey)` has already been written to the view's
    /// error message.
    ///
    /// A returned [`PendingSearch`] has already put the view into loading:
    /// it must be [run](PendingSearch::run) and its outcome passed to
    /// [`complete`](Self::complete). Dropping it leaves `loading` set until a
    /// later search completes, and only Enter can start one meanwhile.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<Option<PendingSearch>, SearchError> {
        match event {
            UiEvent::CityEdited(city) => {
                self.view.set_city(city);
                Ok(None)
            }
            UiEvent::SearchClicked if !self.view.search_enabled() => {
                debug!("search control disabled while loading");
                Ok(None)
            }
            UiEvent::EnterPressed | UiEvent::SearchClicked => self.begin_search().map(Some),
        }
    }

    fn begin_search(&mut self) -> Result<PendingSearch, SearchError> {
        let city = self.view.city().trim().to_string();
        if city.is_empty() {
            return Err(SearchError::EmptyCity);
        }

        let Some(provider) = self.provider.clone() else {
            let err = SearchError::MissingApiKey;
            self.view.fail(&err);
            return Err(err);
        };

        let generation = self.view.start_search();
        debug!(%city, generation, "search started");

        Ok(PendingSearch {
            generation,
            city,
            provider,
        })
    }

    /// Write a finished search back into the view.
    ///
    /// Returns `false` if the outcome belonged to a superseded search and was
    /// discarded.
    pub fn complete(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.view.generation() {
            debug!(
                generation = outcome.generation,
                latest = self.view.generation(),
                "discarding stale search outcome"
            );
            return false;
        }

        let mut first_error = None;

        match outcome.current {
            Ok(current) => self.view.store_current(current),
            Err(e) => first_error = Some(e),
        }

        match outcome.forecast {
            Ok(entries) => self.view.store_forecast(entries),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => {
                warn!(city = %outcome.city, error = %e, "search failed");
                self.view.fail(&e);
            }
            None => info!(
                city = %outcome.city,
                entries = self.view.hourly_forecast().len(),
                "search completed"
            ),
        }

        self.view.finish_search();
        true
    }

    /// Run a search triggered by `event` to completion.
    pub async fn search(&mut self, event: UiEvent) -> Result<(), SearchError> {
        if let Some(pending) = self.dispatch(event)? {
            let outcome = pending.run().await;
            self.complete(outcome);
        }
        Ok(())
    }
}

/// A started search: both requests, not yet issued.
#[derive(Debug)]
pub struct PendingSearch {
    generation: u64,
    city: String,
    provider: Arc<dyn WeatherProvider>,
}

impl PendingSearch {
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Issue the current-weather and forecast requests concurrently and wait
    /// for both to settle.
    pub async fn run(self) -> SearchOutcome {
        let (current, forecast) = tokio::join!(
            self.provider.current_weather(&self.city),
            self.provider.hourly_forecast(&self.city),
        );

        SearchOutcome {
            generation: self.generation,
            city: self.city,
            current,
            forecast,
        }
    }
}

/// Results of both requests of one search.
#[derive(Debug)]
pub struct SearchOutcome {
    generation: u64,
    city: String,
    current: Result<CurrentWeather, SearchError>,
    forecast: Result<Vec<ForecastEntry>, SearchError>,
}
