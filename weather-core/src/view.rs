//! View state for a single weather search screen.

use crate::{
    error::SearchError,
    model::{CurrentWeather, ForecastEntry},
};

/// Most forecast entries kept (8 × 3 h = 24 h).
pub const MAX_FORECAST_ENTRIES: usize = 8;

/// Everything the renderer reads. Only [`crate::app::WeatherApp`] writes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherView {
    city: String,
    current_weather: Option<CurrentWeather>,
    hourly_forecast: Vec<ForecastEntry>,
    loading: bool,
    error_message: Option<String>,
    generation: u64,
}

impl WeatherView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn current_weather(&self) -> Option<&CurrentWeather> {
        self.current_weather.as_ref()
    }

    pub fn hourly_forecast(&self) -> &[ForecastEntry] {
        &self.hourly_forecast
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the Search control accepts clicks.
    pub fn search_enabled(&self) -> bool {
        !self.loading
    }

    pub(crate) fn set_city(&mut self, city: String) {
        self.city = city;
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Enter the loading state for a new search and return its generation.
    pub(crate) fn start_search(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error_message = None;
        self.generation
    }

    pub(crate) fn fail(&mut self, error: &SearchError) {
        self.error_message = Some(error.to_string());
    }

    pub(crate) fn store_current(&mut self, current: CurrentWeather) {
        self.current_weather = Some(current);
    }

    pub(crate) fn store_forecast(&mut self, entries: Vec<ForecastEntry>) {
        self.hourly_forecast = entries.into_iter().take(MAX_FORECAST_ENTRIES).collect();
    }

    pub(crate) fn finish_search(&mut self) {
        self.loading = false;
    }
}
