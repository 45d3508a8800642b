use crate::{
    error::SearchError,
    model::{CurrentWeather, ForecastEntry},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of weather data for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`.
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, SearchError>;

    /// The full 3-hourly forecast list for `city`, in provider order.
    async fn hourly_forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, SearchError>;
}
