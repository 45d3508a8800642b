//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - The weather view state and the search operation that fills it
//! - Rendering of that state into text or JSON
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod view;

pub use app::{PendingSearch, SearchOutcome, UiEvent, WeatherApp};
pub use config::Config;
pub use error::{ConfigError, SearchError};
pub use model::{CurrentWeather, ForecastEntry, Units};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use render::{ForecastCard, Rendered, Renderer, SearchControl, WeatherPanel};
pub use view::WeatherView;
