use thiserror::Error;

/// Message shown when a transport or decoding failure hides the provider's answer.
pub const GENERIC_FETCH_FAILURE: &str = "Error fetching weather data. Please try again.";

/// Everything that can stop a search from producing data.
///
/// The `Display` text of each variant is exactly what ends up in the view's
/// error message.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Search triggered with no city typed in.
    #[error("Please enter a city")]
    EmptyCity,

    /// No OpenWeather API key in the config file or environment.
    #[error(
        "API key is not configured. Please check your environment variables.\n\
         Hint: set OPENWEATHER_API_KEY or run `weather configure`."
    )]
    MissingApiKey,

    /// The provider answered with a non-success `cod`.
    #[error("{0}")]
    Provider(String),

    #[error("Error fetching weather data. Please try again.")]
    Transport(#[source] reqwest::Error),

    #[error("Error fetching weather data. Please try again.")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to initialise HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

impl SearchError {
    /// Provider failure carrying the payload's message, or `fallback` when it had none.
    pub fn provider(message: Option<&str>, fallback: &str) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback);
        SearchError::Provider(message.to_string())
    }
}

/// Errors in configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown units '{0}'. Supported units: metric, standard.")]
    UnknownUnits(String),
}
