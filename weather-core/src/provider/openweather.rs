use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::SearchError,
    model::{self, CurrentWeather, ForecastEntry, Units},
};

use super::WeatherProvider;

const CURRENT_FALLBACK: &str = "Failed to fetch weather data";
const FORECAST_FALLBACK: &str = "Failed to fetch forecast data";

/// Client for the OpenWeather 2.5 `weather` and `forecast` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: Units,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, units: Units, timeout: Duration) -> Result<Self, SearchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SearchError::HttpClient)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            units,
            http,
        })
    }

    /// Construct from config. Fails with [`SearchError::MissingApiKey`] when no key is set.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let api_key = config.api_key().ok_or(SearchError::MissingApiKey)?;

        Self::new(
            api_key.to_owned(),
            config.api_base_url.clone(),
            config.units,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// GET `{base_url}/{endpoint}` and return the body once its `cod` says 200.
    async fn fetch(&self, endpoint: &str, city: &str, fallback: &str) -> Result<Value, SearchError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut query = vec![("q", city), ("appid", self.api_key.as_str())];
        if let Some(units) = self.units.query_param() {
            query.push(("units", units));
        }

        debug!(%url, city, units = %self.units, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "OpenWeather request failed");
                SearchError::Transport(e)
            })?;

        let http_status = res.status();
        let body = res.text().await.map_err(|e| {
            warn!(%url, %http_status, error = %e, "OpenWeather response body could not be read");
            SearchError::Transport(e)
        })?;

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(%url, %http_status, body = %truncate_body(&body), "OpenWeather returned invalid JSON");
            SearchError::Parse(e)
        })?;

        match model::status_code(&payload) {
            Some(200) => Ok(payload),
            cod => {
                warn!(%url, %http_status, ?cod, "OpenWeather reported failure");
                Err(SearchError::provider(model::status_message(&payload), fallback))
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, SearchError> {
        let payload = self.fetch("weather", city, CURRENT_FALLBACK).await?;
        Ok(CurrentWeather::from_payload(payload, self.units))
    }

    async fn hourly_forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, SearchError> {
        let payload = self.fetch("forecast", city, FORECAST_FALLBACK).await?;

        let list = match payload {
            Value::Object(mut fields) => match fields.remove("list") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Ok(list
            .into_iter()
            .map(|item| ForecastEntry::from_payload(item, self.units))
            .collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
