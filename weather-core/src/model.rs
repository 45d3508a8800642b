use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

const KELVIN_OFFSET: f64 = 273.15;

/// Unit system requested from the provider.
///
/// `Metric` asks the provider for °C; `Standard` sends no units parameter and
/// gets Kelvin back, which is converted on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Standard => "standard",
        }
    }

    /// Value of the `units` query parameter, if one is sent at all.
    pub fn query_param(&self) -> Option<&'static str> {
        match self {
            Units::Metric => Some("metric"),
            Units::Standard => None,
        }
    }

    /// Convert a temperature as returned for these units into °C.
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Standard => value - KELVIN_OFFSET,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "standard" => Ok(Units::Standard),
            _ => Err(ConfigError::UnknownUnits(value.to_string())),
        }
    }
}

/// Current conditions for a city, as decoded from a successful response.
///
/// Fields stay optional: a success payload may still lack what the renderer
/// needs, and that is decided at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub temperature_c: Option<f64>,
}

impl CurrentWeather {
    /// Decode a success payload. Anything that does not fit the expected
    /// shape yields an empty (structurally invalid) record instead of an error.
    pub fn from_payload(payload: Value, units: Units) -> Self {
        let Ok(raw) = serde_json::from_value::<OwCurrent>(payload) else {
            return Self::default();
        };

        let first = raw.weather.and_then(|w| w.into_iter().next());
        let (description, icon) = match first {
            Some(w) => (w.description, w.icon),
            None => (None, None),
        };

        Self {
            city_name: raw.name,
            description,
            icon,
            temperature_c: raw.main.and_then(|m| m.temp).map(|t| units.to_celsius(t)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.city_name.is_some() && self.description.is_some() && self.temperature_c.is_some()
    }
}

/// One 3-hour forecast data point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature_c: Option<f64>,
    pub icon: Option<String>,
}

impl ForecastEntry {
    /// Decode a single `list` item; a malformed item becomes an empty entry.
    pub fn from_payload(item: Value, units: Units) -> Self {
        let Ok(raw) = serde_json::from_value::<OwForecastItem>(item) else {
            return Self::default();
        };

        Self {
            timestamp: raw.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            temperature_c: raw.main.and_then(|m| m.temp).map(|t| units.to_celsius(t)),
            icon: raw.weather.and_then(|w| w.into_iter().next()).and_then(|w| w.icon),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.timestamp.is_some() && self.temperature_c.is_some() && self.icon.is_some()
    }
}

/// Read the provider's embedded status code. OpenWeather sends it as a number
/// on `/weather` and as a string on `/forecast`; both are normalized here.
pub fn status_code(payload: &Value) -> Option<i64> {
    match payload.get("cod")? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The provider's `message` field, when it is a string.
pub fn status_message(payload: &Value) -> Option<&str> {
    payload.get("message").and_then(Value::as_str)
}

/// Round to the nearest whole degree, halves rounding up.
pub fn round_degrees(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    name: Option<String>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
}

#[derive(Debug, Deserialize)]
struct OwForecastItem {
    dt: Option<i64>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
}
