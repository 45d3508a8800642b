//! Turning [`WeatherView`] state into what the user sees.

use std::fmt;

use chrono::{TimeZone, Timelike};
use serde::Serialize;

use crate::{
    config::Config,
    model::{CurrentWeather, ForecastEntry, round_degrees},
    view::WeatherView,
};

pub const FORECAST_HEADING: &str = "24-Hour Forecast";
pub const INVALID_DATA_NOTICE: &str = "Invalid weather data received";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchControl {
    pub label: &'static str,
    pub enabled: bool,
}

/// The main weather area. Error beats loading beats data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherPanel {
    /// No search has completed yet.
    Empty,
    Error { message: String },
    Loading,
    Weather {
        city: String,
        description: String,
        temperature: String,
    },
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub hour: String,
    pub icon_url: String,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub search: SearchControl,
    pub weather: WeatherPanel,
    /// Present whenever the view holds forecast entries, even if every one
    /// of them was malformed and produced no card.
    pub forecast: Option<Vec<ForecastCard>>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    icon_base_url: String,
}

impl Renderer {
    pub fn new(icon_base_url: impl Into<String>) -> Self {
        Self {
            icon_base_url: icon_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.icon_base_url.as_str())
    }

    pub fn icon_url(&self, icon: &str) -> String {
        format!("{}/{icon}.png", self.icon_base_url)
    }

    /// Render `view`, showing forecast hours in `tz`.
    pub fn render<Tz: TimeZone>(&self, view: &WeatherView, tz: &Tz) -> Rendered {
        let search = SearchControl {
            label: if view.is_loading() { "Searching..." } else { "Search" },
            enabled: view.search_enabled(),
        };

        let weather = if let Some(message) = view.error_message() {
            WeatherPanel::Error {
                message: message.to_string(),
            }
        } else if view.is_loading() {
            WeatherPanel::Loading
        } else {
            view.current_weather()
                .map_or(WeatherPanel::Empty, weather_panel)
        };

        let forecast = (!view.hourly_forecast().is_empty()).then(|| {
            view.hourly_forecast()
                .iter()
                .filter_map(|entry| self.card(entry, tz))
                .collect()
        });

        Rendered {
            search,
            weather,
            forecast,
        }
    }

    fn card<Tz: TimeZone>(&self, entry: &ForecastEntry, tz: &Tz) -> Option<ForecastCard> {
        let (Some(timestamp), Some(temp), Some(icon)) =
            (entry.timestamp, entry.temperature_c, entry.icon.as_deref())
        else {
            return None;
        };

        Some(ForecastCard {
            hour: format!("{}:00", timestamp.with_timezone(tz).hour()),
            icon_url: self.icon_url(icon),
            temperature: format_temperature(temp),
        })
    }
}

fn weather_panel(current: &CurrentWeather) -> WeatherPanel {
    match (&current.city_name, &current.description, current.temperature_c) {
        (Some(city), Some(description), Some(temp)) => WeatherPanel::Weather {
            city: city.clone(),
            description: description.clone(),
            temperature: format_temperature(temp),
        },
        _ => WeatherPanel::Invalid,
    }
}

fn format_temperature(celsius: f64) -> String {
    format!("{}°C", round_degrees(celsius))
}

impl fmt::Display for WeatherPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherPanel::Empty => Ok(()),
            WeatherPanel::Error { message } => writeln!(f, "Error: {message}"),
            WeatherPanel::Loading => writeln!(f, "Loading..."),
            WeatherPanel::Weather {
                city,
                description,
                temperature,
            } => {
                writeln!(f, "City: {city}")?;
                writeln!(f, "Description: {description}")?;
                writeln!(f, "Temperature: {temperature}")
            }
            WeatherPanel::Invalid => writeln!(f, "{INVALID_DATA_NOTICE}"),
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weather)?;

        if let Some(cards) = &self.forecast {
            writeln!(f)?;
            writeln!(f, "{FORECAST_HEADING}")?;
            for card in cards {
                writeln!(f, "  {:>5}  {:>6}  {}", card.hour, card.temperature, card.icon_url)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{
            UiEvent, WeatherApp,
            tests::{Canned, FakeProvider, entries, london},
        },
        error::SearchError,
    };
    use chrono::{DateTime, FixedOffset, Utc};

    fn renderer() -> Renderer {
        Renderer::from_config(&Config::default())
    }

    async fn searched(current: Canned<CurrentWeather>, forecast: Canned<Vec<ForecastEntry>>) -> WeatherApp {
        let mut app = WeatherApp::with_provider(FakeProvider::new(current, forecast));
        app.dispatch(UiEvent::CityEdited("London".into())).unwrap();
        app.search(UiEvent::EnterPressed).await.unwrap();
        app
    }

    #[test]
    fn fresh_view_renders_nothing() {
        let out = renderer().render(&WeatherView::new(), &Utc);
        assert_eq!(out.weather, WeatherPanel::Empty);
        assert_eq!(out.forecast, None);
        assert_eq!(out.search, SearchControl { label: "Search", enabled: true });
        assert_eq!(out.to_string(), "");
    }

    #[tokio::test]
    async fn london_renders_rounded_temperature() {
        let app = searched(Canned::Ok(london()), Canned::Ok(Vec::new())).await;
        let out = renderer().render(app.view(), &Utc);

        assert_eq!(
            out.weather,
            WeatherPanel::Weather {
                city: "London".into(),
                description: "clear sky".into(),
                temperature: "15°C".into(),
            }
        );
        assert_eq!(out.forecast, None);
        assert_eq!(
            out.to_string(),
            "City: London\nDescription: clear sky\nTemperature: 15°C\n"
        );
    }

    #[tokio::test]
    async fn error_takes_priority_over_data() {
        let app = searched(Canned::Ok(london()), Canned::Fail("Failed to fetch forecast data")).await;
        let out = renderer().render(app.view(), &Utc);

        assert_eq!(
            out.weather,
            WeatherPanel::Error {
                message: "Failed to fetch forecast data".into()
            }
        );
        assert!(out.to_string().starts_with("Error: Failed to fetch forecast data"));
    }

    #[test]
    fn loading_hides_data() {
        let mut app = WeatherApp::with_provider(FakeProvider::new(Canned::Ok(london()), Canned::Ok(entries(2))));
        app.dispatch(UiEvent::CityEdited("London".into())).unwrap();
        let _pending = app.dispatch(UiEvent::SearchClicked).unwrap();

        let out = renderer().render(app.view(), &Utc);
        assert_eq!(out.weather, WeatherPanel::Loading);
        assert_eq!(out.search, SearchControl { label: "Searching...", enabled: false });
        assert_eq!(out.to_string(), "Loading...\n");
    }

    #[tokio::test]
    async fn structurally_invalid_weather_gets_notice() {
        let broken = CurrentWeather {
            description: None,
            ..london()
        };
        let app = searched(Canned::Ok(broken), Canned::Ok(Vec::new())).await;
        let out = renderer().render(app.view(), &Utc);

        assert_eq!(out.weather, WeatherPanel::Invalid);
        assert_eq!(out.to_string(), "Invalid weather data received\n");
    }

    #[tokio::test]
    async fn forecast_cards_use_viewer_time_zone() {
        // 2023-11-14T22:13:20Z
        let entry = ForecastEntry {
            timestamp: DateTime::from_timestamp(1_700_000_000, 0),
            temperature_c: Some(-2.5),
            icon: Some("10n".into()),
        };
        let app = searched(Canned::Ok(london()), Canned::Ok(vec![entry])).await;

        let utc = renderer().render(app.view(), &Utc);
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        let shifted = renderer().render(app.view(), &plus_three);

        assert_eq!(
            utc.forecast,
            Some(vec![ForecastCard {
                hour: "22:00".into(),
                icon_url: "https://openweathermap.org/img/wn/10n.png".into(),
                temperature: "-2°C".into(),
            }])
        );
        assert_eq!(shifted.forecast.unwrap()[0].hour, "1:00");
    }

    #[tokio::test]
    async fn malformed_entries_are_skipped() {
        let mut list = entries(4);
        list[1].icon = None;
        list[2] = ForecastEntry::default();
        let app = searched(Canned::Ok(london()), Canned::Ok(list)).await;

        let cards = renderer().render(app.view(), &Utc).forecast.unwrap();
        let temps: Vec<_> = cards.iter().map(|c| c.temperature.as_str()).collect();
        assert_eq!(temps, ["0°C", "3°C"]);
    }

    #[tokio::test]
    async fn all_malformed_entries_still_show_heading() {
        let app = searched(Canned::Ok(london()), Canned::Ok(vec![ForecastEntry::default()])).await;
        let out = renderer().render(app.view(), &Utc);

        assert_eq!(out.forecast, Some(Vec::new()));
        assert!(out.to_string().contains(FORECAST_HEADING));
    }

    #[tokio::test]
    async fn identical_searches_render_identically() {
        let mut app = searched(Canned::Ok(london()), Canned::Ok(entries(9))).await;
        let first = renderer().render(app.view(), &Utc);

        app.search(UiEvent::EnterPressed).await.unwrap();
        let second = renderer().render(app.view(), &Utc);

        assert_eq!(first, second);
        assert_eq!(first.forecast.map(|c| c.len()), Some(8));
    }

    #[test]
    fn missing_key_renders_config_error() {
        let mut app = WeatherApp::unconfigured();
        app.dispatch(UiEvent::CityEdited("London".into())).unwrap();
        assert!(matches!(
            app.dispatch(UiEvent::EnterPressed),
            Err(SearchError::MissingApiKey)
        ));

        let out = renderer().render(app.view(), &Utc);
        assert!(matches!(out.weather, WeatherPanel::Error { .. }));
        assert!(out.to_string().starts_with("Error: API key is not configured"));
    }

    #[test]
    fn icon_url_trims_trailing_slash() {
        let r = Renderer::new("http://icons.test/wn/");
        assert_eq!(r.icon_url("01d"), "http://icons.test/wn/01d.png");
    }
}
