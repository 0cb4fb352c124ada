use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ServiceConfig, DEFAULT_WEATHER_BASE_URL};
use crate::domains::response::{PluginData, PluginResult, ResultType, WeatherData};
use crate::error::{LexiError, Result};
use crate::interfaces::plugins::{Plugin, PluginKind, PluginRequest};
use crate::plugins::http::{fetch_json, Endpoint};

#[derive(Debug, Deserialize)]
struct GeoEntry {
    lat: f64,
    lon: f64,
    name: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Conditions {
    main: ConditionsMain,
    #[serde(default)]
    weather: Vec<ConditionsWeather>,
    wind: Option<ConditionsWind>,
}

#[derive(Debug, Deserialize)]
struct ConditionsMain {
    temp: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionsWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConditionsWind {
    #[serde(default)]
    speed: f64,
}

/// Current conditions via geocode-then-fetch against an OpenWeatherMap-style API.
pub struct WeatherPlugin {
    client: Client,
    endpoint: Endpoint,
}

impl WeatherPlugin {
    pub fn new(client: Client, config: Option<&ServiceConfig>) -> Self {
        Self {
            client,
            endpoint: Endpoint::new(config, DEFAULT_WEATHER_BASE_URL),
        }
    }

    pub async fn lookup(&self, location: &str) -> PluginResult {
        let Some(api_key) = self.endpoint.api_key() else {
            return PluginResult::failure(
                ResultType::Weather,
                "Weather service is not configured. Please add LEXI_WEATHER_API_KEY to your environment.",
            );
        };

        match self.fetch_weather(location, api_key).await {
            Ok(Some(data)) => {
                let summary = weather_summary(&data);
                PluginResult::success(PluginData::Weather(data), summary)
            }
            Ok(None) => PluginResult::failure(
                ResultType::Weather,
                format!(
                    "I couldn't find weather data for {location}. Please try a different location."
                ),
            ),
            Err(err) => {
                warn!(error = %err, location, "weather fetch failed");
                PluginResult::failure(
                    ResultType::Weather,
                    "I couldn't fetch the weather right now. Please try again later.",
                )
            }
        }
    }

    async fn fetch_weather(&self, location: &str, api_key: &str) -> Result<Option<WeatherData>> {
        let geo: Vec<GeoEntry> = fetch_json(
            self.client
                .get(self.endpoint.url("/geo/1.0/direct"))
                .query(&[("q", location), ("limit", "1"), ("appid", api_key)]),
            "Geocoding",
        )
        .await?;

        let Some(place) = geo.into_iter().next() else {
            debug!(location, "geocoder returned no matches");
            return Ok(None);
        };

        let lat = place.lat.to_string();
        let lon = place.lon.to_string();
        let conditions: Conditions = fetch_json(
            self.client.get(self.endpoint.url("/data/2.5/weather")).query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ]),
            "Weather API",
        )
        .await?;

        let name = place.name.unwrap_or_else(|| location.to_string());
        let display = match place.country.filter(|c| !c.is_empty()) {
            Some(country) => format!("{name}, {country}"),
            None => name,
        };
        let first = conditions.weather.into_iter().next();
        let (description, icon) = match first {
            Some(w) => (
                w.description.unwrap_or_else(|| "Unknown".to_string()),
                w.icon.unwrap_or_default(),
            ),
            None => ("Unknown".to_string(), String::new()),
        };

        Ok(Some(WeatherData {
            location: display,
            temperature: round_half_up(conditions.main.temp),
            description,
            humidity: round_half_up(conditions.main.humidity).max(0) as u32,
            wind_speed: conditions.wind.map(|w| w.speed).unwrap_or(0.0),
            icon,
        }))
    }
}

/// Nearest integer with halves going toward positive infinity, so -2.5 becomes -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn weather_summary(data: &WeatherData) -> String {
    format!(
        "It's {}°C and {} in {}. Humidity is {}% and wind speed is {} m/s.",
        data.temperature, data.description, data.location, data.humidity, data.wind_speed
    )
}

#[async_trait]
impl Plugin for WeatherPlugin {
    fn kind(&self) -> PluginKind {
        PluginKind::Weather
    }

    fn description(&self) -> &str {
        "Current weather conditions for a named location"
    }

    fn is_configured(&self) -> bool {
        self.endpoint.api_key().is_some()
    }

    async fn execute(&self, request: PluginRequest) -> Result<PluginResult> {
        match request {
            PluginRequest::Weather { location } => Ok(self.lookup(&location).await),
            other => Err(LexiError::Runtime(format!(
                "weather plugin cannot handle a {} request",
                other.kind()
            ))),
        }
    }
}
