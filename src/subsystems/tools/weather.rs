//! Current-conditions client for an Open-Meteo-style forecast API.
//!
//! Unauthenticated, one fixed coordinate pair. Unlike the calendar client
//! this one is unguarded: transport, status and decode failures are returned
//! as [`ToolError`] and the caller decides what the user sees.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ToolError, build_http_client, check_status, decode};
use crate::config::WeatherConfig;

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_base_url: String,
    latitude: f64,
    longitude: f64,
    temperature_unit: String,
    windspeed_unit: String,
    location_label: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig, location_label: &str) -> Result<Self, ToolError> {
        Ok(Self {
            client: build_http_client(config.timeout_seconds)?,
            api_base_url: config.api_base_url.clone(),
            latitude: config.latitude,
            longitude: config.longitude,
            temperature_unit: config.temperature_unit.clone(),
            windspeed_unit: config.windspeed_unit.clone(),
            location_label: location_label.to_string(),
        })
    }

    /// Fetch and format current temperature and wind speed.
    pub async fn current(&self) -> Result<String, ToolError> {
        let url = format!("{}/v1/forecast", self.api_base_url);
        let latitude = self.latitude.to_string();
        let longitude = self.longitude.to_string();
        debug!(%url, %latitude, %longitude, "fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("temperature_unit", self.temperature_unit.as_str()),
                ("windspeed_unit", self.windspeed_unit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;

        let forecast: Forecast = decode(check_status(response).await?).await?;
        let now = forecast.current_weather;
        Ok(format!(
            "🌤️ Weather at {}: {}{}, wind speed {} {}",
            self.location_label,
            format_reading(now.temperature),
            temperature_symbol(&self.temperature_unit),
            format_reading(now.windspeed),
            windspeed_label(&self.windspeed_unit),
        ))
    }
}

/// Whole readings keep one decimal (`72.0`); others print as received.
fn format_reading(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn temperature_symbol(unit: &str) -> &'static str {
    match unit {
        "fahrenheit" => "°F",
        _ => "°C",
    }
}

fn windspeed_label(unit: &str) -> &'static str {
    match unit {
        "mph" => "mph",
        "ms" => "m/s",
        "kn" => "kn",
        _ => "km/h",
    }
}

#[derive(Debug, Deserialize)]
struct Forecast {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
}
