//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` (or an explicit path), then applies
//! `OFFICE_ASSISTANT_LOG_LEVEL`. Secrets never come from TOML: the calendar
//! bearer token is read from `CALENDAR_API_TOKEN` and the completion key from
//! `LLM_API_KEY`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Calendar provider (Calendly-style REST API) settings.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// API root, without trailing slash (e.g. `https://api.calendly.com`).
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

/// Weather provider (Open-Meteo-style forecast API) settings.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_base_url: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Sent as `temperature_unit`; the reply is labelled `°F` for `fahrenheit`.
    pub temperature_unit: String,
    /// Sent as `windspeed_unit`.
    pub windspeed_unit: String,
    pub timeout_seconds: u64,
}

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"`, `"openai"`, `"openai-compatible"`).
    /// Maps to `default` in `[llm]`.
    pub provider: String,
    pub openai: OpenAiConfig,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub assistant_name: String,
    pub log_level: String,
    /// Human label for the weather coordinates, shown in weather replies.
    pub location_label: String,
    pub calendar: CalendarConfig,
    pub weather: WeatherConfig,
    pub llm: LlmConfig,
    /// From `CALENDAR_API_TOKEN`.
    pub calendar_token: Option<String>,
    /// From `LLM_API_KEY`; `None` for keyless local models.
    pub llm_api_key: Option<String>,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    assistant: RawAssistant,
    #[serde(default)]
    calendar: RawCalendar,
    #[serde(default)]
    weather: RawWeather,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawAssistant {
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_location_label")]
    location_label: String,
}

#[derive(Deserialize)]
struct RawCalendar {
    #[serde(default = "default_calendar_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawCalendar {
    fn default() -> Self {
        Self {
            api_base_url: default_calendar_api_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawWeather {
    #[serde(default = "default_weather_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_latitude")]
    latitude: f64,
    #[serde(default = "default_longitude")]
    longitude: f64,
    #[serde(default = "default_temperature_unit")]
    temperature_unit: String,
    #[serde(default = "default_windspeed_unit")]
    windspeed_unit: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawWeather {
    fn default() -> Self {
        Self {
            api_base_url: default_weather_api_base_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            temperature_unit: default_temperature_unit(),
            windspeed_unit: default_windspeed_unit(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_location_label() -> String { "AvePoint Jersey City office".to_string() }
fn default_calendar_api_base_url() -> String { "https://api.calendly.com".to_string() }
fn default_weather_api_base_url() -> String { "https://api.open-meteo.com".to_string() }
fn default_latitude() -> f64 { 40.71 }
fn default_longitude() -> f64 { -74.01 }
fn default_temperature_unit() -> String { "fahrenheit".to_string() }
fn default_windspeed_unit() -> String { "mph".to_string() }
fn default_timeout_seconds() -> u64 { 30 }
fn default_llm_provider() -> String { "dummy".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-3.5-turbo".to_string() }
fn default_openai_temperature() -> f32 { 0.7 }
fn default_openai_timeout_seconds() -> u64 { 60 }

/// Load config from `explicit_path`, `OFFICE_ASSISTANT_CONFIG`, or
/// `config/default.toml`, in that order, then apply env overrides.
pub fn load(explicit_path: Option<&str>) -> Result<Config, AppError> {
    let env_path = env::var("OFFICE_ASSISTANT_CONFIG").ok();
    let path = explicit_path
        .or(env_path.as_deref())
        .map(expand_home)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let log_level_override = env::var("OFFICE_ASSISTANT_LOG_LEVEL").ok();
    let mut config = load_from(&path, log_level_override.as_deref())?;
    config.calendar_token = non_empty_env("CALENDAR_API_TOKEN");
    config.llm_api_key = non_empty_env("LLM_API_KEY");
    Ok(config)
}

/// Internal loader — accepts an explicit path and an optional level override.
/// Secrets are left unset; tests pass everything explicitly instead of
/// mutating env vars.
pub fn load_from(path: &Path, log_level_override: Option<&str>) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let a = parsed.assistant;
    if a.name.trim().is_empty() {
        return Err(AppError::Config("assistant.name must not be empty".into()));
    }
    let log_level = log_level_override.unwrap_or(&a.log_level).to_string();
    crate::logger::parse_level(&log_level)
        .map_err(|e| AppError::Config(format!("assistant.log_level: {e}")))?;

    Ok(Config {
        assistant_name: a.name,
        log_level,
        location_label: a.location_label,
        calendar: CalendarConfig {
            api_base_url: trim_base(parsed.calendar.api_base_url),
            timeout_seconds: parsed.calendar.timeout_seconds,
        },
        weather: WeatherConfig {
            api_base_url: trim_base(parsed.weather.api_base_url),
            latitude: parsed.weather.latitude,
            longitude: parsed.weather.longitude,
            temperature_unit: parsed.weather.temperature_unit,
            windspeed_unit: parsed.weather.windspeed_unit,
            timeout_seconds: parsed.weather.timeout_seconds,
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        calendar_token: None,
        llm_api_key: None,
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

impl Config {
    /// Config pointing every provider at `base_url` (a local mock server),
    /// with the dummy LLM unless the caller switches it.
    ///
    /// Public so the integration tests under `tests/` can build an
    /// assistant against their mock provider; the binary never calls it.
    pub fn for_base_url(base_url: &str) -> Self {
        let base = trim_base(base_url.to_string());
        Self {
            assistant_name: "test".into(),
            log_level: "info".into(),
            location_label: default_location_label(),
            calendar: CalendarConfig {
                api_base_url: base.clone(),
                timeout_seconds: 5,
            },
            weather: WeatherConfig {
                api_base_url: base.clone(),
                latitude: default_latitude(),
                longitude: default_longitude(),
                temperature_unit: default_temperature_unit(),
                windspeed_unit: default_windspeed_unit(),
                timeout_seconds: 5,
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                openai: OpenAiConfig {
                    api_base_url: format!("{base}/v1/chat/completions"),
                    model: default_openai_model(),
                    temperature: default_openai_temperature(),
                    timeout_seconds: 5,
                },
            },
            calendar_token: Some("test-token".into()),
            llm_api_key: None,
        }
    }
}
