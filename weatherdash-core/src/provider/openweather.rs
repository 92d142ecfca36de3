use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    config::Config,
    model::{Condition, CurrentConditions, ForecastSample, Query, RawReport},
};

use super::{ApiKey, FetchError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Build a provider honoring the configured base URL and request timeout.
    pub fn from_config(config: &Config, api_key: ApiKey) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        let mut provider = Self::new(api_key).with_http_client(http);
        if let Some(base_url) = config.base_url() {
            provider = provider.with_base_url(base_url);
        }
        Ok(provider)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &Query,
    ) -> Result<T, FetchError> {
        tracing::debug!(endpoint, city = %query, "Requesting OpenWeather");

        let url = format!("{}/{}", self.base_url, endpoint);
        let res = self
            .http
            .get(url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.expose()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint,
                source: source.without_url(),
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint,
                source: source.without_url(),
            })?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::debug!(endpoint, %status, body = %truncate_body(&body), "OpenWeather returned an error");
            return Err(FetchError::Provider {
                endpoint,
                status,
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }

    async fn fetch_current(&self, query: &Query) -> Result<CurrentConditions, FetchError> {
        let parsed: OwCurrentResponse = self.get_json(CURRENT_ENDPOINT, query).await?;

        Ok(CurrentConditions {
            location_name: parsed.name,
            country: parsed.sys.country.unwrap_or_default(),
            condition: primary_condition(parsed.weather),
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
        })
    }

    async fn fetch_forecast(&self, query: &Query) -> Result<Vec<ForecastSample>, FetchError> {
        let parsed: OwForecastResponse = self.get_json(FORECAST_ENDPOINT, query).await?;

        let samples = parsed
            .list
            .into_iter()
            .filter_map(|entry| {
                let Some(timestamp) = DateTime::<Utc>::from_timestamp(entry.dt, 0) else {
                    tracing::warn!(dt = entry.dt, "Skipping forecast sample with invalid timestamp");
                    return None;
                };
                Some(ForecastSample {
                    timestamp,
                    temperature_c: entry.main.temp,
                    condition: primary_condition(entry.weather),
                })
            })
            .collect();

        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwSampleMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwSampleMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &Query) -> Result<RawReport, FetchError> {
        let (current, samples) =
            tokio::try_join!(self.fetch_current(query), self.fetch_forecast(query))?;

        tracing::debug!(city = %query, samples = samples.len(), "OpenWeather fetch complete");
        Ok(RawReport { current, samples })
    }
}

fn primary_condition(weather: Vec<OwWeather>) -> Condition {
    weather
        .into_iter()
        .next()
        .map(|w| Condition {
            label: w.main,
            description: w.description,
            icon: w.icon,
        })
        .unwrap_or_default()
}

/// Pulls `message` out of an OpenWeather error payload, if there is one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_extracted() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        assert_eq!(error_message(body).as_deref(), Some("city not found"));
    }

    #[test]
    fn error_message_tolerates_numeric_cod_and_garbage() {
        assert_eq!(
            error_message(r#"{"cod":401,"message":"Invalid API key."}"#).as_deref(),
            Some("Invalid API key.")
        );
        assert_eq!(error_message("<html>bad gateway</html>"), None);
        assert_eq!(error_message(r#"{"cod":"500"}"#), None);
    }

    #[test]
    fn missing_weather_descriptor_yields_empty_condition() {
        assert_eq!(primary_condition(Vec::new()), Condition::default());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(truncate_body(&body).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenWeatherProvider::new(ApiKey::new("k")).with_base_url("http://localhost:1234/");
        assert_eq!(provider.base_url(), "http://localhost:1234");
    }

    #[test]
    fn from_config_uses_configured_base_url() {
        let mut cfg = Config::default();
        cfg.set_api_key("k".into());
        cfg.openweather.as_mut().unwrap().base_url = Some("http://example.test/v".into());

        let provider = OpenWeatherProvider::from_config(&cfg, ApiKey::new("k")).unwrap();
        assert_eq!(provider.base_url(), "http://example.test/v");
    }

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_api_key() {
        let provider = OpenWeatherProvider::new(ApiKey::new("SECRET-KEY-123"))
            .with_base_url(format!("http://127.0.0.1:{}/data/2.5", closed_port()));

        let err = provider
            .fetch(&Query::parse("Paris").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }), "unexpected error: {err:?}");
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
        assert_eq!(err.user_message(), super::super::FALLBACK_MESSAGE);
    }
}
