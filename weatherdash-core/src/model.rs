use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message shown when a search is submitted without a city name.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", EMPTY_QUERY_MESSAGE)]
    EmptyQuery,
}

/// A place name ready to be handed to a provider: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display unit preference. Stored temperatures are always Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Celsius => f.write_str("celsius"),
            Unit::Fahrenheit => f.write_str("fahrenheit"),
        }
    }
}

/// Primary weather descriptor as reported by the provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    /// Short category, e.g. "Clear" or "Rain".
    pub label: String,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    pub condition: Condition,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// One raw forecast sample (3-hour resolution for OpenWeather).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub condition: Condition,
}

/// Representative forecast for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub timestamp: DateTime<Utc>,
    pub condition: Condition,
    pub temperature_c: f64,
}

impl From<&ForecastSample> for ForecastDay {
    fn from(sample: &ForecastSample) -> Self {
        Self {
            timestamp: sample.timestamp,
            condition: sample.condition.clone(),
            temperature_c: sample.temperature_c,
        }
    }
}

/// What a provider hands back for one search, before forecast reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReport {
    pub current: CurrentConditions,
    pub samples: Vec<ForecastSample>,
}

/// A completed search: current conditions plus at most five days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}
