//! Pure presentation helpers. Nothing here mutates stored data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Unit;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Visual theme derived from the current condition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunder,
    #[default]
    Default,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Clear => "clear",
            Theme::Clouds => "clouds",
            Theme::Rain => "rain",
            Theme::Snow => "snow",
            Theme::Thunder => "thunder",
            Theme::Default => "default",
        }
    }

    /// Background gradient stops, top-left to bottom-right.
    pub fn gradient(&self) -> [&'static str; 3] {
        match self {
            Theme::Clear => ["#facc15", "#fb923c", "#f87171"],
            Theme::Clouds => ["#9ca3af", "#6b7280", "#4b5563"],
            Theme::Rain => ["#3b82f6", "#2563eb", "#4338ca"],
            Theme::Snow => ["#dbeafe", "#bfdbfe", "#93c5fd"],
            Theme::Thunder => ["#374151", "#6b21a8", "#312e81"],
            Theme::Default => ["#60a5fa", "#3b82f6", "#2563eb"],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a stored Celsius value to the display unit, rounded half away from zero.
pub fn convert(celsius: f64, unit: Unit) -> i64 {
    let value = match unit {
        Unit::Celsius => celsius,
        Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    };
    value.round() as i64
}

pub fn format_temperature(celsius: f64, unit: Unit) -> String {
    format!("{}°{}", convert(celsius, unit), unit.symbol())
}

/// Short day label such as "Mon, Jan 5". The timestamp is rendered as-is in UTC.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %b %-d").to_string()
}

/// Maps a condition label to a theme. Keywords are checked in a fixed order and the first hit wins.
pub fn theme(label: Option<&str>) -> Theme {
    let Some(label) = label else {
        return Theme::Default;
    };
    let label = label.to_lowercase();

    if label.contains("clear") {
        Theme::Clear
    } else if label.contains("cloud") {
        Theme::Clouds
    } else if label.contains("rain") || label.contains("drizzle") {
        Theme::Rain
    } else if label.contains("snow") {
        Theme::Snow
    } else if label.contains("thunder") {
        Theme::Thunder
    } else {
        Theme::Default
    }
}

pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE_URL}/{code}@2x.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn convert_pins_known_values() {
        assert_eq!(convert(20.0, Unit::Celsius), 20);
        assert_eq!(convert(20.0, Unit::Fahrenheit), 68);
        assert_eq!(convert(0.0, Unit::Fahrenheit), 32);
        assert_eq!(convert(-10.0, Unit::Fahrenheit), 14);
    }

    #[test]
    fn convert_rounds_half_away_from_zero() {
        assert_eq!(convert(15.4, Unit::Celsius), 15);
        assert_eq!(convert(2.5, Unit::Celsius), 3);
        assert_eq!(convert(-2.5, Unit::Celsius), -3);
        // 15.4 * 1.8 + 32 = 59.72
        assert_eq!(convert(15.4, Unit::Fahrenheit), 60);
    }

    #[test]
    fn temperature_label_carries_unit() {
        assert_eq!(format_temperature(15.4, Unit::Celsius), "15°C");
        assert_eq!(format_temperature(15.4, Unit::Fahrenheit), "60°F");
    }

    #[test]
    fn date_label_is_short_form() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(format_date(ts), "Mon, Jan 5");

        let ts = Utc.with_ymd_and_hms(2026, 10, 16, 23, 59, 59).unwrap();
        assert_eq!(format_date(ts), "Fri, Oct 16");
    }

    #[test]
    fn theme_matches_keywords() {
        assert_eq!(theme(Some("Clear")), Theme::Clear);
        assert_eq!(theme(Some("light rain")), Theme::Rain);
        assert_eq!(theme(Some("Drizzle")), Theme::Rain);
        assert_eq!(theme(Some("scattered clouds")), Theme::Clouds);
        assert_eq!(theme(Some("SNOW")), Theme::Snow);
        assert_eq!(theme(Some("Thunderstorm")), Theme::Thunder);
    }

    #[test]
    fn theme_falls_back_to_default() {
        assert_eq!(theme(None), Theme::Default);
        assert_eq!(theme(Some("haze")), Theme::Default);
        assert_eq!(theme(Some("")), Theme::Default);
    }

    #[test]
    fn theme_priority_order_is_fixed() {
        assert_eq!(theme(Some("cloud with rain")), Theme::Clouds);
        assert_eq!(theme(Some("rain turning to snow")), Theme::Rain);
        assert_eq!(theme(Some("clear after thunder")), Theme::Clear);
    }

    #[test]
    fn icon_url_uses_cdn_pattern() {
        assert_eq!(icon_url("01d"), "https://openweathermap.org/img/wn/01d@2x.png");
    }
}
