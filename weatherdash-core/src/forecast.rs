//! Reduces a provider's sub-daily forecast to one representative sample per day.

use serde::{Deserialize, Serialize};

use crate::model::{ForecastDay, ForecastSample};

/// Samples per day at the provider's 3-hour resolution.
pub const SAMPLES_PER_DAY: usize = 8;

/// Upper bound on the number of days shown.
pub const MAX_DAYS: usize = 5;

/// How a day's representative sample is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastStrategy {
    /// Every eighth sample starting at index 0, regardless of clock time.
    #[default]
    Stride,
    /// First sample of each distinct UTC date.
    CalendarDay,
}

impl ForecastStrategy {
    pub fn reduce(self, samples: &[ForecastSample]) -> Vec<ForecastDay> {
        match self {
            ForecastStrategy::Stride => reduce(samples),
            ForecastStrategy::CalendarDay => reduce_by_date(samples),
        }
    }
}

/// Picks positions 0, 8, 16, 24, 32 and truncates to [`MAX_DAYS`].
///
/// A sequence shorter than 40 samples yields `ceil(n / 8)` days.
pub fn reduce(samples: &[ForecastSample]) -> Vec<ForecastDay> {
    samples
        .iter()
        .step_by(SAMPLES_PER_DAY)
        .take(MAX_DAYS)
        .map(ForecastDay::from)
        .collect()
}

/// Groups by UTC calendar date and keeps the earliest sample of each date.
///
/// Input is assumed to be chronologically ordered, as the provider returns it.
pub fn reduce_by_date(samples: &[ForecastSample]) -> Vec<ForecastDay> {
    let mut days: Vec<ForecastDay> = Vec::with_capacity(MAX_DAYS);

    for sample in samples {
        let date = sample.timestamp.date_naive();
        if days.last().is_some_and(|d| d.timestamp.date_naive() == date) {
            continue;
        }
        if days.len() == MAX_DAYS {
            break;
        }
        days.push(ForecastDay::from(sample));
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;
    use chrono::{DateTime, TimeZone, Utc};

    fn samples(n: usize, start: DateTime<Utc>) -> Vec<ForecastSample> {
        (0..n)
            .map(|i| ForecastSample {
                timestamp: start + chrono::Duration::hours(3 * i as i64),
                temperature_c: i as f64,
                condition: Condition {
                    label: "Clear".into(),
                    description: "clear sky".into(),
                    icon: Some("01d".into()),
                },
            })
            .collect()
    }

    fn indices(days: &[ForecastDay]) -> Vec<usize> {
        days.iter().map(|d| d.temperature_c as usize).collect()
    }

    fn midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap()
    }

    #[test]
    fn full_forecast_picks_every_eighth_sample() {
        let days = reduce(&samples(40, midnight()));
        assert_eq!(indices(&days), vec![0, 8, 16, 24, 32]);
    }

    #[test]
    fn output_is_capped_at_five_days() {
        let days = reduce(&samples(48, midnight()));
        assert_eq!(days.len(), MAX_DAYS);
    }

    #[test]
    fn short_forecast_does_not_panic() {
        assert!(reduce(&[]).is_empty());
        assert_eq!(indices(&reduce(&samples(1, midnight()))), vec![0]);
        assert_eq!(indices(&reduce(&samples(16, midnight()))), vec![0, 8]);
        assert_eq!(indices(&reduce(&samples(17, midnight()))), vec![0, 8, 16]);
    }

    #[test]
    fn reduction_is_deterministic() {
        let input = samples(40, midnight());
        assert_eq!(reduce(&input), reduce(&input));
    }

    #[test]
    fn calendar_day_realigns_to_date_boundaries() {
        // First sample at 21:00, so stride sampling would land late in each day.
        let start = Utc.with_ymd_and_hms(2026, 1, 5, 21, 0, 0).unwrap();
        let days = reduce_by_date(&samples(40, start));

        assert_eq!(days.len(), MAX_DAYS);
        assert_eq!(indices(&days), vec![0, 1, 9, 17, 25]);
        for pair in days.windows(2) {
            assert!(pair[0].timestamp.date_naive() < pair[1].timestamp.date_naive());
        }
    }

    #[test]
    fn strategy_dispatches() {
        let input = samples(40, midnight());
        assert_eq!(ForecastStrategy::Stride.reduce(&input), reduce(&input));
        assert_eq!(ForecastStrategy::CalendarDay.reduce(&input), reduce_by_date(&input));
    }
}
