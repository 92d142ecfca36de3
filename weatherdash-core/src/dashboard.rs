//! Dashboard state: the current search outcome, the unit preference and the input buffer.

use serde::Serialize;

use crate::{
    forecast::ForecastStrategy,
    model::{Query, RawReport, Unit, WeatherReport},
    provider::{FALLBACK_MESSAGE, FetchError},
    view::{self, Theme},
};

/// Outcome of the most recent search. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Empty,
    Loading,
    Success(WeatherReport),
    Failure(String),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            SearchState::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The query was accepted and the dashboard is now loading.
    Started(Query),
    /// The input was blank; the dashboard shows the validation message.
    Rejected,
    /// Another search is still in flight; nothing changed.
    Suppressed,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    input: String,
    state: SearchState,
    unit: Unit,
    strategy: ForecastStrategy,
}

impl Dashboard {
    pub fn new(unit: Unit, strategy: ForecastStrategy) -> Self {
        Self {
            unit,
            strategy,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn toggle_unit(&mut self) -> Unit {
        self.unit = self.unit.toggled();
        self.unit
    }

    /// Replaces the input buffer with `text` and starts a search, unless one is in flight.
    pub fn submit(&mut self, text: &str) -> Submission {
        if self.state.is_loading() {
            tracing::debug!("Search already in flight, ignoring submission");
            return Submission::Suppressed;
        }
        self.set_input(text);
        self.begin_search()
    }

    /// Validates the input buffer and moves to `Loading`.
    pub fn begin_search(&mut self) -> Submission {
        if self.state.is_loading() {
            tracing::debug!("Search already in flight, ignoring submission");
            return Submission::Suppressed;
        }

        match Query::parse(&self.input) {
            Ok(query) => {
                tracing::info!(city = %query, "Search started");
                self.state = SearchState::Loading;
                Submission::Started(query)
            }
            Err(err) => {
                self.state = SearchState::Failure(err.to_string());
                Submission::Rejected
            }
        }
    }

    /// Replaces `Loading` with the final outcome of the fetch.
    pub fn finish_search(&mut self, outcome: Result<RawReport, FetchError>) {
        self.state = match outcome {
            Ok(raw) => {
                let forecast = self.strategy.reduce(&raw.samples);
                tracing::info!(
                    location = %raw.current.location_name,
                    days = forecast.len(),
                    "Search succeeded"
                );
                self.input.clear();
                SearchState::Success(WeatherReport {
                    current: raw.current,
                    forecast,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Search failed");
                SearchState::Failure(err.user_message())
            }
        };
    }

    /// Ends a search whose fetch never completed, so new submissions are accepted again.
    pub fn abandon_search(&mut self) {
        if self.state.is_loading() {
            tracing::warn!("Search abandoned before the provider answered");
            self.state = SearchState::Failure(FALLBACK_MESSAGE.to_string());
        }
    }

    pub fn theme(&self) -> Theme {
        view::theme(
            self.state
                .report()
                .map(|r| r.current.condition.label.as_str()),
        )
    }

    /// Derive everything a front end needs to draw the dashboard.
    pub fn view(&self) -> DashboardView {
        let unit = self.unit;
        let report = self.state.report();
        let theme = self.theme();

        DashboardView {
            theme,
            gradient: theme.gradient(),
            unit,
            loading: self.state.is_loading(),
            error: self.state.error().map(str::to_string),
            current: report.map(|r| CurrentCard::new(r, unit)),
            forecast: report
                .map(|r| {
                    r.forecast
                        .iter()
                        .map(|day| DayCard {
                            date: view::format_date(day.timestamp),
                            icon_url: day.condition.icon.as_deref().map(view::icon_url),
                            temperature: view::format_temperature(day.temperature_c, unit),
                            description: day.condition.description.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            show_empty_prompt: matches!(self.state, SearchState::Empty),
        }
    }
}

/// Serializable snapshot of the rendered dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub theme: Theme,
    pub gradient: [&'static str; 3],
    pub unit: Unit,
    pub loading: bool,
    pub error: Option<String>,
    pub current: Option<CurrentCard>,
    pub forecast: Vec<DayCard>,
    pub show_empty_prompt: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentCard {
    pub location: String,
    pub icon_url: Option<String>,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
}

impl CurrentCard {
    fn new(report: &WeatherReport, unit: Unit) -> Self {
        let current = &report.current;
        let location = if current.country.is_empty() {
            current.location_name.clone()
        } else {
            format!("{}, {}", current.location_name, current.country)
        };

        Self {
            location,
            icon_url: current.condition.icon.as_deref().map(view::icon_url),
            temperature: view::format_temperature(current.temperature_c, unit),
            description: current.condition.description.clone(),
            feels_like: view::format_temperature(current.feels_like_c, unit),
            humidity: format!("{}%", current.humidity_pct),
            wind: format!("{} m/s", current.wind_speed_mps.round() as i64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCard {
    pub date: String,
    pub icon_url: Option<String>,
    pub temperature: String,
    pub description: String,
}
