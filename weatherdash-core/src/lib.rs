//! Core library for the `weatherdash` weather dashboard.
//!
//! This crate defines:
//! - Query validation and the search controller
//! - The OpenWeather client behind the `WeatherProvider` trait
//! - Forecast reduction to one sample per day
//! - Dashboard state and the derived view model
//! - Configuration & credentials handling
//!
//! It is used by `weatherdash-cli`, but any other front end can drive a `SearchController` too.

pub mod config;
pub mod controller;
pub mod dashboard;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod view;

pub use config::{Config, DisplayConfig, ProviderConfig};
pub use controller::SearchController;
pub use dashboard::{Dashboard, DashboardView, SearchState, Submission};
pub use forecast::ForecastStrategy;
pub use model::{Query, Unit, WeatherReport};
pub use provider::{ApiKey, FetchError, WeatherProvider, openweather::OpenWeatherProvider};
pub use view::Theme;
