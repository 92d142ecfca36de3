use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::{self, Debug};

use crate::model::{Query, RawReport};

pub mod openweather;

/// Message shown when the provider gave no usable explanation.
pub const FALLBACK_MESSAGE: &str = "City not found. Please try again.";

/// Opaque provider credential. Never printed, not even in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{endpoint} request failed with status {status}")]
    Provider {
        endpoint: &'static str,
        status: StatusCode,
        message: Option<String>,
    },
    #[error("{endpoint} request could not be completed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Text suitable for the user: the provider's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Provider {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the raw forecast for `query`.
    ///
    /// Both parts must succeed; a failure of either fails the whole call.
    async fn fetch(&self, query: &Query) -> Result<RawReport, FetchError>;
}
