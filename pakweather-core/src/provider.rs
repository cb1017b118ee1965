use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::model::{City, Reading};

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

/// Why an observation is missing from the working table.
///
/// Both variants lead to the same outcome (the row is left out); they are kept
/// apart so the reason can be logged and inspected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Omission {
    /// Non-success status, or the request never got a response.
    #[error("provider unavailable{}: {detail}", status_suffix(.status))]
    ProviderUnavailable { status: Option<u16>, detail: String },

    /// Success status, but the body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl Omission {
    pub fn status(&self) -> Option<u16> {
        match self {
            Omission::ProviderUnavailable { status, .. } => *status,
            Omission::MalformedResponse(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Omission::MalformedResponse(_))
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

pub type ProviderResult = Result<Reading, Omission>;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Conditions right now.
    async fn current(&self, city: City) -> ProviderResult;

    /// Day-level averages for a past calendar date.
    async fn history(&self, city: City, date: NaiveDate) -> ProviderResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omission_display_includes_status() {
        let err = Omission::ProviderUnavailable { status: Some(503), detail: "busy".into() };
        assert_eq!(err.to_string(), "provider unavailable (status 503): busy");
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_malformed());
    }

    #[test]
    fn omission_display_without_status() {
        let err =
            Omission::ProviderUnavailable { status: None, detail: "connection refused".into() };
        assert_eq!(err.to_string(), "provider unavailable: connection refused");
    }

    #[test]
    fn malformed_omission() {
        let err = Omission::MalformedResponse("no forecastday data".into());
        assert!(err.is_malformed());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "malformed response: no forecastday data");
    }
}
