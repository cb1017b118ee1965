//! Core library for the `pakweather` dashboard.
//!
//! This crate defines:
//! - The working table of per-city observations
//! - The WeatherAPI.com provider and the fetch cycle over all cities
//! - A one-hour result cache
//! - Single-city selection and city-by-date pivots
//! - Icon buckets and configuration handling
//!
//! It is used by `pakweather-cli`, but can also be reused by other front ends.

pub mod cache;
pub mod clock;
pub mod config;
pub mod fetcher;
pub mod icon;
pub mod model;
pub mod provider;
pub mod view;

pub use cache::{ResultCache, TableSource};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use fetcher::{CityOutcome, FetchReport, Fetcher, fetch_all, fetch_report};
pub use icon::{ConditionCategory, HumidityBand, TemperatureBand};
pub use model::{City, Day, Metric, ObservationTable, Reading, WeatherObservation};
pub use provider::{Omission, WeatherApiProvider, WeatherProvider};
pub use view::{PivotMatrix, PivotRow, Selection, pivot, select};
