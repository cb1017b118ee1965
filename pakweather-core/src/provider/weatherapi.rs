use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{City, Reading};

use super::{Omission, ProviderResult, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` and hand back the body of a success response.
    async fn get_body(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, Omission> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| Omission::ProviderUnavailable {
                status: None,
                detail: format!("Failed to send request to WeatherAPI.com ({endpoint}): {e}"),
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| Omission::ProviderUnavailable {
            status: Some(status.as_u16()),
            detail: format!("Failed to read WeatherAPI {endpoint} response body: {e}"),
        })?;

        if status != reqwest::StatusCode::OK {
            return Err(Omission::ProviderUnavailable {
                status: Some(status.as_u16()),
                detail: format!("WeatherAPI {endpoint} request failed: {}", truncate_body(&body)),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    avghumidity: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaHistoryResponse {
    forecast: WaForecast,
}

fn parse_current(body: &str) -> ProviderResult {
    let parsed: WaResponse = serde_json::from_str(body).map_err(|e| {
        Omission::MalformedResponse(format!("Failed to parse WeatherAPI current JSON: {e}"))
    })?;

    Ok(Reading {
        temperature_celsius: parsed.current.temp_c,
        humidity_percent: parsed.current.humidity,
        condition: parsed.current.condition.text,
    })
}

fn parse_history(body: &str) -> ProviderResult {
    let parsed: WaHistoryResponse = serde_json::from_str(body).map_err(|e| {
        Omission::MalformedResponse(format!("Failed to parse WeatherAPI history JSON: {e}"))
    })?;

    let day = parsed.forecast.forecastday.into_iter().next().ok_or_else(|| {
        Omission::MalformedResponse("WeatherAPI response contained no forecastday data".into())
    })?;

    Ok(Reading {
        temperature_celsius: day.day.avgtemp_c,
        humidity_percent: day.day.avghumidity,
        condition: day.day.condition.text,
    })
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, city: City) -> ProviderResult {
        tracing::debug!(%city, "requesting current conditions");
        let body = self.get_body("current.json", &[("q", city.as_str())]).await?;
        parse_current(&body)
    }

    async fn history(&self, city: City, date: NaiveDate) -> ProviderResult {
        let dt = date.format("%Y-%m-%d").to_string();
        tracing::debug!(%city, %dt, "requesting historical conditions");
        let body = self
            .get_body("history.json", &[("q", city.as_str()), ("dt", dt.as_str())])
            .await?;
        parse_history(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
