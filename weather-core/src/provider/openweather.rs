use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    config::DEFAULT_BASE_URL,
    error::{FetchFailure, LookupError},
    model::WeatherResult,
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another origin, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherResult, LookupError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(FetchFailure::from)?;

        let status = res.status();
        if !status.is_success() {
            return Err(rejected(city, status, res.text().await));
        }

        let body = res.text().await.map_err(FetchFailure::from)?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(FetchFailure::from)?;

        parsed.into_result().map_err(LookupError::from)
    }
}

/// Any non-success status is a `NotFound`. The body is only kept for
/// diagnostics, so a body that cannot be read is recorded as empty.
fn rejected<E: std::fmt::Display>(
    city: &str,
    status: StatusCode,
    body: Result<String, E>,
) -> LookupError {
    let body = match body {
        Ok(text) => truncate_body(&text),
        Err(err) => {
            tracing::debug!(error = %err, "could not read OpenWeather error body");
            String::new()
        }
    };
    tracing::debug!(%status, %body, city, "OpenWeather rejected lookup");

    LookupError::NotFound { status, body }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, FetchFailure> {
        if self.main.humidity > 100 {
            return Err(FetchFailure::Incomplete("main.humidity outside 0..=100"));
        }

        // Only the first reported condition is shown.
        let condition_description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or(FetchFailure::Incomplete("weather[0].description"))?;

        Ok(WeatherResult {
            city_name: self.name,
            temperature_celsius: self.main.temp,
            wind_speed_mps: self.wind.speed,
            humidity_pct: self.main.humidity,
            condition_description,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn lookup(&self, city: &str) -> Result<WeatherResult, LookupError> {
        let result = self.fetch_current(city).await;

        if let Err(LookupError::NetworkOrParseFailure(cause)) = &result {
            tracing::debug!(error = %cause, city, "OpenWeather lookup failed");
        }

        result
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
