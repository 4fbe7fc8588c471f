use crate::{Config, WeatherResult, error::LookupError, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`, sent to the provider exactly as given.
    async fn lookup(&self, city: &str) -> Result<WeatherResult, LookupError>;
}

/// Construct the OpenWeather provider from config and the resolved credential.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    Ok(Box::new(OpenWeatherProvider::with_base_url(api_key, config.base_url())))
}
