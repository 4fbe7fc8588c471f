//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The lookup client for OpenWeather, behind the `WeatherProvider` trait
//! - The recent-cities tracker and the session state machine
//! - Theme and time-of-day selection used by the dashboard
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod recent;
pub mod session;
pub mod theme;

pub use config::{Config, OpenWeatherConfig};
pub use error::{FetchFailure, LookupError, LookupErrorKind, LookupFailure};
pub use model::WeatherResult;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use recent::{MAX_RECENT, RecentCities, record};
pub use session::{SearchTicket, Session, SessionState, SharedSession};
pub use theme::{Theme, TimeOfDay};
