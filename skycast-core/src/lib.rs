//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client and its raw payload types
//! - Normalization of raw payloads into the UI view model
//! - The fetch and search-suggestion controllers with their
//!   debounce/staleness semantics
//!
//! It is used by `skycast-cli`, but can also be reused by other frontends.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod search;

pub use config::{Config, DEFAULT_LOCATION};
pub use error::WeatherError;
pub use fetch::FetchController;
pub use model::{Condition, DaySlot, HourlySlot, Location, RequestState, WeatherSnapshot};
pub use normalize::{NormalizedForecast, normalize};
pub use provider::{DEFAULT_FORECAST_DAYS, WeatherApi, WeatherApiClient};
pub use search::{SuggestionController, resolve_selection};
