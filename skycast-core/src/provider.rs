use crate::error::WeatherError;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Days of multi-day forecast requested when the caller does not say
/// otherwise.
pub const DEFAULT_FORECAST_DAYS: u8 = 5;

/// Raw forecast payload as returned by the forecast endpoint. Field names
/// mirror the wire format; [`crate::normalize`] turns this into the view
/// model.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub location: ApiLocation,
    pub current: ApiCurrent,
    pub forecast: ApiForecast,
}

/// Only the canonical resolved name is consumed downstream; the endpoint's
/// other location fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiLocation {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConditionText {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCurrent {
    pub temp_f: f64,
    pub feelslike_f: f64,
    pub humidity: u8,
    pub wind_mph: f64,
    pub vis_miles: f64,
    pub pressure_in: f64,
    pub uv: f64,
    pub condition: ApiConditionText,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiForecast {
    pub forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiForecastDay {
    /// Local date, `YYYY-MM-DD`.
    pub date: String,
    pub day: ApiDay,
    #[serde(default)]
    pub hour: Vec<ApiHour>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDay {
    pub maxtemp_f: f64,
    pub mintemp_f: f64,
    pub condition: ApiConditionText,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiHour {
    /// Local timestamp, `YYYY-MM-DD HH:MM`.
    pub time: String,
    pub temp_f: f64,
    pub condition: ApiConditionText,
}

/// One candidate from the location-search endpoint, in API relevance order.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCity {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
}

/// Remote weather backend. The production implementation is
/// [`WeatherApiClient`]; controllers take the trait so tests can substitute
/// canned responses.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Fetch current conditions plus an hourly and multi-day forecast for
    /// `query`.
    async fn forecast(&self, query: &str, days: u8) -> Result<ForecastResponse, WeatherError>;

    /// Look up location candidates matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<SearchCity>, WeatherError>;
}
