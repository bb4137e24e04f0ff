//! Pure transformation from raw WeatherAPI payloads to the view model.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::WeatherError;
use crate::model::{Condition, DaySlot, HourlySlot, Location, WeatherSnapshot};
use crate::provider::{ForecastResponse, SearchCity};

/// Hourly entries shown for the current day.
pub const HOURLY_SLOTS: usize = 6;

/// Search candidates kept in the suggestion list.
pub const MAX_SUGGESTIONS: usize = 5;

/// A normalized forecast plus the provider's canonical name for the queried
/// location, which may differ from what the user typed (corrected spelling,
/// added region). Callers adopt it as the new current-location label.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedForecast {
    pub resolved_name: String,
    pub snapshot: WeatherSnapshot,
}

/// Convert a raw forecast response into a [`WeatherSnapshot`].
///
/// Pure and side-effect free. Fails with
/// [`WeatherError::MalformedResponse`] only on structural defects (empty
/// forecast-day series, unparseable timestamps); unexpected condition text
/// is handled by the classifier's fallback instead.
pub fn normalize(raw: &ForecastResponse) -> Result<NormalizedForecast, WeatherError> {
    let today = raw
        .forecast
        .forecastday
        .first()
        .ok_or_else(|| WeatherError::malformed("forecast contained no days"))?;

    let hourly = today
        .hour
        .iter()
        .take(HOURLY_SLOTS)
        .map(|hour| {
            Ok(HourlySlot {
                time: hour_label(&hour.time)?,
                temp: round_whole(hour.temp_f),
                condition: Condition::classify(&hour.condition.text),
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    let forecast = raw
        .forecast
        .forecastday
        .iter()
        .map(|day| {
            Ok(DaySlot {
                day: weekday_label(&day.date)?,
                high: round_whole(day.day.maxtemp_f),
                low: round_whole(day.day.mintemp_f),
                condition: Condition::classify(&day.day.condition.text),
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    let current = &raw.current;
    let snapshot = WeatherSnapshot {
        temperature: round_whole(current.temp_f),
        feels_like: round_whole(current.feelslike_f),
        humidity: current.humidity,
        wind_speed: round_whole(current.wind_mph),
        visibility: round_whole(current.vis_miles),
        pressure: current.pressure_in,
        uv_index: current.uv,
        condition: Condition::classify(&current.condition.text),
        hourly,
        forecast,
    };

    Ok(NormalizedForecast { resolved_name: raw.location.name.clone(), snapshot })
}

/// Keep the first [`MAX_SUGGESTIONS`] search candidates, preserving the
/// API's relevance order.
pub fn suggestions_from(cities: Vec<SearchCity>) -> Vec<Location> {
    cities
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|city| Location { name: city.name, region: city.region, country: city.country })
        .collect()
}

/// "2026-08-23 15:00" → "3 PM".
fn hour_label(time: &str) -> Result<String, WeatherError> {
    let parsed = NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M")
        .map_err(|e| WeatherError::malformed(format!("bad hourly timestamp '{time}': {e}")))?;

    Ok(parsed.format("%-I %p").to_string())
}

/// "2026-08-23" → "Sun".
fn weekday_label(date: &str) -> Result<String, WeatherError> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| WeatherError::malformed(format!("bad forecast date '{date}': {e}")))?;

    Ok(parsed.format("%a").to_string())
}

/// Round half away from zero, matching `f64::round`.
fn round_whole(value: f64) -> i32 {
    value.round() as i32
}
