use serde::{Deserialize, Serialize};

/// Simplified weather condition, reduced from the provider's free-text
/// descriptions to the four categories the app actually renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl Condition {
    /// Classify free-text condition descriptions ("Patchy light drizzle",
    /// "Partly cloudy", ...) into a [`Condition`].
    ///
    /// Case-insensitive substring match; rule order matters because a string
    /// like "Rain turning to snow" hits several rules and the first match
    /// must win. Unrecognized text falls back to [`Condition::Sunny`] rather
    /// than erroring.
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("sun") || text.contains("clear") {
            Condition::Sunny
        } else if text.contains("rain") || text.contains("drizzle") {
            Condition::Rainy
        } else if text.contains("snow") || text.contains("blizzard") {
            Condition::Snowy
        } else if text.contains("cloud") || text.contains("overcast") {
            Condition::Cloudy
        } else {
            Condition::Sunny
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::Cloudy => "cloudy",
            Condition::Rainy => "rainy",
            Condition::Snowy => "snowy",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A location candidate returned by the search endpoint. Immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

impl Location {
    /// Label shown in the suggestion list: `"name, region"` when the
    /// provider supplied a region, otherwise `"name, country"`.
    pub fn display_name(&self) -> String {
        if self.region.is_empty() {
            format!("{}, {}", self.name, self.country)
        } else {
            format!("{}, {}", self.name, self.region)
        }
    }
}

/// One of the six hourly forecast entries for the current day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlySlot {
    /// 12-hour clock label, e.g. "3 PM".
    pub time: String,
    /// Temperature in whole °F.
    pub temp: i32,
    pub condition: Condition,
}

/// One day of the multi-day forecast, chronological from the request day.
/// Index 0 is rendered as "Today" regardless of its weekday label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlot {
    /// Short weekday label, e.g. "Tue".
    pub day: String,
    pub high: i32,
    pub low: i32,
    pub condition: Condition,
}

/// The normalized, UI-ready view of a forecast response. Replaced wholesale
/// on every successful fetch; never partially merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed: i32,
    pub visibility: i32,
    /// Pressure in inHg, kept at the source's precision.
    pub pressure: f64,
    pub uv_index: f64,
    pub condition: Condition,
    pub hourly: Vec<HourlySlot>,
    pub forecast: Vec<DaySlot>,
}

/// Loading/error state of the forecast fetch, as the rendering sink sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
}
