use thiserror::Error;

/// Failure modes of the weather pipeline.
///
/// `Configuration` is raised before any network call is made. `Transport`,
/// `Network` and `MalformedResponse` are user-visible on the forecast path;
/// `SearchLookup` is swallowed by the suggestion controller since suggestions
/// are a non-critical enhancement.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(
        "No WeatherAPI.com key configured.\n\
         Hint: run `skycast configure` and paste your key from weatherapi.com."
    )]
    Configuration,

    #[error("weather request failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed forecast response: {0}")]
    MalformedResponse(String),

    #[error("location search failed: {0}")]
    SearchLookup(String),
}

impl WeatherError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        WeatherError::MalformedResponse(detail.into())
    }
}
