use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::WeatherError;
use crate::provider::{ForecastResponse, SearchCity, WeatherApi};

const BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Value shipped in sample configs; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// HTTP client for WeatherAPI.com.
///
/// Construction validates the credential, so a missing or placeholder key
/// fails with [`WeatherError::Configuration`] before any request is made.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() || api_key == PLACEHOLDER_API_KEY {
            return Err(WeatherError::Configuration);
        }

        Ok(Self { api_key, http: Client::new(), base_url: BASE_URL.to_string() })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<(u16, String), WeatherError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "sending WeatherAPI request");

        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok((status, body))
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn forecast(&self, query: &str, days: u8) -> Result<ForecastResponse, WeatherError> {
        let days = days.to_string();
        let (status, body) = self
            .get(
                "forecast.json",
                &[
                    ("key", self.api_key.as_str()),
                    ("q", query),
                    ("days", days.as_str()),
                    ("aqi", "no"),
                    ("alerts", "no"),
                ],
            )
            .await?;

        if !(200..300).contains(&status) {
            return Err(WeatherError::Transport { status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(format!("forecast JSON did not parse: {e}")))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchCity>, WeatherError> {
        let outcome = self
            .get("search.json", &[("key", self.api_key.as_str()), ("q", query)])
            .await
            .map_err(|e| WeatherError::SearchLookup(e.to_string()))?;

        let (status, body) = outcome;
        if !(200..300).contains(&status) {
            return Err(WeatherError::SearchLookup(format!(
                "search request failed with status {status}: {}",
                truncate_body(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::SearchLookup(format!("search JSON did not parse: {e}")))
    }
}

/// Load the configured client, for callers that start from the on-disk
/// config rather than an explicit key.
pub fn client_from_config(config: &crate::config::Config) -> anyhow::Result<WeatherApiClient> {
    let key = config.require_api_key()?;
    WeatherApiClient::new(key).context("Failed to construct WeatherAPI client")
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back off to a char boundary; slicing mid-codepoint panics.
    let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
    format!("{}...", &body[..cut])
}
