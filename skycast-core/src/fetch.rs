//! Forecast fetch orchestration: loading/error state, snapshot replacement,
//! and last-write-wins sequencing for overlapping requests.

use tracing::{debug, warn};

use crate::error::WeatherError;
use crate::model::{RequestState, WeatherSnapshot};
use crate::normalize::normalize;
use crate::provider::{DEFAULT_FORECAST_DAYS, ForecastResponse, WeatherApi};

/// Handle for one in-flight fetch. Settling a ticket whose tag is no longer
/// the latest is a no-op, so a slow response for an old query can never
/// overwrite a newer one.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    tag: u64,
    pub query: String,
    pub days: u8,
}

/// Sole owner of the current [`WeatherSnapshot`] and its [`RequestState`].
///
/// State transitions are explicit (`begin` / `settle`) so interleavings of
/// overlapping fetches can be exercised directly; [`FetchController::run`]
/// wires them to a [`WeatherApi`] for the common sequential case.
#[derive(Debug, Default)]
pub struct FetchController {
    snapshot: Option<WeatherSnapshot>,
    location_label: String,
    state: RequestState,
    seq: u64,
}

impl FetchController {
    pub fn new(default_location: impl Into<String>) -> Self {
        Self { location_label: default_location.into(), ..Self::default() }
    }

    /// Latest successfully fetched snapshot, if any.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    /// Canonical label of the location currently shown.
    pub fn location_label(&self) -> &str {
        &self.location_label
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Start a fetch: bumps the sequence, raises `loading`, clears the
    /// previous transient error.
    pub fn begin(&mut self, query: impl Into<String>, days: u8) -> FetchTicket {
        self.seq += 1;
        self.state.loading = true;
        self.state.error = None;

        FetchTicket { tag: self.seq, query: query.into(), days }
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    ///
    /// Stale tickets are discarded without touching any state, including
    /// `loading`, which still belongs to the newer in-flight fetch. For the
    /// current ticket `loading` drops unconditionally; success replaces the
    /// snapshot wholesale and adopts the provider's canonical location name,
    /// failure keeps the previous snapshot and records a user-facing message.
    pub fn settle(&mut self, ticket: &FetchTicket, outcome: Result<ForecastResponse, WeatherError>) {
        if ticket.tag != self.seq {
            debug!(tag = ticket.tag, latest = self.seq, "discarding stale fetch result");
            return;
        }

        self.state.loading = false;
        match outcome.and_then(|raw| normalize(&raw)) {
            Ok(normalized) => {
                debug!(location = %normalized.resolved_name, "applying forecast snapshot");
                self.location_label = normalized.resolved_name;
                self.snapshot = Some(normalized.snapshot);
            }
            Err(err) => {
                warn!(query = %ticket.query, error = %err, "forecast fetch failed");
                self.state.error = Some(err.to_string());
            }
        }
    }

    /// Begin → single request (no retry) → settle.
    pub async fn run(&mut self, api: &impl WeatherApi, query: &str, days: u8) {
        let ticket = self.begin(query, days);
        let outcome = api.forecast(&ticket.query, ticket.days).await;
        self.settle(&ticket, outcome);
    }

    /// [`FetchController::run`] with the default 5-day window.
    pub async fn run_default(&mut self, api: &impl WeatherApi, query: &str) {
        self.run(api, query, DEFAULT_FORECAST_DAYS).await;
    }
}
