//! Type-ahead search: debounced suggestion lookups and submission
//! resolution.
//!
//! The controller is a small state machine (`Idle` → `Pending` →
//! `InFlight`) driven by three events: a query edit, the quiet-window timer
//! elapsing, and a lookup response arriving. Every edit bumps a sequence
//! number; timers and responses carry the sequence they were issued under
//! and are discarded when it is no longer the latest, so an out-of-order
//! response can never clobber the list for a newer query.

use std::time::Duration;

use tracing::debug;

use crate::error::WeatherError;
use crate::model::Location;
use crate::normalize::suggestions_from;
use crate::provider::{SearchCity, WeatherApi};

/// Quiet window after the last keystroke before a lookup is issued.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Queries shorter than this never hit the network.
pub const MIN_QUERY_LEN: usize = 2;

/// What the event loop should do after a query edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    /// (Re)schedule the debounce timer; deliver `tag` back via
    /// [`SuggestionController::quiet_window_elapsed`] when it fires.
    Schedule { tag: u64, delay: Duration },
    /// Query dropped below the minimum length; suggestions were cleared and
    /// no request should be made.
    Clear,
}

/// A lookup the controller wants issued, produced when the quiet window
/// elapses for the still-current tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub tag: u64,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pending { tag: u64 },
    InFlight { tag: u64 },
}

/// Sole owner of the suggestion list.
#[derive(Debug)]
pub struct SuggestionController {
    query: String,
    suggestions: Vec<Location>,
    phase: Phase,
    seq: u64,
}

impl Default for SuggestionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionController {
    pub fn new() -> Self {
        Self { query: String::new(), suggestions: Vec::new(), phase: Phase::Idle, seq: 0 }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current suggestions, up to 5, in API relevance order.
    pub fn suggestions(&self) -> &[Location] {
        &self.suggestions
    }

    /// Record a query edit.
    ///
    /// Each edit invalidates whatever timer or request the previous text had
    /// pending. Short queries clear the list immediately; anything else asks
    /// the caller to restart the debounce timer.
    pub fn on_query_change(&mut self, text: &str) -> QueryAction {
        self.query = text.to_string();
        self.seq += 1;

        if text.chars().count() < MIN_QUERY_LEN {
            self.suggestions.clear();
            self.phase = Phase::Idle;
            return QueryAction::Clear;
        }

        self.phase = Phase::Pending { tag: self.seq };
        QueryAction::Schedule { tag: self.seq, delay: DEBOUNCE_WINDOW }
    }

    /// The debounce timer for `tag` fired. Returns the lookup to issue, or
    /// `None` when the user has typed again since and the timer is stale.
    pub fn quiet_window_elapsed(&mut self, tag: u64) -> Option<Lookup> {
        match self.phase {
            Phase::Pending { tag: current } if current == tag => {
                self.phase = Phase::InFlight { tag };
                Some(Lookup { tag, query: self.query.clone() })
            }
            _ => {
                debug!(tag, "ignoring stale debounce timer");
                None
            }
        }
    }

    /// Apply a lookup response.
    ///
    /// Responses tagged with anything but the latest sequence are discarded
    /// (staleness guard). Errors are swallowed, leaving the list unchanged;
    /// suggestions are a non-critical enhancement.
    pub fn apply_lookup(&mut self, tag: u64, outcome: Result<Vec<SearchCity>, WeatherError>) {
        if tag != self.seq || self.phase != (Phase::InFlight { tag }) {
            debug!(tag, latest = self.seq, "discarding stale suggestion response");
            return;
        }

        self.phase = Phase::Idle;
        match outcome {
            Ok(cities) => self.suggestions = suggestions_from(cities),
            Err(err) => debug!(error = %err, "suggestion lookup failed, keeping current list"),
        }
    }

    /// Clear the query text and dismiss the suggestion list, invalidating
    /// any pending timer or in-flight lookup.
    pub fn dismiss(&mut self) {
        self.query.clear();
        self.suggestions.clear();
        self.seq += 1;
        self.phase = Phase::Idle;
    }

    /// Resolve a submission against the current query and suggestions. On
    /// resolution the query is cleared and the list dismissed.
    pub fn submit(&mut self, explicit_pick: Option<&Location>) -> Option<String> {
        let resolved = resolve_selection(explicit_pick, &self.query, &self.suggestions);
        if resolved.is_some() {
            self.dismiss();
        }
        resolved
    }

    /// Edit → debounce → lookup, sequentially. Callers that interleave
    /// events (a UI event loop) drive the individual transitions instead.
    pub async fn drive(&mut self, api: &impl WeatherApi, text: &str) {
        if let QueryAction::Schedule { tag, delay } = self.on_query_change(text) {
            tokio::time::sleep(delay).await;
            if let Some(lookup) = self.quiet_window_elapsed(tag) {
                let outcome = api.search(&lookup.query).await;
                self.apply_lookup(lookup.tag, outcome);
            }
        }
    }
}

/// Turn a search submission into the location query to fetch, if any.
///
/// Priority order: an explicitly picked suggestion wins; otherwise a
/// non-empty suggestion list resolves to its first entry even when the user
/// typed something else (best match beats literal text); otherwise non-empty
/// trimmed free text is used verbatim; otherwise nothing happens.
pub fn resolve_selection(
    explicit_pick: Option<&Location>,
    raw_text: &str,
    suggestions: &[Location],
) -> Option<String> {
    if let Some(pick) = explicit_pick {
        return Some(pick.name.clone());
    }

    if let Some(first) = suggestions.first() {
        return Some(first.name.clone());
    }

    let trimmed = raw_text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn city(name: &str) -> SearchCity {
        serde_json::from_value(serde_json::json!({
            "name": name, "region": "Region", "country": "Country"
        }))
        .expect("fixture parses")
    }

    fn location(name: &str) -> Location {
        Location { name: name.into(), region: "Region".into(), country: "Country".into() }
    }

    #[derive(Debug, Default)]
    struct CountingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherApi for CountingApi {
        async fn forecast(
            &self,
            _query: &str,
            _days: u8,
        ) -> Result<crate::provider::ForecastResponse, WeatherError> {
            unreachable!("suggestion tests never fetch forecasts")
        }

        async fn search(&self, query: &str) -> Result<Vec<SearchCity>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![city(&format!("{query}ville"))])
        }
    }

    #[test]
    fn rapid_edits_coalesce_into_one_lookup_for_the_last_text() {
        let mut ctl = SuggestionController::new();

        let QueryAction::Schedule { tag: first, .. } = ctl.on_query_change("Ne") else {
            panic!("expected schedule");
        };
        let QueryAction::Schedule { tag: second, .. } = ctl.on_query_change("New") else {
            panic!("expected schedule");
        };

        // The first timer fires late, after the second edit: stale, no-op.
        assert_eq!(ctl.quiet_window_elapsed(first), None);

        let lookup = ctl.quiet_window_elapsed(second).expect("latest timer fires");
        assert_eq!(lookup.query, "New");

        // The same timer cannot fire twice.
        assert_eq!(ctl.quiet_window_elapsed(second), None);
    }

    #[test]
    fn short_query_clears_suggestions_without_a_request() {
        let mut ctl = SuggestionController::new();

        let action = ctl.on_query_change("Lo");
        assert!(matches!(action, QueryAction::Schedule { .. }));
        let lookup = ctl.quiet_window_elapsed(match action {
            QueryAction::Schedule { tag, .. } => tag,
            QueryAction::Clear => unreachable!(),
        });
        let lookup = lookup.expect("lookup issued");
        ctl.apply_lookup(lookup.tag, Ok(vec![city("London")]));
        assert_eq!(ctl.suggestions().len(), 1);

        // Deleting back to one character clears immediately.
        assert_eq!(ctl.on_query_change("L"), QueryAction::Clear);
        assert!(ctl.suggestions().is_empty());
    }

    #[test]
    fn response_for_superseded_query_is_discarded() {
        let mut ctl = SuggestionController::new();

        let QueryAction::Schedule { tag: q1, .. } = ctl.on_query_change("Par") else {
            panic!("expected schedule");
        };
        let lookup1 = ctl.quiet_window_elapsed(q1).expect("q1 issued");

        let QueryAction::Schedule { tag: q2, .. } = ctl.on_query_change("Berl") else {
            panic!("expected schedule");
        };
        let lookup2 = ctl.quiet_window_elapsed(q2).expect("q2 issued");

        // Q2's response lands first, then Q1's arrives late.
        ctl.apply_lookup(lookup2.tag, Ok(vec![city("Berlin")]));
        ctl.apply_lookup(lookup1.tag, Ok(vec![city("Paris")]));

        assert_eq!(ctl.suggestions().len(), 1);
        assert_eq!(ctl.suggestions()[0].name, "Berlin");
    }

    #[test]
    fn response_after_query_dropped_below_minimum_is_discarded() {
        let mut ctl = SuggestionController::new();

        let QueryAction::Schedule { tag, .. } = ctl.on_query_change("Par") else {
            panic!("expected schedule");
        };
        let lookup = ctl.quiet_window_elapsed(tag).expect("issued");

        ctl.on_query_change("P");
        ctl.apply_lookup(lookup.tag, Ok(vec![city("Paris")]));

        assert!(ctl.suggestions().is_empty());
    }

    #[test]
    fn lookup_errors_are_swallowed_and_list_kept() {
        let mut ctl = SuggestionController::new();

        let QueryAction::Schedule { tag, .. } = ctl.on_query_change("Lon") else {
            panic!("expected schedule");
        };
        let lookup = ctl.quiet_window_elapsed(tag).expect("issued");
        ctl.apply_lookup(lookup.tag, Ok(vec![city("London")]));

        let QueryAction::Schedule { tag, .. } = ctl.on_query_change("Lond") else {
            panic!("expected schedule");
        };
        let lookup = ctl.quiet_window_elapsed(tag).expect("issued");
        ctl.apply_lookup(lookup.tag, Err(WeatherError::SearchLookup("boom".into())));

        assert_eq!(ctl.suggestions().len(), 1);
        assert_eq!(ctl.suggestions()[0].name, "London");
    }

    #[tokio::test(start_paused = true)]
    async fn drive_issues_exactly_one_request_after_the_quiet_window() {
        let api = CountingApi::default();
        let mut ctl = SuggestionController::new();

        ctl.drive(&api, "New").await;

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.suggestions()[0].name, "Newville");
    }

    #[tokio::test(start_paused = true)]
    async fn drive_skips_the_network_for_short_queries() {
        let api = CountingApi::default();
        let mut ctl = SuggestionController::new();

        ctl.drive(&api, "N").await;

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(ctl.suggestions().is_empty());
    }

    // The resolver's step 2 is the surprising rule: typed text loses to an
    // existing first suggestion on free-text submission.
    #[test]
    fn submission_prefers_first_suggestion_over_typed_text() {
        let suggestions = vec![location("London"), location("Londonderry")];
        assert_eq!(
            resolve_selection(None, "Lon", &suggestions),
            Some("London".to_string())
        );
    }

    #[test]
    fn explicit_pick_beats_everything() {
        let suggestions = vec![location("London"), location("Londonderry")];
        let pick = location("Londonderry");
        assert_eq!(
            resolve_selection(Some(&pick), "Lon", &suggestions),
            Some("Londonderry".to_string())
        );
    }

    #[test]
    fn free_text_is_used_verbatim_when_no_suggestions_exist() {
        assert_eq!(
            resolve_selection(None, "  Paris  ", &[]),
            Some("Paris".to_string())
        );
    }

    #[test]
    fn empty_submission_is_a_no_op() {
        assert_eq!(resolve_selection(None, "   ", &[]), None);
        assert_eq!(resolve_selection(None, "", &[]), None);
    }

    #[test]
    fn submit_clears_query_and_dismisses_suggestions() {
        let mut ctl = SuggestionController::new();

        let QueryAction::Schedule { tag, .. } = ctl.on_query_change("Lon") else {
            panic!("expected schedule");
        };
        let lookup = ctl.quiet_window_elapsed(tag).expect("issued");
        ctl.apply_lookup(lookup.tag, Ok(vec![city("London")]));

        let resolved = ctl.submit(None);
        assert_eq!(resolved, Some("London".to_string()));
        assert_eq!(ctl.query(), "");
        assert!(ctl.suggestions().is_empty());
    }

    #[test]
    fn submit_without_anything_to_resolve_keeps_state() {
        let mut ctl = SuggestionController::new();
        ctl.on_query_change("  ");

        assert_eq!(ctl.submit(None), None);
    }
}
