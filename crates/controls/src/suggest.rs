use std::time::Duration;

use foundation::geo::Coordinate;
use providers::error::ProviderError;
use providers::geocode::SuggestionCandidate;
use tracing::{debug, warn};

/// Quiescence window between the last keystroke and the place query.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// Inputs shorter than this (after trimming) never trigger a query.
pub const MIN_QUERY_LEN: usize = 3;

/// Upper bound on rendered suggestion candidates.
pub const MAX_SUGGESTIONS: usize = 5;

/// Identifies one scheduled debounce timer. Only the most recently
/// scheduled timer is live; firing any older one is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Identifies one issued place query, so late responses from superseded
/// queries can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestPhase {
    Idle,
    Debouncing,
    AwaitingResponse,
    ShowingSuggestions,
}

/// Side effects requested by the state machine. The embedding driver is
/// responsible for actually running timers, queries, and recenters.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestCommand {
    ScheduleTimer { timer: TimerId, fire_at: Duration },
    CancelTimer { timer: TimerId },
    IssueQuery { query: QueryId, text: String },
    Recenter { coordinate: Coordinate },
}

/// Debounced place-search suggest box.
///
/// Pure state machine: every entry point takes the event and returns the
/// side effects to run, which keeps the debounce logic deterministic
/// under test. Time is an opaque offset supplied by the caller.
#[derive(Debug, Default)]
pub struct SearchSuggestBox {
    phase: SuggestPhase,
    input: String,
    candidates: Vec<SuggestionCandidate>,
    panel_visible: bool,
    pending_timer: Option<TimerId>,
    current_query: Option<QueryId>,
    next_timer: u64,
    next_query: u64,
}

impl Default for SuggestPhase {
    fn default() -> Self {
        SuggestPhase::Idle
    }
}

impl SearchSuggestBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SuggestPhase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn candidates(&self) -> &[SuggestionCandidate] {
        &self.candidates
    }

    /// One keystroke. Cancels any pending debounce timer and, when the
    /// trimmed text is long enough, schedules a fresh one; shorter input
    /// clears the suggestions and drops back to idle without waiting.
    pub fn on_input(&mut self, text: &str, now: Duration) -> Vec<SuggestCommand> {
        let mut commands = Vec::new();
        if let Some(timer) = self.pending_timer.take() {
            commands.push(SuggestCommand::CancelTimer { timer });
        }
        // A newer keystroke supersedes any in-flight query outright.
        self.current_query = None;

        let trimmed = text.trim();
        self.input = trimmed.to_string();

        if trimmed.chars().count() < MIN_QUERY_LEN {
            self.candidates.clear();
            self.panel_visible = false;
            self.phase = SuggestPhase::Idle;
            return commands;
        }

        let timer = TimerId(self.next_timer);
        self.next_timer += 1;
        self.pending_timer = Some(timer);
        self.phase = SuggestPhase::Debouncing;
        commands.push(SuggestCommand::ScheduleTimer {
            timer,
            fire_at: now + DEBOUNCE_INTERVAL,
        });
        commands
    }

    /// Debounce timer expiry. Superseded timers return `None`; the live
    /// one issues exactly one query for the current input.
    pub fn on_timer_fired(&mut self, timer: TimerId) -> Option<SuggestCommand> {
        if self.pending_timer != Some(timer) {
            return None;
        }
        self.pending_timer = None;

        let query = QueryId(self.next_query);
        self.next_query += 1;
        self.current_query = Some(query);
        self.phase = SuggestPhase::AwaitingResponse;
        Some(SuggestCommand::IssueQuery {
            query,
            text: self.input.clone(),
        })
    }

    /// Query completion. Responses for superseded queries are discarded.
    /// A response that lands after the panel was dismissed updates the
    /// candidate list but never re-opens the panel.
    pub fn on_response(
        &mut self,
        query: QueryId,
        result: Result<Vec<SuggestionCandidate>, ProviderError>,
    ) {
        if self.current_query != Some(query) {
            debug!(query = query.0, "discarding response for superseded query");
            return;
        }
        self.current_query = None;
        let awaiting = self.phase == SuggestPhase::AwaitingResponse;

        match result {
            Ok(mut candidates) => {
                candidates.truncate(MAX_SUGGESTIONS);
                let empty = candidates.is_empty();
                self.candidates = candidates;
                if awaiting {
                    self.panel_visible = !empty;
                    self.phase = if empty {
                        SuggestPhase::Idle
                    } else {
                        SuggestPhase::ShowingSuggestions
                    };
                }
            }
            Err(err) => {
                warn!(error = %err, "place suggestion query failed");
                self.candidates.clear();
                self.panel_visible = false;
                if awaiting {
                    self.phase = SuggestPhase::Idle;
                }
            }
        }
    }

    /// Picks one rendered candidate: fills the input with its display
    /// name, hides the panel, and asks the embedder to recenter there.
    pub fn on_select(&mut self, index: usize) -> Option<SuggestCommand> {
        let candidate = self.candidates.get(index)?.clone();
        self.input = candidate.display_name.clone();
        self.candidates.clear();
        self.panel_visible = false;
        self.phase = SuggestPhase::Idle;
        Some(SuggestCommand::Recenter {
            coordinate: candidate.coordinate,
        })
    }

    /// Hides the panel without cancelling an in-flight query; its
    /// eventual response lands in the hidden panel via [`Self::on_response`].
    pub fn on_dismiss(&mut self) {
        self.panel_visible = false;
        self.phase = SuggestPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn candidate(name: &str, lat: f64, lon: f64) -> SuggestionCandidate {
        SuggestionCandidate {
            display_name: name.to_string(),
            coordinate: Coordinate::new(lat, lon),
        }
    }

    fn issued_query(command: Option<SuggestCommand>) -> (QueryId, String) {
        match command {
            Some(SuggestCommand::IssueQuery { query, text }) => (query, text),
            other => panic!("expected IssueQuery, got {other:?}"),
        }
    }

    #[test]
    fn rapid_keystrokes_collapse_into_one_query() {
        let mut suggest = SearchSuggestBox::new();

        let mut timers = Vec::new();
        for (text, at) in [("Mad", 0), ("Madr", 50), ("Madri", 100), ("Madrid", 400)] {
            for command in suggest.on_input(text, ms(at)) {
                if let SuggestCommand::ScheduleTimer { timer, fire_at } = command {
                    timers.push((timer, fire_at));
                }
            }
        }
        assert_eq!(timers.len(), 4);
        let (last_timer, fire_at) = timers[3];
        assert_eq!(fire_at, ms(700));

        // Superseded timers are dead even if the embedder fires them.
        for (timer, _) in &timers[..3] {
            assert_eq!(suggest.on_timer_fired(*timer), None);
        }
        assert_eq!(suggest.phase(), SuggestPhase::Debouncing);

        let (_, text) = issued_query(suggest.on_timer_fired(last_timer));
        assert_eq!(text, "Madrid");
        assert_eq!(suggest.phase(), SuggestPhase::AwaitingResponse);
    }

    #[test]
    fn short_input_clears_suggestions_without_waiting() {
        let mut suggest = SearchSuggestBox::new();

        let commands = suggest.on_input("Vienna", ms(0));
        let timer = match commands.as_slice() {
            [SuggestCommand::ScheduleTimer { timer, .. }] => *timer,
            other => panic!("expected one ScheduleTimer, got {other:?}"),
        };
        let (query, _) = issued_query(suggest.on_timer_fired(timer));
        suggest.on_response(query, Ok(vec![candidate("Vienna, Austria", 48.2, 16.4)]));
        assert!(suggest.panel_visible());

        let commands = suggest.on_input("Vi", ms(5000));
        assert_eq!(commands, vec![]);
        assert_eq!(suggest.phase(), SuggestPhase::Idle);
        assert!(!suggest.panel_visible());
        assert!(suggest.candidates().is_empty());
    }

    #[test]
    fn response_is_truncated_in_provider_order() {
        let mut suggest = SearchSuggestBox::new();
        let commands = suggest.on_input("Springfield", ms(0));
        let timer = match commands.as_slice() {
            [SuggestCommand::ScheduleTimer { timer, .. }] => *timer,
            other => panic!("expected one ScheduleTimer, got {other:?}"),
        };
        let (query, _) = issued_query(suggest.on_timer_fired(timer));

        let hits: Vec<_> = (0..7)
            .map(|i| candidate(&format!("Springfield {i}"), 40.0 + i as f64, -90.0))
            .collect();
        suggest.on_response(query, Ok(hits));

        assert_eq!(suggest.candidates().len(), MAX_SUGGESTIONS);
        assert_eq!(suggest.candidates()[0].display_name, "Springfield 0");
        assert_eq!(suggest.phase(), SuggestPhase::ShowingSuggestions);
    }

    #[test]
    fn empty_response_returns_to_idle() {
        let mut suggest = SearchSuggestBox::new();
        suggest.on_input("Nowhereville", ms(0));
        let (query, _) = issued_query(suggest.on_timer_fired(TimerId(0)));

        suggest.on_response(query, Ok(vec![]));
        assert_eq!(suggest.phase(), SuggestPhase::Idle);
        assert!(!suggest.panel_visible());
    }

    #[test]
    fn failed_query_hides_panel_and_returns_to_idle() {
        let mut suggest = SearchSuggestBox::new();
        suggest.on_input("Madrid", ms(0));
        let (query, _) = issued_query(suggest.on_timer_fired(TimerId(0)));

        suggest.on_response(query, Err(ProviderError::EmptyResponseBody));
        assert_eq!(suggest.phase(), SuggestPhase::Idle);
        assert!(!suggest.panel_visible());
        assert!(suggest.candidates().is_empty());
    }

    #[test]
    fn selection_fills_input_and_recenters() {
        let mut suggest = SearchSuggestBox::new();
        suggest.on_input("Madrid", ms(0));
        let (query, _) = issued_query(suggest.on_timer_fired(TimerId(0)));
        suggest.on_response(
            query,
            Ok(vec![
                candidate("Madrid, Spain", 40.4168, -3.7038),
                candidate("Madridejos, Spain", 39.4689, -3.5312),
            ]),
        );

        let command = suggest.on_select(0);
        assert_eq!(
            command,
            Some(SuggestCommand::Recenter {
                coordinate: Coordinate::new(40.4168, -3.7038),
            })
        );
        assert_eq!(suggest.input(), "Madrid, Spain");
        assert!(!suggest.panel_visible());
        assert_eq!(suggest.phase(), SuggestPhase::Idle);

        // Out-of-range index after the panel closed.
        assert_eq!(suggest.on_select(0), None);
    }

    #[test]
    fn dismissal_keeps_late_response_from_reopening_panel() {
        let mut suggest = SearchSuggestBox::new();
        suggest.on_input("Madrid", ms(0));
        let (query, _) = issued_query(suggest.on_timer_fired(TimerId(0)));

        suggest.on_dismiss();
        assert_eq!(suggest.phase(), SuggestPhase::Idle);

        suggest.on_response(query, Ok(vec![candidate("Madrid, Spain", 40.4168, -3.7038)]));
        assert!(!suggest.panel_visible());
        assert_eq!(suggest.phase(), SuggestPhase::Idle);
        // The hidden panel still received the candidates.
        assert_eq!(suggest.candidates().len(), 1);
    }

    #[test]
    fn new_keystroke_supersedes_in_flight_query() {
        let mut suggest = SearchSuggestBox::new();
        suggest.on_input("Madrid", ms(0));
        let (stale_query, _) = issued_query(suggest.on_timer_fired(TimerId(0)));

        suggest.on_input("Vienna", ms(400));
        suggest.on_response(
            stale_query,
            Ok(vec![candidate("Madrid, Spain", 40.4168, -3.7038)]),
        );
        assert!(suggest.candidates().is_empty());
        assert_eq!(suggest.phase(), SuggestPhase::Debouncing);
    }
}
