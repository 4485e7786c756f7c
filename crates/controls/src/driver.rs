use std::sync::Arc;

use foundation::geo::Coordinate;
use parking_lot::Mutex;
use providers::geocode::{GeoSuggestProvider, SuggestionCandidate};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::suggest::{
    SearchSuggestBox, SuggestCommand, SuggestPhase, TimerId, MAX_SUGGESTIONS,
};

/// Runs a [`SearchSuggestBox`] on a tokio runtime.
///
/// Executes the machine's commands: debounce timers become abortable
/// spawned sleeps, queries go to the injected [`GeoSuggestProvider`],
/// and the selected coordinate is handed back to the caller to recenter
/// with. Clone-cheap; all clones share one state machine.
#[derive(Clone)]
pub struct SuggestDriver {
    shared: Arc<DriverShared>,
}

struct DriverShared {
    state: Mutex<SearchSuggestBox>,
    provider: Arc<dyn GeoSuggestProvider>,
    epoch: Instant,
    timer_task: Mutex<Option<JoinHandle<()>>>,
}

impl SuggestDriver {
    pub fn new(provider: Arc<dyn GeoSuggestProvider>) -> Self {
        Self {
            shared: Arc::new(DriverShared {
                state: Mutex::new(SearchSuggestBox::new()),
                provider,
                epoch: Instant::now(),
                timer_task: Mutex::new(None),
            }),
        }
    }

    /// Feeds one keystroke into the suggest box.
    pub fn input(&self, text: &str) {
        let now = self.shared.epoch.elapsed();
        let commands = self.shared.state.lock().on_input(text, now);
        for command in commands {
            match command {
                SuggestCommand::CancelTimer { .. } => self.abort_timer(),
                SuggestCommand::ScheduleTimer { timer, fire_at } => {
                    self.schedule(timer, self.shared.epoch + fire_at);
                }
                // on_input never issues queries or recenters directly.
                SuggestCommand::IssueQuery { .. } | SuggestCommand::Recenter { .. } => {}
            }
        }
    }

    /// Picks a rendered candidate; returns the coordinate to recenter on.
    pub fn select(&self, index: usize) -> Option<Coordinate> {
        match self.shared.state.lock().on_select(index) {
            Some(SuggestCommand::Recenter { coordinate }) => Some(coordinate),
            _ => None,
        }
    }

    pub fn dismiss(&self) {
        self.shared.state.lock().on_dismiss();
    }

    pub fn phase(&self) -> SuggestPhase {
        self.shared.state.lock().phase()
    }

    pub fn panel_visible(&self) -> bool {
        self.shared.state.lock().panel_visible()
    }

    pub fn candidates(&self) -> Vec<SuggestionCandidate> {
        self.shared.state.lock().candidates().to_vec()
    }

    /// Aborts the pending debounce timer, if any. Registered with the
    /// view's teardown guard so no timer outlives the view.
    pub fn abort(&self) {
        self.abort_timer();
    }

    fn abort_timer(&self) {
        if let Some(handle) = self.shared.timer_task.lock().take() {
            handle.abort();
        }
    }

    fn schedule(&self, timer: TimerId, deadline: Instant) {
        let shared = self.shared.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            DriverShared::fire(shared, timer).await;
        });
        if let Some(old) = self.shared.timer_task.lock().replace(handle) {
            old.abort();
        }
    }
}

impl DriverShared {
    async fn fire(shared: Arc<Self>, timer: TimerId) {
        // Lock scope must end before the provider await.
        let issued = shared.state.lock().on_timer_fired(timer);
        if let Some(SuggestCommand::IssueQuery { query, text }) = issued {
            let result = shared.provider.suggest(&text, MAX_SUGGESTIONS).await;
            shared.state.lock().on_response(query, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use providers::memory::MemoryGeoSuggest;
    use std::time::Duration;

    fn suggest_fixture() -> Arc<MemoryGeoSuggest> {
        Arc::new(MemoryGeoSuggest::new(vec![
            SuggestionCandidate {
                display_name: "Madrid, Spain".to_string(),
                coordinate: Coordinate::new(40.4168, -3.7038),
            },
            SuggestionCandidate {
                display_name: "Madridejos, Spain".to_string(),
                coordinate: Coordinate::new(39.4689, -3.5312),
            },
        ]))
    }

    async fn advance(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        // Let the woken timer task and its provider call run to completion.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_issues_one_query() {
        let provider = suggest_fixture();
        let driver = SuggestDriver::new(provider.clone());

        driver.input("Mad");
        advance(50).await;
        driver.input("Madr");
        advance(50).await;
        driver.input("Madri");
        advance(250).await;
        driver.input("Madrid");
        advance(301).await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(driver.phase(), SuggestPhase::ShowingSuggestions);
        assert_eq!(driver.candidates().len(), 2);

        let coordinate = driver.select(0);
        assert_eq!(coordinate, Some(Coordinate::new(40.4168, -3.7038)));
        assert_eq!(driver.phase(), SuggestPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn abort_stops_a_pending_timer() {
        let provider = suggest_fixture();
        let driver = SuggestDriver::new(provider.clone());

        driver.input("Madrid");
        driver.abort();
        advance(500).await;

        assert_eq!(provider.calls(), 0);
        assert_eq!(driver.phase(), SuggestPhase::Debouncing);
    }

    #[tokio::test(start_paused = true)]
    async fn dismissal_hides_the_panel() {
        let provider = suggest_fixture();
        let driver = SuggestDriver::new(provider.clone());

        driver.input("Madrid");
        advance(301).await;
        assert_eq!(driver.phase(), SuggestPhase::ShowingSuggestions);
        assert!(driver.panel_visible());

        driver.dismiss();
        assert_eq!(driver.phase(), SuggestPhase::Idle);
        assert!(!driver.panel_visible());
    }
}
