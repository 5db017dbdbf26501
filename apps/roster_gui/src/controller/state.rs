//! Screen state and its transition functions.
//!
//! The UI thread owns exactly one [`ScreenState`]; every mutation goes
//! through the functions below, so the rendering code only ever sees a
//! consistent snapshot. Clocks are injected (`Instant` parameters) to keep
//! the cooldown logic testable.

use std::time::{Duration, Instant};

use shared::domain::UserRecord;

use crate::controller::events::{BatchOrigin, FetchFailure, UiEvent};

/// A modal alert with a title and message. At most one is shown; a newer
/// alert replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn for_batch_failure(failure: &FetchFailure) -> Self {
        if failure.rate_limited {
            Self {
                title: "Too many requests".to_string(),
                message: "The user directory is rate limiting this app (HTTP 429). \
                          Wait a moment before trying again."
                    .to_string(),
            }
        } else {
            Self {
                title: "Fetch failed".to_string(),
                message: format!("Could not load users: {}.", failure.detail),
            }
        }
    }

    fn for_add_failure(failure: &FetchFailure) -> Self {
        if failure.rate_limited {
            Self {
                title: "Too many requests".to_string(),
                message: "The user directory is rate limiting this app (HTTP 429); \
                          no user was added."
                    .to_string(),
            }
        } else {
            Self {
                title: "Add failed".to_string(),
                message: format!("Could not add a user: {}.", failure.detail),
            }
        }
    }

    fn for_cooldown(remaining: Duration) -> Self {
        Self {
            title: "Hold on".to_string(),
            message: format!(
                "Refreshed too recently; try again in {} second(s).",
                remaining.as_secs().max(1)
            ),
        }
    }
}

/// Outcome of the cooldown gate on a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    Proceed,
    CoolingDown { remaining: Duration },
}

pub struct ScreenState {
    /// Most-recent-first; replaced wholesale on load/refresh, extended only
    /// by prepending on add.
    pub users: Vec<UserRecord>,
    /// True only until the initial fetch resolves, success or failure.
    pub loading: bool,
    /// True only while a user-initiated refresh is in flight.
    pub refreshing: bool,
    /// Recorded when a refresh is accepted, so an in-flight refresh also
    /// counts against the cooldown window.
    pub last_refresh: Option<Instant>,
    pub alert: Option<Alert>,
    pub status: String,
}

impl ScreenState {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            loading: true,
            refreshing: false,
            last_refresh: None,
            alert: None,
            status: "Loading users...".to_string(),
        }
    }

    /// Cooldown gate for a user-initiated refresh. `Proceed` flips the
    /// refreshing flag and records `now` as the accepted refresh time; the
    /// caller is responsible for dispatching the actual fetch.
    pub fn begin_refresh(&mut self, now: Instant, cooldown: Duration) -> RefreshDecision {
        if let Some(last) = self.last_refresh {
            let elapsed = now.duration_since(last);
            if elapsed < cooldown {
                let remaining = cooldown - elapsed;
                self.alert = Some(Alert::for_cooldown(remaining));
                return RefreshDecision::CoolingDown { remaining };
            }
        }
        self.last_refresh = Some(now);
        self.refreshing = true;
        self.status = "Refreshing...".to_string();
        RefreshDecision::Proceed
    }

    /// Rolls back an accepted refresh whose dispatch never reached the
    /// worker, restoring the previous accepted-refresh time so the cooldown
    /// window is not consumed by a refresh that never happened.
    pub fn cancel_refresh(&mut self, previous_refresh: Option<Instant>) {
        self.refreshing = false;
        self.last_refresh = previous_refresh;
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::BatchLoaded { origin, users } => {
                self.users = users;
                self.finish_batch(origin);
                self.status = format!("{} users loaded", self.users.len());
            }
            UiEvent::BatchFailed { origin, failure } => {
                // A failed load still yields a consistent (empty) list.
                self.users = Vec::new();
                self.finish_batch(origin);
                self.alert = Some(Alert::for_batch_failure(&failure));
                self.status = "Fetch failed".to_string();
            }
            UiEvent::UserAdded(user) => {
                self.status = format!("Added {}", user.full_name());
                self.users.insert(0, *user);
            }
            UiEvent::AddFailed(failure) => {
                self.alert = Some(Alert::for_add_failure(&failure));
                self.status = "Add failed".to_string();
            }
            UiEvent::WorkerFailed(message) => {
                self.loading = false;
                self.refreshing = false;
                self.status = "Fetch worker unavailable".to_string();
                self.alert = Some(Alert {
                    title: "Fetch worker unavailable".to_string(),
                    message,
                });
            }
            // Avatar events are handled by the UI image cache, not here.
            UiEvent::AvatarImageLoaded { .. } | UiEvent::AvatarImageFailed { .. } => {}
        }
    }

    // Loading -> Ready is unconditional, whatever the fetch outcome.
    fn finish_batch(&mut self, origin: BatchOrigin) {
        self.loading = false;
        if origin == BatchOrigin::Refresh {
            self.refreshing = false;
        }
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::UserId;

    fn sample_user(id: i64, first: &str, last: &str) -> UserRecord {
        UserRecord {
            id: UserId(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar: format!("https://example.com/a/{id}.png"),
            extra: serde_json::Map::new(),
        }
    }

    fn sample_batch(count: i64) -> Vec<UserRecord> {
        (1..=count).map(|id| sample_user(id, "User", "Sample")).collect()
    }

    fn generic_failure() -> FetchFailure {
        FetchFailure {
            rate_limited: false,
            detail: "the user directory returned HTTP 500".to_string(),
        }
    }

    fn rate_limited_failure() -> FetchFailure {
        FetchFailure {
            rate_limited: true,
            detail: "the user directory is rate limiting requests (HTTP 429)".to_string(),
        }
    }

    #[test]
    fn initial_batch_of_ten_clears_loading_and_fills_list() {
        let mut state = ScreenState::new();
        assert!(state.loading);

        state.apply(UiEvent::BatchLoaded {
            origin: BatchOrigin::Initial,
            users: sample_batch(10),
        });

        assert!(!state.loading);
        assert!(!state.refreshing);
        assert_eq!(state.users.len(), 10);
        assert!(state.alert.is_none());
    }

    #[test]
    fn failed_initial_fetch_still_clears_loading() {
        let mut state = ScreenState::new();
        state.apply(UiEvent::BatchFailed {
            origin: BatchOrigin::Initial,
            failure: generic_failure(),
        });

        assert!(!state.loading);
        assert!(state.users.is_empty());
        let alert = state.alert.expect("alert");
        assert_eq!(alert.title, "Fetch failed");
    }

    #[test]
    fn rate_limited_initial_fetch_clears_loading_with_specific_alert() {
        let mut state = ScreenState::new();
        state.apply(UiEvent::BatchFailed {
            origin: BatchOrigin::Initial,
            failure: rate_limited_failure(),
        });

        assert!(!state.loading);
        let alert = state.alert.expect("alert");
        assert!(alert.message.contains("429"), "{}", alert.message);
    }

    #[test]
    fn refresh_within_cooldown_is_rejected_with_one_alert() {
        let cooldown = Duration::from_secs(10);
        let start = Instant::now();
        let mut state = ScreenState::new();

        assert_eq!(state.begin_refresh(start, cooldown), RefreshDecision::Proceed);
        state.alert = None;

        // Second request one second later must not dispatch and must raise
        // exactly one alert.
        let decision = state.begin_refresh(start + Duration::from_secs(1), cooldown);
        assert!(matches!(decision, RefreshDecision::CoolingDown { .. }));
        let alert = state.alert.take().expect("cooldown alert");
        assert_eq!(alert.title, "Hold on");
        // The rejected attempt does not move the accepted-refresh time.
        assert_eq!(state.last_refresh, Some(start));
    }

    #[test]
    fn refresh_after_cooldown_proceeds_and_records_time() {
        let cooldown = Duration::from_secs(10);
        let start = Instant::now();
        let mut state = ScreenState::new();

        assert_eq!(state.begin_refresh(start, cooldown), RefreshDecision::Proceed);
        let later = start + Duration::from_secs(10);
        assert_eq!(state.begin_refresh(later, cooldown), RefreshDecision::Proceed);
        assert_eq!(state.last_refresh, Some(later));
        assert!(state.refreshing);
    }

    #[test]
    fn cancelled_refresh_restores_the_previous_accepted_time() {
        let cooldown = Duration::from_secs(10);
        let start = Instant::now();
        let mut state = ScreenState::new();

        assert_eq!(state.begin_refresh(start, cooldown), RefreshDecision::Proceed);
        let later = start + Duration::from_secs(15);
        assert_eq!(state.begin_refresh(later, cooldown), RefreshDecision::Proceed);

        state.cancel_refresh(Some(start));

        assert!(!state.refreshing);
        assert_eq!(state.last_refresh, Some(start));
    }

    #[test]
    fn successful_refresh_replaces_the_whole_list() {
        let mut state = ScreenState::new();
        state.apply(UiEvent::BatchLoaded {
            origin: BatchOrigin::Initial,
            users: sample_batch(10),
        });
        state.begin_refresh(Instant::now(), Duration::from_secs(10));

        let replacement = vec![sample_user(77, "Fresh", "Batch")];
        state.apply(UiEvent::BatchLoaded {
            origin: BatchOrigin::Refresh,
            users: replacement,
        });

        assert!(!state.refreshing);
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].id, UserId(77));
    }

    #[test]
    fn failed_refresh_clears_refreshing_and_empties_list() {
        let mut state = ScreenState::new();
        state.apply(UiEvent::BatchLoaded {
            origin: BatchOrigin::Initial,
            users: sample_batch(3),
        });
        state.begin_refresh(Instant::now(), Duration::from_secs(10));

        state.apply(UiEvent::BatchFailed {
            origin: BatchOrigin::Refresh,
            failure: generic_failure(),
        });

        assert!(!state.refreshing);
        assert!(state.users.is_empty());
        assert!(state.alert.is_some());
    }

    #[test]
    fn successful_add_prepends_exactly_one_record() {
        let mut state = ScreenState::new();
        state.apply(UiEvent::BatchLoaded {
            origin: BatchOrigin::Initial,
            users: sample_batch(10),
        });

        state.apply(UiEvent::UserAdded(Box::new(sample_user(42, "New", "Arrival"))));

        assert_eq!(state.users.len(), 11);
        assert_eq!(state.users[0].id, UserId(42));
    }

    #[test]
    fn failed_add_leaves_the_list_unchanged() {
        let mut state = ScreenState::new();
        state.apply(UiEvent::BatchLoaded {
            origin: BatchOrigin::Initial,
            users: sample_batch(10),
        });
        let before: Vec<UserId> = state.users.iter().map(|user| user.id).collect();

        state.apply(UiEvent::AddFailed(generic_failure()));

        let after: Vec<UserId> = state.users.iter().map(|user| user.id).collect();
        assert_eq!(before, after);
        let alert = state.alert.expect("alert");
        assert_eq!(alert.title, "Add failed");
    }

    #[test]
    fn worker_failure_clears_loading_and_raises_alert() {
        let mut state = ScreenState::new();
        state.apply(UiEvent::WorkerFailed("runtime build failed".to_string()));

        assert!(!state.loading);
        assert!(!state.refreshing);
        let alert = state.alert.expect("alert");
        assert!(alert.message.contains("runtime build failed"));
    }
}
