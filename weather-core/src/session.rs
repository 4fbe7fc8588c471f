//! Session state for one running shell.
//!
//! The state is a single tagged value, so a stored result and a stored error
//! can never coexist. Every search is tagged with a sequence number when it is
//! issued. A completion is only applied if it belongs to the latest search, so
//! an older request that happens to finish last cannot overwrite a newer one.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::{LookupError, LookupFailure},
    model::WeatherResult,
    provider::WeatherProvider,
    recent::RecentCities,
    theme::Theme,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Loading {
        city: String,
    },
    Success(WeatherResult),
    Failed(LookupFailure),
}

/// Handle for an issued search, redeemed by [`Session::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    city: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    recent: RecentCities,
    theme: Theme,
    latest_seq: u64,
    last_issued: Option<String>,
}

impl Session {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn recent(&self) -> &RecentCities {
        &self.recent
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        match &self.state {
            SessionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match &self.state {
            SessionState::Failed(failure) => Some(failure.message),
            _ => None,
        }
    }

    /// Query of the most recently issued search, used by refresh.
    pub fn last_query(&self) -> Option<&str> {
        self.last_issued.as_deref()
    }

    /// Enter `Loading` for `city`, dropping any previous result or error.
    pub fn begin_search(&mut self, city: &str) -> SearchTicket {
        self.latest_seq += 1;
        self.state = SessionState::Loading {
            city: city.to_owned(),
        };
        self.last_issued = Some(city.to_owned());

        SearchTicket {
            seq: self.latest_seq,
            city: city.to_owned(),
        }
    }

    /// Apply the outcome of `ticket`'s lookup.
    ///
    /// Returns `false` and leaves the session untouched when a newer search has
    /// been issued since.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<WeatherResult, LookupError>,
    ) -> bool {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                city = %ticket.city,
                "discarding stale lookup response"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    query = %ticket.city,
                    city = %result.city_name,
                    "lookup succeeded"
                );
                self.recent.record(&ticket.city);
                self.state = SessionState::Success(result);
            }
            Err(err) => {
                tracing::info!(query = %ticket.city, kind = ?err.kind(), "lookup failed");
                self.state = SessionState::Failed(LookupFailure::from(&err));
            }
        }

        true
    }

    /// Run one search to completion against `provider`.
    pub async fn search(&mut self, provider: &dyn WeatherProvider, city: &str) -> bool {
        let ticket = self.begin_search(city);
        let outcome = provider.lookup(city).await;
        self.complete(ticket, outcome)
    }
}

/// Session shared between concurrent callers; this is what the interactive
/// shell drives.
///
/// The lock is held only to issue a ticket and to apply a completion, never
/// across the network call.
#[derive(Debug, Clone)]
pub struct SharedSession {
    session: Arc<Mutex<Session>>,
    provider: Arc<dyn WeatherProvider>,
}

impl SharedSession {
    pub fn new(session: Session, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            provider,
        }
    }

    /// Enter `Loading` for `city`. Pair with [`SharedSession::finish_search`].
    pub async fn begin_search(&self, city: &str) -> SearchTicket {
        self.session.lock().await.begin_search(city)
    }

    /// Run the lookup for `ticket` and apply it if it is still the latest.
    pub async fn finish_search(&self, ticket: SearchTicket) -> bool {
        let outcome = self.provider.lookup(ticket.city()).await;
        self.session.lock().await.complete(ticket, outcome)
    }

    /// Returns whether this search's outcome was applied.
    pub async fn search(&self, city: &str) -> bool {
        let ticket = self.begin_search(city).await;
        self.finish_search(ticket).await
    }

    pub async fn toggle_theme(&self) -> Theme {
        self.session.lock().await.toggle_theme()
    }

    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FETCH_FAILED_MESSAGE, FetchFailure, LookupErrorKind, NOT_FOUND_MESSAGE};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use tokio::sync::Notify;

    /// Answers from a fixed table; cities with a gate wait until it is opened.
    #[derive(Debug, Default)]
    struct FakeProvider {
        gates: HashMap<String, Arc<Notify>>,
    }

    impl FakeProvider {
        fn gated(city: &str) -> (Self, Arc<Notify>) {
            let gate = Arc::new(Notify::new());
            let mut gates = HashMap::new();
            gates.insert(city.to_string(), gate.clone());
            (Self { gates }, gate)
        }
    }

    fn result_for(city: &str) -> WeatherResult {
        WeatherResult {
            city_name: city.to_string(),
            temperature_celsius: 18.5,
            wind_speed_mps: 3.2,
            humidity_pct: 60,
            condition_description: "clear sky".to_string(),
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn lookup(&self, city: &str) -> Result<WeatherResult, LookupError> {
            if let Some(gate) = self.gates.get(city) {
                gate.notified().await;
            }

            match city {
                "Nowhereville" => Err(LookupError::NotFound {
                    status: StatusCode::NOT_FOUND,
                    body: r#"{"cod":"404","message":"city not found"}"#.to_string(),
                }),
                "Offline" => Err(FetchFailure::Incomplete("connection refused").into()),
                _ => Ok(result_for(city)),
            }
        }
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let session = Session::new(Theme::Dark);

        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.recent().is_empty());
        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.last_query(), None);
    }

    #[tokio::test]
    async fn success_stores_result_and_records_city() {
        let mut session = Session::default();

        assert!(session.search(&FakeProvider::default(), "Paris").await);

        assert_eq!(session.result(), Some(&result_for("Paris")));
        assert_eq!(session.error_message(), None);
        assert!(!session.is_loading());
        assert_eq!(session.recent().as_slice(), ["Paris".to_string()]);
    }

    #[tokio::test]
    async fn not_found_stores_message_and_keeps_recent() {
        let provider = FakeProvider::default();
        let mut session = Session::default();
        session.search(&provider, "Rome").await;

        session.search(&provider, "Nowhereville").await;

        assert_eq!(session.error_message(), Some(NOT_FOUND_MESSAGE));
        assert_eq!(session.result(), None);
        assert_eq!(session.recent().as_slice(), ["Rome".to_string()]);
        match session.state() {
            SessionState::Failed(failure) => {
                assert_eq!(failure.kind, LookupErrorKind::NotFound)
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_failure_clears_previous_result() {
        let provider = FakeProvider::default();
        let mut session = Session::default();
        session.search(&provider, "Oslo").await;
        assert!(session.result().is_some());

        session.search(&provider, "Offline").await;

        assert_eq!(session.error_message(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(session.result(), None);
        assert_eq!(session.recent().as_slice(), ["Oslo".to_string()]);
    }

    #[tokio::test]
    async fn success_after_failure_clears_error() {
        let provider = FakeProvider::default();
        let mut session = Session::default();
        session.search(&provider, "Nowhereville").await;

        session.search(&provider, "Lima").await;

        assert_eq!(session.error_message(), None);
        assert_eq!(session.result().map(|r| r.city_name.as_str()), Some("Lima"));
    }

    #[tokio::test]
    async fn begin_search_drops_stale_data_immediately() {
        let provider = FakeProvider::default();
        let mut session = Session::default();
        session.search(&provider, "Nowhereville").await;

        let ticket = session.begin_search("Tokyo");

        assert!(session.is_loading());
        assert_eq!(session.error_message(), None);
        assert_eq!(session.result(), None);
        assert_eq!(session.last_query(), Some("Tokyo"));
        assert_eq!(ticket.city(), "Tokyo");
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut session = Session::default();
        let first = session.begin_search("Paris");
        let second = session.begin_search("Rome");
        assert!(second.seq() > first.seq());

        assert!(session.complete(second, Ok(result_for("Rome"))));
        assert!(!session.complete(first, Ok(result_for("Paris"))));

        assert_eq!(session.result(), Some(&result_for("Rome")));
        assert_eq!(session.recent().as_slice(), ["Rome".to_string()]);
    }

    #[test]
    fn stale_failure_does_not_replace_loading() {
        let mut session = Session::default();
        let first = session.begin_search("Paris");
        let _second = session.begin_search("Rome");

        let err = LookupError::from(FetchFailure::Incomplete("timeout"));
        assert!(!session.complete(first, Err(err)));

        assert_eq!(
            session.state(),
            &SessionState::Loading {
                city: "Rome".to_string()
            }
        );
    }

    #[tokio::test]
    async fn last_query_survives_completion_for_refresh() {
        let provider = FakeProvider::default();
        let mut session = Session::default();
        session.search(&provider, "Nowhereville").await;

        assert_eq!(session.last_query(), Some("Nowhereville"));
    }

    #[tokio::test]
    async fn shared_session_applies_latest_issued_search() {
        let (provider, paris_gate) = FakeProvider::gated("Paris");
        let shared = SharedSession::new(Session::default(), Arc::new(provider));

        let slow = tokio::spawn({
            let shared = shared.clone();
            async move { shared.search("Paris").await }
        });

        while !shared.snapshot().await.is_loading() {
            tokio::task::yield_now().await;
        }

        assert!(shared.search("Rome").await);
        paris_gate.notify_one();
        assert!(!slow.await.expect("search task must not panic"));

        let session = shared.snapshot().await;
        assert_eq!(session.result().map(|r| r.city_name.as_str()), Some("Rome"));
        assert_eq!(session.recent().as_slice(), ["Rome".to_string()]);
    }

    #[tokio::test]
    async fn shared_session_toggles_theme() {
        let shared = SharedSession::new(Session::default(), Arc::new(FakeProvider::default()));

        assert_eq!(shared.toggle_theme().await, Theme::Dark);
        assert_eq!(shared.snapshot().await.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn shared_session_shows_loading_between_begin_and_finish() {
        let shared = SharedSession::new(Session::default(), Arc::new(FakeProvider::default()));
        shared.search("Nowhereville").await;

        let ticket = shared.begin_search("Cairo").await;
        let loading = shared.snapshot().await;
        assert!(loading.is_loading());
        assert_eq!(loading.error_message(), None);

        assert!(shared.finish_search(ticket).await);

        let session = shared.snapshot().await;
        assert_eq!(session.result(), Some(&result_for("Cairo")));
        assert_eq!(session.recent().as_slice(), ["Cairo".to_string()]);
    }
}
