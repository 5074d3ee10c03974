//! Caller-owned view state for the dashboard.
//!
//! The [`ViewStateController`] holds the selected ticker, a refresh counter and
//! the last successfully fetched [`ViewModel`]. User intents ([`set_ticker`],
//! [`refresh`]) spawn a fetch and return immediately. Completed fetches come
//! back as [`StateUpdate`] messages on the controller's own channel and are
//! applied by the owner through [`drain_updates`] or [`next_update`].
//!
//! Every request carries a monotonic sequence number. A response older than
//! the last applied one is discarded, so out-of-order completions never roll
//! the view back.
//!
//! [`set_ticker`]: ViewStateController::set_ticker
//! [`refresh`]: ViewStateController::refresh
//! [`drain_updates`]: ViewStateController::drain_updates
//! [`next_update`]: ViewStateController::next_update

use crate::{
    error::RequestError,
    model::{StatePayload, ViewModel},
    source::StateSource,
    ticker::TickerDescriptor,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Completed fetch, tagged with the request sequence it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub seq: u64,
    /// Key the request was issued with (may be unknown to [`TickerDescriptor`])
    pub key: String,
    /// Descriptor resolved from `key` when the request was issued
    pub ticker: TickerDescriptor,
    pub result: Result<StatePayload, RequestError>,
}

/// Outcome of applying a successful [`StateUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The update replaced the current view model
    Replaced,
    /// A newer response had already been applied, the update was dropped
    Stale,
}

pub struct ViewStateController {
    source: Arc<dyn StateSource>,
    selected_key: String,
    refresh_counter: u64,
    current: Option<ViewModel>,
    fallback: ViewModel,
    issued_seq: u64,
    applied_seq: u64,
    update_tx: mpsc::UnboundedSender<StateUpdate>,
    update_rx: mpsc::UnboundedReceiver<StateUpdate>,
}

impl ViewStateController {
    /// Create a controller selecting the default ticker. No fetch is issued.
    pub fn new(source: Arc<dyn StateSource>) -> Self {
        Self::with_ticker(source, TickerDescriptor::default_ticker().key)
    }

    /// Create a controller selecting `key`. No fetch is issued.
    pub fn with_ticker(source: Arc<dyn StateSource>, key: impl Into<String>) -> Self {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        Self {
            source,
            selected_key: key.into(),
            refresh_counter: 0,
            current: None,
            fallback: ViewModel::fallback(),
            issued_seq: 0,
            applied_seq: 0,
            update_tx,
            update_rx,
        }
    }

    /// Select a ticker and spawn a re-fetch. The key is stored as given.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_ticker(&mut self, key: impl Into<String>) -> u64 {
        self.selected_key = key.into();
        info!(ticker = %self.selected_key, "ticker selected");
        self.spawn_fetch()
    }

    /// Bump the refresh counter and spawn a re-fetch for the same ticker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh(&mut self) -> u64 {
        self.refresh_counter += 1;
        debug!(
            ticker = %self.selected_key,
            refresh_counter = self.refresh_counter,
            "refresh requested"
        );
        self.spawn_fetch()
    }

    /// Fetch state for the selected ticker and apply it before returning.
    ///
    /// On failure the current view model is left untouched.
    pub async fn fetch_state(&mut self) -> Result<(), RequestError> {
        let (seq, key, ticker) = self.next_request();
        let result = self.source.fetch_state(&key).await;

        self.apply_update(StateUpdate {
            seq,
            key,
            ticker,
            result,
        })
        .map(|_| ())
    }

    /// Apply a completed fetch. This is the only place the view model changes.
    ///
    /// Failures are logged and returned without touching the view model.
    pub fn apply_update(&mut self, update: StateUpdate) -> Result<Applied, RequestError> {
        let StateUpdate {
            seq,
            key,
            ticker,
            result,
        } = update;

        let payload = match result {
            Ok(payload) => payload,
            Err(error) => {
                error!(%key, seq, %error, "failed to fetch dashboard state");
                return Err(error);
            }
        };

        if seq <= self.applied_seq {
            debug!(
                %key,
                seq,
                applied_seq = self.applied_seq,
                "discarding out-of-order state response"
            );
            return Ok(Applied::Stale);
        }

        self.applied_seq = seq;
        self.current = Some(ViewModel::from_payload(ticker, payload));
        debug!(%key, seq, "view model replaced");

        Ok(Applied::Replaced)
    }

    /// Apply every queued update without waiting. Returns how many replaced the view.
    pub fn drain_updates(&mut self) -> usize {
        let mut replaced = 0;
        while let Ok(update) = self.update_rx.try_recv() {
            if let Ok(Applied::Replaced) = self.apply_update(update) {
                replaced += 1;
            }
        }
        replaced
    }

    /// Wait for the next spawned fetch to complete and apply it.
    pub async fn next_update(&mut self) -> Option<Result<Applied, RequestError>> {
        let update = self.update_rx.recv().await?;
        Some(self.apply_update(update))
    }

    /// Current view model, or the zero-valued fallback before the first success.
    pub fn view(&self) -> &ViewModel {
        self.current.as_ref().unwrap_or(&self.fallback)
    }

    /// Whether any fetch has succeeded yet.
    pub fn has_data(&self) -> bool {
        self.current.is_some()
    }

    pub fn selected_key(&self) -> &str {
        &self.selected_key
    }

    /// Descriptor for the selected key, the default ticker if the key is unknown.
    pub fn selected_ticker(&self) -> TickerDescriptor {
        TickerDescriptor::resolve(&self.selected_key)
    }

    pub fn refresh_counter(&self) -> u64 {
        self.refresh_counter
    }

    /// Sequence number of the most recently issued request.
    pub fn issued_seq(&self) -> u64 {
        self.issued_seq
    }

    pub fn tickers(&self) -> &'static [TickerDescriptor] {
        TickerDescriptor::all()
    }

    fn next_request(&mut self) -> (u64, String, TickerDescriptor) {
        self.issued_seq += 1;
        let key = self.selected_key.clone();
        let ticker = TickerDescriptor::resolve(&key);
        (self.issued_seq, key, ticker)
    }

    fn spawn_fetch(&mut self) -> u64 {
        let (seq, key, ticker) = self.next_request();
        let source = Arc::clone(&self.source);
        let update_tx = self.update_tx.clone();

        tokio::spawn(async move {
            let result = source.fetch_state(&key).await;
            // Receiver lives as long as the controller
            let _ = update_tx.send(StateUpdate {
                seq,
                key,
                ticker,
                result,
            });
        });

        seq
    }
}

impl std::fmt::Debug for ViewStateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStateController")
            .field("selected_key", &self.selected_key)
            .field("refresh_counter", &self.refresh_counter)
            .field("issued_seq", &self.issued_seq)
            .field("applied_seq", &self.applied_seq)
            .field("has_data", &self.current.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alert, PricePoint};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    /// Replies with queued results in call order, recording requested keys.
    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<StatePayload, RequestError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<StatePayload, RequestError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().clone()
        }
    }

    #[async_trait]
    impl StateSource for ScriptedSource {
        async fn fetch_state(&self, key: &str) -> Result<StatePayload, RequestError> {
            self.requested.lock().push(key.to_string());
            self.replies
                .lock()
                .pop_front()
                .unwrap_or(Err(RequestError::Transport("no scripted reply".to_string())))
        }
    }

    /// Each call waits on the next gate, letting tests choose completion order.
    struct GatedSource {
        gates: Mutex<VecDeque<oneshot::Receiver<Result<StatePayload, RequestError>>>>,
    }

    #[async_trait]
    impl StateSource for GatedSource {
        async fn fetch_state(&self, _key: &str) -> Result<StatePayload, RequestError> {
            let gate = self.gates.lock().pop_front();
            match gate {
                Some(gate) => gate
                    .await
                    .unwrap_or(Err(RequestError::Transport("gate dropped".to_string()))),
                None => Err(RequestError::Transport("no gate".to_string())),
            }
        }
    }

    fn payload_with_last(last: f64) -> StatePayload {
        let mut payload = StatePayload::default();
        payload.price.last = Some(last);
        payload.price.series = vec![PricePoint::new("10:00", last)];
        payload
    }

    #[test]
    fn test_view_before_fetch_is_fallback() {
        let controller = ViewStateController::new(ScriptedSource::new(vec![]));

        assert_eq!(controller.view(), &ViewModel::fallback());
        assert!(!controller.has_data());
        assert_eq!(controller.selected_key(), "bitcoin");
        assert_eq!(controller.refresh_counter(), 0);
    }

    #[tokio::test]
    async fn test_fetch_state_success_attaches_ticker() {
        let payload = payload_with_last(0.12);
        let source = ScriptedSource::new(vec![Ok(payload.clone())]);
        let mut controller = ViewStateController::with_ticker(source.clone(), "dogecoin");

        controller.fetch_state().await.unwrap();

        let expected = ViewModel::from_payload(TickerDescriptor::resolve("dogecoin"), payload);
        assert_eq!(controller.view(), &expected);
        assert_eq!(controller.view().ticker.symbol, "DOGE");
        assert_eq!(source.requested(), vec!["dogecoin".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_state_failure_keeps_view() {
        struct TestCase {
            replies: Vec<Result<StatePayload, RequestError>>,
            expected_error: RequestError,
        }

        let tests = vec![
            TestCase {
                // TC0: failure before any success keeps the fallback
                replies: vec![Err(RequestError::Status { status: 500 })],
                expected_error: RequestError::Status { status: 500 },
            },
            TestCase {
                // TC1: failure after a success keeps the last-known-good view
                replies: vec![
                    Ok(payload_with_last(65_000.0)),
                    Err(RequestError::Status { status: 502 }),
                ],
                expected_error: RequestError::Status { status: 502 },
            },
            TestCase {
                // TC2: unreachable host
                replies: vec![
                    Ok(payload_with_last(3_100.0)),
                    Err(RequestError::Transport("connection refused".to_string())),
                ],
                expected_error: RequestError::Transport("connection refused".to_string()),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let attempts = test.replies.len();
            let mut controller = ViewStateController::new(ScriptedSource::new(test.replies));

            for _ in 1..attempts {
                controller.fetch_state().await.unwrap();
            }

            let before = controller.view().clone();
            let actual = controller.fetch_state().await.unwrap_err();

            assert_eq!(actual, test.expected_error, "TC{} failed", index);
            assert_eq!(controller.view(), &before, "TC{} failed", index);
        }
    }

    #[tokio::test]
    async fn test_set_ticker_unknown_key_resolves_default() {
        let source = ScriptedSource::new(vec![Ok(payload_with_last(1.0))]);
        let mut controller = ViewStateController::new(source.clone());

        controller.set_ticker("solana");
        assert_eq!(controller.selected_ticker().key, "bitcoin");

        let applied = controller.next_update().await.unwrap().unwrap();

        assert_eq!(applied, Applied::Replaced);
        assert_eq!(controller.selected_key(), "solana");
        assert_eq!(controller.view().ticker, TickerDescriptor::default_ticker());
        assert_eq!(source.requested(), vec!["solana".to_string()]);
    }

    #[tokio::test]
    async fn test_set_ticker_switches_view() {
        let mut eth = payload_with_last(3_000.0);
        eth.signal.alert = Some(Alert::ImminentHypePump);
        let source = ScriptedSource::new(vec![Ok(eth)]);
        let mut controller = ViewStateController::new(source);

        controller.set_ticker("ethereum");
        controller.next_update().await.unwrap().unwrap();

        assert_eq!(controller.view().ticker.key, "ethereum");
        assert_eq!(controller.view().signal.alert, Some(Alert::ImminentHypePump));
    }

    #[tokio::test]
    async fn test_refresh_twice_in_order_keeps_second() {
        let source = ScriptedSource::new(vec![
            Ok(payload_with_last(100.0)),
            Ok(payload_with_last(200.0)),
        ]);
        let mut controller = ViewStateController::new(source.clone());

        let first = controller.refresh();
        let second = controller.refresh();
        assert!(second > first);
        assert_eq!(controller.refresh_counter(), 2);

        assert_eq!(controller.next_update().await.unwrap(), Ok(Applied::Replaced));
        assert_eq!(controller.next_update().await.unwrap(), Ok(Applied::Replaced));

        assert_eq!(controller.view().price.last, Some(200.0));
        assert_eq!(source.requested(), vec!["bitcoin".to_string(), "bitcoin".to_string()]);
    }

    #[tokio::test]
    async fn test_out_of_order_response_is_discarded() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let source = Arc::new(GatedSource {
            gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
        });
        let mut controller = ViewStateController::new(source);

        controller.set_ticker("ethereum");
        controller.set_ticker("dogecoin");

        second_tx.send(Ok(payload_with_last(0.2))).unwrap();
        assert_eq!(controller.next_update().await.unwrap(), Ok(Applied::Replaced));
        assert_eq!(controller.view().ticker.key, "dogecoin");

        first_tx.send(Ok(payload_with_last(3_000.0))).unwrap();
        assert_eq!(controller.next_update().await.unwrap(), Ok(Applied::Stale));
        assert_eq!(controller.view().ticker.key, "dogecoin");
        assert_eq!(controller.view().price.last, Some(0.2));
    }

    #[tokio::test]
    async fn test_older_response_applies_until_newer_lands() {
        let mut controller = ViewStateController::new(ScriptedSource::new(vec![]));
        let ethereum = TickerDescriptor::resolve("ethereum");

        let older = StateUpdate {
            seq: 1,
            key: "ethereum".to_string(),
            ticker: ethereum,
            result: Ok(payload_with_last(1.0)),
        };
        let newer_failed = StateUpdate {
            seq: 2,
            key: "ethereum".to_string(),
            ticker: ethereum,
            result: Err(RequestError::Status { status: 500 }),
        };

        assert_eq!(
            controller.apply_update(newer_failed),
            Err(RequestError::Status { status: 500 })
        );
        assert_eq!(controller.apply_update(older), Ok(Applied::Replaced));
        assert_eq!(controller.view().price.last, Some(1.0));
    }

    #[tokio::test]
    async fn test_drain_updates_counts_replacements() {
        let source = ScriptedSource::new(vec![
            Ok(payload_with_last(1.0)),
            Err(RequestError::Status { status: 500 }),
            Ok(payload_with_last(3.0)),
        ]);
        let mut controller = ViewStateController::new(source);

        controller.refresh();
        controller.refresh();
        controller.refresh();
        assert_eq!(controller.drain_updates(), 0);

        // Let the spawned fetches run to completion
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.drain_updates(), 2);
        assert_eq!(controller.view().price.last, Some(3.0));
        assert_eq!(controller.issued_seq(), 3);
    }
}
