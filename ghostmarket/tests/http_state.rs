use ghostmarket::{
    Alert, ApiConfig, Applied, HttpStateSource, PricePoint, RequestError, StateSource,
    TickerDescriptor, ViewModel, ViewStateController,
};
use parking_lot::Mutex;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

const BITCOIN_BODY: &str = r#"{
    "stats": {"avgSentiment": 0.4, "signalUp": true, "sources": 3, "eventsCount": 12, "eventsLabel": "hype"},
    "price": {"last": 65000, "changePct": 1.2, "series": [{"t": "10:00", "p": 64000}, {"t": "10:05", "p": 65000}]},
    "vibeFeed": [],
    "signal": {"alert": "HYPE_PUMP_CONFIRMED", "deltaPrice": 0.03, "deltaVibe": 0.5, "hypeMomentum": 0.8, "n": 12}
}"#;

/// Minimal HTTP/1.1 responder serving one scripted response per connection.
struct MockApi {
    addr: SocketAddr,
    request_lines: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let request_lines = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&request_lines);

        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };

                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let read = stream.read(&mut chunk).await.unwrap_or(0);
                    if read == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..read]);
                    if request.windows(4).any(|window| window == b"\r\n\r\n") {
                        break;
                    }
                }

                if let Some(line) = String::from_utf8_lossy(&request).lines().next() {
                    recorded.lock().push(line.to_string());
                }

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    _ => "Unknown",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            addr,
            request_lines,
        }
    }

    fn source(&self) -> Arc<HttpStateSource> {
        let config = ApiConfig::new(format!("http://{}", self.addr))
            .unwrap()
            .with_request_timeout(Duration::from_secs(5));
        Arc::new(HttpStateSource::new(&config).unwrap())
    }

    fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().clone()
    }
}

#[tokio::test]
async fn test_bitcoin_scenario_is_exposed_verbatim() {
    let api = MockApi::start(vec![(200, BITCOIN_BODY.to_string())]).await;
    let mut controller = ViewStateController::new(api.source());

    controller.fetch_state().await.unwrap();

    let view = controller.view();
    assert_eq!(view.ticker.key, "bitcoin");
    assert_eq!(view.ticker, TickerDescriptor::resolve("bitcoin"));
    assert_eq!(view.stats.avg_sentiment, 0.4);
    assert!(view.stats.signal_up);
    assert_eq!(view.stats.sources, 3);
    assert_eq!(view.stats.events_count, 12);
    assert_eq!(view.stats.events_label, "hype");
    assert_eq!(view.price.last, Some(65000.0));
    assert_eq!(view.price.change_pct, Some(1.2));
    assert_eq!(
        view.price.series,
        vec![PricePoint::new("10:00", 64000.0), PricePoint::new("10:05", 65000.0)]
    );
    assert!(view.vibe_feed.is_empty());
    assert_eq!(view.signal.alert, Some(Alert::HypePumpConfirmed));
    assert_eq!(view.signal.delta_price, Some(0.03));
    assert_eq!(view.signal.delta_vibe, Some(0.5));
    assert_eq!(view.signal.hype_momentum, Some(0.8));
    assert_eq!(view.signal.n, Some(12));

    assert_eq!(
        api.request_lines(),
        vec!["GET /api/state?ticker=bitcoin HTTP/1.1".to_string()]
    );
}

#[tokio::test]
async fn test_server_error_keeps_previous_view() {
    let api = MockApi::start(vec![
        (200, BITCOIN_BODY.to_string()),
        (500, r#"{"error": "boom"}"#.to_string()),
    ])
    .await;
    let mut controller = ViewStateController::new(api.source());

    controller.fetch_state().await.unwrap();
    let before = controller.view().clone();

    let error = controller.fetch_state().await.unwrap_err();

    assert_eq!(error, RequestError::Status { status: 500 });
    assert_eq!(error.status(), Some(500));
    assert_eq!(controller.view(), &before);
}

#[tokio::test]
async fn test_server_error_before_first_success_keeps_fallback() {
    let api = MockApi::start(vec![(404, String::new())]).await;
    let mut controller = ViewStateController::new(api.source());

    let error = controller.fetch_state().await.unwrap_err();

    assert_eq!(error, RequestError::Status { status: 404 });
    assert_eq!(controller.view(), &ViewModel::fallback());
    assert!(!controller.has_data());
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let api = MockApi::start(vec![(200, "<html>not json</html>".to_string())]).await;

    let result = api.source().fetch_state("bitcoin").await;

    assert!(matches!(result, Err(RequestError::Decode(_))), "{:?}", result);
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let config = ApiConfig::new(format!("http://{}", addr))
        .unwrap()
        .with_request_timeout(Duration::from_secs(2));
    let source = HttpStateSource::new(&config).unwrap();

    let result = source.fetch_state("bitcoin").await;

    assert!(matches!(result, Err(RequestError::Transport(_))), "{:?}", result);
}

#[tokio::test]
async fn test_set_ticker_overrides_server_ticker() {
    let body = r#"{
        "ticker": {"key": "ethereum", "label": "Ethereum", "symbol": "ETHE"},
        "price": {"last": 3100.5, "changePct": -0.4, "series": []}
    }"#;
    let api = MockApi::start(vec![(200, body.to_string())]).await;
    let mut controller = ViewStateController::new(api.source());

    controller.set_ticker("ethereum");
    let applied = controller.next_update().await.unwrap();

    assert_eq!(applied, Ok(Applied::Replaced));
    assert_eq!(controller.view().ticker, TickerDescriptor::resolve("ethereum"));
    assert_eq!(controller.view().ticker.symbol, "ETH");
    assert_eq!(controller.view().price.last, Some(3100.5));
    assert_eq!(
        api.request_lines(),
        vec!["GET /api/state?ticker=ethereum HTTP/1.1".to_string()]
    );
}

#[tokio::test]
async fn test_null_fields_still_replace_the_view() {
    let body = r#"{
        "stats": null,
        "price": {"last": null, "changePct": null, "series": null},
        "vibeFeed": null,
        "signal": {"alert": null, "deltaPrice": null, "deltaVibe": 0.2, "hypeMomentum": null, "n": null}
    }"#;
    let api = MockApi::start(vec![(200, body.to_string())]).await;
    let mut controller = ViewStateController::new(api.source());

    controller.fetch_state().await.unwrap();

    let view = controller.view();
    assert!(controller.has_data());
    assert_eq!(view.stats.events_label, "demo");
    assert_eq!(view.price.last, None);
    assert_eq!(view.price.change_pct, None);
    assert!(view.price.series.is_empty());
    assert!(view.vibe_feed.is_empty());
    assert_eq!(view.signal.delta_price, None);
    assert_eq!(view.signal.delta_vibe, Some(0.2));
    assert_eq!(view.signal.n, None);
}
