use std::time::Duration;

use egld_predictor::{
    Action, CoinGeckoFeed, FeedError, FeedEvent, FeedFailure, PriceSource, Session, TimeframeBucket,
    spawn_poller,
};
use httpmock::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

const ASSET: &str = "elrond-erd-2";

fn build_feed(server: &MockServer, timeout: Option<Duration>) -> CoinGeckoFeed {
    let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    CoinGeckoFeed::with_client(builder.build().unwrap(), &server.base_url(), ASSET, "usd")
}

#[tokio::test]
async fn parses_simple_price_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/simple/price")
                .query_param("ids", ASSET)
                .query_param("vs_currencies", "usd");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ ASSET: { "usd": 31.42 } }));
        })
        .await;

    let sample = build_feed(&server, None)
        .fetch_price()
        .await
        .expect("price should parse");

    mock.assert_async().await;
    assert_eq!(sample.value, 31.42);
}

#[tokio::test]
async fn non_success_status_is_feed_unavailable() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(429);
        })
        .await;

    let err = build_feed(&server, None).fetch_price().await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err, FeedError::FeedUnavailable(FeedFailure::Status(429)));
    assert_eq!(err.user_message("EGLD"), "Could not fetch EGLD price.");
}

#[tokio::test]
async fn unexpected_shape_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(200).json_body(json!({ "bitcoin": { "usd": 60000.0 } }));
        })
        .await;

    let err = build_feed(&server, None).fetch_price().await.unwrap_err();
    assert!(matches!(err.failure(), FeedFailure::Malformed(_)));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = build_feed(&server, None).fetch_price().await.unwrap_err();
    assert!(matches!(err.failure(), FeedFailure::Malformed(_)));
}

#[tokio::test]
async fn string_price_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(200).json_body(json!({ ASSET: { "usd": "31.42" } }));
        })
        .await;

    let err = build_feed(&server, None).fetch_price().await.unwrap_err();
    assert!(matches!(err.failure(), FeedFailure::Malformed(_)));
}

#[tokio::test]
async fn slow_response_times_out_as_network_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({ ASSET: { "usd": 31.42 } }));
        })
        .await;

    let err = build_feed(&server, Some(Duration::from_millis(200)))
        .fetch_price()
        .await
        .unwrap_err();
    assert!(matches!(err.failure(), FeedFailure::Network(_)));
}

#[tokio::test]
async fn poller_feeds_session_and_keeps_price_after_failure() {
    let server = MockServer::start_async().await;
    let mut ok = server
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(200).json_body(json!({ ASSET: { "usd": 100.0 } }));
        })
        .await;

    let mut rng = StdRng::seed_from_u64(21);
    let mut session = Session::new(TimeframeBucket::reference_set());
    let mut poller = spawn_poller(build_feed(&server, None), Duration::from_millis(100));

    let first = poller.next_event().await.expect("startup poll");
    assert!(matches!(first, FeedEvent::Price(_)));
    session = session.apply(Action::from(first), &mut rng);
    session = session.apply(Action::SelectBucket("tomorrow".into()), &mut rng);
    let predicted = session.prediction().unwrap().predicted_price;
    assert!((108.0 - 1e-9..=110.0 + 1e-9).contains(&predicted));

    ok.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(500);
        })
        .await;

    // A poll already in flight may still return the old price; wait for the failure.
    loop {
        let event = poller.next_event().await.expect("poller still running");
        let failed = matches!(event, FeedEvent::Unavailable(_));
        session = session.apply(Action::from(event), &mut rng);
        if failed {
            break;
        }
    }

    assert!(session.feed_unavailable());
    assert_eq!(session.price().unwrap().value, 100.0);
    assert_eq!(session.selected_bucket().unwrap().key, "tomorrow");
    // Repeated polls at the same price never redrew the prediction.
    assert_eq!(session.prediction().unwrap().predicted_price, predicted);

    poller.shutdown().await;
}
