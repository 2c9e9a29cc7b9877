// End-to-end pipeline tests: mock endpoint -> fetch -> flatten -> CSV sink

use chrono::{TimeZone, Utc};
use common::model::TradeSide;
use market_feed::client::{FeedClient, FeedConfig};
use market_feed::flatten::flatten;
use market_feed::models::ListingQuery;
use recorder::{create_sink, SinkSpec};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/bapi/c2c/v2/friendly/c2c/adv/search";

fn listing(price: &str, user: &str) -> serde_json::Value {
    json!({
        "adv": {
            "price": price,
            "surplusAmount": "500",
            "fiatUnit": "ETB"
        },
        "advertiser": {
            "nickName": user,
            "monthOrderCount": 120,
            "monthFinishRate": 0.98
        }
    })
}

fn client_for(server_uri: &str) -> FeedClient {
    let config = FeedConfig {
        endpoint: format!("{}{}", server_uri, SEARCH_PATH),
        timeout_secs: 2,
        ..FeedConfig::default()
    };
    FeedClient::new(config).expect("Failed to build feed client")
}

#[tokio::test]
async fn test_full_cycle_writes_buy_then_sell_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({ "tradeType": "BUY" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [listing("128.5", "alice")]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({ "tradeType": "SELL" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [listing("129.0", "bob")]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let buy = client
        .fetch(&ListingQuery::new("USDT", "ETB", TradeSide::Buy))
        .await
        .expect("Buy fetch failed");
    let sell = client
        .fetch(&ListingQuery::new("USDT", "ETB", TradeSide::Sell))
        .await
        .expect("Sell fetch failed");

    let captured_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let records = flatten(&buy, &sell, captured_at);
    assert_eq!(records.len(), 2);

    let dir = tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("listings.csv");
    let sink = create_sink(&SinkSpec::File {
        path: csv_path.clone(),
    })
    .await
    .expect("Failed to build sink");

    sink.append(&records).await.expect("Append failed");

    let contents = std::fs::read_to_string(&csv_path).expect("Failed to read file");
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Timestamp,"));
    assert_eq!(lines[1], "2024-05-01 12:00:00,128.5,500,ETB,alice,120,0.98,BUY");
    assert_eq!(lines[2], "2024-05-01 12:00:00,129.0,500,ETB,bob,120,0.98,SELL");
}

#[tokio::test]
async fn test_failed_buy_side_degrades_to_partial_sell_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({ "tradeType": "BUY" })))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({ "tradeType": "SELL" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [listing("129.0", "bob")]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());

    // Lenient handling: a failed side becomes an empty side
    let buy = client
        .fetch(&ListingQuery::new("USDT", "ETB", TradeSide::Buy))
        .await
        .unwrap_or_default();
    let sell = client
        .fetch(&ListingQuery::new("USDT", "ETB", TradeSide::Sell))
        .await
        .expect("Sell fetch failed");

    let captured_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let records = flatten(&buy, &sell, captured_at);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].trade_type, TradeSide::Sell);
    assert_eq!(records[0].user, "bob");

    let dir = tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("listings.csv");
    let sink = create_sink(&SinkSpec::File {
        path: csv_path.clone(),
    })
    .await
    .expect("Failed to build sink");

    sink.append(&records).await.expect("Append failed");

    let contents = std::fs::read_to_string(&csv_path).expect("Failed to read file");
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.lines().nth(1).unwrap().ends_with("SELL"));
}

#[tokio::test]
async fn test_cycle_with_no_listings_writes_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let buy = client
        .fetch(&ListingQuery::new("USDT", "ETB", TradeSide::Buy))
        .await
        .expect("Buy fetch failed");
    let sell = client
        .fetch(&ListingQuery::new("USDT", "ETB", TradeSide::Sell))
        .await
        .expect("Sell fetch failed");

    let captured_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let records = flatten(&buy, &sell, captured_at);
    assert!(records.is_empty());

    let dir = tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("listings.csv");
    let sink = create_sink(&SinkSpec::File {
        path: csv_path.clone(),
    })
    .await
    .expect("Failed to build sink");

    sink.append(&records).await.expect("Append failed");

    assert!(!csv_path.exists());
}
