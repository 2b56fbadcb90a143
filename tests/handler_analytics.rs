mod common;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::Value;

use affiliate_redirect::routes::routes;

#[tokio::test]
async fn test_analytics_requires_token() {
    let db = common::MemoryDb::new();
    db.seed_link("deal", "https://shop.example.com/item");
    let server = TestServer::new(routes(common::create_test_state(db.clone()))).unwrap();

    let response = server.get("/api/affiliate-links/deal").await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.header("www-authenticate"), "Bearer");

    let response = server
        .get("/api/affiliate-links/deal")
        .add_header("authorization", "Bearer not-a-real-token")
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_revoked_token_is_rejected() {
    let db = common::MemoryDb::new();
    db.seed_link("deal", "https://shop.example.com/item");
    let token = db.seed_token("ops");
    db.revoke_all_tokens();
    let server = TestServer::new(routes(common::create_test_state(db.clone()))).unwrap();

    let response = server
        .get("/api/affiliate-links/deal")
        .add_header("authorization", format!("Bearer {}", token))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_analytics_success() {
    let db = common::MemoryDb::new();
    let link = db.seed_link("deal", "https://shop.example.com/item");
    let now = Utc::now();
    db.seed_click(link.id, "203.0.113.1", Some("US"), now);
    db.seed_click(link.id, "203.0.113.2", Some("US"), now);
    db.seed_click(link.id, "203.0.113.3", Some("DE"), now - Duration::days(2));
    db.seed_click(link.id, "203.0.113.4", None, now - Duration::days(40));
    let token = db.seed_token("ops");
    let server = TestServer::new(routes(common::create_test_state(db.clone()))).unwrap();

    let response = server
        .get("/api/affiliate-links/deal")
        .add_header("authorization", format!("Bearer {}", token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();

    assert_eq!(body["days"], 30);
    assert_eq!(body["link"]["slug"], "deal");
    assert_eq!(body["link"]["targetUrl"], "https://shop.example.com/item");
    assert_eq!(body["recentClicks"].as_array().unwrap().len(), 4);

    let daily = body["daily"].as_array().unwrap();
    assert_eq!(daily.len(), 30);
    let total: i64 = daily.iter().map(|d| d["clicks"].as_i64().unwrap()).sum();
    assert_eq!(total, 3);
    assert_eq!(daily[29]["clicks"], 2);

    let countries = body["countries"].as_array().unwrap();
    assert_eq!(countries[0]["country"], "US");
    assert_eq!(countries[0]["clicks"], 2);
    assert_eq!(countries[1]["country"], "DE");
    assert_eq!(countries.len(), 2);
}

#[tokio::test]
async fn test_analytics_recent_clicks_capped() {
    let db = common::MemoryDb::new();
    let link = db.seed_link("deal", "https://shop.example.com/item");
    let now = Utc::now();
    for i in 0..60 {
        db.seed_click(
            link.id,
            &format!("198.51.100.{}", i),
            None,
            now - Duration::minutes(i),
        );
    }
    let token = db.seed_token("ops");
    let server = TestServer::new(routes(common::create_test_state(db.clone()))).unwrap();

    let response = server
        .get("/api/affiliate-links/deal")
        .add_query_param("days", 7)
        .add_header("authorization", format!("Bearer {}", token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let recent = body["recentClicks"].as_array().unwrap();
    assert_eq!(recent.len(), 50);
    assert_eq!(recent[0]["ip"], "198.51.100.0");
    assert_eq!(body["daily"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_analytics_days_out_of_range() {
    let db = common::MemoryDb::new();
    db.seed_link("deal", "https://shop.example.com/item");
    let token = db.seed_token("ops");
    let server = TestServer::new(routes(common::create_test_state(db.clone()))).unwrap();

    for days in ["0", "366", "abc"] {
        let response = server
            .get("/api/affiliate-links/deal")
            .add_query_param("days", days)
            .add_header("authorization", format!("Bearer {}", token))
            .await;
        assert_eq!(response.status_code(), 400, "days={}", days);
    }
}

#[tokio::test]
async fn test_analytics_unknown_slug() {
    let db = common::MemoryDb::new();
    let token = db.seed_token("ops");
    let server = TestServer::new(routes(common::create_test_state(db.clone()))).unwrap();

    let response = server
        .get("/api/affiliate-links/nope")
        .add_header("authorization", format!("Bearer {}", token))
        .await;

    assert_eq!(response.status_code(), 404);
}
