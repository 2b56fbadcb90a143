mod common;

use axum_test::TestServer;
use serde_json::Value;

use affiliate_redirect::routes::routes;

#[tokio::test]
async fn test_health_check() {
    let db = common::MemoryDb::new();
    db.seed_link("deal", "https://shop.example.com/item");
    let server = TestServer::new(routes(common::create_test_state(db))).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["database"]["message"], "Connected, 1 links");
    assert_eq!(body["checks"]["cache"]["status"], "ok");
    assert_eq!(body["checks"]["geoip"]["status"], "ok");
}
