//! E2E tests for game server control and launch history.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use cabinet_core::{GatewayError, LaunchOutcome, LaunchStore};
use common::{TestConfig, TestFixture};

#[tokio::test]
async fn test_launch_records_history() {
    let fixture = TestFixture::new().await;
    fixture
        .gateway
        .set_client_hosts(&["marquee-1", "marquee-2"])
        .await;

    let response = fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:sf2" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");
    assert_eq!(response.body["title"]["title"], "Street Fighter II");
    assert_eq!(response.body["clients"].as_array().unwrap().len(), 2);

    assert_eq!(fixture.gateway.recorded_launches().await, vec!["fbneo:sf2"]);

    let latest = fixture.launch_store.latest().unwrap().unwrap();
    assert_eq!(latest.entry_id, "fbneo:sf2");
    assert_eq!(latest.app_id, "fbneo");
    assert_eq!(latest.user_id, "anonymous");
    assert!(latest.is_running());
    assert_eq!(fixture.launch_store.count_for("fbneo:sf2").unwrap(), 1);
}

#[tokio::test]
async fn test_launch_missing_id() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/launch", json!({})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "ERR");
    assert_eq!(response.body["message"], "Game id missing");

    let response = fixture.post("/api/v1/launch", json!({ "id": "" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert!(fixture.gateway.recorded_launches().await.is_empty());
}

#[tokio::test]
async fn test_launch_unknown_game() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:nothing" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Game not found");
    assert!(fixture.gateway.recorded_launches().await.is_empty());
}

#[tokio::test]
async fn test_launch_script_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .gateway
        .set_launch_outcome(LaunchOutcome::failure(1, "rom not found\n"))
        .await;

    let response = fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:sf2" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "ERR");
    assert_eq!(response.body["message"], "Failed to launch");
    assert_eq!(response.body["detail"], "rom not found");

    assert!(fixture.launch_store.latest().unwrap().is_none());
    assert_eq!(fixture.launch_store.count_for("fbneo:sf2").unwrap(), 0);
}

#[tokio::test]
async fn test_launch_gateway_error() {
    let fixture = TestFixture::new().await;
    fixture
        .gateway
        .set_next_error(GatewayError::ShellNotFound {
            command: "ssh".to_string(),
        })
        .await;

    let response = fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:sf2" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["status"], "ERR");
    assert!(response.body["detail"].as_str().unwrap().contains("ssh"));
}

#[tokio::test]
async fn test_second_launch_ends_the_first() {
    let fixture = TestFixture::new().await;

    fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:sf2" }))
        .await;
    fixture
        .post("/api/v1/launch", json!({ "id": "mame:galaga" }))
        .await;

    let recent = fixture.launch_store.recent(10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].entry_id, "mame:galaga");
    assert!(recent[0].is_running());
    assert_eq!(recent[1].entry_id, "fbneo:sf2");
    assert!(!recent[1].is_running());
}

#[tokio::test]
async fn test_query_reports_running_game() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/query").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["is_running"], false);
    assert!(response.body["title"].is_null());

    fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:pacman" }))
        .await;

    let response = fixture.get("/api/v1/query").await;
    assert_eq!(response.body["is_running"], true);
    assert_eq!(response.body["title"]["id"], "fbneo:pacman");
    assert_eq!(response.body["volume"], 50);
}

#[tokio::test]
async fn test_query_game_missing_from_catalog() {
    let fixture = TestFixture::new().await;
    fixture.gateway.set_running(Some("mame:unknown")).await;

    let response = fixture.get("/api/v1/query").await;
    assert_eq!(response.body["is_running"], true);
    assert!(response.body["title"].is_null());
}

#[tokio::test]
async fn test_stop_ends_launch() {
    let fixture = TestFixture::new().await;
    fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:sf2" }))
        .await;

    let response = fixture.post("/api/v1/stop", json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");

    assert_eq!(fixture.gateway.stop_count().await, 1);
    assert!(!fixture.launch_store.latest().unwrap().unwrap().is_running());
}

#[tokio::test]
async fn test_stop_when_idle_is_a_no_op() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/stop", json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");
    assert_eq!(fixture.gateway.stop_count().await, 0);
}

#[tokio::test]
async fn test_set_volume() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/volume", json!({ "volume": 75 })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["volume"], 75);

    let response = fixture.get("/api/v1/query").await;
    assert_eq!(response.body["volume"], 75);
}

#[tokio::test]
async fn test_set_volume_out_of_range() {
    let fixture = TestFixture::new().await;

    for body in [json!({ "volume": 101 }), json!({ "volume": -1 }), json!({})] {
        let response = fixture.post("/api/v1/volume", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["message"], "Volume is not valid");
    }
}

#[tokio::test]
async fn test_control_without_game_server() {
    let fixture = TestFixture::with_config(TestConfig {
        without_gateway: true,
        ..Default::default()
    })
    .await;

    let response = fixture
        .post("/api/v1/launch", json!({ "id": "fbneo:sf2" }))
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "ERR");

    let response = fixture.get("/api/v1/query").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);

    // Catalog browsing still works
    let response = fixture.get("/api/v1/games").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_launch_history_endpoints() {
    let fixture = TestFixture::new().await;

    for id in ["fbneo:sf2", "mame:galaga", "fbneo:sf2"] {
        let response = fixture.post("/api/v1/launch", json!({ "id": id })).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = fixture.get("/api/v1/launches?limit=2").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 2);
    assert_eq!(response.body["launches"][0]["entry_id"], "fbneo:sf2");
    assert_eq!(response.body["launches"][1]["entry_id"], "mame:galaga");

    let response = fixture.get("/api/v1/launches/counts").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["counts"],
        json!([
            {"entry_id": "fbneo:sf2", "title": "Street Fighter II", "count": 2},
            {"entry_id": "mame:galaga", "title": "Galaga", "count": 1},
        ])
    );
}
