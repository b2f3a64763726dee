//! 看板写入 → 实时订阅者收到变更

mod common;

use std::time::Duration;

use common::TestApp;
use http::StatusCode;
use serde_json::json;
use shared::message::{ChangeFilter, ChangeKind};
use tokio::time::timeout;

#[tokio::test]
async fn test_opening_hour_insert_reaches_subscriber() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("temps-reel").await;
    let other = app.seed_establishment("voisin").await;

    let mut own = app
        .state
        .realtime
        .subscribe("opening_hour", ChangeFilter::eq("establishment_id", id));
    let mut foreign = app
        .state
        .realtime
        .subscribe("opening_hour", ChangeFilter::eq("establishment_id", other));

    let (status, created) = app
        .post(
            &format!("/api/establishments/{id}/opening-hours"),
            json!({ "day_of_week": 5, "open_time": "19:00", "close_time": "23:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");

    let event = timeout(Duration::from_secs(1), own.recv())
        .await
        .expect("change delivered")
        .expect("channel open");
    assert_eq!(event.table, "opening_hour");
    assert_eq!(event.event_type, ChangeKind::Insert);
    assert!(event.old.is_none());
    assert_eq!(event.new.as_ref(), Some(&created));

    // 其他门店的订阅者收不到
    assert!(timeout(Duration::from_millis(100), foreign.recv()).await.is_err());
}

#[tokio::test]
async fn test_update_and_delete_carry_old_row() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("temps-reel-maj").await;

    let uri = format!("/api/establishments/{id}/opening-hours");
    let (_, created) = app
        .post(&uri, json!({ "day_of_week": 1, "open_time": "12:00", "close_time": "14:00" }))
        .await;
    let hour_id = created["id"].as_i64().expect("id");

    let mut subscription = app.state.realtime.subscribe("opening_hour", ChangeFilter::All);

    let (status, updated) = app
        .put(&format!("{uri}/{hour_id}"), json!({ "close_time": "15:00" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let event = timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("update delivered")
        .expect("channel open");
    assert_eq!(event.event_type, ChangeKind::Update);
    assert_eq!(event.old.as_ref(), Some(&created));
    assert_eq!(event.new.as_ref(), Some(&updated));

    let (status, _) = app.delete(&format!("{uri}/{hour_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let event = timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("delete delivered")
        .expect("channel open");
    assert_eq!(event.event_type, ChangeKind::Delete);
    assert!(event.new.is_none());
    assert_eq!(event.old.as_ref().map(|row| row["id"].clone()), Some(json!(hour_id)));
}
