//! 看板 CRUD 接口集成测试

mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.get("/health/detailed").await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn test_establishment_crud_and_slug_conflict() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("chez-test").await;

    let (status, body) = app.get(&format!("/api/establishments/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "chez-test");
    assert_eq!(body["booking_enabled"], true);

    let (status, body) = app
        .post(
            "/api/establishments",
            json!({ "organization_id": body["organization_id"], "name": "Autre", "slug": "chez-test" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1002);

    let (status, body) = app
        .put(&format!("/api/establishments/{id}"), json!({ "name": "Chez Test 2" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Chez Test 2");

    let (status, _) = app.delete(&format!("/api/establishments/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/establishments/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_scoped_resource_requires_establishment() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/establishments/999/opening-hours",
            json!({ "day_of_week": 1, "open_time": "12:00", "close_time": "14:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_opening_hours_overlap_and_time_order() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("horaires").await;
    let uri = format!("/api/establishments/{id}/opening-hours");

    let (status, lunch) = app
        .post(&uri, json!({ "day_of_week": 2, "open_time": "12:00", "close_time": "14:30" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{lunch}");

    // 同一天重叠
    let (status, body) = app
        .post(&uri, json!({ "day_of_week": 2, "open_time": "14:00", "close_time": "16:00" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    // 不同天不冲突
    let (status, _) = app
        .post(&uri, json!({ "day_of_week": 3, "open_time": "14:00", "close_time": "16:00" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    // 停用的时段不参与重叠检查
    let (status, _) = app
        .post(
            &uri,
            json!({ "day_of_week": 2, "open_time": "13:00", "close_time": "15:00", "is_active": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&uri, json!({ "day_of_week": 4, "open_time": "19:00", "close_time": "18:00" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    // 更新自身不与自己冲突
    let (status, body) = app
        .put(
            &format!("{uri}/{}", lunch["id"]),
            json!({ "close_time": "15:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["close_time"], "15:00");

    let (status, list) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_menu_calendar_without_schedule_covers_month() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("menus").await;

    let (status, menu) = app
        .post(
            &format!("/api/establishments/{id}/menus"),
            json!({ "name": "Carte du jour" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{menu}");

    let (status, body) = app
        .get(&format!(
            "/api/establishments/{id}/menus/calendar?view=month&date=2024-03-15"
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let events = body["events"].as_array().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["start"], "2024-03-01");
    assert_eq!(events[0]["end"], "2024-04-01");
    assert_eq!(events[0]["allDay"], true);
    assert!(body["rejected"].as_array().is_some_and(Vec::is_empty));
}

#[tokio::test]
async fn test_menu_schedule_rejected_on_write() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("menus-invalid").await;

    let (status, menu) = app
        .post(&format!("/api/establishments/{id}/menus"), json!({ "name": "Brunch" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/establishments/{id}/menus/{}/schedules", menu["id"]);
    let (status, body) = app
        .post(&uri, json!({ "valid_from": "2024-03-10", "valid_until": "2024-03-01" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2003);

    let (status, schedule) = app
        .post(&uri, json!({ "day_of_week": 7, "start_time": "11:00", "end_time": "15:00" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{schedule}");

    let (status, list) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_products_and_low_stock() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("stock").await;

    let (status, body) = app
        .post(
            &format!("/api/establishments/{id}/products"),
            json!({ "name": "Tarte", "price": -1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, product) = app
        .post(
            &format!("/api/establishments/{id}/products"),
            json!({ "name": "Tarte", "price": 6.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{product}");

    let stocks = format!("/api/establishments/{id}/stocks");
    let (status, _) = app
        .post(
            &stocks,
            json!({ "product_id": product["id"], "name": "Farine", "quantity": 2.0, "unit": "kg", "alert_threshold": 5.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post(
            &stocks,
            json!({ "name": "Sucre", "quantity": 10.0, "unit": "kg", "alert_threshold": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, low) = app.get(&format!("{stocks}/low")).await;
    assert_eq!(status, StatusCode::OK);
    let low = low.as_array().expect("low stocks");
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["name"], "Farine");
}
