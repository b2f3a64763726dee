//! 公开预订流程集成测试: 可用时间格、容量、关闭例外、令牌

mod common;

use common::{MONDAY, TestApp, booking_payload};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_public_establishment_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/public/establishments/inconnu").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_public_slots_quarter_hours() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("bistrot").await;
    app.seed_lunch_service(id, 20).await;

    let (status, slots) = app
        .get(&format!("/api/public/establishments/bistrot/slots?date={MONDAY}"))
        .await;
    assert_eq!(status, StatusCode::OK, "{slots}");
    let slots = slots.as_array().expect("slots");
    assert_eq!(slots.len(), 8);
    assert_eq!(slots[0]["slot_time"], "12:00");
    assert_eq!(slots[0]["slot_number"], 48);
    assert_eq!(slots[7]["slot_time"], "13:45");
    assert!(slots.iter().all(|s| s["available_capacity"] == 20));

    // 周二没有服务时段
    let (status, slots) = app
        .get("/api/public/establishments/bistrot/slots?date=2099-01-06")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(slots.as_array().is_some_and(Vec::is_empty));

    let (status, body) = app
        .get("/api/public/establishments/bistrot/slots?date=2000-01-03")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5006);
}

#[tokio::test]
async fn test_booking_disabled() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("ferme").await;
    let slot_id = app.seed_lunch_service(id, 20).await;

    let (status, _) = app
        .put(&format!("/api/establishments/{id}"), json!({ "booking_enabled": false }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:00", 2))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn test_booking_capacity_is_enforced() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("capacite").await;
    let slot_id = app.seed_lunch_service(id, 4).await;

    let (status, created) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:30", 3))
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["booking"]["status"], "pending");
    assert_eq!(created["booking"]["slot_time"], "12:30");

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:30", 2))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5003);

    // 其他时间格不受影响
    let (status, _) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:45", 4))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, slots) = app
        .get(&format!("/api/establishments/{id}/bookings/availability?date={MONDAY}"))
        .await;
    assert_eq!(status, StatusCode::OK, "{slots}");
    let at = |time: &str| {
        slots
            .as_array()
            .and_then(|all| all.iter().find(|s| s["slot_time"] == time).cloned())
            .expect("slot present")
    };
    assert_eq!(at("12:30")["available_capacity"], 1);
    assert_eq!(at("12:45")["is_available"], false);

    let (status, bookings) = app
        .get(&format!("/api/establishments/{id}/bookings?date={MONDAY}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bookings.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_booking_outside_service_or_off_grid() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("horaire").await;
    let slot_id = app.seed_lunch_service(id, 10).await;

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:10", 2))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "14:00", 2))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["code"], 5004);

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, 999, "12:00", 2))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5002);
}

#[tokio::test]
async fn test_closed_time_slot_blocks_booking_until_toggled_back() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("exceptions").await;
    let slot_id = app.seed_lunch_service(id, 10).await;
    let exceptions = format!("/api/establishments/{id}/booking-exceptions");

    let (status, exception) = app
        .post(
            &exceptions,
            json!({
                "exception_type": "time_slots",
                "date": MONDAY,
                "booking_slot_id": slot_id,
                "closed_slots": [49, 48, 49],
                "reason": "Privatisation",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{exception}");
    assert_eq!(exception["closed_slots"], json!([48, 49]));
    let exception_id = exception["id"].as_i64().expect("exception id");

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:00", 2))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5004);

    let (status, listed) = app.get(&format!("{exceptions}?date={MONDAY}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let toggle = format!("{exceptions}/{exception_id}/toggle-slot");
    let (status, edit) = app.post(&toggle, json!({ "slot_number": 48 })).await;
    assert_eq!(status, StatusCode::OK, "{edit}");
    assert_eq!(edit["deleted"], false);
    assert_eq!(edit["exception"]["closed_slots"], json!([49]));

    let (status, _) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:00", 2))
        .await;
    assert_eq!(status, StatusCode::OK);

    // 最后一个时间格被取消后例外被删除
    let (status, edit) = app.post(&toggle, json!({ "slot_number": 49 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edit["deleted"], true);

    let (status, body) = app.get(&format!("{exceptions}/{exception_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5101);
}

#[tokio::test]
async fn test_period_closure_covers_every_service() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("vacances").await;
    let slot_id = app.seed_lunch_service(id, 10).await;

    let (status, _) = app
        .post(
            &format!("/api/establishments/{id}/booking-exceptions"),
            json!({
                "exception_type": "period",
                "start_date": "2099-01-01",
                "end_date": MONDAY,
                "reason": "Congés",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, slots) = app
        .get(&format!(
            "/api/public/establishments/vacances/slots?date={MONDAY}&available_only=true"
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(slots.as_array().is_some_and(Vec::is_empty));

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "13:00", 2))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5004);

    let (status, events) = app
        .get(&format!("/api/establishments/{id}/booking-exceptions/calendar"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["start"], "2099-01-01");
    assert_eq!(events[0]["end"], "2099-01-06");
}

#[tokio::test]
async fn test_verify_token_and_cancel() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("jeton").await;
    let slot_id = app.seed_lunch_service(id, 2).await;

    let (status, created) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "13:00", 2))
        .await;
    assert_eq!(status, StatusCode::OK);
    let booking_id = created["booking"]["id"].as_i64().expect("booking id");
    let token = created["token"].as_str().expect("token").to_string();

    let (status, body) = app
        .post(
            "/api/booking/verify-token",
            json!({ "booking_id": booking_id, "token": "faux" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 5005);

    let (status, body) = app
        .post(
            "/api/booking/verify-token",
            json!({ "booking_id": booking_id, "token": token }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], booking_id);

    let (status, body) = app
        .post(&format!("/api/booking/{booking_id}/cancel"), json!({ "token": token }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    // 取消后容量释放
    let (status, _) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "13:00", 2))
        .await;
    assert_eq!(status, StatusCode::OK);

    // 已取消的预订不能重新打开
    let (status, _) = app
        .put(
            &format!("/api/establishments/{id}/bookings/{booking_id}/status"),
            json!({ "status": "confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unpadded_date_shares_the_same_capacity() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("zero-pad").await;
    let slot_id = app.seed_lunch_service(id, 4).await;

    let (status, created) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:00", 4))
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");

    let mut unpadded = booking_payload(id, slot_id, "12:00", 4);
    unpadded["date"] = json!("2099-1-5");
    let (status, body) = app.post("/api/booking/create", unpadded).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["code"], 5003);

    let mut unpadded = booking_payload(id, slot_id, "12:15", 2);
    unpadded["date"] = json!("2099-1-5");
    let (status, created) = app.post("/api/booking/create", unpadded).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["booking"]["date"], MONDAY);

    let (_, bookings) = app
        .get(&format!("/api/establishments/{id}/bookings?date={MONDAY}"))
        .await;
    assert_eq!(bookings.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_unpadded_closure_date_still_closes_the_day() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("fermeture-jour").await;
    let slot_id = app.seed_lunch_service(id, 10).await;
    let exceptions = format!("/api/establishments/{id}/booking-exceptions");

    let (status, exception) = app
        .post(
            &exceptions,
            json!({ "exception_type": "single_day", "date": "2099-1-5", "reason": "Inventaire" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{exception}");
    assert_eq!(exception["date"], MONDAY);

    let (status, listed) = app.get(&format!("{exceptions}?date={MONDAY}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, body) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "12:00", 2))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5004);
}

#[tokio::test]
async fn test_service_bounds_stay_on_quarter_hours() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("quart-heure").await;
    let slots = format!("/api/establishments/{id}/booking-slots");

    let (status, body) = app
        .post(
            &slots,
            json!({
                "day_of_week": 1,
                "start_time": "12:10",
                "end_time": "14:00",
                "slot_name": "Déjeuner",
                "max_capacity": 10,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, service) = app
        .post(
            &slots,
            json!({
                "day_of_week": 1,
                "start_time": "12:00:00",
                "end_time": "14:00",
                "slot_name": "Déjeuner",
                "max_capacity": 10,
                "valid_from": "2099-1-1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{service}");
    assert_eq!(service["start_time"], "12:00");
    assert_eq!(service["valid_from"], "2099-01-01");

    let (status, body) = app
        .put(&format!("{slots}/{}", service["id"]), json!({ "end_time": "13:50" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    // 公开列表中的每个时间格都能预订
    let (_, listed) = app
        .get(&format!("/api/public/establishments/quart-heure/slots?date={MONDAY}"))
        .await;
    let first = listed[0]["slot_time"].as_str().expect("slot time").to_string();
    let (status, body) = app
        .post(
            "/api/booking/create",
            booking_payload(id, service["id"].as_i64().expect("id"), &first, 2),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn test_booking_lookup_requires_token() {
    let app = TestApp::new().await;
    let id = app.seed_establishment("confidentiel").await;
    let slot_id = app.seed_lunch_service(id, 10).await;

    let (_, created) = app
        .post("/api/booking/create", booking_payload(id, slot_id, "13:30", 2))
        .await;
    let booking_id = created["booking"]["id"].as_i64().expect("booking id");
    let token = created["token"].as_str().expect("token");

    let (status, body) = app.get(&format!("/api/booking/{booking_id}")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 5005);
    assert!(body.get("customer_email").is_none());

    let (status, body) = app
        .get(&format!("/api/booking/{booking_id}?token=autre"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");

    let (status, body) = app
        .get(&format!("/api/booking/{booking_id}?token={token}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_email"], "marie@example.com");
    assert!(body.get("token").is_none());
}
