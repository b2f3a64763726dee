//! 集成测试公共工具: 内存数据库 + 完整中间件栈

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use resto_server::{ServerState, build_app};
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    pub state: ServerState,
    app: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = ServerState::in_memory().await.expect("in-memory state");
        let app = build_app(state.clone());
        Self { state, app }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// 创建组织 + 门店，返回门店 id
    pub async fn seed_establishment(&self, slug: &str) -> i64 {
        let (status, org) = self
            .post("/api/organizations", json!({ "name": "Groupe Test" }))
            .await;
        assert_eq!(status, StatusCode::OK, "{org}");

        let (status, place) = self
            .post(
                "/api/establishments",
                json!({
                    "organization_id": org["id"],
                    "name": "Chez Test",
                    "slug": slug,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{place}");
        place["id"].as_i64().expect("establishment id")
    }

    /// 周一午市 12:00-14:00 服务时段
    pub async fn seed_lunch_service(&self, establishment_id: i64, max_capacity: i64) -> i64 {
        let (status, slot) = self
            .post(
                &format!("/api/establishments/{establishment_id}/booking-slots"),
                json!({
                    "day_of_week": 1,
                    "start_time": "12:00",
                    "end_time": "14:00",
                    "slot_name": "Déjeuner",
                    "max_capacity": max_capacity,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{slot}");
        slot["id"].as_i64().expect("booking slot id")
    }
}

/// 2099-01-05 是周一
pub const MONDAY: &str = "2099-01-05";

pub fn booking_payload(establishment_id: i64, slot_id: i64, time: &str, guests: i64) -> Value {
    json!({
        "establishment_id": establishment_id,
        "booking_slot_id": slot_id,
        "date": MONDAY,
        "slot_time": time,
        "guests": guests,
        "customer_name": "Marie Curie",
        "customer_email": "marie@example.com",
        "customer_phone": "0600000000",
    })
}
