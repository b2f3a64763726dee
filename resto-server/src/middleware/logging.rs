//! 请求日志中间件
//!
//! 每个请求记录两行：开始与结束。门店范围的请求附带门店标识
//! (看板路由的 `establishment_id`，公开路由的 slug)，便于按门店过滤日志。

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

const DASHBOARD_PREFIX: &str = "/api/establishments/";
const PUBLIC_PREFIX: &str = "/api/public/establishments/";

/// 请求所属门店: 看板路由取 id，公开路由取 slug
pub(crate) fn establishment_scope(path: &str) -> Option<&str> {
    let rest = path
        .strip_prefix(DASHBOARD_PREFIX)
        .or_else(|| path.strip_prefix(PUBLIC_PREFIX))?;
    rest.split('/').next().filter(|segment| !segment.is_empty())
}

/// 请求日志中间件
///
/// 字段: request_id, method, 路由模板, establishment, status, latency_ms
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let establishment = establishment_scope(req.uri().path())
        .unwrap_or("-")
        .to_string();

    info!(
        request_id = %request_id,
        method = %method,
        route = %route,
        establishment = %establishment,
        "Request started"
    );

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            route = %route,
            establishment = %establishment,
            status,
            latency_ms = %latency_ms,
            "Request failed"
        );
    } else if response.status().is_client_error() {
        // 预订冲突 (409) 和令牌错误属于正常业务结果
        info!(
            request_id = %request_id,
            method = %method,
            route = %route,
            establishment = %establishment,
            status,
            latency_ms = %latency_ms,
            "Request rejected"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            route = %route,
            establishment = %establishment,
            status,
            latency_ms = %latency_ms,
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_establishment_scope() {
        assert_eq!(establishment_scope("/api/establishments/12/menus"), Some("12"));
        assert_eq!(establishment_scope("/api/establishments/12"), Some("12"));
        assert_eq!(
            establishment_scope("/api/public/establishments/chez-test/slots"),
            Some("chez-test")
        );
        assert_eq!(establishment_scope("/api/establishments"), None);
        assert_eq!(establishment_scope("/api/establishments/"), None);
        assert_eq!(establishment_scope("/api/booking/create"), None);
        assert_eq!(establishment_scope("/health"), None);
    }
}
