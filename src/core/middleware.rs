//! 核心中间件模块

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{info, warn};

use super::error::CoreError;

/// 请求日志中间件，以结构化字段记录每个请求
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();

    let response = next.run(req).await;
    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(
            %method,
            %path,
            %query,
            status = status.as_u16(),
            latency_ms,
            "请求失败"
        );
    } else {
        info!(
            %method,
            %path,
            %query,
            status = status.as_u16(),
            latency_ms,
            "请求完成"
        );
    }

    response
}

/// 把框架自身生成的空响应（405、408）改写为统一的 JSON 错误格式
///
/// 方法不匹配按未知路由处理，返回 404。
pub async fn error_envelope_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => {
            CoreError::NotFound("Route not found".to_string()).into_response()
        }
        StatusCode::REQUEST_TIMEOUT => CoreError::Timeout.into_response(),
        _ => response,
    }
}
