//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::app::product::filter::FilterError;
use crate::infrastructure::store::StoreError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Request timed out")]
    Timeout,

    /// 存储不可达，附带内部原因（不会返回给客户端）
    #[error("Database not connected")]
    ServiceUnavailable(String),

    /// 内部错误，附带内部原因（不会返回给客户端）
    #[error("Something went wrong!")]
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl CoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Timeout => StatusCode::REQUEST_TIMEOUT,
            CoreError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FilterError> for CoreError {
    fn from(err: FilterError) -> Self {
        CoreError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(detail) => CoreError::ServiceUnavailable(detail),
            StoreError::Invalid(msg) => CoreError::BadRequest(msg),
            StoreError::Backend(detail) => CoreError::InternalServerError(detail),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            CoreError::ServiceUnavailable(detail) => warn!("存储不可用: {}", detail),
            CoreError::InternalServerError(detail) => error!("内部错误: {}", detail),
            CoreError::Timeout => warn!("请求处理超时"),
            _ => {}
        }

        let error_response = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
