//! 个人简介处理器

use axum::{extract::State, response::Json};

use crate::app::AppState;
use crate::config::ProfileConfig;
use crate::core::response::ApiResponse;

/// GET /api/profile
pub async fn get_profile(State(state): State<AppState>) -> Json<ApiResponse<ProfileConfig>> {
    Json(ApiResponse::success(state.profile.as_ref().clone()))
}
