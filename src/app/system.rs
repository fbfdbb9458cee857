//! 系统级处理器：API 信息、健康检查、请求头示例、404

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::app::AppState;
use crate::core::error::ErrorResponse;

/// GET /
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "🎉 Welcome to the Product Catalog API!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "root": "GET /",
            "health": "GET /health",
            "allProducts": "GET /api/products",
            "productById": "GET /api/products/:id",
            "productsByCategory": "GET /api/products?category=electronics",
            "categoryRoute": "GET /api/products/category/:category",
            "categoryProducts": "GET /api/categories/:category/products",
            "expensiveProducts": "GET /api/products?minPrice=100",
            "priceRange": "GET /api/products?minPrice=50&maxPrice=500",
            "inStockProducts": "GET /api/products?inStock=true",
            "headersExample": "GET /api/headers-example",
            "profile": "GET /api/profile"
        }
    }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = state.product_service.store();
    let reachable = store.ping().await.is_ok();

    let (status, label) = if reachable {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "store": {
                "backend": store.backend(),
                "reachable": reachable
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// GET /api/headers-example
pub async fn headers_example(headers: HeaderMap) -> Json<Value> {
    debug!("收到的请求头: {:?}", headers);

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    Json(json!({
        "success": true,
        "message": "Check your server console for headers",
        "yourHeaders": {
            "userAgent": header("user-agent"),
            "accept": header("accept"),
            "contentType": header("content-type"),
            "customHeader": header("x-custom-header")
        }
    }))
}

/// 未匹配路由
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: "Route not found".to_string(),
        }),
    )
}
