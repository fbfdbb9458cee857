//! 产品处理器

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};

use super::{filter::ProductQuery, model::Product};
use crate::app::AppState;
use crate::core::{error::CoreError, response::ApiResponse};

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for CoreError {
    fn from(rejection: PathRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let Query(query) = query?;
    let products = state.product_service.list(&query).await?;
    Ok(Json(ApiResponse::list(products)))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let Path(id) = id?;
    let product = state.product_service.get(&id).await?;
    Ok(Json(ApiResponse::success(product)))
}

/// GET /api/products/category/:category
pub async fn list_products_in_category(
    State(state): State<AppState>,
    category: Result<Path<String>, PathRejection>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let Path(category) = category?;
    let Query(query) = query?;
    let products = state
        .product_service
        .list_by_category(&category, query)
        .await?;
    Ok(Json(ApiResponse::list(products)))
}

/// GET /api/categories/:category/products
pub async fn category_products(
    State(state): State<AppState>,
    category: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let Path(category) = category?;
    let products = state.product_service.list_exact_category(&category).await?;
    Ok(Json(ApiResponse::list(products).with_category(category)))
}
