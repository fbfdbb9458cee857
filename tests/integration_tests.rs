use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use catalog_api::{
    app::{product::model::seed_products, AppState},
    config::{ProfileConfig, ServerConfig},
    infrastructure::memory::InMemoryProductStore,
    server::build_router,
    NewProduct, Product, ProductFilter, ProductStore, StoreError,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

async fn seeded_store() -> (Arc<InMemoryProductStore>, Vec<Product>) {
    let store = Arc::new(InMemoryProductStore::new());
    let created = store.insert_many(seed_products()).await.unwrap();
    (store, created)
}

fn router(store: Arc<dyn ProductStore>) -> Router {
    build_router(
        AppState::new(store, ProfileConfig::default()),
        &ServerConfig::default(),
    )
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri).await
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

/// 模拟不可用或出错的后端
struct BrokenStore {
    unavailable: bool,
}

impl BrokenStore {
    fn error(&self) -> StoreError {
        if self.unavailable {
            StoreError::Unavailable("connection refused".to_string())
        } else {
            StoreError::Backend("relation \"products\" does not exist".to_string())
        }
    }
}

#[async_trait]
impl ProductStore for BrokenStore {
    fn backend(&self) -> &'static str {
        "broken"
    }

    async fn find(&self, _filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        Err(self.error())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Product>, StoreError> {
        Err(self.error())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Err(self.error())
    }

    async fn insert_many(&self, _products: Vec<NewProduct>) -> Result<Vec<Product>, StoreError> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(self.error())
    }
}

/// 查询耗时超过请求超时时间的后端
struct SlowStore;

#[async_trait]
impl ProductStore for SlowStore {
    fn backend(&self) -> &'static str {
        "slow"
    }

    async fn find(&self, _filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(None)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(0)
    }

    async fn insert_many(&self, _products: Vec<NewProduct>) -> Result<Vec<Product>, StoreError> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_list_without_params_returns_everything() {
    let (store, created) = seeded_store().await;
    let (status, body) = get(router(store), "/api/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], created.len());
    assert_eq!(body["data"].as_array().unwrap().len(), created.len());
}

#[tokio::test]
async fn test_category_and_min_price() {
    let (store, _) = seeded_store().await;
    let (status, body) = get(
        router(store),
        "/api/products?category=electronics&minPrice=100",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(names(&body), ["Laptop", "Monitor"]);
}

#[tokio::test]
async fn test_price_range_and_stock() {
    let (store, _) = seeded_store().await;
    let (_, body) = get(
        router(store.clone()),
        "/api/products?minPrice=50&maxPrice=500&inStock=true",
    )
    .await;
    assert_eq!(names(&body), ["Monitor", "Desk", "Chair"]);

    let (_, body) = get(router(store), "/api/products?inStock=false").await;
    assert_eq!(names(&body), ["Keyboard"]);
}

#[tokio::test]
async fn test_in_stock_non_literal_values_mean_false() {
    let (store, _) = seeded_store().await;

    for value in ["yes", "1", "True", ""] {
        let (status, body) =
            get(router(store.clone()), &format!("/api/products?inStock={}", value)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), ["Keyboard"], "inStock={value}");
    }
}

#[tokio::test]
async fn test_product_json_shape() {
    let (store, _) = seeded_store().await;
    let (_, body) = get(router(store), "/api/products?category=furniture&maxPrice=300").await;

    let chair = &body["data"][0];
    assert_eq!(chair["name"], "Chair");
    assert_eq!(chair["price"], 250.0);
    assert_eq!(chair["category"], "furniture");
    assert_eq!(chair["inStock"], true);
    assert!(Uuid::parse_str(chair["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_malformed_price_is_client_error() {
    let (store, _) = seeded_store().await;
    let (status, body) = get(router(store), "/api/products?minPrice=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("minPrice"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_inverted_range_is_client_error() {
    let (store, _) = seeded_store().await;
    let (status, body) = get(router(store), "/api/products?minPrice=500&maxPrice=100").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_product_by_id() {
    let (store, created) = seeded_store().await;
    let desk = created.iter().find(|p| p.name == "Desk").unwrap();

    let (status, body) = get(router(store), &format!("/api/products/{}", desk.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Desk");
    assert!(body.get("count").is_none());
}

#[tokio::test]
async fn test_get_product_invalid_and_missing_id() {
    let (store, _) = seeded_store().await;

    let (status, body) = get(router(store.clone()), "/api/products/not-an-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid product ID format");

    let (status, body) = get(router(store), &format!("/api/products/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_category_route_overrides_query_category() {
    let (store, _) = seeded_store().await;
    let (status, body) = get(
        router(store),
        "/api/products/category/furniture?category=electronics&minPrice=300",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), ["Desk"]);
}

#[tokio::test]
async fn test_categories_products_envelope() {
    let (store, _) = seeded_store().await;
    let (status, body) = get(router(store.clone()), "/api/categories/electronics/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "electronics");
    assert_eq!(body["count"], 4);

    let (_, body) = get(router(store), "/api/categories/toys/products").await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_route() {
    let (store, _) = seeded_store().await;
    let (status, body) = get(router(store), "/api/orders").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_wrong_method_is_unknown_route() {
    let (store, created) = seeded_store().await;

    let (status, body) = send(router(store.clone()), Method::POST, "/api/products").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Route not found");

    let uri = format!("/api/products/{}", created[0].id);
    let (status, body) = send(router(store), Method::DELETE, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_undecodable_path_segment_is_client_error() {
    let (store, _) = seeded_store().await;

    for uri in [
        "/api/categories/%FF/products",
        "/api/products/category/%FF",
        "/api/products/%FF",
    ] {
        let (status, body) = get(router(store.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert!(body.get("data").is_none());
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_store_times_out_with_envelope() {
    let config = ServerConfig {
        timeout_seconds: 1,
        ..ServerConfig::default()
    };
    let app = build_router(
        AppState::new(Arc::new(SlowStore), ProfileConfig::default()),
        &config,
    );

    let (status, body) = get(app, "/api/products").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Request timed out");
}

#[tokio::test]
async fn test_unavailable_store_returns_503() {
    let store = Arc::new(BrokenStore { unavailable: true });

    let (status, body) = get(router(store.clone()), "/api/products").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Database not connected");

    let (status, body) = get(router(store), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["store"]["reachable"], false);
}

#[tokio::test]
async fn test_backend_error_is_not_leaked() {
    let store = Arc::new(BrokenStore { unavailable: false });
    let (status, body) = get(router(store), "/api/products?category=electronics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Something went wrong!");
}

#[tokio::test]
async fn test_health_and_info() {
    let (store, _) = seeded_store().await;

    let (status, body) = get(router(store.clone()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["backend"], "in-memory");

    let (status, body) = get(router(store), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]["allProducts"].is_string());
}

#[tokio::test]
async fn test_profile_endpoint() {
    let (store, _) = seeded_store().await;
    let (status, body) = get(router(store), "/api/profile").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], ProfileConfig::default().name);
    assert!(body["data"]["skills"].as_array().unwrap().len() >= 1);
}

#[tokio::test]
async fn test_headers_example_echoes_headers() {
    let (store, _) = seeded_store().await;
    let response = router(store)
        .oneshot(
            Request::builder()
                .uri("/api/headers-example")
                .header("user-agent", "catalog-tests")
                .header("x-custom-header", "hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["yourHeaders"]["userAgent"], "catalog-tests");
    assert_eq!(body["yourHeaders"]["customHeader"], "hello");
    assert_eq!(body["yourHeaders"]["accept"], Value::Null);
}
