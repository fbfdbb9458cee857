//! 服务器初始化与路由

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::app::{
    product::{handler as product, model::seed_products},
    profile, system, AppState,
};
use crate::config::{Config, ServerConfig, StoreBackend, StoreConfig};
use crate::core::middleware::{error_envelope_middleware, request_logging_middleware};
use crate::infrastructure::{
    memory::InMemoryProductStore,
    store::{seed_if_empty, ProductStore},
};

/// 构建路由
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(system::api_info))
        .route("/health", get(system::health_check))
        .route("/api/products", get(product::list_products))
        .route("/api/products/:id", get(product::get_product))
        .route(
            "/api/products/category/:category",
            get(product::list_products_in_category),
        )
        .route(
            "/api/categories/:category/products",
            get(product::category_products),
        )
        .route("/api/headers-example", get(system::headers_example))
        .route("/api/profile", get(profile::get_profile))
        .fallback(system::not_found)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeout_seconds)))
        .layer(middleware::from_fn(error_envelope_middleware))
        .with_state(state)
}

/// 按配置构造存储，并在需要时写入示例数据
pub async fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn ProductStore>> {
    let store: Arc<dyn ProductStore> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryProductStore::new()),
        #[cfg(feature = "database")]
        StoreBackend::Postgres => {
            let store = crate::infrastructure::database::PgProductStore::connect(config).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
        #[cfg(not(feature = "database"))]
        StoreBackend::Postgres => {
            anyhow::bail!("postgres 存储需要启用 `database` feature")
        }
    };

    if config.seed_on_empty {
        seed_if_empty(store.as_ref(), seed_products()).await?;
    }

    info!("使用 {} 存储", store.backend());
    Ok(store)
}

/// 启动服务器，直到收到 Ctrl+C 或 SIGTERM
pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config.store).await?;
    let state = AppState::new(store.clone(), config.profile.clone());
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 服务器运行在 http://{}", addr);
    info!(
        "超时: {}s, CORS: {}",
        config.server.timeout_seconds, config.server.enable_cors
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("服务器已关闭");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("无法监听 Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到 Ctrl+C，正在关闭..."),
        _ = terminate => info!("收到 SIGTERM，正在关闭..."),
    }
}
