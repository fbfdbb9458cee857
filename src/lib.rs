//! # 产品目录 API
//!
//! 基于 Axum 的产品目录 JSON 服务：
//! - 按分类、价格区间、库存状态过滤产品列表
//! - 内存存储或 PostgreSQL 存储，启动时注入
//! - 统一的 `{ success, count, data }` 响应格式

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod server;

pub use app::product::filter::{FilterError, FilterParams, PriceRange, ProductFilter, ProductQuery};
pub use app::product::model::{NewProduct, Product};
pub use app::AppState;
pub use config::Config;
pub use infrastructure::store::{ProductStore, StoreError};
