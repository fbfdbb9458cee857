//! 产品存储抽象
//!
//! 存储实例在启动时显式构造并注入到应用状态中，不使用全局变量。

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::app::product::{
    filter::ProductFilter,
    model::{NewProduct, Product},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 后端不可达或尚未初始化
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid product: {0}")]
    Invalid(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("invalid {}", field))
                })
            })
            .collect();

        StoreError::Invalid(messages.join(", "))
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 后端名称，用于健康检查和日志
    fn backend(&self) -> &'static str;

    /// 返回满足过滤条件的全部产品，保持插入顺序
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    async fn insert_many(&self, products: Vec<NewProduct>) -> Result<Vec<Product>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self) {}
}

/// 集合为空时写入示例数据，返回写入的条数
pub async fn seed_if_empty(
    store: &dyn ProductStore,
    seed: Vec<NewProduct>,
) -> Result<usize, StoreError> {
    let existing = store.count().await?;
    if existing > 0 {
        info!("存储中已有 {} 个产品，跳过示例数据", existing);
        return Ok(0);
    }

    let inserted = store.insert_many(seed).await?;
    info!("📝 已写入 {} 个示例产品", inserted.len());
    Ok(inserted.len())
}
