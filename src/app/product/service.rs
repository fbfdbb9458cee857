//! 产品业务服务

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::{
    filter::{ProductFilter, ProductQuery},
    model::Product,
};
use crate::core::error::CoreError;
use crate::infrastructure::store::ProductStore;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ProductStore> {
        &self.store
    }

    /// 先校验参数，再构造过滤条件查询存储
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, CoreError> {
        let params = query.validate()?;
        let filter = ProductFilter::from(&params);
        debug!("产品过滤条件: {}", filter.to_document());

        Ok(self.store.find(&filter).await?)
    }

    /// 路径中的分类优先于查询参数
    pub async fn list_by_category(
        &self,
        category: &str,
        query: ProductQuery,
    ) -> Result<Vec<Product>, CoreError> {
        self.list(&query.with_category(category)).await
    }

    pub async fn list_exact_category(&self, category: &str) -> Result<Vec<Product>, CoreError> {
        Ok(self.store.find(&ProductFilter::by_category(category)).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Product, CoreError> {
        let id = Uuid::parse_str(id)
            .map_err(|_| CoreError::BadRequest("Invalid product ID format".to_string()))?;

        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Product not found".to_string()))
    }
}
