//! 内存产品存储

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use super::store::{ProductStore, StoreError};
use crate::app::product::{
    filter::ProductFilter,
    model::{NewProduct, Product},
};

#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Backend("product store lock poisoned".to_string())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    fn backend(&self) -> &'static str {
        "in-memory"
    }

    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(Self::poisoned)?;
        Ok(products.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(Self::poisoned)?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.products.read().map_err(Self::poisoned)?.len())
    }

    async fn insert_many(&self, products: Vec<NewProduct>) -> Result<Vec<Product>, StoreError> {
        // 全部校验通过后才写入
        for product in &products {
            product.validate()?;
        }

        let created: Vec<Product> = products
            .into_iter()
            .map(|p| p.into_product(Uuid::new_v4()))
            .collect();

        self.products
            .write()
            .map_err(Self::poisoned)?
            .extend(created.iter().cloned());

        Ok(created)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
