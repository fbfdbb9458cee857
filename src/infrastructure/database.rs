//! PostgreSQL 产品存储

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Postgres, QueryBuilder,
};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use super::store::{ProductStore, StoreError};
use crate::app::product::{
    filter::ProductFilter,
    model::{NewProduct, Product},
};
use crate::config::StoreConfig;

const SELECT_PRODUCTS: &str = "SELECT id, name, price, category, in_stock FROM products";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let unavailable = matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        );

        if unavailable {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("database_url is not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await
            .map_err(|e| {
                error!("❌ 数据库连接失败: {}", e);
                StoreError::Unavailable(e.to_string())
            })?;

        info!("✅ 已连接到 PostgreSQL");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 创建产品表（生产环境应使用迁移）
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL CHECK (length(name) > 0),
                price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                category TEXT NOT NULL,
                in_stock BOOLEAN NOT NULL,
                seq BIGSERIAL NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // 旧表没有 seq 列时补上，插入顺序以 seq 为准
        sqlx::query("ALTER TABLE products ADD COLUMN IF NOT EXISTS seq BIGSERIAL")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// 列表查询：过滤条件 + 按插入顺序排序
///
/// 同一事务内 `NOW()` 相同，所以排序依赖 `seq` 而不是 `created_at`。
pub fn select_products(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_PRODUCTS);
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY seq");
    builder
}

/// 把过滤条件追加为带参数绑定的 WHERE 子句
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if filter.is_unconstrained() {
        return;
    }

    builder.push(" WHERE ");
    let mut conditions = builder.separated(" AND ");

    if let Some(category) = &filter.category {
        conditions.push("category = ");
        conditions.push_bind_unseparated(category.clone());
    }
    if let Some(min) = filter.price.min {
        conditions.push("price >= ");
        conditions.push_bind_unseparated(min);
    }
    if let Some(max) = filter.price.max {
        conditions.push("price <= ");
        conditions.push_bind_unseparated(max);
    }
    if let Some(in_stock) = filter.in_stock {
        conditions.push("in_stock = ");
        conditions.push_bind_unseparated(in_stock);
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let mut builder = select_products(filter);
        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&format!("{} WHERE id = $1", SELECT_PRODUCTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 as usize)
    }

    async fn insert_many(&self, products: Vec<NewProduct>) -> Result<Vec<Product>, StoreError> {
        for product in &products {
            product.validate()?;
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(products.len());

        for product in products {
            let product = product.into_product(Uuid::new_v4());
            sqlx::query(
                "INSERT INTO products (id, name, price, category, in_stock) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.in_stock)
            .execute(&mut *tx)
            .await?;
            created.push(product);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL 连接池已关闭");
    }
}
