//! 产品数据模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

/// 新建产品请求，id 由存储层分配
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,

    pub category: String,
    pub in_stock: bool,
}

impl NewProduct {
    pub fn new(name: &str, price: f64, category: &str, in_stock: bool) -> Self {
        Self {
            name: name.to_string(),
            price,
            category: category.to_string(),
            in_stock,
        }
    }

    pub fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
        }
    }
}

/// 启动时写入的示例数据
pub fn seed_products() -> Vec<NewProduct> {
    vec![
        NewProduct::new("Laptop", 999.0, "electronics", true),
        NewProduct::new("Mouse", 25.0, "electronics", true),
        NewProduct::new("Keyboard", 75.0, "electronics", false),
        NewProduct::new("Monitor", 300.0, "electronics", true),
        NewProduct::new("Desk", 450.0, "furniture", true),
        NewProduct::new("Chair", 250.0, "furniture", true),
    ]
}
