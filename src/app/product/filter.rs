//! 产品查询过滤
//!
//! 请求参数分两步处理：
//! - [`ProductQuery::validate`] 校验原始字符串参数，得到类型化的 [`FilterParams`]
//! - [`ProductFilter::from`] 由 [`FilterParams`] 构造过滤条件，纯函数，不会失败
//!
//! 所有条件之间是 AND 关系，缺省的参数不施加约束。

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::model::Product;

/// 列表接口接收的原始查询参数
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub in_stock: Option<String>,
}

/// 查询参数校验错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("{param} must be a finite number, got '{value}'")]
    InvalidNumber { param: &'static str, value: String },

    #[error("minPrice ({min}) must not exceed maxPrice ({max})")]
    InvertedRange { min: f64, max: f64 },
}

/// 校验通过的类型化参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
}

impl ProductQuery {
    /// 用路径中的分类覆盖查询参数中的分类
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn validate(&self) -> Result<FilterParams, FilterError> {
        let category = self
            .category
            .as_ref()
            .filter(|c| !c.is_empty())
            .cloned();

        let min_price = parse_price("minPrice", self.min_price.as_deref())?;
        let max_price = parse_price("maxPrice", self.max_price.as_deref())?;

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(FilterError::InvertedRange { min, max });
            }
        }

        // 只有字面量 "true" 视为 true，其余任何值（包括空串）都是 false
        let in_stock = self.in_stock.as_deref().map(|v| v == "true");

        Ok(FilterParams {
            category,
            min_price,
            max_price,
            in_stock,
        })
    }
}

fn parse_price(param: &'static str, raw: Option<&str>) -> Result<Option<f64>, FilterError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(FilterError::InvalidNumber {
            param,
            value: raw.to_string(),
        }),
    }
}

/// 价格闭区间，两端都可缺省
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// 产品过滤条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub price: PriceRange,
    pub in_stock: Option<bool>,
}

impl From<&FilterParams> for ProductFilter {
    fn from(params: &FilterParams) -> Self {
        Self {
            category: params.category.clone(),
            price: PriceRange {
                min: params.min_price,
                max: params.max_price,
            },
            in_stock: params.in_stock,
        }
    }
}

impl ProductFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none() && self.price.is_unbounded() && self.in_stock.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.category
            .as_ref()
            .map_or(true, |category| product.category == *category)
            && self.price.contains(product.price)
            && self.in_stock.map_or(true, |in_stock| product.in_stock == in_stock)
    }

    /// 等价的查询文档，例如 `{"category": "electronics", "price": {"$gte": 100.0}}`
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();

        if let Some(category) = &self.category {
            doc.insert("category".to_string(), json!(category));
        }

        if !self.price.is_unbounded() {
            let mut range = Map::new();
            if let Some(min) = self.price.min {
                range.insert("$gte".to_string(), json!(min));
            }
            if let Some(max) = self.price.max {
                range.insert("$lte".to_string(), json!(max));
            }
            doc.insert("price".to_string(), Value::Object(range));
        }

        if let Some(in_stock) = self.in_stock {
            doc.insert("inStock".to_string(), json!(in_stock));
        }

        Value::Object(doc)
    }
}
