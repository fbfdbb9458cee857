//! 应用层

pub mod product;
pub mod profile;
pub mod system;

use std::sync::Arc;

use crate::config::ProfileConfig;
use crate::infrastructure::store::ProductStore;
use product::service::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub profile: Arc<ProfileConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, profile: ProfileConfig) -> Self {
        Self {
            product_service: ProductService::new(store),
            profile: Arc::new(profile),
        }
    }
}
