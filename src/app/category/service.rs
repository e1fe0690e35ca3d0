//! 分类业务服务

use std::sync::Arc;
use tracing::{info, warn};

use super::model::{Category, CreateCategoryRequest};
use crate::core::error::CoreError;
use crate::infrastructure::repository::InventoryRepository;

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn InventoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn InventoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>, CoreError> {
        Ok(self.repo.list_categories().await?)
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, CoreError> {
        let new_category = request.validated().map_err(|e| {
            warn!("Invalid category payload: {:?}", e);
            e
        })?;
        let category = self.repo.create_category(new_category).await?;
        info!("Category created: {} ({})", category.name, category.id);
        Ok(category)
    }
}
