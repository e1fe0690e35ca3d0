//! 商品业务服务

use std::sync::Arc;
use tracing::{info, warn};

use super::model::{CreateProductRequest, CreatedProduct, NewProduct, ProductListing};
use crate::core::error::CoreError;
use crate::infrastructure::repository::InventoryRepository;

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn InventoryRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn InventoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<ProductListing>, CoreError> {
        Ok(self.repo.list_products().await?)
    }

    /// 校验请求、按名字解析分类，然后创建商品
    pub async fn create(&self, request: CreateProductRequest) -> Result<CreatedProduct, CoreError> {
        let draft = request.validated().map_err(|errors| {
            warn!("Invalid product payload: {:?}", errors);
            CoreError::Validation(errors)
        })?;

        let category = self
            .repo
            .find_category_by_name(&draft.category_name)
            .await?
            .ok_or_else(|| {
                warn!("Product references unknown category: {}", draft.category_name);
                CoreError::ReferenceNotFound
            })?;

        let created = self
            .repo
            .create_product(NewProduct {
                name: draft.name,
                category_id: category.id,
                price: draft.price,
                stock: draft.stock,
            })
            .await?;

        info!("Product created: {} in {}", created.name, created.category);
        Ok(created.into())
    }

    pub async fn by_category(&self, category_name: &str) -> Result<Vec<ProductListing>, CoreError> {
        let products = self.repo.find_products_by_category(category_name).await?;
        if products.is_empty() {
            warn!("No products found for category: {}", category_name);
        }
        Ok(products)
    }
}
