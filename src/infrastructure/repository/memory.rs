//! 内存存储，用于测试和不连接数据库的本地运行

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{InventoryCounts, InventoryRepository, RepositoryError};
use crate::app::category::model::{Category, NewCategory};
use crate::app::product::model::{NewProduct, ProductListing};

#[derive(Debug, Clone)]
struct StoredProduct {
    name: String,
    category_id: i64,
    price: Decimal,
    stock: i32,
}

#[derive(Debug, Default)]
struct Store {
    // 按插入顺序保存，id 单调递增
    categories: Vec<Category>,
    products: Vec<StoredProduct>,
    next_category_id: i64,
}

impl Store {
    fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn listing(&self, product: &StoredProduct) -> Option<ProductListing> {
        self.category(product.category_id).map(|category| ProductListing {
            name: product.name.clone(),
            category: category.name.clone(),
            price: product.price,
            stock: product.stock,
            description: category.description.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl InventoryRepository for MemoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.store.read().await.categories.clone())
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, RepositoryError> {
        let mut store = self.store.write().await;
        if store.categories.iter().any(|c| same_name(&c.name, &category.name)) {
            return Err(RepositoryError::Duplicate(category.name));
        }

        store.next_category_id += 1;
        let created = Category {
            id: store.next_category_id,
            name: category.name,
            description: category.description,
        };
        store.categories.push(created.clone());
        Ok(created)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .categories
            .iter()
            .find(|c| same_name(&c.name, name))
            .cloned())
    }

    async fn list_products(&self) -> Result<Vec<ProductListing>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .products
            .iter()
            .filter_map(|p| store.listing(p))
            .collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<ProductListing, RepositoryError> {
        let mut store = self.store.write().await;
        let stored = StoredProduct {
            name: product.name,
            category_id: product.category_id,
            price: product.price,
            stock: product.stock,
        };
        let listing = store
            .listing(&stored)
            .ok_or(RepositoryError::MissingCategory(product.category_id))?;

        store.products.push(stored);
        Ok(listing)
    }

    async fn find_products_by_category(
        &self,
        category_name: &str,
    ) -> Result<Vec<ProductListing>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .products
            .iter()
            .filter_map(|p| store.listing(p))
            .filter(|listing| same_name(&listing.category, category_name))
            .collect())
    }

    async fn counts(&self) -> Result<InventoryCounts, RepositoryError> {
        let store = self.store.read().await;
        Ok(InventoryCounts {
            categories: store.categories.len() as i64,
            products: store.products.len() as i64,
        })
    }
}
