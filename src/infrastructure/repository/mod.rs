//! 库存存储接口
//!
//! 处理器和服务只依赖 `InventoryRepository`，具体实现有 PostgreSQL 和内存两种。

use async_trait::async_trait;

use crate::app::category::model::{Category, NewCategory};
use crate::app::product::model::{NewProduct, ProductListing};

pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;

pub use memory::MemoryRepository;
#[cfg(feature = "database")]
pub use postgres::PgRepository;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 分类名（不区分大小写）已存在
    #[error("category already exists: {0}")]
    Duplicate(String),
    /// 商品引用的分类 id 不存在
    #[error("category {0} does not exist")]
    MissingCategory(i64),
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 统计数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryCounts {
    pub categories: i64,
    pub products: i64,
}

/// 列表结果都按 id 升序返回
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    async fn create_category(&self, category: NewCategory) -> Result<Category, RepositoryError>;

    /// 按名字查找分类，不区分大小写的精确匹配
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError>;

    async fn list_products(&self) -> Result<Vec<ProductListing>, RepositoryError>;

    async fn create_product(&self, product: NewProduct) -> Result<ProductListing, RepositoryError>;

    /// 分类名不区分大小写；没有匹配时返回空列表
    async fn find_products_by_category(
        &self,
        category_name: &str,
    ) -> Result<Vec<ProductListing>, RepositoryError>;

    async fn counts(&self) -> Result<InventoryCounts, RepositoryError>;
}
