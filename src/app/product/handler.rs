//! 商品处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::info;

use super::model::{CreateProductRequest, CreatedProduct, ProductListing};
use crate::app::AppState;
use crate::core::{auth::CurrentUser, error::CoreError, response::Created};

/// 商品列表，公开访问
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductListing>>, CoreError> {
    info!("Product listing requested");
    Ok(Json(state.products.list().await?))
}

/// 创建商品，需要访问令牌
pub async fn create_product(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Created<CreatedProduct>, CoreError> {
    let claims = user.require("Autenticación requerida para crear productos")?;
    info!("Product creation attempt by user: {}", claims.sub);

    let Json(payload) = payload?;
    let product = state.products.create(payload).await?;
    Ok(Created::new("Producto creado exitosamente", "producto", product))
}

/// 按分类名筛选商品
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(categoria): Path<String>,
) -> Result<Json<Vec<ProductListing>>, CoreError> {
    info!("Product search by category: {}", categoria);
    Ok(Json(state.products.by_category(&categoria).await?))
}
