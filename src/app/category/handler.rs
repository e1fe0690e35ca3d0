//! 分类处理器

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::info;

use super::model::{Category, CreateCategoryRequest};
use crate::app::AppState;
use crate::config::CategoryWritePolicy;
use crate::core::{auth::CurrentUser, error::CoreError, response::Created};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, CoreError> {
    Ok(Json(state.categories.list().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<Created<Category>, CoreError> {
    info!(
        "Category creation attempt by user: {}",
        user.username().unwrap_or("anonymous")
    );
    if state.category_write == CategoryWritePolicy::Authenticated {
        user.require("Autenticación requerida para crear categorías")?;
    }

    let Json(payload) = payload?;
    let category = state.categories.create(payload).await?;
    Ok(Created::new("Categoría creada exitosamente", "categoria", category))
}
