//! API 首页和健康检查

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::config::CategoryWritePolicy;
use crate::core::error::CoreError;

/// API 信息
pub async fn api_home(State(state): State<AppState>) -> Json<Value> {
    info!("API home requested");

    let create_category = match state.category_write {
        CategoryWritePolicy::Public => "POST /api/categorias/ - Crear nueva categoría",
        CategoryWritePolicy::Authenticated => {
            "POST /api/categorias/ - Crear nueva categoría (requiere autenticación)"
        }
    };

    Json(json!({
        "mensaje": "Bienvenido a la API de Comida al Paso",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints_disponibles": [
            "GET  /api/ - Información de la API",
            "GET  /api/test - Endpoint de prueba",
            "POST /api/token/ - Obtener token JWT",
            "POST /api/token/refresh/ - Refrescar token JWT",
            "GET  /api/categorias/ - Obtener todas las categorías",
            create_category,
            "GET  /api/productos/ - Obtener todos los productos",
            "POST /api/productos/ - Crear nuevo producto (requiere autenticación)",
            "GET  /api/productos/<categoria> - Productos por categoría"
        ],
        "documentacion": "Envía requests a los endpoints para interactuar con el inventario"
    }))
}

/// 返回分类和商品总数
pub async fn test_api(State(state): State<AppState>) -> Result<Json<Value>, CoreError> {
    let counts = state.inventory.counts().await?;
    info!(
        "API test: {} categories, {} products",
        counts.categories, counts.products
    );

    Ok(Json(json!({
        "mensaje": "API funcionando correctamente",
        "total_categorias": counts.categories,
        "total_productos": counts.products
    })))
}
