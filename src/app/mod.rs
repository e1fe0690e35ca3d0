//! 应用层：状态、路由表和各资源的处理器

use axum::{
    http::{
        header::{
            HeaderName, ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE, ORIGIN, USER_AGENT,
        },
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{AuthConfig, CategoryWritePolicy, Config, CorsConfig};
use crate::core::{auth::TokenService, middleware::request_logging_middleware};
use crate::infrastructure::repository::InventoryRepository;

pub mod auth;
pub mod category;
pub mod home;
pub mod product;

use category::service::CategoryService;
use product::service::ProductService;

/// 所有处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn InventoryRepository>,
    pub categories: CategoryService,
    pub products: ProductService,
    pub tokens: TokenService,
    pub category_write: CategoryWritePolicy,
}

impl AppState {
    pub fn new(inventory: Arc<dyn InventoryRepository>, auth: &AuthConfig) -> Self {
        Self {
            categories: CategoryService::new(inventory.clone()),
            products: ProductService::new(inventory.clone()),
            tokens: TokenService::new(auth),
            category_write: auth.category_write,
            inventory,
        }
    }
}

/// 路由表
pub fn create_routes() -> Router<AppState> {
    use category::handler::{create_category, list_categories};
    use product::handler::{create_product, list_products, products_by_category};

    Router::new()
        .route("/api", get(home::handler::api_home))
        .route("/api/", get(home::handler::api_home))
        .route("/api/test", get(home::handler::test_api))
        .route("/api/token/", post(auth::handler::obtain_token))
        .route("/api/token/refresh/", post(auth::handler::refresh_token))
        .route(
            "/api/categorias",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/categorias/",
            get(list_categories).post(create_category),
        )
        .route("/api/productos", get(list_products).post(create_product))
        .route("/api/productos/", get(list_products).post(create_product))
        .route("/api/productos/:categoria", get(products_by_category))
}

/// 组装完整应用：路由 + 中间件 + 状态
pub fn build_app(state: AppState, config: &Config) -> Router {
    create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(cors_layer(&config.cors))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.timeout_seconds,
                ))),
        )
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allow_any {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::DELETE,
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            ACCEPT,
            ACCEPT_ENCODING,
            AUTHORIZATION,
            CONTENT_TYPE,
            ORIGIN,
            USER_AGENT,
            HeaderName::from_static("dnt"),
            HeaderName::from_static("x-csrftoken"),
            HeaderName::from_static("x-requested-with"),
        ])
}
