use axum::{
    body::Bytes,
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
};
use axum_test::TestServer;
use comida_al_paso::{
    build_app,
    config::{CategoryWritePolicy, Config},
    core::auth::UserAccount,
    infrastructure::repository::MemoryRepository,
    AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_test_server(policy: CategoryWritePolicy) -> TestServer {
    let mut config = Config::default();
    config.logging.file_output = false;
    config.auth.category_write = policy;
    config.auth.users = vec![UserAccount::new("cajero", "clave123")];

    let state = AppState::new(Arc::new(MemoryRepository::new()), &config.auth);
    TestServer::new(build_app(state, &config)).unwrap()
}

fn public_server() -> TestServer {
    create_test_server(CategoryWritePolicy::Public)
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

async fn obtain_pair(server: &TestServer) -> Value {
    let response = server
        .post("/api/token/")
        .json(&json!({"username": "cajero", "password": "clave123"}))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

async fn access_token(server: &TestServer) -> String {
    obtain_pair(server).await["access"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_category(server: &TestServer, nombre: &str, descripcion: &str) {
    server
        .post("/api/categorias/")
        .json(&json!({"nombre": nombre, "descripcion": descripcion}))
        .await
        .assert_status(StatusCode::CREATED);
}

async fn create_product(server: &TestServer, token: &str, body: Value) -> axum_test::TestResponse {
    server
        .post("/api/productos")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&body)
        .await
}

#[tokio::test]
async fn test_api_home() {
    let server = public_server();

    let response = server.get("/api/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["mensaje"], "Bienvenido a la API de Comida al Paso");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints_disponibles"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_api_test_counts() {
    let server = public_server();
    let token = access_token(&server).await;

    create_category(&server, "Bebidas", "Drinks").await;
    create_product(
        &server,
        &token,
        json!({"nombre_producto": "Agua", "nombre_categoria": "Bebidas", "precio": 1}),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let body: Value = server.get("/api/test").await.json();
    assert_eq!(body["mensaje"], "API funcionando correctamente");
    assert_eq!(body["total_categorias"], 1);
    assert_eq!(body["total_productos"], 1);
}

#[tokio::test]
async fn test_create_and_list_category() {
    let server = public_server();

    let response = server
        .post("/api/categorias/")
        .json(&json!({"nombre": "Bebidas", "descripcion": "Drinks"}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["mensaje"], "Categoría creada exitosamente");
    assert_eq!(body["categoria"]["nombre"], "Bebidas");
    assert_eq!(body["categoria"]["descripcion"], "Drinks");

    let listed: Vec<Value> = server.get("/api/categorias/").await.json();
    let matching: Vec<_> = listed
        .iter()
        .filter(|c| c["nombre"] == "Bebidas" && c["descripcion"] == "Drinks")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["id"], body["categoria"]["id"]);
}

#[tokio::test]
async fn test_category_description_is_optional() {
    let server = public_server();

    let response = server
        .post("/api/categorias")
        .json(&json!({"nombre": "Postres"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["categoria"]["descripcion"], "");
}

#[tokio::test]
async fn test_category_without_name_is_rejected() {
    let server = public_server();

    for body in [json!({}), json!({"nombre": ""}), json!({"nombre": "   "}), json!({"nombre": null})] {
        let response = server.post("/api/categorias/").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"error": "Nombre es requerido"}));
    }

    let listed: Vec<Value> = server.get("/api/categorias/").await.json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_duplicate_category_is_rejected() {
    let server = public_server();
    create_category(&server, "Bebidas", "Drinks").await;

    let response = server
        .post("/api/categorias/")
        .json(&json!({"nombre": "BEBIDAS"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    let listed: Vec<Value> = server.get("/api/categorias/").await.json();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_authenticated_category_policy() {
    let server = create_test_server(CategoryWritePolicy::Authenticated);

    let response = server
        .post("/api/categorias/")
        .json(&json!({"nombre": "Bebidas"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Autenticación requerida para crear categorías"})
    );

    let token = access_token(&server).await;
    server
        .post("/api/categorias/")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"nombre": "Bebidas"}))
        .await
        .assert_status(StatusCode::CREATED);

    let home: Value = server.get("/api/").await.json();
    let endpoints = home["endpoints_disponibles"].as_array().unwrap();
    assert!(endpoints
        .iter()
        .any(|e| e == "POST /api/categorias/ - Crear nueva categoría (requiere autenticación)"));
}

#[tokio::test]
async fn test_create_product() {
    let server = public_server();
    let token = access_token(&server).await;
    create_category(&server, "Bebidas", "Drinks").await;

    let response = create_product(
        &server,
        &token,
        json!({
            "nombre_producto": "Coca-Cola",
            "nombre_categoria": "bebidas",
            "precio": "2.50",
            "stock": 10
        }),
    )
    .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["mensaje"], "Producto creado exitosamente");
    assert_eq!(
        body["producto"],
        json!({"nombre": "Coca-Cola", "categoria": "Bebidas", "precio": 2.5, "stock": 10})
    );

    let listed: Value = server.get("/api/productos/").await.json();
    assert_eq!(
        listed,
        json!([{
            "nombre": "Coca-Cola",
            "categoria": "Bebidas",
            "precio": 2.5,
            "stock": 10,
            "descripcion": "Drinks"
        }])
    );
}

#[tokio::test]
async fn test_product_stock_defaults_to_zero() {
    let server = public_server();
    let token = access_token(&server).await;
    create_category(&server, "Comidas", "").await;

    let response = create_product(
        &server,
        &token,
        json!({"nombre_producto": "Empanada", "nombre_categoria": "Comidas", "precio": 1.75}),
    )
    .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["producto"]["stock"], 0);
}

#[tokio::test]
async fn test_product_with_unknown_category() {
    let server = public_server();
    let token = access_token(&server).await;
    create_category(&server, "Bebidas", "Drinks").await;

    let response = create_product(
        &server,
        &token,
        json!({"nombre_producto": "Flan", "nombre_categoria": "Postres", "precio": "3.00"}),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({"error": "Categoría no encontrada"}));

    let listed: Vec<Value> = server.get("/api/productos").await.json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_product_requires_authentication() {
    let server = public_server();
    create_category(&server, "Bebidas", "Drinks").await;

    let response = server
        .post("/api/productos/")
        .json(&json!({
            "nombre_producto": "Coca-Cola",
            "nombre_categoria": "Bebidas",
            "precio": "2.50"
        }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Autenticación requerida para crear productos"})
    );

    let listed: Vec<Value> = server.get("/api/productos/").await.json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_invalid_and_refresh_tokens_are_rejected() {
    let server = public_server();
    create_category(&server, "Bebidas", "Drinks").await;
    let pair = obtain_pair(&server).await;
    let body = json!({"nombre_producto": "Agua", "nombre_categoria": "Bebidas", "precio": 1});

    let response = create_product(&server, "no-es-un-jwt", body.clone()).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({"error": "Token inválido o expirado"}));

    let refresh = pair["refresh"].as_str().unwrap();
    create_product(&server, refresh, body)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let listed: Vec<Value> = server.get("/api/productos/").await.json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_product_field_errors() {
    let server = public_server();
    let token = access_token(&server).await;

    let response = create_product(
        &server,
        &token,
        json!({"nombre_categoria": "Bebidas", "precio": "gratis", "stock": -2}),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["nombre_producto"], json!(["Este campo es requerido."]));
    assert_eq!(body["precio"], json!(["Se requiere un número válido."]));
    assert!(body["stock"].is_array());
    assert!(body.get("nombre_categoria").is_none());
}

#[tokio::test]
async fn test_malformed_json() {
    let server = public_server();
    let token = access_token(&server).await;

    let response = server
        .post("/api/productos/")
        .add_header(AUTHORIZATION, bearer(&token))
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_filter_products_by_category() {
    let server = public_server();
    let token = access_token(&server).await;
    create_category(&server, "Bebidas", "Drinks").await;
    create_category(&server, "Postres", "Dulces").await;
    create_category(&server, "Helados", "").await;

    for (nombre, categoria) in [("Agua", "Bebidas"), ("Flan", "postres"), ("Jugo", "BEBIDAS")] {
        create_product(
            &server,
            &token,
            json!({"nombre_producto": nombre, "nombre_categoria": categoria, "precio": "1.00"}),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    let exact: Value = server.get("/api/productos/Bebidas").await.json();
    let lower: Value = server.get("/api/productos/bebidas").await.json();
    assert_eq!(exact, lower);

    let names: Vec<_> = exact
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["nombre"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Agua", "Jugo"]);

    let empty = server.get("/api/productos/Helados").await;
    empty.assert_status_ok();
    assert_eq!(empty.json::<Value>(), json!([]));

    let missing = server.get("/api/productos/Inexistente").await;
    missing.assert_status_ok();
    assert_eq!(missing.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_token_endpoints() {
    let server = public_server();

    let response = server
        .post("/api/token/")
        .json(&json!({"username": "cajero", "password": "incorrecta"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.json::<Value>()["error"].is_string());

    let response = server.post("/api/token/").json(&json!({"username": "cajero"})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"password": ["Este campo es requerido."]})
    );

    let pair = obtain_pair(&server).await;
    let response = server
        .post("/api/token/refresh/")
        .json(&json!({"refresh": pair["refresh"]}))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["access"].is_string());

    server
        .post("/api/token/refresh/")
        .json(&json!({"refresh": pair["access"]}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_numeric_names_are_accepted_as_text() {
    let server = public_server();
    let token = access_token(&server).await;

    let response = server.post("/api/categorias/").json(&json!({"nombre": 5})).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["categoria"]["nombre"], "5");

    let response = create_product(
        &server,
        &token,
        json!({"nombre_producto": 123, "nombre_categoria": 5, "precio": "4.00"}),
    )
    .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>()["producto"],
        json!({"nombre": "123", "categoria": "5", "precio": 4.0, "stock": 0})
    );
}

#[tokio::test]
async fn test_wrong_json_types_are_field_errors() {
    let server = public_server();
    let token = access_token(&server).await;
    create_category(&server, "Bebidas", "Drinks").await;

    let response = create_product(
        &server,
        &token,
        json!({"nombre_producto": true, "nombre_categoria": "Bebidas", "precio": "1.00"}),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"nombre_producto": ["No es una cadena válida."]})
    );

    let response = create_product(
        &server,
        &token,
        json!({"nombre_producto": "Agua", "nombre_categoria": {"id": 1}, "precio": [1]}),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["nombre_categoria"], json!(["No es una cadena válida."]));
    assert_eq!(body["precio"], json!(["Se requiere un número válido."]));

    let response = server.post("/api/categorias/").json(&json!({"nombre": false})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({"error": "No es una cadena válida."}));

    let listed: Vec<Value> = server.get("/api/productos/").await.json();
    assert!(listed.is_empty());
    let categories: Vec<Value> = server.get("/api/categorias/").await.json();
    assert_eq!(categories.len(), 1);
}

#[tokio::test]
async fn test_price_with_three_decimals_is_rejected() {
    let server = public_server();
    let token = access_token(&server).await;
    create_category(&server, "Bebidas", "Drinks").await;

    let response = create_product(
        &server,
        &token,
        json!({"nombre_producto": "Agua", "nombre_categoria": "Bebidas", "precio": "1.500"}),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"precio": ["Asegúrese de que no haya más de 2 decimales."]})
    );
}

#[cfg(feature = "database")]
mod failing_store {
    use super::*;
    use async_trait::async_trait;
    use comida_al_paso::{
        app::{
            category::model::{Category, NewCategory},
            product::model::{NewProduct, ProductListing},
        },
        infrastructure::repository::{InventoryCounts, InventoryRepository, RepositoryError},
    };

    /// 所有操作都返回连接池超时
    struct UnavailableRepository;

    fn pool_timeout() -> RepositoryError {
        RepositoryError::Database(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl InventoryRepository for UnavailableRepository {
        async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
            Err(pool_timeout())
        }

        async fn create_category(&self, _: NewCategory) -> Result<Category, RepositoryError> {
            Err(pool_timeout())
        }

        async fn find_category_by_name(&self, _: &str) -> Result<Option<Category>, RepositoryError> {
            Err(pool_timeout())
        }

        async fn list_products(&self) -> Result<Vec<ProductListing>, RepositoryError> {
            Err(pool_timeout())
        }

        async fn create_product(&self, _: NewProduct) -> Result<ProductListing, RepositoryError> {
            Err(pool_timeout())
        }

        async fn find_products_by_category(
            &self,
            _: &str,
        ) -> Result<Vec<ProductListing>, RepositoryError> {
            Err(pool_timeout())
        }

        async fn counts(&self) -> Result<InventoryCounts, RepositoryError> {
            Err(pool_timeout())
        }
    }

    fn unavailable_server() -> TestServer {
        let mut config = Config::default();
        config.auth.users = vec![UserAccount::new("cajero", "clave123")];
        let state = AppState::new(Arc::new(UnavailableRepository), &config.auth);
        TestServer::new(build_app(state, &config)).unwrap()
    }

    fn assert_generic_500(response: axum_test::TestResponse) {
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let text = response.text();
        assert!(!text.contains(&sqlx::Error::PoolTimedOut.to_string()));
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"error": "Error interno del servidor"})
        );
    }

    #[tokio::test]
    async fn test_storage_failure_returns_generic_error() {
        let server = unavailable_server();
        let token = access_token(&server).await;

        assert_generic_500(
            server
                .post("/api/categorias/")
                .json(&json!({"nombre": "Bebidas"}))
                .await,
        );
        assert_generic_500(
            create_product(
                &server,
                &token,
                json!({"nombre_producto": "Agua", "nombre_categoria": "Bebidas", "precio": 1}),
            )
            .await,
        );
        assert_generic_500(server.get("/api/productos/").await);
        assert_generic_500(server.get("/api/test").await);
    }
}
