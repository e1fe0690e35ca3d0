use anyhow::Context;
use clap::Parser;
use comida_al_paso::{
    build_app,
    config::{self, DatabaseBackend},
    infrastructure::{logger::Logger, repository::InventoryRepository},
    AppState,
};
use std::{path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "comida-al-paso", version, about = "Comida al Paso inventory API")]
struct Cli {
    /// 配置文件路径，默认查找 config.toml 和 config/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;

    let _log_guard = Logger::init(&config.logging)?;
    info!(
        "Starting Comida al Paso API v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let inventory = build_repository(&config).await?;
    let state = AppState::new(inventory, &config.auth);
    let app = build_app(state, &config);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 Server running on http://{}", listener.local_addr()?);
    info!("📖 API endpoints:");
    info!("   GET    /api/                    - API info");
    info!("   GET    /api/test                - Health counts");
    info!("   POST   /api/token/              - Obtain token pair");
    info!("   POST   /api/token/refresh/      - Refresh access token");
    info!("   GET    /api/categorias/         - List categories");
    info!("   POST   /api/categorias/         - Create category ({:?})", config.auth.category_write);
    info!("   GET    /api/productos/          - List products");
    info!("   POST   /api/productos/          - Create product (authenticated)");
    info!("   GET    /api/productos/:categoria - Products by category");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn build_repository(config: &config::Config) -> anyhow::Result<Arc<dyn InventoryRepository>> {
    match config.database.backend {
        DatabaseBackend::Memory => {
            info!("Using in-memory inventory store");
            Ok(Arc::new(
                comida_al_paso::infrastructure::repository::MemoryRepository::new(),
            ))
        }
        #[cfg(feature = "database")]
        DatabaseBackend::Postgres => {
            use comida_al_paso::infrastructure::{
                database::DatabaseManager, repository::PgRepository,
            };

            let db = DatabaseManager::new(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            let repo = PgRepository::new(db.into_pool());
            repo.create_tables().await?;
            Ok(Arc::new(repo))
        }
        #[cfg(not(feature = "database"))]
        DatabaseBackend::Postgres => {
            anyhow::bail!("postgres backend requires the `database` feature")
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
