//! Binário do serviço: tracing, banco, administrador inicial e servidor HTTP

use anyhow::{Context, Result};
use clinica_api::{create_router, AppConfig, AppState};
use clinica_db::auth::LoginService;
use clinica_db::init_db_pool;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let json = std::env::var("CLINICA_LOG_JSON")
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Falha ao aguardar sinal de encerramento: {}", e);
    }
    info!("Encerrando servidor");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    info!(
        "Iniciando {} {}",
        clinica_api::built_info::PKG_NAME,
        clinica_api::built_info::PKG_VERSION
    );

    let config = AppConfig::from_env();
    let pool = init_db_pool(&config.db).await?;

    if let Some((login, password)) = config.bootstrap_admin() {
        LoginService::new(pool.clone())
            .ensure_admin(login, password)
            .await
            .context("Falha ao criar administrador inicial")?;
    }

    let addr = config.bind_addr;
    let app = create_router(AppState::new(pool, config));

    info!("Escutando em {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Falha no servidor HTTP")?;

    Ok(())
}
