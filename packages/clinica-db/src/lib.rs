//! Clinica DB - acesso ao banco de dados e regras de negócio da clínica
//!
//! Esta biblioteca fornece:
//! - Modelos de dados (usuário, paciente, médico, consulta)
//! - Migrações automáticas do banco de dados
//! - DAOs por entidade e a busca livre de consultas
//! - Filtros de relatório, login e a tabela de permissões por perfil
//! - Pool de conexão SQLite

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod auth;
pub mod dao;
pub mod datetime;
pub mod error;
pub mod forms;
pub mod migrations;
pub mod models;
pub mod permissions;
pub mod reports;
pub mod search;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{AuthError, ClinicaError, ClinicaResult, DbError, DbResult};

/// Configuração da conexão com o banco de dados
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Caminho para o arquivo SQLite
    pub db_path: String,
    /// Número máximo de conexões no pool
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            db_path: "data/clinica.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Garante que o diretório do arquivo exista
fn ensure_parent_dir(db_path: &Path) -> Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Falha ao criar diretório {}", parent.display()))
        }
        _ => Ok(()),
    }
}

/// Abre o pool SQLite (WAL, chaves estrangeiras ligadas) e aplica as
/// migrações pendentes
pub async fn init_db_pool(config: &DbConfig) -> Result<SqlitePool> {
    let db_path = Path::new(&config.db_path);
    ensure_parent_dir(db_path)?;

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .pragma("synchronous", "NORMAL");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("Falha ao abrir o banco {}", config.db_path))?;

    migrations::run_migrations(&pool)
        .await
        .context("Falha ao aplicar migrações")?;

    info!("Banco de dados pronto: {}", config.db_path);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_creates_missing_dirs_and_enforces_foreign_keys() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = DbConfig {
            db_path: dir
                .path()
                .join("dados")
                .join("clinica.db")
                .to_string_lossy()
                .into_owned(),
            max_connections: 2,
        };

        let pool = init_db_pool(&config).await?;
        assert!(Path::new(&config.db_path).exists());

        let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await?;
        assert_eq!(foreign_keys, 1);

        let orphan = sqlx::query(
            "INSERT INTO consulta (data_agendada, hora_agendada, paciente_id, medico_id) VALUES ('2024-01-01', '10:00:00', 99, 99)",
        )
        .execute(&pool)
        .await;
        assert!(matches!(
            orphan.map_err(DbError::from),
            Err(DbError::ConstraintViolation(_))
        ));
        Ok(())
    }
}
