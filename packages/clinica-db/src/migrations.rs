//! Esquema da clínica
//!
//! A versão aplicada fica em `PRAGMA user_version`; cada migração roda numa
//! transação própria junto com a atualização da versão.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// Em ordem; a versão de cada migração é sua posição a partir de 1
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "esquema inicial",
        sql: r#"
    -- Usuários e perfis de acesso (ADMIN, RECEP, MEDICO)
    CREATE TABLE IF NOT EXISTS usuario (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        login TEXT NOT NULL,
        senha TEXT NOT NULL,
        perfil TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS paciente (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        cpf TEXT NOT NULL,
        telefone TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS medico (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        especialidade TEXT NOT NULL,
        crm TEXT NOT NULL
    );

    -- Domínio do status da consulta
    CREATE TABLE IF NOT EXISTS status_consulta (
        codigo TEXT PRIMARY KEY NOT NULL
    );

    INSERT OR IGNORE INTO status_consulta (codigo) VALUES ('AGENDADA'), ('REALIZADA'), ('CANCELADA');

    -- Consultas: sem remoção em cascata, a exclusão é sempre explícita
    CREATE TABLE IF NOT EXISTS consulta (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data_agendada DATE NOT NULL,
        hora_agendada TIME NOT NULL,
        status TEXT NOT NULL DEFAULT 'AGENDADA',
        paciente_id INTEGER NOT NULL,
        medico_id INTEGER NOT NULL,
        FOREIGN KEY (status) REFERENCES status_consulta (codigo),
        FOREIGN KEY (paciente_id) REFERENCES paciente (id),
        FOREIGN KEY (medico_id) REFERENCES medico (id)
    );
    "#,
    },
    Migration {
        name: "índices de busca",
        sql: r#"
    CREATE INDEX IF NOT EXISTS idx_usuario_login ON usuario (login);
    CREATE INDEX IF NOT EXISTS idx_consulta_paciente_id ON consulta (paciente_id);
    CREATE INDEX IF NOT EXISTS idx_consulta_medico_id ON consulta (medico_id);
    CREATE INDEX IF NOT EXISTS idx_consulta_data_agendada ON consulta (data_agendada);
    CREATE INDEX IF NOT EXISTS idx_consulta_status ON consulta (status);
    "#,
    },
];

/// Versão gravada no banco; 0 para um arquivo recém-criado
async fn schema_version(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| {
            warn!("Não foi possível ler a versão do esquema, assumindo 0: {}", e);
            0
        })
}

/// Aplica as migrações ainda não registradas em `user_version`
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current = schema_version(pool).await;
    let pending: Vec<(i64, &Migration)> = MIGRATIONS
        .iter()
        .enumerate()
        .map(|(index, migration)| (index as i64 + 1, migration))
        .filter(|(version, _)| *version > current)
        .collect();

    if pending.is_empty() {
        debug!("Esquema já está na versão {}", current);
        return Ok(());
    }

    for (version, migration) in pending {
        info!("Migração {} ({})", version, migration.name);

        let mut tx = pool
            .begin()
            .await
            .with_context(|| format!("Falha ao abrir transação da migração {}", version))?;

        sqlx::query(migration.sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Migração {} ({}) falhou", version, migration.name))?;

        // PRAGMA não aceita parâmetros
        sqlx::query(&format!("PRAGMA user_version = {}", version))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Falha ao gravar versão {}", version))?;

        tx.commit()
            .await
            .with_context(|| format!("Falha ao confirmar migração {}", version))?;
    }

    info!("Esquema atualizado de {} para {}", current, MIGRATIONS.len());
    Ok(())
}
