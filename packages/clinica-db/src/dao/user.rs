//! Usuários do sistema (tabela `usuario`)

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

use super::Dao;
use crate::error::{DbError, DbResult};
use crate::models::User;

#[derive(Debug, Clone)]
pub struct UserDao {
    pool: SqlitePool,
}

impl UserDao {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Primeiro usuário (menor id) com o login informado
    pub async fn find_by_login(&self, login: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, login, senha, perfil FROM usuario WHERE login = ? ORDER BY id LIMIT 1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuario")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl Dao<User> for UserDao {
    async fn insert(&self, user: &User) -> DbResult<i64> {
        let id = sqlx::query("INSERT INTO usuario (login, senha, perfil) VALUES (?, ?, ?)")
            .bind(&user.login)
            .bind(&user.password_hash)
            .bind(&user.profile)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        info!("Usuário {} ({}) cadastrado", user.login, id);
        Ok(id)
    }

    async fn update(&self, user: &User) -> DbResult<()> {
        let result = sqlx::query("UPDATE usuario SET login = ?, senha = ?, perfil = ? WHERE id = ?")
            .bind(&user.login)
            .bind(&user.password_hash)
            .bind(&user.profile)
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Usuário {}", user.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM usuario WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, login, senha, perfil FROM usuario WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, login, senha, perfil FROM usuario ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
