//! Cadastro de médicos (tabela `medico`)

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{like_pattern, Dao};
use crate::error::{DbError, DbResult};
use crate::models::Doctor;

#[derive(Debug, Clone)]
pub struct DoctorDao {
    pool: SqlitePool,
}

impl DoctorDao {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Médicos cujo nome, especialidade ou CRM contém `term`
    pub async fn search(&self, term: &str) -> DbResult<Vec<Doctor>> {
        debug!("Buscando médicos por '{}'", term);
        let doctors = sqlx::query_as::<_, Doctor>(
            r#"
            SELECT id, nome, especialidade, crm FROM medico
            WHERE nome LIKE ?1 ESCAPE '\'
               OR especialidade LIKE ?1 ESCAPE '\'
               OR crm LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }
}

#[async_trait]
impl Dao<Doctor> for DoctorDao {
    async fn insert(&self, doctor: &Doctor) -> DbResult<i64> {
        let id = sqlx::query("INSERT INTO medico (nome, especialidade, crm) VALUES (?, ?, ?)")
            .bind(&doctor.name)
            .bind(&doctor.specialty)
            .bind(&doctor.crm)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        info!("Médico {} cadastrado", id);
        Ok(id)
    }

    async fn update(&self, doctor: &Doctor) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE medico SET nome = ?, especialidade = ?, crm = ? WHERE id = ?")
                .bind(&doctor.name)
                .bind(&doctor.specialty)
                .bind(&doctor.crm)
                .bind(doctor.id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Médico {}", doctor.id)));
        }
        info!("Médico {} atualizado", doctor.id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM medico WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, Doctor>(
            "SELECT id, nome, especialidade, crm FROM medico WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doctor)
    }

    async fn list_all(&self) -> DbResult<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>(
            "SELECT id, nome, especialidade, crm FROM medico ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }
}
