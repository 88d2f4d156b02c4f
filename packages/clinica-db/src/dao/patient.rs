//! Cadastro de pacientes (tabela `paciente`)

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{like_pattern, Dao};
use crate::error::{DbError, DbResult};
use crate::models::Patient;

#[derive(Debug, Clone)]
pub struct PatientDao {
    pool: SqlitePool,
}

impl PatientDao {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Pacientes cujo nome, CPF ou telefone contém `term`
    pub async fn search(&self, term: &str) -> DbResult<Vec<Patient>> {
        debug!("Buscando pacientes por '{}'", term);
        let pattern = like_pattern(term);
        let patients = sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, nome, cpf, telefone FROM paciente
            WHERE nome LIKE ?1 ESCAPE '\'
               OR cpf LIKE ?1 ESCAPE '\'
               OR telefone LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(patients)
    }
}

#[async_trait]
impl Dao<Patient> for PatientDao {
    async fn insert(&self, patient: &Patient) -> DbResult<i64> {
        let id = sqlx::query("INSERT INTO paciente (nome, cpf, telefone) VALUES (?, ?, ?)")
            .bind(&patient.name)
            .bind(&patient.cpf)
            .bind(&patient.phone)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        info!("Paciente {} cadastrado", id);
        Ok(id)
    }

    async fn update(&self, patient: &Patient) -> DbResult<()> {
        let result = sqlx::query("UPDATE paciente SET nome = ?, cpf = ?, telefone = ? WHERE id = ?")
            .bind(&patient.name)
            .bind(&patient.cpf)
            .bind(&patient.phone)
            .bind(patient.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Paciente {}", patient.id)));
        }
        info!("Paciente {} atualizado", patient.id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM paciente WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(
            "SELECT id, nome, cpf, telefone FROM paciente WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(patient)
    }

    async fn list_all(&self) -> DbResult<Vec<Patient>> {
        let patients =
            sqlx::query_as::<_, Patient>("SELECT id, nome, cpf, telefone FROM paciente ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(patients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use anyhow::Result;

    #[tokio::test]
    async fn test_patient_crud() -> Result<()> {
        let db = test_db().await?;
        let dao = PatientDao::new(db.pool.clone());

        let id = dao
            .insert(&Patient::new("Ana Souza", "123.456.789-00", "(11) 99999-0000"))
            .await?;

        let mut patient = dao.find_by_id(id).await?.expect("paciente inserido");
        assert_eq!(patient.name, "Ana Souza");

        patient.update_contact("(11) 98888-1111");
        dao.update(&patient).await?;
        assert_eq!(dao.find_by_id(id).await?.unwrap().phone, "(11) 98888-1111");

        assert!(dao.delete(id).await?);
        assert!(!dao.delete(id).await?);
        assert!(dao.find_by_id(id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_patient_is_not_found() -> Result<()> {
        let db = test_db().await?;
        let dao = PatientDao::new(db.pool.clone());

        let mut ghost = Patient::new("Ninguém", "000.000.000-00", "0");
        ghost.id = 999;
        assert!(matches!(dao.update(&ghost).await, Err(DbError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_by_name_cpf_or_phone() -> Result<()> {
        let db = test_db().await?;
        let dao = PatientDao::new(db.pool.clone());

        dao.insert(&Patient::new("Ana Souza", "123.456.789-00", "1111-2222")).await?;
        dao.insert(&Patient::new("Bruno Alves", "987.654.321-00", "3333-4444")).await?;
        dao.insert(&Patient::new("Carla 100%", "555.555.555-55", "5555")).await?;

        let by_name = dao.search("souza").await?;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Ana Souza");

        assert_eq!(dao.search("987.654").await?[0].name, "Bruno Alves");
        assert_eq!(dao.search("3333").await?[0].name, "Bruno Alves");
        assert_eq!(dao.search("%").await?.len(), 1);
        assert_eq!(dao.search("").await?.len(), 3);

        Ok(())
    }
}
