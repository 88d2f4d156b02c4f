//! Consultas (tabela `consulta`), sempre lidas junto com paciente e médico

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::Dao;
use crate::error::{DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus};
use crate::search::{contains_ignore_case, AppointmentSearch};

/// Consulta com o paciente e o médico carregados
const SELECT_APPOINTMENTS: &str = r#"
    SELECT c.id, c.data_agendada, c.hora_agendada, c.status,
           p.id AS paciente_id, p.nome AS paciente_nome,
           p.cpf AS paciente_cpf, p.telefone AS paciente_telefone,
           m.id AS medico_id, m.nome AS medico_nome,
           m.especialidade AS medico_especialidade, m.crm AS medico_crm
    FROM consulta c
    JOIN paciente p ON p.id = c.paciente_id
    JOIN medico m ON m.id = c.medico_id
"#;

fn select_where(condition: &str) -> String {
    format!("{SELECT_APPOINTMENTS} WHERE {condition} ORDER BY c.id")
}

#[derive(Debug, Clone)]
pub struct AppointmentDao {
    pool: SqlitePool,
}

impl AppointmentDao {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Busca livre: nome do paciente, nome do médico, status, data ou horário
    pub async fn search(&self, term: &str) -> DbResult<Vec<Appointment>> {
        let search = AppointmentSearch::new(term);
        debug!(
            "Buscando consultas por '{}' (data: {:?}, hora: {:?})",
            term,
            search.date(),
            search.time()
        );
        Ok(search.filter(self.list_all().await?))
    }

    pub async fn list_by_doctor(&self, doctor_id: i64) -> DbResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&select_where("c.medico_id = ?"))
            .bind(doctor_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(appointments)
    }

    pub async fn list_by_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&select_where("c.paciente_id = ?"))
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(appointments)
    }

    pub async fn list_by_status(&self, status: AppointmentStatus) -> DbResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&select_where("c.status = ?"))
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(appointments)
    }

    /// Consultas com data entre `start` e `end`, inclusive
    pub async fn list_by_period(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Appointment>> {
        let appointments =
            sqlx::query_as::<_, Appointment>(&select_where("c.data_agendada BETWEEN ? AND ?"))
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?;
        Ok(appointments)
    }

    pub async fn list_by_patient_and_doctor(
        &self,
        patient_id: i64,
        doctor_id: i64,
    ) -> DbResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&select_where(
            "c.paciente_id = ? AND c.medico_id = ?",
        ))
        .bind(patient_id)
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    pub async fn list_by_status_and_doctor(
        &self,
        status: AppointmentStatus,
        doctor_id: i64,
    ) -> DbResult<Vec<Appointment>> {
        let appointments =
            sqlx::query_as::<_, Appointment>(&select_where("c.status = ? AND c.medico_id = ?"))
                .bind(status.as_str())
                .bind(doctor_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(appointments)
    }

    pub async fn list_by_period_and_doctor(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        doctor_id: i64,
    ) -> DbResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&select_where(
            "c.data_agendada BETWEEN ? AND ? AND c.medico_id = ?",
        ))
        .bind(start)
        .bind(end)
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    /// Consultas cujo nome do paciente contém `name` (sem diferenciar maiúsculas)
    pub async fn list_by_patient_name(&self, name: &str) -> DbResult<Vec<Appointment>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|a| contains_ignore_case(&a.patient.name, &needle))
            .collect())
    }

    /// Consultas cujo nome do médico contém `name` (sem diferenciar maiúsculas)
    pub async fn list_by_doctor_name(&self, name: &str) -> DbResult<Vec<Appointment>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|a| contains_ignore_case(&a.doctor.name, &needle))
            .collect())
    }

    /// Altera apenas o status da consulta
    pub async fn update_status(&self, id: i64, status: AppointmentStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE consulta SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Consulta {}", id)));
        }
        info!("Consulta {} agora está {}", id, status);
        Ok(())
    }
}

#[async_trait]
impl Dao<Appointment> for AppointmentDao {
    async fn insert(&self, appointment: &Appointment) -> DbResult<i64> {
        let id = sqlx::query(
            r#"
            INSERT INTO consulta (data_agendada, hora_agendada, status, paciente_id, medico_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(appointment.scheduled_date)
        .bind(appointment.scheduled_time)
        .bind(appointment.status.as_str())
        .bind(appointment.patient.id)
        .bind(appointment.doctor.id)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        info!(
            "Consulta {} agendada para {} {}",
            id, appointment.scheduled_date, appointment.scheduled_time
        );
        Ok(id)
    }

    async fn update(&self, appointment: &Appointment) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE consulta
            SET data_agendada = ?, hora_agendada = ?, status = ?, paciente_id = ?, medico_id = ?
            WHERE id = ?
            "#,
        )
        .bind(appointment.scheduled_date)
        .bind(appointment.scheduled_time)
        .bind(appointment.status.as_str())
        .bind(appointment.patient.id)
        .bind(appointment.doctor.id)
        .bind(appointment.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Consulta {}", appointment.id)));
        }
        info!("Consulta {} atualizada", appointment.id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM consulta WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Appointment>> {
        let appointment = sqlx::query_as::<_, Appointment>(&select_where("c.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(appointment)
    }

    async fn list_all(&self) -> DbResult<Vec<Appointment>> {
        let appointments =
            sqlx::query_as::<_, Appointment>(&format!("{SELECT_APPOINTMENTS} ORDER BY c.id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(appointments)
    }
}
