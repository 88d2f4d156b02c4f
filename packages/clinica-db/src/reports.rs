//! Filtros da tela de relatórios
//!
//! Para o perfil MEDICO todo filtro fica restrito às consultas do próprio
//! médico (o id do usuário é usado como id do médico).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::Session;
use crate::dao::{AppointmentDao, Dao};
use crate::datetime::parse_form_date;
use crate::error::{ClinicaError, ClinicaResult};
use crate::models::{Appointment, AppointmentStatus};
use crate::search::AppointmentSearch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum ReportFilter {
    Patient { patient_id: i64 },
    /// Para MEDICO o médico escolhido é ignorado
    Doctor { doctor_id: i64 },
    Status { status: AppointmentStatus },
    /// Datas no formato `dd/MM/yyyy`, ambas obrigatórias
    Period { start: String, end: String },
    PatientName { name: String },
    DoctorName { name: String },
    All,
}

fn own_only(appointments: Vec<Appointment>, doctor_id: i64) -> Vec<Appointment> {
    appointments
        .into_iter()
        .filter(|a| a.doctor.id == doctor_id)
        .collect()
}

impl ReportFilter {
    pub async fn execute(
        &self,
        dao: &AppointmentDao,
        session: &Session,
    ) -> ClinicaResult<Vec<Appointment>> {
        let scope = session.doctor_scope();
        debug!("Relatório {:?} para {} (escopo: {:?})", self, session.login, scope);

        let appointments = match (self, scope) {
            (ReportFilter::Patient { patient_id }, Some(own)) => {
                dao.list_by_patient_and_doctor(*patient_id, own).await?
            }
            (ReportFilter::Patient { patient_id }, None) => dao.list_by_patient(*patient_id).await?,
            (ReportFilter::Doctor { .. }, Some(own)) => dao.list_by_doctor(own).await?,
            (ReportFilter::Doctor { doctor_id }, None) => dao.list_by_doctor(*doctor_id).await?,
            (ReportFilter::Status { status }, Some(own)) => {
                dao.list_by_status_and_doctor(*status, own).await?
            }
            (ReportFilter::Status { status }, None) => dao.list_by_status(*status).await?,
            (ReportFilter::Period { start, end }, scope) => {
                let (start, end) = parse_period(start, end)?;
                match scope {
                    Some(own) => dao.list_by_period_and_doctor(start, end, own).await?,
                    None => dao.list_by_period(start, end).await?,
                }
            }
            (ReportFilter::PatientName { name }, scope) => {
                let found = dao.list_by_patient_name(name).await?;
                match scope {
                    Some(own) => own_only(found, own),
                    None => found,
                }
            }
            (ReportFilter::DoctorName { name }, scope) => {
                let found = dao.list_by_doctor_name(name).await?;
                match scope {
                    Some(own) => own_only(found, own),
                    None => found,
                }
            }
            (ReportFilter::All, Some(own)) => dao.list_by_doctor(own).await?,
            (ReportFilter::All, None) => dao.list_all().await?,
        };
        Ok(appointments)
    }
}

fn parse_period(start: &str, end: &str) -> ClinicaResult<(chrono::NaiveDate, chrono::NaiveDate)> {
    if start.trim().is_empty() || end.trim().is_empty() {
        return Err(ClinicaError::Validation(
            "Informe a data inicial e final para o filtro por período.".to_string(),
        ));
    }
    let parse = |text: &str| {
        parse_form_date(text).ok_or_else(|| {
            ClinicaError::Validation(format!("Data inválida: '{}' (use dd/MM/aaaa)", text.trim()))
        })
    };
    Ok((parse(start)?, parse(end)?))
}

/// Listagem inicial das telas de consulta: com termo vazio, tudo o que o
/// perfil pode ver; caso contrário, a busca livre (restrita ao médico logado
/// quando o perfil é MEDICO).
pub async fn search_visible(
    dao: &AppointmentDao,
    session: &Session,
    term: &str,
) -> ClinicaResult<Vec<Appointment>> {
    let term = term.trim();
    let visible = match session.doctor_scope() {
        Some(own) => dao.list_by_doctor(own).await?,
        None => dao.list_all().await?,
    };
    if term.is_empty() {
        return Ok(visible);
    }
    Ok(AppointmentSearch::new(term).filter(visible))
}
