//! Agendamento de consultas
//!
//! A listagem e a busca servem tanto a tela de agendamento quanto a de
//! relatórios; para MEDICO só aparecem as consultas do próprio médico.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clinica_db::auth::Session;
use clinica_db::dao::Dao;
use clinica_db::forms::{AppointmentForm, AppointmentInput};
use clinica_db::models::{Appointment, AppointmentStatus};
use clinica_db::permissions::{ensure_can_open, ensure_enabled, Action, Screen};
use clinica_db::reports::search_visible;
use clinica_db::ClinicaError;
use serde::Deserialize;
use tracing::debug;

use super::SearchParams;
use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;
use crate::token::CurrentSession;

fn not_found(id: i64) -> ClinicaError {
    ClinicaError::NotFound(format!("Consulta {} não encontrada.", id))
}

fn ensure_can_list(session: &Session) -> Result<(), ClinicaError> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Appointments)
        .or_else(|_| ensure_can_open(profile, Screen::Reports))
}

/// Consulta pelo id, desde que visível para a sessão
async fn visible(state: &AppState, session: &Session, id: i64) -> ApiResult<Appointment> {
    let appointment = state
        .appointments
        .find_by_id(id)
        .await?
        .filter(|a| session.doctor_scope().map_or(true, |own| a.doctor.id == own))
        .ok_or_else(|| not_found(id))?;
    Ok(appointment)
}

/// Carrega paciente e médico escolhidos no formulário
async fn build(state: &AppState, input: AppointmentInput) -> ApiResult<Appointment> {
    let patient = state
        .patients
        .find_by_id(input.patient_id)
        .await?
        .ok_or_else(|| {
            ClinicaError::NotFound(format!("Paciente {} não encontrado.", input.patient_id))
        })?;
    let doctor = state
        .doctors
        .find_by_id(input.doctor_id)
        .await?
        .ok_or_else(|| {
            ClinicaError::NotFound(format!("Médico {} não encontrado.", input.doctor_id))
        })?;

    let mut appointment = Appointment::new(input.date, input.time, patient, doctor);
    appointment.status = input.status;
    Ok(appointment)
}

/// Consultas visíveis, filtradas pela busca livre `?busca=`
/// (nome do paciente, nome do médico, status, data ou hora)
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Appointment>>> {
    ensure_can_list(&session)?;
    let term = params.term().unwrap_or_default();
    debug!("Busca de consultas por '{}' ({})", term, session.login);
    let appointments = search_visible(&state.appointments, &session, term).await?;
    Ok(Json(appointments))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Appointment>> {
    ensure_can_list(&session)?;
    Ok(Json(visible(&state, &session, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppJson(form): AppJson<AppointmentForm>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Appointments)?;
    ensure_enabled(profile, Screen::Appointments, Action::Save)?;

    let input = form.validated()?;
    let mut appointment = build(&state, input).await?;
    appointment.id = state.appointments.insert(&appointment).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
    AppJson(form): AppJson<AppointmentForm>,
) -> ApiResult<Json<Appointment>> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Appointments)?;
    ensure_enabled(profile, Screen::Appointments, Action::Edit)?;

    let input = form.validated()?;
    let mut appointment = build(&state, input).await?;
    appointment.id = id;
    state.appointments.update(&appointment).await?;
    Ok(Json(appointment))
}

/// Remoção pela tela de agendamento ou pela de relatórios (apenas ADMIN)
pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
) -> ApiResult<StatusCode> {
    let profile = Some(session.profile);
    ensure_enabled(profile, Screen::Appointments, Action::Remove)
        .or_else(|_| ensure_enabled(profile, Screen::Reports, Action::Remove))?;

    if !state.appointments.delete(id).await? {
        return Err(not_found(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
}

/// Ação "editar status" da tela de relatórios
pub async fn change_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
    AppJson(change): AppJson<StatusChange>,
) -> ApiResult<Json<Appointment>> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Reports)?;
    ensure_enabled(profile, Screen::Reports, Action::EditStatus)?;

    let mut appointment = visible(&state, &session, id).await?;
    state.appointments.update_status(id, change.status).await?;
    appointment.status = change.status;
    Ok(Json(appointment))
}
