//! Cadastro de médicos

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clinica_db::dao::Dao;
use clinica_db::forms::DoctorForm;
use clinica_db::models::Doctor;
use clinica_db::permissions::{ensure_can_open, ensure_enabled, Action, Screen};
use clinica_db::ClinicaError;
use tracing::debug;

use super::SearchParams;
use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;
use crate::token::CurrentSession;

fn not_found(id: i64) -> ClinicaError {
    ClinicaError::NotFound(format!("Médico {} não encontrado.", id))
}

/// Todos os médicos, ou os que casam com `?busca=` (nome, especialidade ou CRM)
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Doctor>>> {
    ensure_can_open(Some(session.profile), Screen::Doctors)?;
    let doctors = match params.term() {
        Some(term) => {
            debug!("Busca de médicos por '{}'", term);
            state.doctors.search(term).await?
        }
        None => state.doctors.list_all().await?,
    };
    Ok(Json(doctors))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Doctor>> {
    ensure_can_open(Some(session.profile), Screen::Doctors)?;
    let doctor = state.doctors.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(doctor))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppJson(form): AppJson<DoctorForm>,
) -> ApiResult<(StatusCode, Json<Doctor>)> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Doctors)?;
    ensure_enabled(profile, Screen::Doctors, Action::Save)?;

    let mut doctor = form.validated()?;
    doctor.id = state.doctors.insert(&doctor).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
    AppJson(form): AppJson<DoctorForm>,
) -> ApiResult<Json<Doctor>> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Doctors)?;
    ensure_enabled(profile, Screen::Doctors, Action::Edit)?;

    let mut doctor = form.validated()?;
    doctor.id = id;
    state.doctors.update(&doctor).await?;
    Ok(Json(doctor))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
) -> ApiResult<StatusCode> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Doctors)?;
    ensure_enabled(profile, Screen::Doctors, Action::Remove)?;

    if !state.doctors.delete(id).await? {
        return Err(not_found(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
