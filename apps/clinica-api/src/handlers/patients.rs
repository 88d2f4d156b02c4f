//! Cadastro de pacientes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clinica_db::dao::Dao;
use clinica_db::forms::PatientForm;
use clinica_db::models::Patient;
use clinica_db::permissions::{ensure_can_open, ensure_enabled, Action, Screen};
use clinica_db::ClinicaError;
use tracing::debug;

use super::SearchParams;
use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;
use crate::token::CurrentSession;

fn not_found(id: i64) -> ClinicaError {
    ClinicaError::NotFound(format!("Paciente {} não encontrado.", id))
}

/// Todos os pacientes, ou os que casam com `?busca=` (nome, CPF ou telefone)
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Patient>>> {
    ensure_can_open(Some(session.profile), Screen::Patients)?;
    let patients = match params.term() {
        Some(term) => {
            debug!("Busca de pacientes por '{}'", term);
            state.patients.search(term).await?
        }
        None => state.patients.list_all().await?,
    };
    Ok(Json(patients))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Patient>> {
    ensure_can_open(Some(session.profile), Screen::Patients)?;
    let patient = state.patients.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(patient))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppJson(form): AppJson<PatientForm>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Patients)?;
    ensure_enabled(profile, Screen::Patients, Action::Save)?;

    let mut patient = form.validated()?;
    patient.id = state.patients.insert(&patient).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
    AppJson(form): AppJson<PatientForm>,
) -> ApiResult<Json<Patient>> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Patients)?;
    ensure_enabled(profile, Screen::Patients, Action::Edit)?;

    let mut patient = form.validated()?;
    patient.id = id;
    state.patients.update(&patient).await?;
    Ok(Json(patient))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppPath(id): AppPath<i64>,
) -> ApiResult<StatusCode> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Patients)?;
    ensure_enabled(profile, Screen::Patients, Action::Remove)?;

    if !state.patients.delete(id).await? {
        return Err(not_found(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
