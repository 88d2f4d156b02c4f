//! Relatórios de consultas

use axum::{extract::State, Json};
use clinica_db::models::Appointment;
use clinica_db::permissions::{ensure_can_open, ensure_enabled, Action, Screen};
use clinica_db::reports::ReportFilter;
use tracing::info;

use crate::error::ApiResult;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::token::CurrentSession;

/// Gera o relatório de consultas para o filtro escolhido
pub async fn generate(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    AppJson(filter): AppJson<ReportFilter>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let profile = Some(session.profile);
    ensure_can_open(profile, Screen::Reports)?;
    ensure_enabled(profile, Screen::Reports, Action::GenerateReport)?;

    let appointments = filter.execute(&state.appointments, &session).await?;
    info!(
        "Relatório gerado por {}: {} consulta(s)",
        session.login,
        appointments.len()
    );
    Ok(Json(appointments))
}
