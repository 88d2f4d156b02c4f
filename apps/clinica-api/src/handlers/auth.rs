//! Login, tabela de permissões do perfil e verificação de saúde

use axum::{extract::State, Json};
use clinica_db::auth::Session;
use clinica_db::permissions::{permission_table, PermissionEntry};
use clinica_db::models::Profile;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::built_info;
use crate::error::ApiResult;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::token::CurrentSession;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default, alias = "senha")]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Session,
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state
        .login
        .authenticate(&request.login, &request.password)
        .await?;
    let token = state.tokens.issue(&session)?;
    info!("Sessão iniciada para {}", session.login);

    Ok(Json(LoginResponse {
        token,
        message: session.welcome_message(),
        user: session,
    }))
}

#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub profile: Profile,
    pub permissions: Vec<PermissionEntry>,
}

pub async fn permissions(CurrentSession(session): CurrentSession) -> Json<PermissionsResponse> {
    Json(PermissionsResponse {
        profile: session.profile,
        permissions: permission_table(Some(session.profile)),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            error!("Banco de dados indisponível: {}", e);
            "indisponível"
        }
    };

    Json(json!({
        "status": "ok",
        "database": database,
        "name": built_info::PKG_NAME,
        "version": built_info::PKG_VERSION,
    }))
}
