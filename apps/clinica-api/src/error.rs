//! Erros da API e sua resposta JSON `{"error": ...}`

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinica_db::{ClinicaError, DbError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Clinica(#[from] ClinicaError),

    /// Cabeçalho Authorization ausente, malformado ou com token inválido
    #[error("{0}")]
    Unauthorized(String),

    /// Corpo JSON ou parâmetro de caminho que não pôde ser lido
    #[error("{0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        ApiError::Clinica(error.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Requisição inválida: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Endereço inválido: {}", rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Clinica(error) => match error {
                ClinicaError::Validation(_) => StatusCode::BAD_REQUEST,
                ClinicaError::Auth(_) => StatusCode::UNAUTHORIZED,
                ClinicaError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                ClinicaError::NotFound(_) | ClinicaError::Db(DbError::NotFound(_)) => {
                    StatusCode::NOT_FOUND
                }
                ClinicaError::Db(DbError::ConstraintViolation(_)) => StatusCode::CONFLICT,
                ClinicaError::Db(_) | ClinicaError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("Erro: {}: {}", status, message);
        } else {
            warn!("Requisição recusada: {}: {}", status, message);
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
