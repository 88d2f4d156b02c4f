//! Definições de erro para a biblioteca clinica-db
//!
//! `DbError` cobre falhas de persistência; `ClinicaError` é o erro das
//! operações de negócio (validação de formulário, login, permissões).

use thiserror::Error;

/// Erros específicos para operações de banco de dados
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Erro de conexão com banco de dados: {0}")]
    ConnectionError(String),

    #[error("Erro de migração: {0}")]
    MigrationError(String),

    #[error("Erro de consulta: {0}")]
    QueryError(String),

    #[error("Entidade não encontrada: {0}")]
    NotFound(String),

    #[error("Violação de restrição: {0}")]
    ConstraintViolation(String),

    #[error("Erro interno: {0}")]
    InternalError(String),
}

/// Códigos estendidos do SQLite tratados como violação de restrição
/// (CHECK, NOT NULL, PRIMARY KEY, UNIQUE, FOREIGN KEY).
const CONSTRAINT_CODES: &[&str] = &["23000", "275", "1299", "1555", "2067", "787"];

/// Conversão de erros específicos do SQLx para nossos tipos de erro
impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DbError::NotFound("Registro não encontrado".to_string()),
            sqlx::Error::Database(dbe) => {
                if let Some(code) = dbe.code() {
                    if CONSTRAINT_CODES.contains(&code.as_ref()) {
                        return DbError::ConstraintViolation(dbe.message().to_string());
                    }
                }
                DbError::QueryError(dbe.message().to_string())
            }
            sqlx::Error::ColumnNotFound(col) => {
                DbError::QueryError(format!("Coluna não encontrada: {}", col))
            }
            sqlx::Error::TypeNotFound { type_name } => {
                DbError::QueryError(format!("Tipo não encontrado: {}", type_name))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::QueryError(format!("Erro ao decodificar coluna {}: {}", index, source))
            }
            sqlx::Error::Io(io_err) => DbError::ConnectionError(io_err.to_string()),
            sqlx::Error::Configuration(conf_err) => DbError::ConnectionError(conf_err.to_string()),
            sqlx::Error::PoolClosed => {
                DbError::ConnectionError("Pool de conexões fechado".to_string())
            }
            sqlx::Error::PoolTimedOut => {
                DbError::ConnectionError("Timeout no pool de conexões".to_string())
            }
            sqlx::Error::WorkerCrashed => {
                DbError::InternalError("Worker do banco de dados falhou".to_string())
            }
            sqlx::Error::Migrate(err) => DbError::MigrationError(err.to_string()),
            _ => DbError::InternalError(format!("Erro inesperado: {:?}", error)),
        }
    }
}

/// Falhas de autenticação na tela de login
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Usuário não encontrado.")]
    UserNotFound,

    #[error("Senha incorreta.")]
    WrongPassword,

    #[error("Perfil desconhecido: {0}")]
    UnknownProfile(String),

    #[error("Sessão inválida: {0}")]
    InvalidSession(String),
}

/// Erro das operações de negócio da clínica
#[derive(Error, Debug)]
pub enum ClinicaError {
    /// Campo obrigatório vazio ou valor que não pôde ser interpretado
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    NotFound(String),

    /// Ação não disponível para o perfil do usuário logado
    #[error("{0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Erro interno: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for ClinicaError {
    fn from(error: sqlx::Error) -> Self {
        ClinicaError::Db(error.into())
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;

pub type ClinicaResult<T> = std::result::Result<T, ClinicaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn test_auth_messages_are_user_facing() {
        assert_eq!(AuthError::UserNotFound.to_string(), "Usuário não encontrado.");
        assert_eq!(AuthError::WrongPassword.to_string(), "Senha incorreta.");
        assert_eq!(
            ClinicaError::from(AuthError::UnknownProfile("GERENTE".into())).to_string(),
            "Perfil desconhecido: GERENTE"
        );
    }
}
