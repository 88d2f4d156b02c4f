//! Tokens JWT (HS256) emitidos no login
//!
//! O token carrega a sessão inteira, então as requisições seguintes não
//! consultam a tabela `usuario`.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use clinica_db::auth::Session;
use clinica_db::models::Profile;
use clinica_db::{AuthError, ClinicaError, ClinicaResult};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MAX_TOKEN_TTL_MINUTES;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id do usuário
    pub sub: i64,
    pub login: String,
    pub profile: Profile,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    ttl: Duration,
}

impl TokenKeys {
    /// `ttl_minutes` é limitado a ±`MAX_TOKEN_TTL_MINUTES`; valores negativos
    /// geram tokens já vencidos.
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        let ttl_minutes = ttl_minutes.clamp(-MAX_TOKEN_TTL_MINUTES, MAX_TOKEN_TTL_MINUTES);
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, session: &Session) -> ClinicaResult<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| ClinicaError::Internal("Validade do token fora do calendário".into()))?;
        let claims = Claims {
            sub: session.user_id,
            login: session.login.clone(),
            profile: session.profile,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ClinicaError::Internal(format!("Falha ao gerar token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            debug!("Token rejeitado: {}", e);
            AuthError::InvalidSession(e.to_string())
        })?;
        Ok(Session {
            user_id: data.claims.sub,
            login: data.claims.login,
            profile: data.claims.profile,
        })
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

/// Sessão do usuário autenticado, extraída do cabeçalho `Authorization: Bearer`
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let auth_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("Faça login para continuar.".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Cabeçalho Authorization inválido.".to_string()))?;

        let token = auth_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Cabeçalho Authorization inválido.".to_string()))?;

        let session = state
            .tokens
            .verify(token.trim())
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
        Ok(CurrentSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user_id: 7,
            login: "recep".into(),
            profile: Profile::Receptionist,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = TokenKeys::new("segredo", 30);
        let token = keys.issue(&session()).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), session());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenKeys::new("segredo", 30).issue(&session()).unwrap();
        let other = TokenKeys::new("outro", 30);
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidSession(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = TokenKeys::new("segredo", -10);
        let token = keys.issue(&session()).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let keys = TokenKeys::new("segredo", i64::MAX);
        let token = keys.issue(&session()).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), session());

        let keys = TokenKeys::new("segredo", i64::MIN);
        let token = keys.issue(&session()).unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
