//! Extratores de entrada com a mesma resposta de erro dos handlers
//!
//! `axum::Json` e `axum::extract::Path` recusam a requisição com texto puro.
//! Os envoltórios abaixo convertem essa recusa em `ApiError::BadRequest`, de
//! modo que um status desconhecido, um filtro inválido ou um id não numérico
//! também respondem 400 com `{"error": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// Corpo JSON da requisição
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Parâmetros do caminho, como o `:id` de `/consultas/:id`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
