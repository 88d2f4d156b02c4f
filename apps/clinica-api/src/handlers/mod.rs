//! Handlers HTTP, um módulo por tela

pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod patients;
pub mod reports;

use serde::Deserialize;

/// Parâmetro `?busca=` das listagens
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub busca: Option<String>,
}

impl SearchParams {
    /// Termo sem espaços nas pontas; `None` quando vazio
    pub fn term(&self) -> Option<&str> {
        self.busca.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
