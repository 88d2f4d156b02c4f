//! Clinica API - serviço HTTP da clínica
//!
//! Cada endpoint corresponde a uma ação das telas de login, cadastro de
//! pacientes e médicos, agendamento e relatórios. Antes de executar a ação o
//! handler consulta a tabela de permissões do perfil logado.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;
pub mod token;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use router::create_router;
pub use state::AppState;
