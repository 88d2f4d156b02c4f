//! Estado compartilhado entre os handlers

use std::sync::Arc;

use clinica_db::auth::LoginService;
use clinica_db::dao::{AppointmentDao, DoctorDao, PatientDao};
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::token::TokenKeys;

/// Estado compartilhado pelos handlers; os DAOs só guardam o pool
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
    pub patients: PatientDao,
    pub doctors: DoctorDao,
    pub appointments: AppointmentDao,
    pub login: LoginService,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_minutes);
        Self {
            patients: PatientDao::new(pool.clone()),
            doctors: DoctorDao::new(pool.clone()),
            appointments: AppointmentDao::new(pool.clone()),
            login: LoginService::new(pool.clone()),
            config: Arc::new(config),
            pool,
            tokens,
        }
    }
}
