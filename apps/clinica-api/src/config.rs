//! Configuração do serviço lida das variáveis `CLINICA_*`

use std::env;
use std::net::SocketAddr;

use clinica_db::DbConfig;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 480;
/// Um ano
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 64;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub max_concurrent_requests: usize,
    /// Administrador criado na primeira execução, com a tabela `usuario` vazia
    pub admin_login: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de consulta de variáveis.
    /// Valores ausentes ou inválidos caem no padrão com um aviso.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DbConfig::default();

        let db_path = lookup("CLINICA_DB_PATH").unwrap_or_else(|| {
            warn!("CLINICA_DB_PATH não definido, usando {}", defaults.db_path);
            defaults.db_path.clone()
        });

        let max_connections = parse_or(
            &lookup,
            "CLINICA_DB_MAX_CONNECTIONS",
            defaults.max_connections,
        );

        let bind_addr = lookup("CLINICA_BIND_ADDR")
            .and_then(|value| match value.trim().parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!("CLINICA_BIND_ADDR inválido: {}", value);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));

        let jwt_secret = lookup("CLINICA_JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .unwrap_or_else(|| {
                warn!("CLINICA_JWT_SECRET não definido, gerando segredo aleatório; tokens não sobrevivem a reinícios");
                random_secret()
            });

        let token_ttl_minutes = match parse_or(
            &lookup,
            "CLINICA_TOKEN_TTL_MINUTES",
            DEFAULT_TOKEN_TTL_MINUTES,
        ) {
            minutes @ 1..=MAX_TOKEN_TTL_MINUTES => minutes,
            minutes => {
                warn!(
                    "CLINICA_TOKEN_TTL_MINUTES fora do intervalo 1..={} ({}), usando {}",
                    MAX_TOKEN_TTL_MINUTES, minutes, DEFAULT_TOKEN_TTL_MINUTES
                );
                DEFAULT_TOKEN_TTL_MINUTES
            }
        };

        let max_concurrent_requests = parse_or(
            &lookup,
            "CLINICA_MAX_CONCURRENT_REQUESTS",
            DEFAULT_MAX_CONCURRENT_REQUESTS,
        );

        let admin_login = lookup("CLINICA_ADMIN_LOGIN").filter(|v| !v.trim().is_empty());
        let admin_password = lookup("CLINICA_ADMIN_PASSWORD").filter(|v| !v.is_empty());

        Self {
            db: DbConfig {
                db_path,
                max_connections,
            },
            bind_addr,
            jwt_secret,
            token_ttl_minutes,
            max_concurrent_requests,
            admin_login,
            admin_password,
        }
    }

    /// Login e senha do administrador inicial, se ambos foram informados
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_login, &self.admin_password) {
            (Some(login), Some(password)) => Some((login.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("{} inválido ({}), usando {}", key, value, default);
            default
        }),
        None => default,
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
