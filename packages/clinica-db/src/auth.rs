//! Login e sessão do usuário
//!
//! As senhas são gravadas como hash Argon2id (formato PHC) na coluna
//! `usuario.senha`.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::dao::{Dao, UserDao};
use crate::error::{AuthError, ClinicaError, ClinicaResult};
use crate::models::{Profile, User};

/// Usuário autenticado e seu perfil
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub login: String,
    pub profile: Profile,
}

impl Session {
    pub fn welcome_message(&self) -> String {
        format!("Você entrou como {}.", self.profile.label())
    }

    /// Para o perfil MEDICO, o id do usuário é o id do médico cujas
    /// consultas ele pode ver.
    pub fn doctor_scope(&self) -> Option<i64> {
        (self.profile == Profile::Doctor).then_some(self.user_id)
    }
}

pub fn hash_password(password: &str) -> ClinicaResult<String> {
    hash_password_with(&Argon2::default(), password)
}

pub fn hash_password_with(hasher: &Argon2<'_>, password: &str) -> ClinicaResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ClinicaError::Internal(format!("Falha ao gerar hash da senha: {}", e)))
}

/// Confere a senha com o hash gravado. Um valor que não é hash PHC nunca confere.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(e) => {
            warn!("Hash de senha inválido no banco: {}", e);
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginService {
    users: UserDao,
}

impl LoginService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserDao::new(pool),
        }
    }

    /// Autentica pelo login (sem espaços nas pontas) e senha
    pub async fn authenticate(&self, login: &str, password: &str) -> ClinicaResult<Session> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(ClinicaError::Validation("Preencha usuário e senha.".to_string()));
        }

        let user = match self.users.find_by_login(login).await? {
            Some(user) => user,
            None => {
                warn!("Tentativa de login com usuário inexistente: {}", login);
                return Err(AuthError::UserNotFound.into());
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!("Senha incorreta para o usuário {}", login);
            return Err(AuthError::WrongPassword.into());
        }

        let profile = Profile::parse(&user.profile)
            .ok_or_else(|| AuthError::UnknownProfile(user.profile.clone()))?;

        info!("Usuário {} autenticado como {}", user.login, profile);
        Ok(Session {
            user_id: user.id,
            login: user.login,
            profile,
        })
    }

    /// Cadastra um usuário, gravando apenas o hash da senha
    pub async fn register(&self, login: &str, password: &str, profile: Profile) -> ClinicaResult<User> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(ClinicaError::Validation("Preencha usuário e senha.".to_string()));
        }
        let mut user = User::new(login, hash_password(password)?, profile);
        user.id = self.users.insert(&user).await?;
        Ok(user)
    }

    /// Cria o administrador inicial quando ainda não há nenhum usuário.
    /// Retorna `true` se o usuário foi criado.
    pub async fn ensure_admin(&self, login: &str, password: &str) -> ClinicaResult<bool> {
        if self.users.count().await? > 0 {
            return Ok(false);
        }
        self.register(login, password, Profile::Admin).await?;
        info!("Administrador inicial '{}' criado", login.trim());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_clinic, test_db, SEED_PASSWORD};
    use anyhow::Result;

    #[tokio::test]
    async fn test_authenticate_each_profile() -> Result<()> {
        let db = test_db().await?;
        let seed = seed_clinic(&db.pool).await?;
        let service = LoginService::new(db.pool.clone());

        let session = service.authenticate(" paulo ", SEED_PASSWORD).await?;
        assert_eq!(session.profile, Profile::Doctor);
        assert_eq!(session.doctor_scope(), Some(seed.paulo.id));
        assert_eq!(session.welcome_message(), "Você entrou como MÉDICO.");

        let admin = service.authenticate("admin", SEED_PASSWORD).await?;
        assert_eq!(admin.profile, Profile::Admin);
        assert_eq!(admin.doctor_scope(), None);

        let recep = service.authenticate("recep", SEED_PASSWORD).await?;
        assert_eq!(recep.welcome_message(), "Você entrou como RECEPCIONISTA.");
        Ok(())
    }

    #[tokio::test]
    async fn test_authentication_failures() -> Result<()> {
        let db = test_db().await?;
        seed_clinic(&db.pool).await?;
        let service = LoginService::new(db.pool.clone());

        assert!(matches!(
            service.authenticate("  ", SEED_PASSWORD).await,
            Err(ClinicaError::Validation(_))
        ));
        assert!(matches!(
            service.authenticate("admin", "").await,
            Err(ClinicaError::Validation(_))
        ));
        assert!(matches!(
            service.authenticate("ninguem", SEED_PASSWORD).await,
            Err(ClinicaError::Auth(AuthError::UserNotFound))
        ));
        assert!(matches!(
            service.authenticate("admin", "errada").await,
            Err(ClinicaError::Auth(AuthError::WrongPassword))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_profile_is_rejected_after_password_check() -> Result<()> {
        let db = test_db().await?;
        let users = UserDao::new(db.pool.clone());
        let mut user = User::new("gerente", hash_password("segredo")?, Profile::Admin);
        user.profile = "GERENTE".into();
        users.insert(&user).await?;

        let service = LoginService::new(db.pool.clone());
        match service.authenticate("gerente", "segredo").await {
            Err(ClinicaError::Auth(AuthError::UnknownProfile(p))) => assert_eq!(p, "GERENTE"),
            other => panic!("esperava perfil desconhecido, veio {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_admin_only_on_empty_table() -> Result<()> {
        let db = test_db().await?;
        let service = LoginService::new(db.pool.clone());

        assert!(service.ensure_admin("admin", "troque-me").await?);
        assert!(!service.ensure_admin("outro", "troque-me").await?);

        let session = service.authenticate("admin", "troque-me").await?;
        assert_eq!(session.profile, Profile::Admin);
        Ok(())
    }

    #[test]
    fn test_plaintext_never_verifies() {
        assert!(!verify_password("senha", "senha"));
    }
}
