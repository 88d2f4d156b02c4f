//! Objetos de acesso a dados (DAO), um por entidade
//!
//! Cada operação obtém uma conexão do pool, executa um único comando e a
//! devolve ao pool ao terminar.

use async_trait::async_trait;

use crate::error::DbResult;

pub mod appointment;
pub mod doctor;
pub mod patient;
pub mod user;

pub use appointment::AppointmentDao;
pub use doctor::DoctorDao;
pub use patient::PatientDao;
pub use user::UserDao;

/// Contrato CRUD comum a todas as entidades
#[async_trait]
pub trait Dao<T>: Send + Sync {
    /// Persiste um novo registro e retorna o id gerado
    async fn insert(&self, obj: &T) -> DbResult<i64>;

    /// Atualiza um registro existente; `DbError::NotFound` se o id não existir
    async fn update(&self, obj: &T) -> DbResult<()>;

    /// Remove pelo id. Retorna `false` quando nada foi removido.
    async fn delete(&self, id: i64) -> DbResult<bool>;

    async fn find_by_id(&self, id: i64) -> DbResult<Option<T>>;

    /// Todos os registros em ordem de chave primária
    async fn list_all(&self) -> DbResult<Vec<T>>;
}

/// Padrão LIKE que casa `term` como substring literal (`%` e `_` escapados).
/// Usar com `ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ana"), "%ana%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
