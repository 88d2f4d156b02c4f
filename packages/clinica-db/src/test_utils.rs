//! Banco temporário e dados de exemplo para testes
//!
//! Disponível nos testes desta biblioteca e, com a feature `test-utils`,
//! nos testes de outras crates do workspace.

use anyhow::Result;
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::auth::hash_password_with;
use crate::dao::{AppointmentDao, Dao, DoctorDao, PatientDao, UserDao};
use crate::models::{Appointment, AppointmentStatus, Doctor, Patient, Profile, User};
use crate::{init_db_pool, DbConfig};

/// Senha de todos os usuários criados por [`seed_clinic`]
pub const SEED_PASSWORD: &str = "senha123";

/// Pool sobre um arquivo SQLite num diretório temporário
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn test_db() -> Result<TestDb> {
    let dir = tempfile::tempdir()?;
    let config = DbConfig {
        db_path: dir.path().join("clinica.db").to_string_lossy().into_owned(),
        max_connections: 2,
    };
    let pool = init_db_pool(&config).await?;
    Ok(TestDb { pool, _dir: dir })
}

/// Dados gravados por [`seed_clinic`]
#[derive(Debug, Clone)]
pub struct Seed {
    pub paulo: Doctor,
    pub helena: Doctor,
    pub ana: Patient,
    pub bruno: Patient,
    /// Ids das consultas, na ordem de inserção
    pub appointments: Vec<i64>,
    /// Usuário MEDICO cujo id coincide com o de `paulo`
    pub doctor_user: User,
    pub admin_user: User,
    pub recep_user: User,
}

/// Hasher barato; a verificação usa os parâmetros gravados no hash
fn light_hasher() -> Result<Argon2<'static>> {
    let params = Params::new(8, 1, 1, None).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Dois médicos, dois pacientes, quatro consultas e um usuário por perfil:
///
/// | consulta | paciente | médico | data | hora | status |
/// |---|---|---|---|---|---|
/// | 0 | Ana | Paulo | 2024-05-10 | 09:00 | AGENDADA |
/// | 1 | Bruno | Paulo | 2024-05-11 | 10:30 | REALIZADA |
/// | 2 | Ana | Helena | 2024-05-20 | 14:00 | AGENDADA |
/// | 3 | Bruno | Helena | 2024-05-25 | 15:30 | CANCELADA |
pub async fn seed_clinic(pool: &SqlitePool) -> Result<Seed> {
    let doctors = DoctorDao::new(pool.clone());
    let patients = PatientDao::new(pool.clone());
    let appointments = AppointmentDao::new(pool.clone());
    let users = UserDao::new(pool.clone());

    let mut paulo = Doctor::new("Dr. Paulo Lima", "Cardiologia", "CRM1234");
    paulo.id = doctors.insert(&paulo).await?;
    let mut helena = Doctor::new("Dra. Helena Costa", "Dermatologia", "CRM5678");
    helena.id = doctors.insert(&helena).await?;

    let mut ana = Patient::new("Ana Souza", "123.456.789-00", "(11) 91111-1111");
    ana.id = patients.insert(&ana).await?;
    let mut bruno = Patient::new("Bruno Alves", "987.654.321-00", "(11) 92222-2222");
    bruno.id = patients.insert(&bruno).await?;

    let rows = [
        (&ana, &paulo, (2024, 5, 10), (9, 0), AppointmentStatus::Scheduled),
        (&bruno, &paulo, (2024, 5, 11), (10, 30), AppointmentStatus::Completed),
        (&ana, &helena, (2024, 5, 20), (14, 0), AppointmentStatus::Scheduled),
        (&bruno, &helena, (2024, 5, 25), (15, 30), AppointmentStatus::Canceled),
    ];
    let mut ids = Vec::with_capacity(rows.len());
    for (patient, doctor, (y, m, d), (h, min), status) in rows {
        let mut appointment = Appointment::new(
            NaiveDate::from_ymd_opt(y, m, d).expect("data válida"),
            NaiveTime::from_hms_opt(h, min, 0).expect("hora válida"),
            patient.clone(),
            doctor.clone(),
        );
        appointment.status = status;
        ids.push(appointments.insert(&appointment).await?);
    }

    let hasher = light_hasher()?;
    let hash = hash_password_with(&hasher, SEED_PASSWORD)?;

    let mut doctor_user = User::new("paulo", hash.clone(), Profile::Doctor);
    doctor_user.id = users.insert(&doctor_user).await?;
    let mut admin_user = User::new("admin", hash.clone(), Profile::Admin);
    admin_user.id = users.insert(&admin_user).await?;
    let mut recep_user = User::new("recep", hash, Profile::Receptionist);
    recep_user.id = users.insert(&recep_user).await?;

    Ok(Seed {
        paulo,
        helena,
        ana,
        bruno,
        appointments: ids,
        doctor_user,
        admin_user,
        recep_user,
    })
}
