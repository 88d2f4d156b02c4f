//! Modelos de dados da clínica
//!
//! Este módulo define as entidades persistidas (usuário, paciente, médico e
//! consulta) e os enumerados de status e perfil.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

/// Status possíveis de uma consulta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Consulta agendada, ainda não realizada nem cancelada
    #[serde(rename = "AGENDADA")]
    Scheduled,
    /// Consulta realizada
    #[serde(rename = "REALIZADA")]
    Completed,
    /// Consulta cancelada
    #[serde(rename = "CANCELADA")]
    Canceled,
}

impl AppointmentStatus {
    /// Texto gravado na coluna `consulta.status`
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "AGENDADA",
            AppointmentStatus::Completed => "REALIZADA",
            AppointmentStatus::Canceled => "CANCELADA",
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    /// Aceita o texto do banco e os rótulos dos formulários ("Agendada")
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "AGENDADA" => Ok(AppointmentStatus::Scheduled),
            "REALIZADA" => Ok(AppointmentStatus::Completed),
            "CANCELADA" => Ok(AppointmentStatus::Canceled),
            _ => Err(format!("Valor de status inválido: {}", value)),
        }
    }
}

/// Perfil de acesso de um usuário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "RECEP")]
    Receptionist,
    #[serde(rename = "MEDICO")]
    Doctor,
}

impl Profile {
    /// Interpreta o perfil gravado no banco, ignorando espaços e caixa.
    ///
    /// Qualquer valor fora de ADMIN/RECEP/MEDICO é um perfil desconhecido.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Profile::Admin),
            "RECEP" | "RECEPCIONISTA" => Some(Profile::Receptionist),
            "MEDICO" => Some(Profile::Doctor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Admin => "ADMIN",
            Profile::Receptionist => "RECEP",
            Profile::Doctor => "MEDICO",
        }
    }

    /// Nome do perfil exibido na mensagem de boas-vindas
    pub fn label(&self) -> &'static str {
        match self {
            Profile::Admin => "ADMIN",
            Profile::Receptionist => "RECEPCIONISTA",
            Profile::Doctor => "MÉDICO",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usuário do sistema (tabela `usuario`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    /// Hash Argon2 da senha, nunca serializado
    #[serde(skip_serializing, default)]
    #[sqlx(rename = "senha")]
    pub password_hash: String,
    /// Perfil como gravado no banco; veja [`User::profile`]
    #[sqlx(rename = "perfil")]
    pub profile: String,
}

impl User {
    pub fn new(login: impl Into<String>, password_hash: impl Into<String>, profile: Profile) -> Self {
        Self {
            id: 0,
            login: login.into(),
            password_hash: password_hash.into(),
            profile: profile.as_str().to_string(),
        }
    }

    pub fn profile(&self) -> Option<Profile> {
        Profile::parse(&self.profile)
    }
}

/// Paciente (tabela `paciente`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub id: i64,
    #[sqlx(rename = "nome")]
    pub name: String,
    /// CPF formatado (`000.000.000-00`)
    pub cpf: String,
    #[sqlx(rename = "telefone")]
    pub phone: String,
}

impl Patient {
    pub fn new(name: impl Into<String>, cpf: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            cpf: cpf.into(),
            phone: phone.into(),
        }
    }

    /// Verificação simples de formato: 14 caracteres, como em `000.000.000-00`.
    /// Não confere os dígitos verificadores.
    pub fn has_valid_cpf_format(&self) -> bool {
        self.cpf.chars().count() == 14
    }

    pub fn update_contact(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Médico (tabela `medico`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    #[sqlx(rename = "nome")]
    pub name: String,
    #[sqlx(rename = "especialidade")]
    pub specialty: String,
    pub crm: String,
}

impl Doctor {
    pub fn new(name: impl Into<String>, specialty: impl Into<String>, crm: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            specialty: specialty.into(),
            crm: crm.into(),
        }
    }

    /// O CRM deve começar com "CRM" (ex.: CRM12345)
    pub fn has_valid_crm_format(&self) -> bool {
        self.crm.starts_with("CRM")
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Consulta agendada, sempre ligada a um paciente e a um médico
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub status: AppointmentStatus,
    pub patient: Patient,
    pub doctor: Doctor,
}

impl Appointment {
    /// Nova consulta com status AGENDADA
    pub fn new(
        scheduled_date: NaiveDate,
        scheduled_time: NaiveTime,
        patient: Patient,
        doctor: Doctor,
    ) -> Self {
        Self {
            id: 0,
            scheduled_date,
            scheduled_time,
            status: AppointmentStatus::default(),
            patient,
            doctor,
        }
    }

    pub fn complete(&mut self) {
        self.status = AppointmentStatus::Completed;
    }

    pub fn cancel(&mut self) {
        self.status = AppointmentStatus::Canceled;
    }
}

/// Lê uma linha do SELECT de consultas com paciente e médico (veja `dao::appointment`)
impl FromRow<'_, SqliteRow> for Appointment {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = status.parse().map_err(|message: String| sqlx::Error::ColumnDecode {
            index: String::from("status"),
            source: Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            scheduled_date: row.try_get("data_agendada")?,
            scheduled_time: row.try_get("hora_agendada")?,
            status,
            patient: Patient {
                id: row.try_get("paciente_id")?,
                name: row.try_get("paciente_nome")?,
                cpf: row.try_get("paciente_cpf")?,
                phone: row.try_get("paciente_telefone")?,
            },
            doctor: Doctor {
                id: row.try_get("medico_id")?,
                name: row.try_get("medico_nome")?,
                specialty: row.try_get("medico_especialidade")?,
                crm: row.try_get("medico_crm")?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment() -> Appointment {
        Appointment::new(
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            Patient::new("Ana Souza", "123.456.789-00", "(11) 99999-0000"),
            Doctor::new("Dr. Paulo Lima", "Cardiologia", "CRM12345"),
        )
    }

    #[test]
    fn test_new_appointment_defaults_to_scheduled() {
        assert_eq!(appointment().status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_complete_and_cancel() {
        let mut a = appointment();
        a.complete();
        assert_eq!(a.status, AppointmentStatus::Completed);
        a.cancel();
        assert_eq!(a.status, AppointmentStatus::Canceled);
    }

    #[test]
    fn test_status_parsing_accepts_form_labels() {
        assert_eq!("Agendada".parse(), Ok(AppointmentStatus::Scheduled));
        assert_eq!(" REALIZADA".parse(), Ok(AppointmentStatus::Completed));
        assert_eq!("cancelada".parse(), Ok(AppointmentStatus::Canceled));
        assert!("PENDENTE".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!(Profile::parse("admin"), Some(Profile::Admin));
        assert_eq!(Profile::parse(" RECEP "), Some(Profile::Receptionist));
        assert_eq!(Profile::parse("Recepcionista"), Some(Profile::Receptionist));
        assert_eq!(Profile::parse("MEDICO"), Some(Profile::Doctor));
        assert_eq!(Profile::parse("GERENTE"), None);
    }

    #[test]
    fn test_cpf_and_crm_format_checks() {
        let mut patient = Patient::new("Ana", "123.456.789-00", "1111");
        assert!(patient.has_valid_cpf_format());
        patient.cpf = "12345678900".into();
        assert!(!patient.has_valid_cpf_format());

        patient.update_contact("2222");
        assert_eq!(patient.phone, "2222");

        assert!(Doctor::new("Paulo", "Clínica Geral", "CRM999").has_valid_crm_format());
        assert!(!Doctor::new("Paulo", "Clínica Geral", "999").has_valid_crm_format());
    }

    #[test]
    fn test_status_serializes_as_stored_text() {
        let json = serde_json::to_string(&AppointmentStatus::Canceled).unwrap();
        assert_eq!(json, "\"CANCELADA\"");
        assert_eq!(Patient::new("Ana", "", "").to_string(), "Ana");
    }
}
