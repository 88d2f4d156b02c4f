//! Validação dos formulários de cadastro e agendamento
//!
//! Os campos de texto chegam como digitados; `validated()` remove espaços nas
//! pontas, exige todos os campos e devolve a entidade pronta para o DAO.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::datetime::{parse_form_date, parse_form_time};
use crate::error::{ClinicaError, ClinicaResult};
use crate::models::{AppointmentStatus, Doctor, Patient};

const REQUIRED_FIELDS: &str = "Preencha todos os campos.";
const REQUIRED_APPOINTMENT_FIELDS: &str =
    "Por favor, preencha todos os campos antes de salvar a consulta.";

fn required(message: &str) -> ClinicaError {
    ClinicaError::Validation(message.to_string())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PatientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub cpf: String,
    #[validate(length(min = 1))]
    pub phone: String,
}

impl PatientForm {
    pub fn validated(&self) -> ClinicaResult<Patient> {
        let form = Self {
            name: self.name.trim().to_string(),
            cpf: self.cpf.trim().to_string(),
            phone: self.phone.trim().to_string(),
        };
        form.validate().map_err(|_| required(REQUIRED_FIELDS))?;
        Ok(Patient::new(form.name, form.cpf, form.phone))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct DoctorForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub specialty: String,
    #[validate(length(min = 1))]
    pub crm: String,
}

impl DoctorForm {
    pub fn validated(&self) -> ClinicaResult<Doctor> {
        let form = Self {
            name: self.name.trim().to_string(),
            specialty: self.specialty.trim().to_string(),
            crm: self.crm.trim().to_string(),
        };
        form.validate().map_err(|_| required(REQUIRED_FIELDS))?;
        Ok(Doctor::new(form.name, form.specialty, form.crm))
    }
}

/// Formulário de agendamento: data `dd/MM/yyyy`, hora `HH:mm`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AppointmentForm {
    #[validate(required)]
    pub patient_id: Option<i64>,
    #[validate(required)]
    pub doctor_id: Option<i64>,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    #[validate(required)]
    pub status: Option<String>,
}

/// Agendamento validado; paciente e médico ainda precisam ser carregados
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentInput {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
}

impl AppointmentForm {
    pub fn validated(&self) -> ClinicaResult<AppointmentInput> {
        let form = Self {
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            status: self
                .status
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            ..self.clone()
        };
        form.validate()
            .map_err(|_| required(REQUIRED_APPOINTMENT_FIELDS))?;

        let date = parse_form_date(&form.date).ok_or_else(|| {
            ClinicaError::Validation(format!("Data inválida: '{}' (use dd/MM/aaaa)", form.date))
        })?;
        let time = parse_form_time(&form.time).ok_or_else(|| {
            ClinicaError::Validation(format!("Hora inválida: '{}' (use HH:mm)", form.time))
        })?;
        let status = form
            .status
            .as_deref()
            .unwrap_or_default()
            .parse::<AppointmentStatus>()
            .map_err(ClinicaError::Validation)?;

        Ok(AppointmentInput {
            patient_id: form.patient_id.unwrap_or_default(),
            doctor_id: form.doctor_id.unwrap_or_default(),
            date,
            time,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_form_trims_and_requires_every_field() {
        let form = PatientForm {
            name: "  Ana Souza ".into(),
            cpf: "123.456.789-00".into(),
            phone: " 1111 ".into(),
        };
        let patient = form.validated().unwrap();
        assert_eq!(patient.name, "Ana Souza");
        assert_eq!(patient.phone, "1111");

        let blank = PatientForm {
            phone: "   ".into(),
            ..form
        };
        match blank.validated() {
            Err(ClinicaError::Validation(msg)) => assert_eq!(msg, "Preencha todos os campos."),
            other => panic!("esperava erro de validação, veio {:?}", other),
        }
    }

    #[test]
    fn test_doctor_form() {
        assert!(DoctorForm {
            name: "Paulo".into(),
            specialty: "Cardiologia".into(),
            crm: "CRM1".into(),
        }
        .validated()
        .is_ok());
        assert!(DoctorForm::default().validated().is_err());
    }

    fn appointment_form() -> AppointmentForm {
        AppointmentForm {
            patient_id: Some(1),
            doctor_id: Some(2),
            date: "10/05/2024".into(),
            time: "09:30".into(),
            status: Some("Agendada".into()),
        }
    }

    #[test]
    fn test_appointment_form_parses_fields() {
        let input = appointment_form().validated().unwrap();
        assert_eq!(input.patient_id, 1);
        assert_eq!(input.doctor_id, 2);
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(input.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(input.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_appointment_form_missing_fields() {
        for form in [
            AppointmentForm { patient_id: None, ..appointment_form() },
            AppointmentForm { doctor_id: None, ..appointment_form() },
            AppointmentForm { date: " ".into(), ..appointment_form() },
            AppointmentForm { time: "".into(), ..appointment_form() },
            AppointmentForm { status: Some(" ".into()), ..appointment_form() },
        ] {
            match form.validated() {
                Err(ClinicaError::Validation(msg)) => {
                    assert_eq!(msg, REQUIRED_APPOINTMENT_FIELDS)
                }
                other => panic!("esperava campos obrigatórios, veio {:?}", other),
            }
        }
    }

    #[test]
    fn test_appointment_form_rejects_bad_date_time_and_status() {
        assert!(AppointmentForm { date: "2024-05-10".into(), ..appointment_form() }
            .validated()
            .is_err());
        assert!(AppointmentForm { time: "9h30".into(), ..appointment_form() }
            .validated()
            .is_err());
        assert!(AppointmentForm { status: Some("Pendente".into()), ..appointment_form() }
            .validated()
            .is_err());
    }
}
