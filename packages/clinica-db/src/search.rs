//! Busca livre de consultas
//!
//! Um termo digitado vira uma disjunção de predicados: nome do paciente, nome
//! do médico ou status contendo o termo (sem diferenciar maiúsculas), ou o
//! termo interpretado como data igual à data agendada, ou como horário igual
//! ao horário agendado. Não há ranking; a ordem é a do armazenamento.

use chrono::{NaiveDate, NaiveTime};

use crate::datetime::{try_parse_date, try_parse_time};
use crate::models::Appointment;

/// Termo de busca já preparado para comparação
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentSearch {
    needle: String,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

impl AppointmentSearch {
    pub fn new(term: &str) -> Self {
        let term = term.trim();
        Self {
            needle: term.to_lowercase(),
            date: try_parse_date(term),
            time: try_parse_time(term),
        }
    }

    /// Data reconhecida no termo, se houver
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Horário reconhecido no termo, se houver
    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        contains_ignore_case(&appointment.patient.name, &self.needle)
            || contains_ignore_case(&appointment.doctor.name, &self.needle)
            || contains_ignore_case(appointment.status.as_str(), &self.needle)
            || self.date == Some(appointment.scheduled_date)
            || self.time == Some(appointment.scheduled_time)
    }

    /// Mantém apenas as consultas que casam, preservando a ordem recebida
    pub fn filter(&self, appointments: Vec<Appointment>) -> Vec<Appointment> {
        appointments
            .into_iter()
            .filter(|appointment| self.matches(appointment))
            .collect()
    }
}

/// `needle` deve vir em minúsculas
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, Doctor, Patient};

    fn appointment(patient: &str, doctor: &str, date: (i32, u32, u32), time: (u32, u32)) -> Appointment {
        Appointment::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            Patient::new(patient, "123.456.789-00", "1111"),
            Doctor::new(doctor, "Clínica Geral", "CRM1"),
        )
    }

    #[test]
    fn test_matches_names_case_insensitively() {
        let a = appointment("José Araújo", "Dra. Helena Costa", (2024, 5, 10), (9, 30));

        assert!(AppointmentSearch::new("josé").matches(&a));
        assert!(AppointmentSearch::new("JOSÉ ARAÚJO").matches(&a));
        assert!(AppointmentSearch::new("helena").matches(&a));
        assert!(AppointmentSearch::new("  COSTA ").matches(&a));
        assert!(!AppointmentSearch::new("Paulo").matches(&a));
    }

    #[test]
    fn test_matches_status_text() {
        let mut a = appointment("Ana", "Paulo", (2024, 5, 10), (9, 30));
        assert!(AppointmentSearch::new("agend").matches(&a));
        assert!(!AppointmentSearch::new("cancel").matches(&a));

        a.cancel();
        assert_eq!(a.status, AppointmentStatus::Canceled);
        assert!(AppointmentSearch::new("Cancelada").matches(&a));
    }

    #[test]
    fn test_matches_date_in_any_accepted_format() {
        let a = appointment("Ana", "Paulo", (2024, 5, 10), (9, 30));
        for term in ["2024-05-10", "10/5/2024", "10-5-2024", "10/05/2024", "10-05-2024"] {
            let search = AppointmentSearch::new(term);
            assert!(search.date().is_some());
            assert!(search.matches(&a), "{term} deveria casar");
        }
        assert!(!AppointmentSearch::new("11/05/2024").matches(&a));
    }

    #[test]
    fn test_matches_time() {
        let a = appointment("Ana", "Paulo", (2024, 5, 10), (9, 30));
        assert!(AppointmentSearch::new("9:30").matches(&a));
        assert!(AppointmentSearch::new("09:30:00").matches(&a));
        assert!(!AppointmentSearch::new("09:31").matches(&a));
    }

    #[test]
    fn test_filter_is_a_plain_union_in_input_order() {
        let list = vec![
            appointment("Ana", "Paulo", (2024, 5, 10), (9, 30)),
            appointment("Bruno", "Helena", (2024, 5, 11), (10, 0)),
            appointment("Carla", "Ana Paula", (2024, 5, 12), (11, 0)),
        ];

        let names: Vec<String> = AppointmentSearch::new("ana")
            .filter(list.clone())
            .into_iter()
            .map(|a| a.patient.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Carla"]);

        assert_eq!(AppointmentSearch::new("10:00").filter(list.clone()).len(), 1);
        assert_eq!(AppointmentSearch::new("").filter(list).len(), 3);
    }
}
