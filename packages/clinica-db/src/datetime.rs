//! Conversão de textos digitados pelo usuário em datas e horários
//!
//! A busca livre de consultas aceita vários formatos de data e hora. Cada
//! formato é um par (forma exigida, padrão do chrono): a expressão regular
//! fixa a quantidade de dígitos e os separadores, e o chrono valida o valor
//! no calendário.
//!
//! Datas e horas impossíveis não são ajustadas: `31/02/2024` e `24:00` não
//! viram 29/02 nem meia-noite, simplesmente não são reconhecidas. Um termo
//! assim na busca livre só casa por nome ou status.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

struct Format {
    shape: Regex,
    pattern: &'static str,
}

impl Format {
    fn new(shape: &str, pattern: &'static str) -> Self {
        Self {
            shape: Regex::new(shape).expect("formato de data/hora"),
            pattern,
        }
    }
}

/// yyyy-MM-dd, d/M/yyyy, d-M-yyyy, dd/MM/yyyy, dd-MM-yyyy (nesta ordem)
static DATE_FORMATS: Lazy<Vec<Format>> = Lazy::new(|| {
    vec![
        Format::new(r"^\d{4}-\d{2}-\d{2}$", "%Y-%m-%d"),
        Format::new(r"^\d{1,2}/\d{1,2}/\d{4}$", "%d/%m/%Y"),
        Format::new(r"^\d{1,2}-\d{1,2}-\d{4}$", "%d-%m-%Y"),
        Format::new(r"^\d{2}/\d{2}/\d{4}$", "%d/%m/%Y"),
        Format::new(r"^\d{2}-\d{2}-\d{4}$", "%d-%m-%Y"),
    ]
});

/// H:mm, HH:mm, H:mm:ss, HH:mm:ss (nesta ordem)
static TIME_FORMATS: Lazy<Vec<Format>> = Lazy::new(|| {
    vec![
        Format::new(r"^\d{1,2}:[0-5]\d$", "%H:%M"),
        Format::new(r"^\d{2}:[0-5]\d$", "%H:%M"),
        Format::new(r"^\d{1,2}:[0-5]\d:[0-5]\d$", "%H:%M:%S"),
        Format::new(r"^\d{2}:[0-5]\d:[0-5]\d$", "%H:%M:%S"),
    ]
});

/// Formato de data dos formulários de agendamento e do filtro por período
static FORM_DATE: Lazy<Format> = Lazy::new(|| Format::new(r"^\d{2}/\d{2}/\d{4}$", "%d/%m/%Y"));

/// Formato de hora do formulário de agendamento
static FORM_TIME: Lazy<Format> = Lazy::new(|| Format::new(r"^\d{2}:[0-5]\d$", "%H:%M"));

fn parse_date_with(format: &Format, text: &str) -> Option<NaiveDate> {
    if !format.shape.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, format.pattern).ok()
}

fn parse_time_with(format: &Format, text: &str) -> Option<NaiveTime> {
    if !format.shape.is_match(text) {
        return None;
    }
    NaiveTime::parse_from_str(text, format.pattern).ok()
}

/// Tenta converter o texto em data, testando os formatos aceitos em ordem.
///
/// Retorna a primeira conversão bem-sucedida ou `None`.
pub fn try_parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| parse_date_with(format, trimmed))
}

/// Tenta converter o texto em horário, testando os formatos aceitos em ordem.
pub fn try_parse_time(text: &str) -> Option<NaiveTime> {
    let trimmed = text.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| parse_time_with(format, trimmed))
}

/// Data digitada no formulário (`dd/MM/yyyy`)
pub fn parse_form_date(text: &str) -> Option<NaiveDate> {
    parse_date_with(&FORM_DATE, text.trim())
}

/// Hora digitada no formulário (`HH:mm`)
pub fn parse_form_time(text: &str) -> Option<NaiveTime> {
    parse_time_with(&FORM_TIME, text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_accepts_every_date_format() {
        assert_eq!(try_parse_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(try_parse_date("5/3/2024"), Some(date(2024, 3, 5)));
        assert_eq!(try_parse_date("5-3-2024"), Some(date(2024, 3, 5)));
        assert_eq!(try_parse_date("05/03/2024"), Some(date(2024, 3, 5)));
        assert_eq!(try_parse_date("05-03-2024"), Some(date(2024, 3, 5)));
        assert_eq!(try_parse_date("  15/11/2025 "), Some(date(2025, 11, 15)));
    }

    #[test]
    fn test_rejects_malformed_dates() {
        for text in [
            "",
            "maria",
            "2024-3-5",
            "05/03/24",
            "2024/03/05",
            "32/01/2024",
            "31/02/2024",
            "10/13/2024",
            "05.03.2024",
            "05/03/2024 10:00",
        ] {
            assert_eq!(try_parse_date(text), None, "{text:?} não deveria ser data");
        }
    }

    #[test]
    fn test_accepts_every_time_format() {
        assert_eq!(try_parse_time("9:05"), Some(time(9, 5, 0)));
        assert_eq!(try_parse_time("09:05"), Some(time(9, 5, 0)));
        assert_eq!(try_parse_time("9:05:30"), Some(time(9, 5, 30)));
        assert_eq!(try_parse_time("09:05:30"), Some(time(9, 5, 30)));
        assert_eq!(try_parse_time(" 14:30 "), Some(time(14, 30, 0)));
    }

    #[test]
    fn test_rejects_malformed_times() {
        for text in ["", "9", "9:5", "24:00", "10:60", "10:00:60", "10h30", "123:00"] {
            assert_eq!(try_parse_time(text), None, "{text:?} não deveria ser hora");
        }
    }

    #[test]
    fn test_form_formats_are_strict() {
        assert_eq!(parse_form_date("05/03/2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_form_date("5/3/2024"), None);
        assert_eq!(parse_form_date("2024-03-05"), None);
        assert_eq!(parse_form_time("08:15"), Some(time(8, 15, 0)));
        assert_eq!(parse_form_time("8:15"), None);
        assert_eq!(parse_form_time("08:15:00"), None);
    }
}
