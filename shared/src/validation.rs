//! Patient form rules.
//!
//! The form works on raw strings as typed; [`PatientForm::validate`] either
//! returns the normalized payload or the per-field messages to show inline.

use crate::date::{format_iso_date, parse_iso_date};
use crate::{Patient, PatientPayload};

pub const NAME_MIN_LEN: usize = 3;
pub const CPF_MIN_LEN: usize = 11;
pub const CPF_MAX_LEN: usize = 14;

pub const MSG_INVALID_NAME: &str = "Informe um nome válido";
pub const MSG_INVALID_CPF: &str = "CPF inválido";
pub const MSG_INVALID_EMAIL: &str = "E-mail inválido";
pub const MSG_INVALID_DATE: &str = "Data inválida";

/// Raw form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub cpf: String,
    pub email: String,
    /// `YYYY-MM-DD` as produced by `<input type="date">`, or empty
    pub birth_date: String,
}

/// Field-level validation messages; `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("formulário inválido")]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub cpf: Option<&'static str>,
    pub email: Option<&'static str>,
    pub birth_date: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cpf.is_none()
            && self.email.is_none()
            && self.birth_date.is_none()
    }
}

impl PatientForm {
    /// Pre-fills the form from an existing record.
    pub fn from_patient(patient: &Patient) -> Self {
        let data = &patient.data;
        Self {
            name: data.name.clone(),
            cpf: data.cpf.clone(),
            email: data.email.clone().unwrap_or_default(),
            birth_date: data
                .birth_date
                .as_ref()
                .map(format_iso_date)
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<PatientPayload, FieldErrors> {
        let name = self.name.trim();
        let cpf = self.cpf.trim();
        let email = non_empty(&self.email);
        let birth_date = non_empty(&self.birth_date);

        let mut errors = FieldErrors::default();

        if name.chars().count() < NAME_MIN_LEN {
            errors.name = Some(MSG_INVALID_NAME);
        }

        let cpf_len = cpf.chars().count();
        if !(CPF_MIN_LEN..=CPF_MAX_LEN).contains(&cpf_len) {
            errors.cpf = Some(MSG_INVALID_CPF);
        }

        if let Some(email) = email {
            if !is_valid_email(email) {
                errors.email = Some(MSG_INVALID_EMAIL);
            }
        }

        let parsed_date = match birth_date {
            Some(raw) => {
                let parsed = parse_iso_date(raw).filter(|_| raw.len() == 10);
                if parsed.is_none() {
                    errors.birth_date = Some(MSG_INVALID_DATE);
                }
                parsed
            }
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PatientPayload {
            name: name.to_string(),
            cpf: cpf.to_string(),
            email: email.map(str::to_string),
            birth_date: parsed_date,
        })
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Syntactic check: `local@domain.tld`, one `@`, no whitespace, no empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
