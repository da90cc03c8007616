//! Patient form state
//!
//! Groups the modal's field signals into one `Copy` struct so it can be
//! passed to child components as a prop.

use genesis_shared::Patient;
use genesis_shared::validation::{FieldErrors, PatientForm};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct FormState {
    pub name: RwSignal<String>,
    pub cpf: RwSignal<String>,
    pub email: RwSignal<String>,
    pub birth_date: RwSignal<String>,
    pub errors: RwSignal<FieldErrors>,
    /// Server failure shown above the buttons; the modal stays open.
    pub submit_error: RwSignal<Option<String>>,
    pub submitting: RwSignal<bool>,
    /// Bumped on every fill; a save that started under an older value is
    /// no longer allowed to touch the modal.
    generation: StoredValue<u64>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            cpf: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            birth_date: RwSignal::new(String::new()),
            errors: RwSignal::new(FieldErrors::default()),
            submit_error: RwSignal::new(None),
            submitting: RwSignal::new(false),
            generation: StoredValue::new(0),
        }
    }

    pub fn reset(&self) {
        self.fill(PatientForm::default());
    }

    /// Pre-fills every field for editing `patient`.
    pub fn fill_from(&self, patient: &Patient) {
        self.fill(PatientForm::from_patient(patient));
    }

    fn fill(&self, form: PatientForm) {
        self.name.set(form.name);
        self.cpf.set(form.cpf);
        self.email.set(form.email);
        self.birth_date.set(form.birth_date);
        self.errors.set(FieldErrors::default());
        self.submit_error.set(None);
        self.submitting.set(false);
        self.generation.update_value(|g| *g += 1);
    }

    /// Marks a save as in flight and returns its generation.
    pub fn begin_submit(&self) -> u64 {
        self.errors.set(FieldErrors::default());
        self.submit_error.set(None);
        self.submitting.set(true);
        self.generation.get_value()
    }

    /// Ends the save started at `generation`.
    ///
    /// Returns `false` when the form was refilled in the meantime; the
    /// caller must then leave the modal alone.
    pub fn finish_submit(&self, generation: u64) -> bool {
        if self.generation.try_get_value() != Some(generation) {
            return false;
        }
        self.submitting.set(false);
        true
    }

    pub fn to_form(&self) -> PatientForm {
        PatientForm {
            name: self.name.get_untracked(),
            cpf: self.cpf.get_untracked(),
            email: self.email.get_untracked(),
            birth_date: self.birth_date.get_untracked(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use genesis_shared::PatientPayload;

    #[test]
    fn fill_and_reset_round_trip_through_the_form() {
        let owner = Owner::new();
        owner.set();

        let state = FormState::new();
        let patient = Patient::new(
            "9",
            PatientPayload {
                name: "Ana Souza".to_string(),
                cpf: "98765432100".to_string(),
                email: Some("ana@lab.com".to_string()),
                birth_date: NaiveDate::from_ymd_opt(1985, 1, 2),
            },
        );

        state.submit_error.set(Some("falhou".to_string()));
        state.fill_from(&patient);
        let form = state.to_form();
        assert_eq!(form.name, "Ana Souza");
        assert_eq!(form.email, "ana@lab.com");
        assert_eq!(form.birth_date, "1985-01-02");
        assert_eq!(state.submit_error.get_untracked(), None);
        assert_eq!(form.validate().unwrap(), patient.data);

        state.reset();
        assert_eq!(state.to_form(), PatientForm::default());
    }

    #[test]
    fn refilling_the_form_orphans_an_in_flight_save() {
        let owner = Owner::new();
        owner.set();

        let state = FormState::new();
        state.reset();
        let first = state.begin_submit();
        assert!(state.submitting.get_untracked());

        // closed and reopened for another record before the save returned
        state.reset();
        assert!(!state.submitting.get_untracked());
        assert!(!state.finish_submit(first));
        assert!(!state.submitting.get_untracked());

        let second = state.begin_submit();
        assert!(state.finish_submit(second));
        assert!(!state.submitting.get_untracked());
    }
}
