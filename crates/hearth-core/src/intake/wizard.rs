//! Admission wizard state machine
//!
//! A pure reducer over [`WizardState`]. It never performs I/O; the front end
//! replays actions locally and the server re-checks the final submission with
//! [`normalize_admission`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::normalizer::{normalize_admission, AdmissionStep};
use super::submission::{FieldValue, Submission};
use crate::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub step: AdmissionStep,
    pub values: Submission,
    pub errors: ValidationError,
    pub submitted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardAction {
    SetField { name: String, value: FieldValue },
    ToggleCondition { condition: String },
    Next,
    Back,
    GoTo { step: AdmissionStep },
    Submit,
    Reset,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: AdmissionStep::Inquirer,
            values: Submission::new(),
            errors: ValidationError::new(),
            submitted: false,
        }
    }
}

pub fn reduce(state: WizardState, action: WizardAction, today: NaiveDate) -> WizardState {
    let mut state = state;
    match action {
        WizardAction::SetField { name, value } => {
            state.values.set(&name, value);
            state.errors = without_field(state.errors, &name);
        }
        WizardAction::ToggleCondition { condition } => {
            state
                .values
                .toggle_list_item("medical_conditions", &condition);
            state.errors = without_field(state.errors, "medical_conditions");
        }
        WizardAction::Next => {
            let errors = state.step.validate(&state.values, today);
            if errors.is_empty() {
                if let Some(next) = state.step.next() {
                    state.step = next;
                }
            }
            state.errors = errors;
        }
        WizardAction::Back => {
            if let Some(previous) = state.step.previous() {
                state.step = previous;
            }
            state.errors = ValidationError::new();
        }
        WizardAction::GoTo { step } => {
            if step <= state.step {
                state.step = step;
                state.errors = ValidationError::new();
            }
        }
        WizardAction::Submit => match normalize_admission(&state.values, today) {
            Ok(_) => {
                state.errors = ValidationError::new();
                state.submitted = true;
            }
            Err(errors) => {
                if let Some(first) = errors
                    .fields()
                    .filter_map(AdmissionStep::of_field)
                    .min()
                {
                    state.step = first;
                }
                state.errors = errors;
                state.submitted = false;
            }
        },
        WizardAction::Reset => return WizardState::default(),
    }
    state
}

fn without_field(errors: ValidationError, field: &str) -> ValidationError {
    let mut kept = ValidationError::new();
    for (name, message) in errors.as_map() {
        if name != field {
            kept.add(name, message.clone());
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn set(state: WizardState, name: &str, value: &str) -> WizardState {
        reduce(
            state,
            WizardAction::SetField {
                name: name.to_string(),
                value: value.into(),
            },
            today(),
        )
    }

    fn filled_through_resident() -> WizardState {
        let mut state = WizardState::default();
        state = set(state, "first_name", "Ana");
        state = set(state, "last_name", "Cruz");
        state = reduce(state, WizardAction::Next, today());
        state = set(state, "resident_name", "Lola Cruz");
        state = set(state, "relationship", "Daughter");
        reduce(state, WizardAction::Next, today())
    }

    #[test]
    fn test_next_blocks_on_invalid_step() {
        let state = reduce(WizardState::default(), WizardAction::Next, today());
        assert_eq!(state.step, AdmissionStep::Inquirer);
        assert!(state.errors.contains("first_name"));
        assert!(state.errors.contains("last_name"));
    }

    #[test]
    fn test_next_advances_on_valid_step() {
        let state = filled_through_resident();
        assert_eq!(state.step, AdmissionStep::CareNeeds);
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_set_field_clears_its_error() {
        let state = reduce(WizardState::default(), WizardAction::Next, today());
        let state = set(state, "first_name", "Ana");
        assert!(!state.errors.contains("first_name"));
        assert!(state.errors.contains("last_name"));
    }

    #[test]
    fn test_back_never_validates() {
        let state = filled_through_resident();
        let state = reduce(state, WizardAction::Back, today());
        assert_eq!(state.step, AdmissionStep::Resident);
        assert!(state.errors.is_empty());
        let state = reduce(state, WizardAction::Back, today());
        let state = reduce(state, WizardAction::Back, today());
        assert_eq!(state.step, AdmissionStep::Inquirer);
    }

    #[test]
    fn test_goto_only_moves_backwards() {
        let state = filled_through_resident();
        let state = reduce(
            state,
            WizardAction::GoTo {
                step: AdmissionStep::Scheduling,
            },
            today(),
        );
        assert_eq!(state.step, AdmissionStep::CareNeeds);
        let state = reduce(
            state,
            WizardAction::GoTo {
                step: AdmissionStep::Inquirer,
            },
            today(),
        );
        assert_eq!(state.step, AdmissionStep::Inquirer);
    }

    #[test]
    fn test_submit_agrees_with_normalizer() {
        let mut state = filled_through_resident();
        state = reduce(
            state,
            WizardAction::ToggleCondition {
                condition: "Dementia".to_string(),
            },
            today(),
        );
        state = reduce(state, WizardAction::Next, today());
        assert_eq!(state.step, AdmissionStep::Scheduling);

        state = set(state, "preferred_tour_date", "2025-06-15");
        let rejected = reduce(state.clone(), WizardAction::Submit, today());
        assert!(!rejected.submitted);
        assert!(normalize_admission(&rejected.values, today()).is_err());
        assert!(rejected.errors.contains("preferred_tour_date"));

        state = set(state, "preferred_tour_date", "2025-06-16");
        let accepted = reduce(state, WizardAction::Submit, today());
        assert!(accepted.submitted);
        assert!(normalize_admission(&accepted.values, today()).is_ok());
    }

    #[test]
    fn test_submit_jumps_to_first_failing_step() {
        let mut state = filled_through_resident();
        state = reduce(state, WizardAction::Next, today());
        assert_eq!(state.step, AdmissionStep::CareNeeds);
        state = set(state, "first_name", "");
        state.step = AdmissionStep::Scheduling;
        let state = reduce(state, WizardAction::Submit, today());
        assert_eq!(state.step, AdmissionStep::Inquirer);
        assert!(state.errors.contains("first_name"));
        assert!(state.errors.contains("medical_conditions"));
    }

    #[test]
    fn test_reset() {
        let state = filled_through_resident();
        assert_eq!(
            reduce(state, WizardAction::Reset, today()),
            WizardState::default()
        );
    }

    #[test]
    fn test_state_with_errors_restores_from_json() {
        let state = reduce(WizardState::default(), WizardAction::Next, today());
        assert!(!state.errors.is_empty());

        let json = serde_json::to_string(&state).unwrap();
        let restored: WizardState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
