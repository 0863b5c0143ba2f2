//! Inquiry intake: raw submissions, field rules, the normalizer and the
//! admission wizard reducer.

mod normalizer;
mod rules;
mod submission;
mod wizard;

pub use normalizer::{normalize_admission, normalize_contact, AdmissionStep};
pub use rules::{tri_state, FieldReader, LONG_TEXT_MAX, TEXT_MAX};
pub use submission::{FieldValue, Submission};
pub use wizard::{reduce, WizardAction, WizardState};
