//! Input validation for patient and treatment entry.
//!
//! Runs before anything reaches a store. Summaries never see invalid input.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::models::{NewTreatment, PatientInput};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9\-+]+$").unwrap());

/// Rejected input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Patient name is required")]
    MissingName,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Phone number may only contain digits, hyphens and '+': {0}")]
    InvalidPhone(String),

    #[error("Patient is required")]
    MissingPatient,

    #[error("Treatment type is required")]
    MissingTreatmentType,

    #[error("Treatment date {date} is in the future (today is {today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },
}

/// Validate a patient create/update payload.
pub fn validate_patient(input: &PatientInput) -> Result<(), ValidationError> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }

    if let Some(email) = filled(&input.email) {
        if !EMAIL_PATTERN.is_match(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
    }

    if let Some(phone) = filled(&input.phone) {
        if !PHONE_PATTERN.is_match(phone) {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }
    }

    Ok(())
}

/// Validate a treatment entry against the caller's current date.
pub fn validate_treatment(
    treatment: &NewTreatment,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if treatment.patient_id.trim().is_empty() {
        return Err(ValidationError::MissingPatient);
    }

    if treatment.treatment_type.is_blank() {
        return Err(ValidationError::MissingTreatmentType);
    }

    if let Some(date) = treatment.treatment_date {
        if date > today {
            return Err(ValidationError::FutureDate { date, today });
        }
    }

    Ok(())
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
