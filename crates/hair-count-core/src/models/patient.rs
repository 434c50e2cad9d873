//! Patient models.

use serde::{Deserialize, Serialize};

/// A clinic client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID, generated on registration
    pub id: String,
    /// Full name
    pub name: String,
    /// Phone number (digits, hyphens and '+')
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Free-form notes (skin sensitivity, scheduling habits, ...)
    pub notes: Option<String>,
    /// Registration timestamp
    pub created_at: String,
}

/// Create/update payload for a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl PatientInput {
    /// Payload with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Patient {
    /// Create a new patient with a fresh ID.
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            phone: None,
            email: None,
            notes: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a new patient from a form payload.
    pub fn from_input(input: PatientInput) -> Self {
        let mut patient = Self::new(input.name.trim().to_string());
        patient.apply(input);
        patient
    }

    /// Overwrite the editable fields, keeping ID and creation time.
    pub fn apply(&mut self, input: PatientInput) {
        self.name = input.name.trim().to_string();
        self.phone = non_blank(input.phone);
        self.email = non_blank(input.email);
        self.notes = non_blank(input.notes);
    }

    /// Case-insensitive match on name and email, plain substring on phone.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let lowered = term.to_lowercase();
        self.name.to_lowercase().contains(&lowered)
            || self
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&lowered))
            || self.phone.as_deref().is_some_and(|phone| phone.contains(term))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("Hanako Yamada".into());
        assert_eq!(patient.name, "Hanako Yamada");
        assert_eq!(patient.id.len(), 36); // UUID format
        assert!(patient.phone.is_none());
    }

    #[test]
    fn test_from_input_drops_blank_fields() {
        let patient = Patient::from_input(PatientInput {
            name: "  Yumi Sato ".into(),
            phone: Some("".into()),
            email: Some("yumi@example.com".into()),
            notes: Some("   ".into()),
        });
        assert_eq!(patient.name, "Yumi Sato");
        assert_eq!(patient.phone, None);
        assert_eq!(patient.email, Some("yumi@example.com".into()));
        assert_eq!(patient.notes, None);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut patient = Patient::new("Taro".into());
        let id = patient.id.clone();
        let created = patient.created_at.clone();

        patient.apply(PatientInput {
            name: "Taro Suzuki".into(),
            notes: Some("Often late".into()),
            ..PatientInput::default()
        });

        assert_eq!(patient.id, id);
        assert_eq!(patient.created_at, created);
        assert_eq!(patient.name, "Taro Suzuki");
        assert_eq!(patient.notes, Some("Often late".into()));
    }

    #[test]
    fn test_matches() {
        let patient = Patient::from_input(PatientInput {
            name: "Hanako Yamada".into(),
            phone: Some("090-1234-5678".into()),
            email: Some("Hanako@Example.com".into()),
            notes: None,
        });

        assert!(patient.matches("yamada"));
        assert!(patient.matches("HANAKO@"));
        assert!(patient.matches("1234"));
        assert!(patient.matches(""));
        assert!(!patient.matches("suzuki"));
    }
}
