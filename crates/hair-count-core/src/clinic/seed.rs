//! Demo clients for a fresh installation.

use chrono::NaiveDate;

use super::{Clinic, ClinicResult};
use crate::models::{BillingCategory, NewTreatment, Patient, PatientInput};
use crate::store::RecordStore;

struct SamplePatient {
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    notes: &'static str,
    sessions: &'static [(BillingCategory, &'static [&'static str])],
}

const SAMPLE_PATIENTS: &[SamplePatient] = &[
    SamplePatient {
        name: "Hanako Yamada",
        phone: "090-1234-5678",
        email: "hanako@example.com",
        notes: "Sensitive skin",
        sessions: &[
            (
                BillingCategory::FullBody,
                &["2024-01-15", "2024-02-15", "2024-03-15", "2024-04-15", "2024-05-15"],
            ),
            (BillingCategory::FemaleFacial, &["2024-01-30", "2024-03-01"]),
        ],
    },
    SamplePatient {
        name: "Taro Suzuki",
        phone: "080-8765-4321",
        email: "taro@example.com",
        notes: "Often late for appointments",
        sessions: &[
            (BillingCategory::FullBody, &["2024-01-10", "2024-02-10"]),
            (
                BillingCategory::MaleBeard,
                &["2024-02-25", "2024-03-25", "2024-04-25"],
            ),
        ],
    },
    SamplePatient {
        name: "Yumi Sato",
        phone: "070-2468-1357",
        email: "yumi@example.com",
        notes: "",
        sessions: &[(
            BillingCategory::FemaleFacial,
            &[
                "2024-01-05", "2024-02-05", "2024-03-05", "2024-04-05", "2024-05-05", "2024-06-05",
                "2024-07-05", "2024-08-05", "2024-09-05", "2024-10-05", "2024-11-05",
            ],
        )],
    },
];

impl<S: RecordStore> Clinic<S> {
    /// Insert the demo clients if the store has no patients yet.
    ///
    /// Returns the inserted patients; empty when the store was already in use.
    pub fn seed_sample_data(&mut self) -> ClinicResult<Vec<Patient>> {
        if !self.store.list_patients()?.is_empty() {
            tracing::debug!("Store already has patients, skipping sample data");
            return Ok(Vec::new());
        }

        let mut inserted = Vec::new();
        for sample in SAMPLE_PATIENTS {
            let patient = Patient::from_input(PatientInput {
                name: sample.name.to_string(),
                phone: Some(sample.phone.to_string()),
                email: Some(sample.email.to_string()),
                notes: Some(sample.notes.to_string()),
            });
            self.store.insert_patient(&patient)?;

            for (category, dates) in sample.sessions {
                for date in dates.iter() {
                    let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
                        tracing::warn!(date, "Skipping malformed sample date");
                        continue;
                    };
                    self.store
                        .add_treatment(NewTreatment::new(patient.id.clone(), *category).on(date))?;
                }
            }
            inserted.push(patient);
        }

        tracing::info!(patients = inserted.len(), "Inserted sample data");
        Ok(inserted)
    }
}
