//! Key-value record store.
//!
//! Records live as two JSON documents, one per key, and every write rewrites
//! the affected document. This mirrors clients that only have a string
//! key-value area to persist into. The whole area can be moved in and out as
//! a snapshot string.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{local_today, NewTreatment, Patient, TreatmentRecord};

/// Key holding the patient list.
pub const PATIENTS_KEY: &str = "patients";
/// Key holding the treatment list.
pub const TREATMENTS_KEY: &str = "treatments";

/// Record store over a string key-value area.
#[derive(Debug, Clone, Default)]
pub struct KeyValueStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a store from a snapshot produced by [`KeyValueStore::to_snapshot`].
    pub fn from_snapshot(snapshot: &str) -> StoreResult<Self> {
        let entries: BTreeMap<String, String> = serde_json::from_str(snapshot)?;
        let store = Self { entries };
        // Fail early on corrupt documents rather than on first read.
        store.read::<Patient>(PATIENTS_KEY)?;
        store.read::<TreatmentRecord>(TREATMENTS_KEY)?;
        Ok(store)
    }

    /// Serialize the whole key-value area.
    pub fn to_snapshot(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Raw stored value for a key.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.entries.get(key) {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(items)?;
        self.entries.insert(key.to_string(), json);
        Ok(())
    }
}

impl RecordStore for KeyValueStore {
    fn insert_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        let mut patients: Vec<Patient> = self.read(PATIENTS_KEY)?;
        if patients.iter().any(|p| p.id == patient.id) {
            return Err(StoreError::Duplicate(patient.id.clone()));
        }
        patients.push(patient.clone());
        self.write(PATIENTS_KEY, &patients)
    }

    fn update_patient(&mut self, patient: &Patient) -> StoreResult<bool> {
        let mut patients: Vec<Patient> = self.read(PATIENTS_KEY)?;
        let Some(existing) = patients.iter_mut().find(|p| p.id == patient.id) else {
            return Ok(false);
        };

        existing.name = patient.name.clone();
        existing.phone = patient.phone.clone();
        existing.email = patient.email.clone();
        existing.notes = patient.notes.clone();
        self.write(PATIENTS_KEY, &patients)?;
        Ok(true)
    }

    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        let patients: Vec<Patient> = self.read(PATIENTS_KEY)?;
        Ok(patients.into_iter().find(|p| p.id == id))
    }

    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut patients: Vec<Patient> = self.read(PATIENTS_KEY)?;
        patients.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(patients)
    }

    fn list_treatments(&self, patient_id: &str) -> StoreResult<Vec<TreatmentRecord>> {
        tracing::debug!(patient_id, "Listing treatments from key-value store");
        let mut treatments = self.list_all_treatments()?;
        treatments.retain(|t| t.patient_id == patient_id);
        Ok(treatments)
    }

    fn list_all_treatments(&self) -> StoreResult<Vec<TreatmentRecord>> {
        let mut treatments: Vec<TreatmentRecord> = self.read(TREATMENTS_KEY)?;
        // Latest insert first among same-day sessions, like the SQLite backend.
        treatments.reverse();
        treatments.sort_by(|a, b| b.treatment_date.cmp(&a.treatment_date));
        Ok(treatments)
    }

    fn add_treatment(&mut self, treatment: NewTreatment) -> StoreResult<TreatmentRecord> {
        if self.get_patient(&treatment.patient_id)?.is_none() {
            return Err(StoreError::UnknownPatient(treatment.patient_id));
        }

        let mut treatments: Vec<TreatmentRecord> = self.read(TREATMENTS_KEY)?;
        let record = treatment.into_record(local_today());
        treatments.push(record.clone());
        self.write(TREATMENTS_KEY, &treatments)?;

        tracing::info!(
            treatment_id = %record.id,
            patient_id = %record.patient_id,
            treatment_type = %record.treatment_type,
            "Treatment stored in key-value store"
        );
        Ok(record)
    }

    fn delete_treatment(&mut self, id: &str) -> StoreResult<bool> {
        let mut treatments: Vec<TreatmentRecord> = self.read(TREATMENTS_KEY)?;
        let before = treatments.len();
        treatments.retain(|t| t.id != id);

        let deleted = treatments.len() < before;
        if deleted {
            self.write(TREATMENTS_KEY, &treatments)?;
        }
        tracing::info!(treatment_id = id, deleted, "Treatment delete in key-value store");
        Ok(deleted)
    }

    fn snapshot(&self) -> StoreResult<Option<String>> {
        self.to_snapshot().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingCategory, PatientInput, TreatmentType};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_store() {
        let store = KeyValueStore::new();
        assert!(store.list_patients().unwrap().is_empty());
        assert!(store.list_treatments("anyone").unwrap().is_empty());
        assert!(store.raw(PATIENTS_KEY).is_none());
    }

    #[test]
    fn test_documents_are_json() {
        let mut store = KeyValueStore::new();
        let patient = Patient::new("Hanako".into());
        store.insert_patient(&patient).unwrap();
        store
            .add_treatment(
                NewTreatment::new(patient.id.clone(), BillingCategory::FemaleFacial)
                    .on(date(2024, 1, 30)),
            )
            .unwrap();

        let treatments: serde_json::Value =
            serde_json::from_str(store.raw(TREATMENTS_KEY).unwrap()).unwrap();
        assert_eq!(treatments[0]["treatment_type"], "female facial");
        assert_eq!(treatments[0]["treatment_date"], "2024-01-30");
    }

    #[test]
    fn test_duplicate_patient_rejected() {
        let mut store = KeyValueStore::new();
        let patient = Patient::new("Hanako".into());
        store.insert_patient(&patient).unwrap();
        assert!(matches!(
            store.insert_patient(&patient),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn test_update_patient() {
        let mut store = KeyValueStore::new();
        let mut patient = Patient::from_input(PatientInput::named("Taro"));
        store.insert_patient(&patient).unwrap();

        patient.notes = Some("Often late".into());
        assert!(store.update_patient(&patient).unwrap());
        assert_eq!(
            store.get_patient(&patient.id).unwrap().unwrap().notes,
            Some("Often late".into())
        );

        assert!(!store.update_patient(&Patient::new("Ghost".into())).unwrap());
    }

    #[test]
    fn test_newest_first() {
        let mut store = KeyValueStore::new();
        let patient = Patient::new("Yumi".into());
        store.insert_patient(&patient).unwrap();

        for (m, d) in [(3, 5), (1, 5), (2, 5)] {
            store
                .add_treatment(NewTreatment::new(patient.id.clone(), "leg").on(date(2024, m, d)))
                .unwrap();
        }

        let dates: Vec<_> = store
            .list_treatments(&patient.id)
            .unwrap()
            .into_iter()
            .map(|t| t.treatment_date)
            .collect();
        assert_eq!(dates, vec![date(2024, 3, 5), date(2024, 2, 5), date(2024, 1, 5)]);
    }

    #[test]
    fn test_deleted_ids_not_reused() {
        let mut store = KeyValueStore::new();
        let patient = Patient::new("Yumi".into());
        store.insert_patient(&patient).unwrap();

        let first = store
            .add_treatment(NewTreatment::new(patient.id.clone(), "arm"))
            .unwrap();
        store.delete_treatment(&first.id).unwrap();
        let second = store
            .add_treatment(NewTreatment::new(patient.id.clone(), "arm"))
            .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_snapshot_restores_records() {
        let mut store = KeyValueStore::new();
        let patient = Patient::new("Hanako".into());
        store.insert_patient(&patient).unwrap();
        store
            .add_treatment(NewTreatment::new(patient.id.clone(), BillingCategory::FullBody))
            .unwrap();

        let snapshot = store.to_snapshot().unwrap();
        let restored = KeyValueStore::from_snapshot(&snapshot).unwrap();

        let history = restored.list_treatments(&patient.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].treatment_type,
            TreatmentType::Billing(BillingCategory::FullBody)
        );
    }

    #[test]
    fn test_corrupt_snapshot_rejected() {
        let snapshot = r#"{"patients":"not json"}"#;
        assert!(matches!(
            KeyValueStore::from_snapshot(snapshot),
            Err(StoreError::Json(_))
        ));
        assert!(KeyValueStore::from_snapshot("[]").is_err());
    }
}
