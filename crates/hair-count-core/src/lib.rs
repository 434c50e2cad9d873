//! Hair-Count Core Library
//!
//! Treatment records and discount eligibility for a hair-removal clinic.
//!
//! # Architecture
//!
//! ```text
//! Front end (UniFFI) ──► Clinic service ──► validation
//!                             │
//!                             ▼
//!                       RecordStore ──────────────┬──────────────────┐
//!                             │                   ▼                  ▼
//!                             │              SQLite (db)     Key-value (JSON)
//!                             ▼
//!                  summarize(history) ──► TreatmentSummary ──► Discount report
//! ```
//!
//! # Core Principle
//!
//! **Summaries are never stored.** Every discount flag is recomputed from the
//! patient's treatment history by [`summarize`].
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, TreatmentRecord, BillingCategory)
//! - [`summary`]: Treatment aggregation and discount thresholds
//! - [`validation`]: Input checks for patients and treatments
//! - [`db`]: SQLite database layer
//! - [`store`]: Record store trait and the key-value backend
//! - [`clinic`]: Service layer used by the front end
//! - [`export`]: Discount report export
//! - [`config`]: Environment configuration and logging

pub mod clinic;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod store;
pub mod summary;
pub mod validation;

// Re-export commonly used types
pub use clinic::{Clinic, ClinicError, ClinicOverview, PatientDetail};
pub use config::AppConfig;
pub use db::Database;
pub use models::{
    BillingCategory, NewTreatment, Patient, PatientInput, TreatmentRecord, TreatmentType,
};
pub use store::{KeyValueStore, RecordStore};
pub use summary::{
    summarize, summarize_for_patient, CategoryStat, DiscountStatus, TreatmentSummary,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use summary::CategoryProgress;

const DATE_FORMAT: &str = "%Y-%m-%d";

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HairCountError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for HairCountError {
    fn from(e: db::DbError) -> Self {
        HairCountError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for HairCountError {
    fn from(e: serde_json::Error) -> Self {
        HairCountError::SerializationError(e.to_string())
    }
}

impl From<validation::ValidationError> for HairCountError {
    fn from(e: validation::ValidationError) -> Self {
        HairCountError::InvalidInput(e.to_string())
    }
}

impl From<store::StoreError> for HairCountError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::Database(e) => e.into(),
            store::StoreError::Json(e) => e.into(),
            store::StoreError::Duplicate(id) => {
                HairCountError::InvalidInput(format!("Duplicate record: {}", id))
            }
            store::StoreError::UnknownPatient(id) => HairCountError::NotFound(id),
        }
    }
}

impl From<ClinicError> for HairCountError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Store(e) => e.into(),
            ClinicError::Validation(e) => e.into(),
            ClinicError::PatientNotFound(id) => HairCountError::NotFound(id),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for HairCountError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HairCountError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, HairCountError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| HairCountError::InvalidInput(format!("Invalid date: {}", value)))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<HairCountCore>, HairCountError> {
    let db = Database::open(&path)?;
    Ok(HairCountCore::wrap(Box::new(db)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<HairCountCore>, HairCountError> {
    let db = Database::open_in_memory()?;
    Ok(HairCountCore::wrap(Box::new(db)))
}

/// Create an empty key-value store.
#[uniffi::export]
pub fn open_key_value_store() -> Arc<HairCountCore> {
    HairCountCore::wrap(Box::new(KeyValueStore::new()))
}

/// Restore a key-value store from a saved snapshot.
#[uniffi::export]
pub fn open_key_value_snapshot(snapshot: String) -> Result<Arc<HairCountCore>, HairCountError> {
    let store = KeyValueStore::from_snapshot(&snapshot)?;
    Ok(HairCountCore::wrap(Box::new(store)))
}

/// Open the database named by the environment, seeding demo data if requested.
#[uniffi::export]
pub fn open_from_env() -> Result<Arc<HairCountCore>, HairCountError> {
    let config = AppConfig::from_env();
    config::init_logging(&config.log_filter);

    let db = Database::open(&config.database_path)?;
    let core = HairCountCore::wrap(Box::new(db));
    if config.seed_sample_data {
        core.seed_sample_data()?;
    }
    Ok(core)
}

/// Install the log subscriber. Returns false if one was already installed.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    config::init_logging(filter.as_deref().unwrap_or(config::DEFAULT_LOG_FILTER))
}

/// Treatment types offered on the entry form.
#[uniffi::export]
pub fn known_treatment_types() -> Vec<String> {
    models::KNOWN_TREATMENT_TYPES
        .iter()
        .map(|t| t.to_string())
        .collect()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic wrapper for FFI.
#[derive(uniffi::Object)]
pub struct HairCountCore {
    clinic: Mutex<Clinic<Box<dyn RecordStore>>>,
}

impl HairCountCore {
    fn wrap(store: Box<dyn RecordStore>) -> Arc<Self> {
        Arc::new(Self {
            clinic: Mutex::new(Clinic::new(store)),
        })
    }
}

#[uniffi::export]
impl HairCountCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a new patient.
    pub fn register_patient(&self, input: FfiPatientInput) -> Result<FfiPatient, HairCountError> {
        let mut clinic = self.clinic.lock()?;
        let patient = clinic.register_patient(input.into())?;
        Ok(patient.into())
    }

    /// Update a patient. Returns false if the ID is unknown.
    pub fn update_patient(
        &self,
        patient_id: String,
        input: FfiPatientInput,
    ) -> Result<bool, HairCountError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.update_patient(&patient_id, input.into())?)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: String) -> Result<Option<FfiPatient>, HairCountError> {
        let clinic = self.clinic.lock()?;
        let patient = clinic.patient(&patient_id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// All patients, ordered by name.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, HairCountError> {
        let clinic = self.clinic.lock()?;
        let patients = clinic.patients()?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Search patients by name, email or phone.
    pub fn search_patients(&self, term: String) -> Result<Vec<FfiPatient>, HairCountError> {
        let clinic = self.clinic.lock()?;
        let patients = clinic.search_patients(&term)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Treatment Operations
    // =========================================================================

    /// Record a treatment session.
    pub fn record_treatment(
        &self,
        treatment: FfiNewTreatment,
    ) -> Result<FfiTreatment, HairCountError> {
        let treatment = NewTreatment::try_from(treatment)?;
        let mut clinic = self.clinic.lock()?;
        let record = clinic.record_treatment(treatment)?;
        Ok(record.into())
    }

    /// Delete a treatment session. Returns false if it did not exist.
    pub fn delete_treatment(&self, treatment_id: String) -> Result<bool, HairCountError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.delete_treatment(&treatment_id)?)
    }

    /// A patient's sessions, newest first.
    pub fn treatment_history(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiTreatment>, HairCountError> {
        let clinic = self.clinic.lock()?;
        let history = clinic.treatment_history(&patient_id)?;
        Ok(history.into_iter().map(|t| t.into()).collect())
    }

    // =========================================================================
    // Summary Operations
    // =========================================================================

    /// Discount summary for a patient.
    pub fn treatment_summary(
        &self,
        patient_id: String,
    ) -> Result<FfiTreatmentSummary, HairCountError> {
        let clinic = self.clinic.lock()?;
        let summary = clinic.treatment_summary(&patient_id)?;
        Ok(summary.into())
    }

    /// Patient, history and summary for the patient page.
    pub fn patient_detail(
        &self,
        patient_id: String,
    ) -> Result<Option<FfiPatientDetail>, HairCountError> {
        let clinic = self.clinic.lock()?;
        let detail = clinic.patient_detail(&patient_id)?;
        Ok(detail.map(|d| d.into()))
    }

    /// Clinic-wide dashboard figures.
    pub fn overview(&self, recent_limit: Option<u32>) -> Result<FfiOverview, HairCountError> {
        let clinic = self.clinic.lock()?;
        let limit = recent_limit
            .map(|l| l as usize)
            .unwrap_or(crate::clinic::DEFAULT_RECENT_LIMIT);
        Ok(clinic.overview(limit)?.into())
    }

    /// Insert the demo clients into an empty store. Returns how many were added.
    pub fn seed_sample_data(&self) -> Result<u32, HairCountError> {
        let mut clinic = self.clinic.lock()?;
        let seeded = clinic.seed_sample_data()?;
        Ok(seeded.len() as u32)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export the discount report as JSON.
    pub fn export_discount_report_json(&self) -> Result<String, HairCountError> {
        let clinic = self.clinic.lock()?;
        let exporter = export::DiscountReportExporter::new(clinic.store());
        let report = exporter.export_all()?;
        Ok(report.to_json()?)
    }

    /// Export the discount report as CSV.
    pub fn export_discount_report_csv(&self) -> Result<String, HairCountError> {
        let clinic = self.clinic.lock()?;
        let exporter = export::DiscountReportExporter::new(clinic.store());
        let report = exporter.export_all()?;
        Ok(report.to_csv())
    }

    /// Serialized key-value store, for `open_key_value_snapshot`.
    ///
    /// Returns None for database-backed cores, which persist on their own.
    pub fn to_snapshot(&self) -> Result<Option<String>, HairCountError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.store().snapshot()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            phone: patient.phone,
            email: patient.email,
            notes: patient.notes,
            created_at: patient.created_at,
        }
    }
}

/// FFI-safe patient create/update payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiPatientInput> for PatientInput {
    fn from(input: FfiPatientInput) -> Self {
        PatientInput {
            name: input.name,
            phone: input.phone,
            email: input.email,
            notes: input.notes,
        }
    }
}

/// FFI-safe treatment session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatment {
    pub id: String,
    pub patient_id: String,
    pub treatment_type: String,
    /// YYYY-MM-DD
    pub treatment_date: String,
}

impl From<TreatmentRecord> for FfiTreatment {
    fn from(record: TreatmentRecord) -> Self {
        Self {
            id: record.id,
            patient_id: record.patient_id,
            treatment_type: record.treatment_type.label().to_string(),
            treatment_date: format_date(record.treatment_date),
        }
    }
}

/// FFI-safe new treatment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewTreatment {
    pub patient_id: String,
    pub treatment_type: String,
    /// YYYY-MM-DD; today when absent or blank
    pub treatment_date: Option<String>,
}

impl TryFrom<FfiNewTreatment> for NewTreatment {
    type Error = HairCountError;

    fn try_from(treatment: FfiNewTreatment) -> Result<Self, Self::Error> {
        let treatment_date = match treatment.treatment_date.as_deref() {
            Some(d) if !d.trim().is_empty() => Some(parse_date(d)?),
            _ => None,
        };

        Ok(NewTreatment {
            patient_id: treatment.patient_id,
            treatment_type: TreatmentType::parse(&treatment.treatment_type),
            treatment_date,
        })
    }
}

/// FFI-safe discount progress for one billing category.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCategoryProgress {
    /// full_body, facial or beard
    pub key: String,
    pub label: String,
    pub count: u32,
    pub combined_count: Option<u32>,
    pub discount_applied: bool,
    pub status: String,
    pub threshold: u32,
    pub remaining_sessions: u32,
}

impl From<CategoryProgress> for FfiCategoryProgress {
    fn from(progress: CategoryProgress) -> Self {
        Self {
            key: progress.category.key().to_string(),
            label: progress.label,
            count: progress.count,
            combined_count: progress.combined_count,
            discount_applied: progress.status.is_applied(),
            status: progress.status.label().to_string(),
            threshold: progress.threshold,
            remaining_sessions: progress.remaining_sessions,
        }
    }
}

/// FFI-safe treatment summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatmentSummary {
    pub full_body: FfiCategoryProgress,
    pub facial: FfiCategoryProgress,
    pub beard: FfiCategoryProgress,
}

impl From<TreatmentSummary> for FfiTreatmentSummary {
    fn from(summary: TreatmentSummary) -> Self {
        let progress = |category| {
            FfiCategoryProgress::from(CategoryProgress::new(category, summary.get(category)))
        };
        Self {
            full_body: progress(BillingCategory::FullBody),
            facial: progress(BillingCategory::FemaleFacial),
            beard: progress(BillingCategory::MaleBeard),
        }
    }
}

/// FFI-safe patient page.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientDetail {
    pub patient: FfiPatient,
    /// Newest first
    pub history: Vec<FfiTreatment>,
    pub summary: FfiTreatmentSummary,
}

impl From<PatientDetail> for FfiPatientDetail {
    fn from(detail: PatientDetail) -> Self {
        Self {
            patient: detail.patient.into(),
            history: detail.history.into_iter().map(|t| t.into()).collect(),
            summary: detail.summary.into(),
        }
    }
}

/// FFI-safe per-type session total.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTypeCount {
    pub treatment_type: String,
    pub count: u32,
}

impl From<clinic::TypeCount> for FfiTypeCount {
    fn from(count: clinic::TypeCount) -> Self {
        Self {
            treatment_type: count.treatment_type.label().to_string(),
            count: count.count,
        }
    }
}

/// FFI-safe recent session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecentTreatment {
    pub treatment: FfiTreatment,
    pub patient_name: String,
}

impl From<clinic::RecentTreatment> for FfiRecentTreatment {
    fn from(recent: clinic::RecentTreatment) -> Self {
        Self {
            treatment: recent.treatment.into(),
            patient_name: recent.patient_name,
        }
    }
}

/// FFI-safe dashboard figures.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOverview {
    pub patient_count: u32,
    pub treatment_count: u32,
    pub treatments_by_type: Vec<FfiTypeCount>,
    pub recent_treatments: Vec<FfiRecentTreatment>,
}

impl From<ClinicOverview> for FfiOverview {
    fn from(overview: ClinicOverview) -> Self {
        Self {
            patient_count: overview.patient_count as u32,
            treatment_count: overview.treatment_count as u32,
            treatments_by_type: overview
                .treatments_by_type
                .into_iter()
                .map(|c| c.into())
                .collect(),
            recent_treatments: overview
                .recent_treatments
                .into_iter()
                .map(|r| r.into())
                .collect(),
        }
    }
}
