//! Discount report for the billing desk.

use serde::{Deserialize, Serialize};

use crate::models::{BillingCategory, Patient};
use crate::store::{RecordStore, StoreResult};
use crate::summary::{
    remaining_sessions, summarize, summarize_for_patient, DiscountStatus, TreatmentSummary,
};

/// One patient/category line of the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountReportRow {
    /// Patient ID
    pub patient_id: String,
    /// Patient name
    pub patient_name: String,
    /// Billing category label
    pub category: String,
    /// Sessions of this category
    pub count: u32,
    /// Count compared against the threshold (facial only)
    pub combined_count: Option<u32>,
    /// "half-price applied" or "standard price"
    pub status: String,
    /// Sessions left until half price
    pub remaining_sessions: u32,
}

impl DiscountReportRow {
    fn rows_for(patient: &Patient, summary: &TreatmentSummary) -> Vec<Self> {
        summary
            .iter()
            .map(|(category, stat)| DiscountReportRow {
                patient_id: patient.id.clone(),
                patient_name: patient.name.clone(),
                category: category.label().to_string(),
                count: stat.count,
                combined_count: stat.combined_count,
                status: stat.discount_status().label().to_string(),
                remaining_sessions: remaining_sessions(category, stat.count_used()),
            })
            .collect()
    }
}

/// Discount status of every patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountReport {
    /// Export timestamp
    pub exported_at: String,
    /// Three rows per patient, in patient order
    pub rows: Vec<DiscountReportRow>,
    /// Rows with half price applied
    pub discounted_count: usize,
}

impl DiscountReport {
    fn from_rows(rows: Vec<DiscountReportRow>) -> Self {
        let discounted_label = DiscountStatus::HalfPrice.label();
        let discounted_count = rows.iter().filter(|r| r.status == discounted_label).count();
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            rows,
            discounted_count,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(
            "patient_id,patient_name,category,count,combined_count,status,remaining_sessions\n",
        );

        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                escape_csv(&row.patient_id),
                escape_csv(&row.patient_name),
                escape_csv(&row.category),
                row.count,
                row.combined_count.map(|c| c.to_string()).unwrap_or_default(),
                escape_csv(&row.status),
                row.remaining_sessions,
            ));
        }

        csv
    }

    /// Rows of one category.
    pub fn rows_for_category(
        &self,
        category: BillingCategory,
    ) -> impl Iterator<Item = &DiscountReportRow> {
        self.rows
            .iter()
            .filter(move |row| row.category == category.label())
    }
}

/// Builds discount reports from a record store.
pub struct DiscountReportExporter<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> DiscountReportExporter<'a, S> {
    /// Create a new exporter.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Report for a single patient. Empty when the patient is unknown.
    pub fn export_patient(&self, patient_id: &str) -> StoreResult<DiscountReport> {
        let rows = match self.store.get_patient(patient_id)? {
            Some(patient) => {
                let history = self.store.list_treatments(&patient.id)?;
                DiscountReportRow::rows_for(&patient, &summarize(&history))
            }
            None => Vec::new(),
        };
        Ok(DiscountReport::from_rows(rows))
    }

    /// Report for all patients, ordered by name.
    pub fn export_all(&self) -> StoreResult<DiscountReport> {
        let patients = self.store.list_patients()?;
        let treatments = self.store.list_all_treatments()?;

        let mut rows = Vec::with_capacity(patients.len() * BillingCategory::ALL.len());
        for patient in &patients {
            let summary = summarize_for_patient(&patient.id, &treatments);
            rows.extend(DiscountReportRow::rows_for(patient, &summary));
        }

        tracing::debug!(patients = patients.len(), rows = rows.len(), "Built discount report");
        Ok(DiscountReport::from_rows(rows))
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
