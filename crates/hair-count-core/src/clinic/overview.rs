//! Clinic-wide dashboard figures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Clinic, ClinicResult};
use crate::models::{TreatmentRecord, TreatmentType};
use crate::store::RecordStore;
use crate::summary::count_by_type;

/// Default number of recent sessions on the dashboard.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Session total for one treatment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub treatment_type: TreatmentType,
    pub count: u32,
}

/// A recent session with its patient's name attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTreatment {
    pub treatment: TreatmentRecord,
    /// Empty when the patient record is gone
    pub patient_name: String,
}

/// Dashboard figures across all patients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicOverview {
    pub patient_count: usize,
    pub treatment_count: usize,
    /// Most frequent type first
    pub treatments_by_type: Vec<TypeCount>,
    /// Newest first
    pub recent_treatments: Vec<RecentTreatment>,
}

impl<S: RecordStore> Clinic<S> {
    /// Build the dashboard, listing at most `recent_limit` recent sessions.
    pub fn overview(&self, recent_limit: usize) -> ClinicResult<ClinicOverview> {
        let patients = self.store.list_patients()?;
        let mut treatments = self.store.list_all_treatments()?;

        let mut treatments_by_type: Vec<TypeCount> = count_by_type(&treatments)
            .into_iter()
            .map(|(treatment_type, count)| TypeCount {
                treatment_type,
                count,
            })
            .collect();
        // count_by_type is ordered by type, so ties stay in a stable order.
        treatments_by_type.sort_by(|a, b| b.count.cmp(&a.count));

        let names: HashMap<&str, &str> = patients
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();

        treatments.sort_by(|a, b| b.treatment_date.cmp(&a.treatment_date));
        let recent_treatments = treatments
            .iter()
            .take(recent_limit)
            .map(|t| RecentTreatment {
                treatment: t.clone(),
                patient_name: names
                    .get(t.patient_id.as_str())
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(ClinicOverview {
            patient_count: patients.len(),
            treatment_count: treatments.len(),
            treatments_by_type,
            recent_treatments,
        })
    }
}
