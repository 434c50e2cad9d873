//! Treatment aggregation and discount eligibility.
//!
//! A patient's summary is derived from their treatment history on every read.
//! Only the three [`BillingCategory`] values are tracked:
//!
//! ```text
//! full_body = #full-body sessions                       discount at >= 6
//! facial    = #facial sessions (+ full_body combined)   discount at >= 11 (combined)
//! beard     = #beard sessions                           discount at >= 11
//! ```
//!
//! A full-body session includes the face, so it counts toward the facial
//! threshold. The facial `count` itself only reports standalone facial sessions.

mod discount;

pub use discount::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{BillingCategory, TreatmentRecord, TreatmentType};

/// Session count and discount state for one billing category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    /// Sessions of this category
    pub count: u32,
    /// Count used for the threshold when other categories contribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_count: Option<u32>,
    /// Whether half-price billing applies
    pub discount_applied: bool,
}

impl CategoryStat {
    /// Count compared against the discount threshold.
    pub fn count_used(&self) -> u32 {
        self.combined_count.unwrap_or(self.count)
    }

    pub fn discount_status(&self) -> DiscountStatus {
        DiscountStatus::from_applied(self.discount_applied)
    }
}

/// Per-category session counts and discount flags for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentSummary {
    pub full_body: CategoryStat,
    pub facial: CategoryStat,
    pub beard: CategoryStat,
}

impl TreatmentSummary {
    /// Summary of a patient with no sessions.
    pub fn empty() -> Self {
        summarize(std::iter::empty::<&TreatmentRecord>())
    }

    pub fn get(&self, category: BillingCategory) -> &CategoryStat {
        match category {
            BillingCategory::FullBody => &self.full_body,
            BillingCategory::FemaleFacial => &self.facial,
            BillingCategory::MaleBeard => &self.beard,
        }
    }

    /// Entries in summary order.
    pub fn iter(&self) -> impl Iterator<Item = (BillingCategory, &CategoryStat)> + '_ {
        BillingCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Display progress for every category.
    pub fn progress(&self) -> Vec<CategoryProgress> {
        self.iter()
            .map(|(category, stat)| CategoryProgress::new(category, stat))
            .collect()
    }
}

/// Count sessions per treatment type.
pub fn count_by_type<'a, I>(records: I) -> BTreeMap<TreatmentType, u32>
where
    I: IntoIterator<Item = &'a TreatmentRecord>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.treatment_type.clone()).or_insert(0) += 1;
    }
    counts
}

/// Summarize one patient's treatment history.
///
/// Order and dates are irrelevant. Types outside the billing categories are
/// ignored, and an empty history gives the zero-filled summary.
pub fn summarize<'a, I>(records: I) -> TreatmentSummary
where
    I: IntoIterator<Item = &'a TreatmentRecord>,
{
    let raw = count_by_type(records);
    let count_of = |category: BillingCategory| {
        raw.get(&TreatmentType::Billing(category))
            .copied()
            .unwrap_or(0)
    };

    let full_body = count_of(BillingCategory::FullBody);
    let face = count_of(BillingCategory::FemaleFacial);
    let beard = count_of(BillingCategory::MaleBeard);
    let combined_face = face + full_body;

    TreatmentSummary {
        full_body: CategoryStat {
            count: full_body,
            combined_count: None,
            discount_applied: is_eligible(BillingCategory::FullBody, full_body),
        },
        facial: CategoryStat {
            count: face,
            combined_count: Some(combined_face),
            discount_applied: is_eligible(BillingCategory::FemaleFacial, combined_face),
        },
        beard: CategoryStat {
            count: beard,
            combined_count: None,
            discount_applied: is_eligible(BillingCategory::MaleBeard, beard),
        },
    }
}

/// Summarize the records of `patient_id` out of a mixed corpus.
pub fn summarize_for_patient<'a, I>(patient_id: &str, records: I) -> TreatmentSummary
where
    I: IntoIterator<Item = &'a TreatmentRecord>,
{
    summarize(
        records
            .into_iter()
            .filter(|record| record.patient_id == patient_id),
    )
}
