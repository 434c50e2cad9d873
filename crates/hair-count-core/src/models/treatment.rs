//! Treatment models.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Treatment categories that carry a session-count discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BillingCategory {
    /// Full-body session (includes face, nape and VIO)
    FullBody,
    /// Standalone female facial session
    FemaleFacial,
    /// Male beard session
    MaleBeard,
}

impl BillingCategory {
    /// All billing categories, in summary order.
    pub const ALL: [BillingCategory; 3] = [
        BillingCategory::FullBody,
        BillingCategory::FemaleFacial,
        BillingCategory::MaleBeard,
    ];

    /// Canonical label stored with each treatment record.
    pub fn label(&self) -> &'static str {
        match self {
            BillingCategory::FullBody => "full-body (face, nape, VIO included)",
            BillingCategory::FemaleFacial => "female facial",
            BillingCategory::MaleBeard => "male beard",
        }
    }

    /// Key used for this category in a treatment summary.
    pub fn key(&self) -> &'static str {
        match self {
            BillingCategory::FullBody => "full_body",
            BillingCategory::FemaleFacial => "facial",
            BillingCategory::MaleBeard => "beard",
        }
    }

    /// Session count at which half-price billing starts.
    pub fn discount_threshold(&self) -> u32 {
        match self {
            BillingCategory::FullBody => 6,
            BillingCategory::FemaleFacial | BillingCategory::MaleBeard => 11,
        }
    }

    /// Parse a stored label. Legacy Japanese labels are accepted as well.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "full-body (face, nape, VIO included)" | "全身脱毛（顔、うなじ、VIO込み）" => {
                Some(BillingCategory::FullBody)
            }
            "female facial" | "女性顔脱毛" => Some(BillingCategory::FemaleFacial),
            "male beard" | "男性ひげ脱毛" => Some(BillingCategory::MaleBeard),
            _ => None,
        }
    }
}

impl fmt::Display for BillingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Treatment types offered by the entry form, billing categories first.
pub const KNOWN_TREATMENT_TYPES: [&str; 7] = [
    "full-body (face, nape, VIO included)",
    "female facial",
    "male beard",
    "VIO",
    "nape",
    "arm",
    "leg",
];

/// Type of a single treatment session.
///
/// Only [`TreatmentType::Billing`] values take part in discount calculation.
/// Everything else is kept as an informational tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TreatmentType {
    Billing(BillingCategory),
    Other(OtherLabel),
}

/// Label of a treatment type outside the billing categories.
///
/// Only [`TreatmentType::parse`] builds one, so it never holds a billing label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OtherLabel(String);

impl OtherLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TreatmentType {
    /// Parse a stored label. Never fails: unknown labels become `Other`.
    pub fn parse(label: &str) -> Self {
        match BillingCategory::from_label(label) {
            Some(category) => TreatmentType::Billing(category),
            None => TreatmentType::Other(OtherLabel(label.trim().to_string())),
        }
    }

    /// Label as stored and displayed.
    pub fn label(&self) -> &str {
        match self {
            TreatmentType::Billing(category) => category.label(),
            TreatmentType::Other(label) => label.as_str(),
        }
    }

    /// Billing category, if this type carries a discount.
    pub fn billing_category(&self) -> Option<BillingCategory> {
        match self {
            TreatmentType::Billing(category) => Some(*category),
            TreatmentType::Other(_) => None,
        }
    }

    /// Whether the label is empty.
    pub fn is_blank(&self) -> bool {
        self.label().trim().is_empty()
    }
}

impl From<BillingCategory> for TreatmentType {
    fn from(category: BillingCategory) -> Self {
        TreatmentType::Billing(category)
    }
}

impl From<String> for TreatmentType {
    fn from(label: String) -> Self {
        TreatmentType::parse(&label)
    }
}

impl From<&str> for TreatmentType {
    fn from(label: &str) -> Self {
        TreatmentType::parse(label)
    }
}

impl From<TreatmentType> for String {
    fn from(treatment_type: TreatmentType) -> Self {
        treatment_type.label().to_string()
    }
}

impl fmt::Display for TreatmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored treatment session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentRecord {
    /// Store-assigned ID, never reused
    pub id: String,
    /// Owning patient ID
    pub patient_id: String,
    /// Session type
    pub treatment_type: TreatmentType,
    /// Session date
    pub treatment_date: NaiveDate,
}

/// A treatment session that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTreatment {
    pub patient_id: String,
    pub treatment_type: TreatmentType,
    /// Defaults to the local date when missing
    pub treatment_date: Option<NaiveDate>,
}

impl NewTreatment {
    /// Create a treatment dated today.
    pub fn new(patient_id: impl Into<String>, treatment_type: impl Into<TreatmentType>) -> Self {
        Self {
            patient_id: patient_id.into(),
            treatment_type: treatment_type.into(),
            treatment_date: None,
        }
    }

    /// Set an explicit session date.
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.treatment_date = Some(date);
        self
    }

    /// Assign an ID, filling a missing date with `today`.
    pub fn into_record(self, today: NaiveDate) -> TreatmentRecord {
        TreatmentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: self.patient_id,
            treatment_type: self.treatment_type,
            treatment_date: self.treatment_date.unwrap_or(today),
        }
    }
}

/// Today's date in the caller's local time zone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
