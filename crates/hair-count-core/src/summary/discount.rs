//! Discount thresholds and progress toward them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CategoryStat;
use crate::models::BillingCategory;

/// Billing status of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    /// Half-price applied
    HalfPrice,
    /// Standard price
    Standard,
}

impl DiscountStatus {
    pub fn from_applied(applied: bool) -> Self {
        if applied {
            DiscountStatus::HalfPrice
        } else {
            DiscountStatus::Standard
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiscountStatus::HalfPrice => "half-price applied",
            DiscountStatus::Standard => "standard price",
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, DiscountStatus::HalfPrice)
    }
}

impl fmt::Display for DiscountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `count_used` sessions reach the category's threshold (inclusive).
pub fn is_eligible(category: BillingCategory, count_used: u32) -> bool {
    count_used >= category.discount_threshold()
}

/// Sessions left before the discount starts; zero once it applies.
pub fn remaining_sessions(category: BillingCategory, count_used: u32) -> u32 {
    category.discount_threshold().saturating_sub(count_used)
}

/// Presentation view of one summary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category: BillingCategory,
    pub label: String,
    pub count: u32,
    pub combined_count: Option<u32>,
    pub status: DiscountStatus,
    pub threshold: u32,
    pub remaining_sessions: u32,
}

impl CategoryProgress {
    /// Build from a computed stat. The discount flag is taken as-is.
    pub fn new(category: BillingCategory, stat: &CategoryStat) -> Self {
        Self {
            category,
            label: category.label().to_string(),
            count: stat.count,
            combined_count: stat.combined_count,
            status: stat.discount_status(),
            threshold: category.discount_threshold(),
            remaining_sessions: remaining_sessions(category, stat.count_used()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_sessions() {
        assert_eq!(remaining_sessions(BillingCategory::FullBody, 0), 6);
        assert_eq!(remaining_sessions(BillingCategory::FullBody, 5), 1);
        assert_eq!(remaining_sessions(BillingCategory::FullBody, 6), 0);
        assert_eq!(remaining_sessions(BillingCategory::FullBody, 40), 0);
        assert_eq!(remaining_sessions(BillingCategory::MaleBeard, 3), 8);
    }

    #[test]
    fn test_is_eligible_boundaries() {
        assert!(!is_eligible(BillingCategory::FullBody, 5));
        assert!(is_eligible(BillingCategory::FullBody, 6));
        assert!(!is_eligible(BillingCategory::FemaleFacial, 10));
        assert!(is_eligible(BillingCategory::FemaleFacial, 11));
    }

    #[test]
    fn test_progress_uses_combined_count() {
        let stat = CategoryStat {
            count: 4,
            combined_count: Some(9),
            discount_applied: false,
        };
        let progress = CategoryProgress::new(BillingCategory::FemaleFacial, &stat);
        assert_eq!(progress.remaining_sessions, 2);
        assert_eq!(progress.status, DiscountStatus::Standard);
        assert_eq!(progress.label, "female facial");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(DiscountStatus::from_applied(true).label(), "half-price applied");
        assert_eq!(DiscountStatus::from_applied(false).to_string(), "standard price");
    }
}
