//! Export of discount status for billing.

mod discount_report;

pub use discount_report::*;
