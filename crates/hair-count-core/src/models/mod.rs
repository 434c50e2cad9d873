//! Domain models for the hair-count system.

mod patient;
mod treatment;

pub use patient::*;
pub use treatment::*;
