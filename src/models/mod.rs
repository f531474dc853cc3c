//! Canonical patient data model.
//!
//! `PatientRecord` is the single source of truth for a requisition;
//! `PartialPatientRecord` is what every import source produces and what
//! `merge` folds into the record.

mod enums;
mod legacy;
mod partial;
mod record;

pub use enums::*;
pub use legacy::*;
pub use partial::*;
pub use record::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
}
