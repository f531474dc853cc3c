use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::Sex;

/// The canonical requisition record for one patient.
///
/// Every key is always present; absence of data is expressed by empty
/// strings and empty sequences, never by missing structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub personal_info: PersonalInfo,
    /// Opaque panel identifiers, in selection order.
    pub selected_panels: Vec<String>,
    pub phenotype_data: Vec<PhenotypeEntry>,
    pub category: String,
    pub consent: Consent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    /// ISO date (`YYYY-MM-DD`), not validated here.
    pub birthdate: String,
    pub sex: Sex,
    pub insurance: String,
    pub insurance_id: String,
    pub referrer: String,
    pub diagnosis: String,
    pub comments: String,
}

/// One HPO term and whether it was observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub term: String,
    /// `Some(true)` observed, `Some(false)` explicitly excluded, `None` unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,
}

impl PhenotypeEntry {
    pub fn present(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: String::new(),
            present: Some(true),
        }
    }

    pub fn absent(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: String::new(),
            present: Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    pub data_processing: bool,
    pub incidental_findings: bool,
    /// Signature block, only rendered on the printed form.
    pub extended: ExtendedConsent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedConsent {
    pub signer_name: String,
    pub date: String,
    pub statement: String,
    /// Yes/no sub-questions keyed by question id.
    pub questions: BTreeMap<String, bool>,
}

/// Fresh record with every field empty.
pub fn create_default() -> PatientRecord {
    PatientRecord::default()
}

/// Deep copy of the record as plain JSON, ready for file save.
pub fn export_plain(record: &PatientRecord) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(record)
}
