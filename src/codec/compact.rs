//! Compact link format: the whole record as one JSON document.

use serde_json::{Map, Value};

use crate::models::{ImportDocument, PartialPatientRecord, PatientRecord, Sex};

/// Enum-valued fields, as JSON pointers into an unwrapped or wrapped document.
const ENUM_FIELDS: &[(&str, &str)] = &[
    ("/personalInfo/sex", "personalInfo.sex"),
    ("/patientData/personalInfo/sex", "patientData.personalInfo.sex"),
];

/// Recursively drop `""`, `[]` and objects left empty after stripping.
/// Returns `None` when nothing is left of `value`.
pub fn strip_empty(value: Value) -> Option<Value> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(strip_empty).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(fields) => {
            let fields: Map<String, Value> = fields
                .into_iter()
                .filter_map(|(key, field)| strip_empty(field).map(|field| (key, field)))
                .collect();
            (!fields.is_empty()).then_some(Value::Object(fields))
        }
        other => Some(other),
    }
}

/// Serialize a record for a link: unset phenotype entries removed, then
/// empty values stripped.
pub fn encode_document(record: &PatientRecord) -> Result<String, serde_json::Error> {
    let mut record = record.clone();
    record.phenotype_data.retain(|entry| entry.present.is_some());

    let value = serde_json::to_value(&record)?;
    let stripped = strip_empty(value).unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::to_string(&stripped)
}

/// Parse a compact document, wrapped or not.
pub fn decode_document(json: &str) -> Result<PartialPatientRecord, serde_json::Error> {
    decode_document_checked(json).map(|(partial, _)| partial)
}

/// [`decode_document`], also naming the fields whose values were not
/// recognized and left out of the partial.
pub fn decode_document_checked(
    json: &str,
) -> Result<(PartialPatientRecord, Vec<&'static str>), serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let rejected = ENUM_FIELDS
        .iter()
        .filter(|(pointer, _)| {
            value
                .pointer(pointer)
                .and_then(Value::as_str)
                .is_some_and(|raw| raw.parse::<Sex>().is_err())
        })
        .map(|(_, field)| *field)
        .collect();
    Ok((ImportDocument::from_value(value)?.resolve(), rejected))
}
