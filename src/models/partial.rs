use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use super::enums::Sex;
use super::record::{Consent, ExtendedConsent, PatientRecord, PersonalInfo, PhenotypeEntry};

/// Incoming patient data where every field may be missing.
///
/// Unknown top-level keys are rejected when deserializing, so stray input
/// can never reach the record through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialPatientRecord {
    pub personal_info: Option<PartialPersonalInfo>,
    pub selected_panels: Option<Vec<String>>,
    pub phenotype_data: Option<Vec<PhenotypeEntry>>,
    pub category: Option<String>,
    pub consent: Option<PartialConsent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<String>,
    #[serde(default, deserialize_with = "recognized_sex")]
    pub sex: Option<Sex>,
    pub insurance: Option<String>,
    pub insurance_id: Option<String>,
    pub referrer: Option<String>,
    pub diagnosis: Option<String>,
    pub comments: Option<String>,
    /// Older producers nested the category here; lifted to the top level on import.
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConsent {
    pub data_processing: Option<bool>,
    pub incidental_findings: Option<bool>,
    pub extended: Option<PartialExtendedConsent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialExtendedConsent {
    pub signer_name: Option<String>,
    pub date: Option<String>,
    pub statement: Option<String>,
    pub questions: Option<BTreeMap<String, bool>>,
}

/// A JSON document as found in files, pastes and `data` links: either the
/// record shape itself or the same shape wrapped under `patientData`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImportDocument {
    patient_data: Option<PartialPatientRecord>,
    personal_info: Option<PartialPersonalInfo>,
    selected_panels: Option<Vec<String>>,
    phenotype_data: Option<Vec<PhenotypeEntry>>,
    category: Option<String>,
    consent: Option<PartialConsent>,
}

impl ImportDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Collapse the wrapped and unwrapped shapes into one partial record.
    ///
    /// Top-level fields win over wrapped ones. Category resolution order:
    /// top-level `category`, top-level `personalInfo.category`,
    /// `patientData.category`, `patientData.personalInfo.category`.
    pub fn resolve(self) -> PartialPatientRecord {
        let mut top = PartialPatientRecord {
            personal_info: self.personal_info,
            selected_panels: self.selected_panels,
            phenotype_data: self.phenotype_data,
            category: self.category,
            consent: self.consent,
        };
        top.lift_nested_category();

        match self.patient_data {
            Some(mut wrapped) => {
                wrapped.lift_nested_category();
                wrapped.overlay(top);
                wrapped
            }
            None => top,
        }
    }
}

/// An out-of-vocabulary value drops the field, not the whole document.
fn recognized_sex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Sex>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw.parse() {
        Ok(sex) => Some(sex),
        Err(_) => {
            tracing::debug!("Unrecognized sex value dropped");
            None
        }
    }))
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn take_text(target: &mut String, incoming: &Option<String>) {
    if let Some(value) = incoming.as_deref().filter(|v| !v.is_empty()) {
        *target = value.to_string();
    }
}

fn take_list<T: Clone>(target: &mut Vec<T>, incoming: &Option<Vec<T>>) {
    if let Some(values) = incoming.as_ref().filter(|v| !v.is_empty()) {
        *target = values.clone();
    }
}

fn overlay_text(slot: &mut Option<String>, later: Option<String>) {
    if has_text(&later) {
        *slot = later;
    }
}

fn overlay_list<T>(slot: &mut Option<Vec<T>>, later: Option<Vec<T>>) {
    if let Some(values) = later.filter(|v| !v.is_empty()) {
        *slot = Some(values);
    }
}

fn overlay_nested<T: Default>(slot: &mut Option<T>, later: Option<T>, apply: impl FnOnce(&mut T, T)) {
    if let Some(later) = later {
        apply(slot.get_or_insert_with(T::default), later);
    }
}

impl PartialPatientRecord {
    /// Apply onto `record`: present, non-empty values overwrite; nothing is cleared.
    pub fn apply_to(&self, record: &mut PatientRecord) {
        if let Some(info) = &self.personal_info {
            info.apply_to(&mut record.personal_info);
        }
        take_list(&mut record.selected_panels, &self.selected_panels);
        take_list(&mut record.phenotype_data, &self.phenotype_data);
        take_text(&mut record.category, &self.category);
        if let Some(consent) = &self.consent {
            consent.apply_to(&mut record.consent);
        }
    }

    /// Combine with a partial applied later, using the same rules as [`merge`].
    pub fn overlay(&mut self, later: PartialPatientRecord) {
        overlay_nested(&mut self.personal_info, later.personal_info, PartialPersonalInfo::overlay);
        overlay_list(&mut self.selected_panels, later.selected_panels);
        overlay_list(&mut self.phenotype_data, later.phenotype_data);
        overlay_text(&mut self.category, later.category);
        overlay_nested(&mut self.consent, later.consent, PartialConsent::overlay);
    }

    /// True when applying this partial could not change any record.
    pub fn is_empty(&self) -> bool {
        let mut probe = PatientRecord::default();
        self.apply_to(&mut probe);
        probe == PatientRecord::default()
            && self
                .consent
                .as_ref()
                .map_or(true, |c| c.data_processing.is_none() && c.incidental_findings.is_none())
    }

    /// Carries at least one of the recognized top-level shapes.
    pub fn has_recognized_shape(&self) -> bool {
        self.personal_info.is_some() || self.selected_panels.is_some() || self.phenotype_data.is_some()
    }

    pub fn has_category(&self) -> bool {
        has_text(&self.category)
    }

    fn lift_nested_category(&mut self) {
        let nested = self.personal_info.as_mut().and_then(|info| info.category.take());
        if !self.has_category() && has_text(&nested) {
            self.category = nested;
        }
    }
}

impl PartialPersonalInfo {
    fn apply_to(&self, info: &mut PersonalInfo) {
        take_text(&mut info.first_name, &self.first_name);
        take_text(&mut info.last_name, &self.last_name);
        take_text(&mut info.birthdate, &self.birthdate);
        if let Some(sex) = self.sex.filter(|s| !s.is_unspecified()) {
            info.sex = sex;
        }
        take_text(&mut info.insurance, &self.insurance);
        take_text(&mut info.insurance_id, &self.insurance_id);
        take_text(&mut info.referrer, &self.referrer);
        take_text(&mut info.diagnosis, &self.diagnosis);
        take_text(&mut info.comments, &self.comments);
    }

    fn overlay(&mut self, later: PartialPersonalInfo) {
        overlay_text(&mut self.first_name, later.first_name);
        overlay_text(&mut self.last_name, later.last_name);
        overlay_text(&mut self.birthdate, later.birthdate);
        if let Some(sex) = later.sex.filter(|s| !s.is_unspecified()) {
            self.sex = Some(sex);
        }
        overlay_text(&mut self.insurance, later.insurance);
        overlay_text(&mut self.insurance_id, later.insurance_id);
        overlay_text(&mut self.referrer, later.referrer);
        overlay_text(&mut self.diagnosis, later.diagnosis);
        overlay_text(&mut self.comments, later.comments);
        overlay_text(&mut self.category, later.category);
    }
}

impl PartialConsent {
    fn apply_to(&self, consent: &mut Consent) {
        if let Some(value) = self.data_processing {
            consent.data_processing = value;
        }
        if let Some(value) = self.incidental_findings {
            consent.incidental_findings = value;
        }
        if let Some(extended) = &self.extended {
            extended.apply_to(&mut consent.extended);
        }
    }

    fn overlay(&mut self, later: PartialConsent) {
        if later.data_processing.is_some() {
            self.data_processing = later.data_processing;
        }
        if later.incidental_findings.is_some() {
            self.incidental_findings = later.incidental_findings;
        }
        overlay_nested(&mut self.extended, later.extended, PartialExtendedConsent::overlay);
    }
}

impl PartialExtendedConsent {
    fn apply_to(&self, extended: &mut ExtendedConsent) {
        take_text(&mut extended.signer_name, &self.signer_name);
        take_text(&mut extended.date, &self.date);
        take_text(&mut extended.statement, &self.statement);
        if let Some(questions) = &self.questions {
            extended
                .questions
                .extend(questions.iter().map(|(k, v)| (k.clone(), *v)));
        }
    }

    fn overlay(&mut self, later: PartialExtendedConsent) {
        overlay_text(&mut self.signer_name, later.signer_name);
        overlay_text(&mut self.date, later.date);
        overlay_text(&mut self.statement, later.statement);
        if let Some(questions) = later.questions {
            self.questions.get_or_insert_with(BTreeMap::new).extend(questions);
        }
    }
}

/// Field-by-field merge into a new record; `existing` is left untouched.
pub fn merge(existing: &PatientRecord, incoming: &PartialPatientRecord) -> PatientRecord {
    let mut merged = existing.clone();
    incoming.apply_to(&mut merged);
    merged
}
