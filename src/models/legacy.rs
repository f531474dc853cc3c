use super::enums::Sex;
use super::partial::{PartialPatientRecord, PartialPersonalInfo};
use super::record::{PatientRecord, PhenotypeEntry};

/// The older one-value-per-field shape, as carried by legacy links.
///
/// Not kept as live state: it is derived from the record on demand and
/// folded back through [`LegacyFlatView::into_partial`], so the two shapes
/// cannot drift apart. Empty strings and lists mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyFlatView {
    pub given_name: String,
    pub family_name: String,
    pub birthdate: String,
    pub sex: Sex,
    pub insurance: String,
    pub insurance_id: String,
    pub physician_name: String,
    pub diagnosis: String,
    pub comments: String,
    pub category: String,
    pub panels: Vec<String>,
    pub hpo: Vec<String>,
    pub hpo_absent: Vec<String>,
}

fn non_empty_text(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

impl LegacyFlatView {
    /// Project the canonical record onto the flat shape.
    ///
    /// Phenotype terms and entries without a status have no flat form and
    /// are dropped, as is the consent block.
    pub fn from_record(record: &PatientRecord) -> Self {
        let info = &record.personal_info;
        let ids_with = |status: bool| -> Vec<String> {
            record
                .phenotype_data
                .iter()
                .filter(|entry| entry.present == Some(status))
                .map(|entry| entry.id.clone())
                .collect()
        };

        Self {
            given_name: info.first_name.clone(),
            family_name: info.last_name.clone(),
            birthdate: info.birthdate.clone(),
            sex: info.sex,
            insurance: info.insurance.clone(),
            insurance_id: info.insurance_id.clone(),
            physician_name: info.referrer.clone(),
            diagnosis: info.diagnosis.clone(),
            comments: info.comments.clone(),
            category: record.category.clone(),
            panels: record.selected_panels.clone(),
            hpo: ids_with(true),
            hpo_absent: ids_with(false),
        }
    }

    /// Fold the flat shape back into a partial record for merging.
    pub fn into_partial(self) -> PartialPatientRecord {
        let personal_info = PartialPersonalInfo {
            first_name: non_empty_text(self.given_name),
            last_name: non_empty_text(self.family_name),
            birthdate: non_empty_text(self.birthdate),
            sex: Some(self.sex).filter(|s| !s.is_unspecified()),
            insurance: non_empty_text(self.insurance),
            insurance_id: non_empty_text(self.insurance_id),
            referrer: non_empty_text(self.physician_name),
            diagnosis: non_empty_text(self.diagnosis),
            comments: non_empty_text(self.comments),
            category: None,
        };

        let phenotypes: Vec<PhenotypeEntry> = self
            .hpo
            .into_iter()
            .map(PhenotypeEntry::present)
            .chain(self.hpo_absent.into_iter().map(PhenotypeEntry::absent))
            .collect();

        PartialPatientRecord {
            personal_info: (personal_info != PartialPersonalInfo::default()).then_some(personal_info),
            selected_panels: non_empty(self.panels),
            phenotype_data: non_empty(phenotypes),
            category: non_empty_text(self.category),
            consent: None,
        }
    }
}
