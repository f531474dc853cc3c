//! Legacy link format: one URL parameter per field.
//!
//! ```text
//! #givenName=John&familyName=Doe&birthdate=1990-02-01&sex=female
//!  &physicianName=Dr.+Smith&category=nephrology&panels=id1,id2
//!  &hpo=HP:0000077,HP:0000123&hpo_absent=HP:0000555
//! ```

use url::form_urlencoded;

use super::params::ParamMap;
use super::CodecWarning;
use crate::models::{LegacyFlatView, PartialPatientRecord, PatientRecord, Sex};

// Accepted names per field. The first name is the one written by `encode`.
const FIRST_NAME: &[&str] = &["givenName", "firstName"];
const LAST_NAME: &[&str] = &["familyName", "lastName"];
const BIRTHDATE: &[&str] = &["birthdate"];
const SEX: &[&str] = &["sex"];
const INSURANCE: &[&str] = &["insurance"];
const INSURANCE_ID: &[&str] = &["insuranceId"];
const REFERRER: &[&str] = &["physicianName", "referrer"];
const DIAGNOSIS: &[&str] = &["diagnosis"];
const COMMENTS: &[&str] = &["comments"];
const CATEGORY: &[&str] = &["category"];
const PANELS: &[&str] = &["panels", "selectedTests"];
const HPO: &[&str] = &["hpo"];
const HPO_ABSENT: &[&str] = &["hpo_absent"];

/// Fragment and query of one URL; the fragment wins per logical field.
struct Sources<'a> {
    fragment: &'a ParamMap,
    query: &'a ParamMap,
}

impl Sources<'_> {
    fn pick(&self, names: &[&str]) -> Option<&str> {
        self.fragment
            .get_any(names)
            .or_else(|| self.query.get_any(names))
    }

    fn text(&self, names: &[&str]) -> String {
        self.pick(names).unwrap_or_default().to_string()
    }

    fn list(&self, names: &[&str]) -> Vec<String> {
        self.pick(names).map(split_list).unwrap_or_default()
    }

    /// HPO ids; a leading `+`/`-` is dropped, the parameter alone decides status.
    fn hpo_ids(&self, names: &[&str]) -> Vec<String> {
        self.list(names)
            .into_iter()
            .map(|id| id.trim_start_matches(['+', '-']).trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read every legacy parameter present in either section.
pub(crate) fn decode(
    fragment: &ParamMap,
    query: &ParamMap,
    warnings: &mut Vec<CodecWarning>,
) -> PartialPatientRecord {
    let sources = Sources { fragment, query };

    let sex = match sources.pick(SEX) {
        Some(raw) => raw.parse::<Sex>().unwrap_or_else(|_| {
            warnings.push(CodecWarning::InvalidValue {
                param: SEX[0].to_string(),
            });
            Sex::Unspecified
        }),
        None => Sex::Unspecified,
    };

    LegacyFlatView {
        given_name: sources.text(FIRST_NAME),
        family_name: sources.text(LAST_NAME),
        birthdate: sources.text(BIRTHDATE),
        sex,
        insurance: sources.text(INSURANCE),
        insurance_id: sources.text(INSURANCE_ID),
        physician_name: sources.text(REFERRER),
        diagnosis: sources.text(DIAGNOSIS),
        comments: sources.text(COMMENTS),
        category: sources.text(CATEGORY),
        panels: sources.list(PANELS),
        hpo: sources.hpo_ids(HPO),
        hpo_absent: sources.hpo_ids(HPO_ABSENT),
    }
    .into_partial()
}

/// Legacy parameter string for `record`, without the leading `#`.
pub(crate) fn encode(record: &PatientRecord) -> String {
    let view = LegacyFlatView::from_record(record);
    let mut out = form_urlencoded::Serializer::new(String::new());

    let text_fields = [
        (FIRST_NAME[0], view.given_name.as_str()),
        (LAST_NAME[0], view.family_name.as_str()),
        (BIRTHDATE[0], view.birthdate.as_str()),
        (SEX[0], view.sex.as_str()),
        (INSURANCE[0], view.insurance.as_str()),
        (INSURANCE_ID[0], view.insurance_id.as_str()),
        (REFERRER[0], view.physician_name.as_str()),
        (CATEGORY[0], view.category.as_str()),
        (DIAGNOSIS[0], view.diagnosis.as_str()),
        (COMMENTS[0], view.comments.as_str()),
    ];
    for (name, value) in text_fields {
        if !value.is_empty() {
            out.append_pair(name, value);
        }
    }

    let list_fields = [
        (PANELS[0], &view.panels),
        (HPO[0], &view.hpo),
        (HPO_ABSENT[0], &view.hpo_absent),
    ];
    for (name, values) in list_fields {
        if !values.is_empty() {
            out.append_pair(name, &values.join(","));
        }
    }

    out.finish()
}
