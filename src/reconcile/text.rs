//! Line-oriented paste format: one `Key: Value` pair per line.
//!
//! ```text
//! First Name: John
//! Last Name: Doe
//! Date of Birth: 01.02.1990
//! Panels: nephronophthise, cakut
//! HPO: HP:0000077 (Abnormality of the kidney), HP:0000123
//! ```

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{LegacyFlatView, PartialPatientRecord, Sex};

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^:]+?)\s*:\s*(.*?)\s*$").unwrap());

static HPO_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"HP:\d{7}").unwrap());

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Turns free text into patient data. `None` means the text is not in this
/// parser's format at all.
pub trait LineParser: Send + Sync {
    fn parse(&self, text: &str) -> Option<PartialPatientRecord>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FirstName,
    LastName,
    Birthdate,
    Sex,
    Insurance,
    InsuranceId,
    Referrer,
    Diagnosis,
    Comments,
    Category,
    Panels,
    PresentHpo,
    AbsentHpo,
}

impl Field {
    /// Keys compare case-insensitively with spaces and punctuation removed.
    fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        let field = match normalized.as_str() {
            "firstname" | "givenname" | "vorname" => Self::FirstName,
            "lastname" | "familyname" | "surname" | "nachname" => Self::LastName,
            "birthdate" | "dateofbirth" | "dob" | "geburtsdatum" => Self::Birthdate,
            "sex" | "gender" | "geschlecht" => Self::Sex,
            "insurance" | "versicherung" => Self::Insurance,
            "insuranceid" | "insurancenumber" | "versichertennummer" => Self::InsuranceId,
            "referrer" | "physician" | "physicianname" | "referringphysician" => Self::Referrer,
            "diagnosis" | "diagnose" => Self::Diagnosis,
            "comments" | "comment" | "notes" => Self::Comments,
            "category" => Self::Category,
            "panels" | "panel" | "tests" | "selectedpanels" => Self::Panels,
            "hpo" | "phenotypes" | "hpoterms" => Self::PresentHpo,
            "absenthpo" | "hpoabsent" | "excludedphenotypes" => Self::AbsentHpo,
            _ => return None,
        };
        Some(field)
    }
}

/// ISO form of a date in one of the accepted layouts; other text verbatim.
pub fn normalize_date(raw: &str) -> String {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_sex(raw: &str) -> Option<Sex> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "m" => Some(Sex::Male),
        "f" | "w" => Some(Sex::Female),
        other => other.parse().ok(),
    }
}

fn hpo_ids(raw: &str) -> impl Iterator<Item = String> + '_ {
    HPO_ID.find_iter(raw).map(|m| m.as_str().to_string())
}

fn set(slot: &mut String, value: String) -> bool {
    *slot = value;
    true
}

/// True when at least one item was added.
fn extend(list: &mut Vec<String>, items: impl Iterator<Item = String>) -> bool {
    let before = list.len();
    list.extend(items);
    list.len() > before
}

/// Default vocabulary (English and German field names).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueLineParser;

impl LineParser for KeyValueLineParser {
    fn parse(&self, text: &str) -> Option<PartialPatientRecord> {
        let mut view = LegacyFlatView::default();
        let mut matched = 0usize;

        for line in text.lines() {
            let Some(caps) = KEY_VALUE.captures(line) else {
                continue;
            };
            let Some(field) = Field::from_key(&caps[1]) else {
                continue;
            };
            let value = caps[2].to_string();
            if value.is_empty() {
                continue;
            }

            let applied = match field {
                Field::FirstName => set(&mut view.given_name, value),
                Field::LastName => set(&mut view.family_name, value),
                Field::Birthdate => set(&mut view.birthdate, normalize_date(&value)),
                Field::Sex => match parse_sex(&value) {
                    Some(sex) if !sex.is_unspecified() => {
                        view.sex = sex;
                        true
                    }
                    _ => false,
                },
                Field::Insurance => set(&mut view.insurance, value),
                Field::InsuranceId => set(&mut view.insurance_id, value),
                Field::Referrer => set(&mut view.physician_name, value),
                Field::Diagnosis => set(&mut view.diagnosis, value),
                Field::Comments => set(&mut view.comments, value),
                Field::Category => set(&mut view.category, value),
                Field::Panels => extend(
                    &mut view.panels,
                    value
                        .split([',', ';'])
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string),
                ),
                Field::PresentHpo => extend(&mut view.hpo, hpo_ids(&value)),
                Field::AbsentHpo => extend(&mut view.hpo_absent, hpo_ids(&value)),
            };
            if applied {
                matched += 1;
            }
        }

        tracing::debug!(fields = matched, "Line-oriented paste parsed");
        (matched > 0).then(|| view.into_partial())
    }
}
