//! Import entry points and the session's single patient record.
//!
//! `RecordStore` owns the record and is passed by `&mut` to whoever edits
//! it. Every mutation path (form edit, URL, encrypted URL, file, paste,
//! reset) ends in one `commit`, which publishes the new record to
//! subscribers in a single step. Failed imports never reach `commit`, so
//! the record is either fully updated or untouched.

mod collab;
mod text;

pub use collab::*;
pub use text::*;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::codec::{self, CodecError, CodecWarning, ShareFormat};
use crate::config::ShareConfig;
use crate::crypto::{self, CryptoError};
use crate::models::{
    create_default, export_plain, merge, ImportDocument, ImportSource, PartialPatientRecord,
    PatientRecord,
};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unrecognized format: neither JSON nor 'Key: Value' lines")]
    UnrecognizedFormat,

    #[error(transparent)]
    Decryption(#[from] CryptoError),

    #[error("No encrypted link is waiting for a password")]
    NoPendingToken,

    #[error(transparent)]
    Location(#[from] LocationError),
}

#[derive(Error, Debug)]
pub enum ShareError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Outcome of reading the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlImport {
    /// Plain data merged; skipped parameters listed.
    Imported { warnings: Vec<CodecWarning> },
    /// An encrypted link is pending; call `decrypt_url_data`.
    PasswordRequired,
    NothingToImport,
}

/// Which grammar a paste was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteFormat {
    Json,
    Lines,
}

/// Validate a JSON document from a file or paste.
fn parse_document(value: Value) -> Result<PartialPatientRecord, ImportError> {
    if !value.is_object() {
        return Err(ImportError::InvalidFormat("top level must be a JSON object".into()));
    }
    let partial = ImportDocument::from_value(value)
        .map_err(|e| ImportError::InvalidFormat(e.to_string()))?
        .resolve();
    if !partial.has_recognized_shape() {
        return Err(ImportError::InvalidFormat(
            "expected personalInfo, selectedPanels or phenotypeData".into(),
        ));
    }
    Ok(partial)
}

/// Rewrite the location without its query and fragment.
fn clear_location(location: &mut dyn Location) -> Result<(), ImportError> {
    let href = location.href();
    let clean = codec::strip_url(&href);
    if clean != href {
        location.replace(&clean)?;
        tracing::info!("Share parameters cleared from location");
    }
    Ok(())
}

pub struct RecordStore {
    record: watch::Sender<PatientRecord>,
    pending_token: Option<String>,
    config: ShareConfig,
    line_parser: Box<dyn LineParser>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(ShareConfig::default())
    }
}

impl RecordStore {
    pub fn new(config: ShareConfig) -> Self {
        let (record, _) = watch::channel(create_default());
        Self {
            record,
            pending_token: None,
            config,
            line_parser: Box::new(KeyValueLineParser),
        }
    }

    /// Swap the paste grammar used when pasted text is not JSON.
    pub fn with_line_parser(mut self, parser: impl LineParser + 'static) -> Self {
        self.line_parser = Box::new(parser);
        self
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    /// Borrow the current record. Mutations need `&mut self`, so the borrow
    /// can never be held across one.
    pub fn record(&self) -> watch::Ref<'_, PatientRecord> {
        self.record.borrow()
    }

    pub fn snapshot(&self) -> PatientRecord {
        self.record.borrow().clone()
    }

    /// Receiver notified after every commit.
    pub fn subscribe(&self) -> watch::Receiver<PatientRecord> {
        self.record.subscribe()
    }

    pub fn has_pending_token(&self) -> bool {
        self.pending_token.is_some()
    }

    fn commit(&self, record: PatientRecord, source: ImportSource) {
        tracing::info!(
            source = %source,
            panels = record.selected_panels.len(),
            phenotypes = record.phenotype_data.len(),
            "Patient record updated"
        );
        self.record.send_replace(record);
    }

    // ── Form edits ──────────────────────────────────────────

    /// Merge a form edit; empty fields in `edit` leave the record alone.
    pub fn apply_edit(&mut self, edit: &PartialPatientRecord) {
        let merged = merge(&self.record.borrow(), edit);
        self.commit(merged, ImportSource::FormEdit);
    }

    /// Direct mutation, for edits that clear or remove values.
    pub fn update(&mut self, edit: impl FnOnce(&mut PatientRecord)) {
        self.record.send_modify(edit);
        tracing::debug!(source = %ImportSource::FormEdit, "Patient record edited");
    }

    /// Back to an empty record; a pending encrypted link is dropped too.
    pub fn reset_to_default(&mut self) {
        self.pending_token = None;
        self.commit(create_default(), ImportSource::FormEdit);
    }

    // ── URL import ──────────────────────────────────────────

    /// Import whatever the current location carries, then clear it.
    ///
    /// Encrypted links are not opened here: the token is kept and
    /// `PasswordRequired` returned, and the location is cleared only once
    /// `decrypt_url_data` succeeds.
    pub fn import_from_url(&mut self, location: &mut dyn Location) -> Result<UrlImport, ImportError> {
        let decoded = codec::decode_url(&location.href(), &self.config);
        for warning in &decoded.warnings {
            tracing::debug!(%warning, "URL parameter skipped");
        }

        if let Some(token) = decoded.encrypted_token {
            tracing::info!("Encrypted link detected, waiting for password");
            self.pending_token = Some(token);
            return Ok(UrlImport::PasswordRequired);
        }
        if !decoded.had_params {
            return Ok(UrlImport::NothingToImport);
        }

        let merged = (!decoded.partial.is_empty()).then(|| merge(&self.record.borrow(), &decoded.partial));
        clear_location(location)?;

        match merged {
            Some(record) => {
                self.commit(record, ImportSource::Url);
                Ok(UrlImport::Imported {
                    warnings: decoded.warnings,
                })
            }
            None => Ok(UrlImport::NothingToImport),
        }
    }

    /// Open the pending encrypted link. On a wrong password the token stays
    /// pending so the user can retry.
    pub fn decrypt_url_data(
        &mut self,
        password: &str,
        location: &mut dyn Location,
    ) -> Result<(), ImportError> {
        let token = self.pending_token.as_deref().ok_or(ImportError::NoPendingToken)?;
        let plaintext = crypto::decrypt(token, password)?;
        self.finish_encrypted_import(&plaintext, location)
    }

    /// [`Self::decrypt_url_data`] with key derivation off the calling task.
    pub async fn decrypt_url_data_async(
        &mut self,
        password: String,
        location: &mut dyn Location,
    ) -> Result<(), ImportError> {
        let token = self.pending_token.clone().ok_or(ImportError::NoPendingToken)?;
        let plaintext = crypto::decrypt_async(token, password).await?;
        self.finish_encrypted_import(&plaintext, location)
    }

    fn finish_encrypted_import(
        &mut self,
        plaintext: &str,
        location: &mut dyn Location,
    ) -> Result<(), ImportError> {
        let partial = codec::decode_plaintext(plaintext, &self.config)
            .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;
        let merged = merge(&self.record.borrow(), &partial);
        clear_location(location)?;

        self.pending_token = None;
        self.commit(merged, ImportSource::EncryptedUrl);
        Ok(())
    }

    // ── File and paste import ───────────────────────────────

    /// Load a saved JSON file. Replaces the whole record: fields the file
    /// does not mention end up empty.
    pub fn import_from_file(&mut self, bytes: &[u8]) -> Result<(), ImportError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| ImportError::InvalidFormat("file is not UTF-8 text".into()))?;
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ImportError::InvalidFormat(format!("not JSON: {e}")))?;
        let partial = parse_document(value)?;

        self.commit(merge(&create_default(), &partial), ImportSource::File);
        Ok(())
    }

    /// Import pasted text. A JSON object is treated like a file (full
    /// replace); anything else goes through the line parser and is merged
    /// into the current record.
    pub fn import_from_pasted_text(&mut self, text: &str) -> Result<PasteFormat, ImportError> {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(text.trim()) {
            let partial = parse_document(value)?;
            self.commit(merge(&create_default(), &partial), ImportSource::PastedJson);
            return Ok(PasteFormat::Json);
        }

        let partial = self
            .line_parser
            .parse(text)
            .ok_or(ImportError::UnrecognizedFormat)?;
        let merged = merge(&self.record.borrow(), &partial);
        self.commit(merged, ImportSource::PastedText);
        Ok(PasteFormat::Lines)
    }

    // ── Export and sharing ──────────────────────────────────

    pub fn export_plain(&self) -> Result<Value, serde_json::Error> {
        export_plain(&self.record.borrow())
    }

    /// Pretty JSON for file save; `import_from_file` reads it back unchanged.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&*self.record.borrow())
    }

    /// Share link for the current record, based on the current location.
    pub fn create_shareable_url(
        &self,
        location: &dyn Location,
        format: &ShareFormat,
    ) -> Result<String, CodecError> {
        let record = self.snapshot();
        codec::encode_share_url(&location.href(), &record, format)
    }

    pub fn copy_shareable_url(
        &self,
        location: &dyn Location,
        clipboard: &mut dyn Clipboard,
        format: &ShareFormat,
    ) -> Result<String, ShareError> {
        let url = self.create_shareable_url(location, format)?;
        clipboard.write_text(&url)?;
        tracing::info!(format = format.name(), "Share URL copied to clipboard");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhenotypeEntry, Sex};

    const PAGE: &str = "https://forms.example.org/requisition/";

    fn store_with(record: impl FnOnce(&mut PatientRecord)) -> RecordStore {
        let mut store = RecordStore::default();
        store.update(record);
        store
    }

    fn filled_store() -> RecordStore {
        store_with(|r| {
            r.personal_info.first_name = "Jane".into();
            r.personal_info.last_name = "Doe".into();
            r.personal_info.sex = Sex::Female;
            r.category = "nephrology".into();
            r.selected_panels = vec!["nephronophthise".into()];
            r.phenotype_data = vec![PhenotypeEntry::present("HP:0000077")];
            r.consent.data_processing = true;
        })
    }

    // ── URL ─────────────────────────────────────────────────

    #[test]
    fn url_import_merges_and_clears_location() {
        let mut store = RecordStore::default();
        let mut location = MemoryLocation::new(format!(
            "{PAGE}#givenName=Jane&familyName=Doe&birthdate=1990-02-01&category=nephrology&panels=nephronophthise"
        ));

        let outcome = store.import_from_url(&mut location).unwrap();
        assert_eq!(outcome, UrlImport::Imported { warnings: vec![] });

        let record = store.snapshot();
        assert_eq!(record.personal_info.first_name, "Jane");
        assert_eq!(record.personal_info.last_name, "Doe");
        assert_eq!(record.category, "nephrology");
        assert_eq!(record.selected_panels, vec!["nephronophthise"]);
        assert_eq!(location.href(), PAGE);
        assert_eq!(location.replacements(), 1);
    }

    #[test]
    fn url_import_keeps_fields_the_link_omits() {
        let mut store = filled_store();
        let mut location = MemoryLocation::new(format!("{PAGE}#givenName=Janet"));
        store.import_from_url(&mut location).unwrap();

        let record = store.snapshot();
        assert_eq!(record.personal_info.first_name, "Janet");
        assert_eq!(record.personal_info.last_name, "Doe");
        assert!(record.consent.data_processing);
    }

    #[test]
    fn hash_wins_over_query_on_import() {
        let mut store = RecordStore::default();
        let mut location =
            MemoryLocation::new(format!("{PAGE}?givenName=Query&insurance=AOK#givenName=Hash"));
        store.import_from_url(&mut location).unwrap();
        assert_eq!(store.record().personal_info.first_name, "Hash");
        assert_eq!(store.record().personal_info.insurance, "AOK");
    }

    #[test]
    fn compact_link_with_absent_hpo_patch() {
        let mut store = RecordStore::default();
        let json = r#"{"personalInfo":{"firstName":"Jane"}}"#;
        let href = format!(
            "{PAGE}#data={}&hpo_absent=HP:0000555",
            percent_encoding::utf8_percent_encode(json, percent_encoding::NON_ALPHANUMERIC)
        );
        store.import_from_url(&mut MemoryLocation::new(href)).unwrap();

        let record = store.snapshot();
        assert_eq!(record.personal_info.first_name, "Jane");
        assert_eq!(record.phenotype_data, vec![PhenotypeEntry::absent("HP:0000555")]);
    }

    #[test]
    fn data_link_with_unrecognized_sex_still_imports() {
        let mut store = RecordStore::default();
        let mut location = MemoryLocation::new(format!(
            "{PAGE}#data=%7B%22personalInfo%22%3A%7B%22firstName%22%3A%22Anna%22%2C%22sex%22%3A%22unknown%22%7D%7D"
        ));

        let outcome = store.import_from_url(&mut location).unwrap();
        assert_eq!(
            outcome,
            UrlImport::Imported {
                warnings: vec![CodecWarning::InvalidValue {
                    param: "data.personalInfo.sex".into()
                }]
            }
        );
        assert_eq!(store.record().personal_info.first_name, "Anna");
        assert_eq!(location.href(), PAGE);
    }

    #[test]
    fn url_without_params_is_left_alone() {
        let mut store = filled_store();
        let before = store.snapshot();
        let mut location = MemoryLocation::new(PAGE);
        assert_eq!(store.import_from_url(&mut location).unwrap(), UrlImport::NothingToImport);
        assert_eq!(location.replacements(), 0);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn url_with_only_garbage_is_cleared_but_imports_nothing() {
        let mut store = filled_store();
        let before = store.snapshot();
        let mut location = MemoryLocation::new(format!("{PAGE}#givenName=%zz&utm=x"));
        assert_eq!(store.import_from_url(&mut location).unwrap(), UrlImport::NothingToImport);
        assert_eq!(location.href(), PAGE);
        assert_eq!(store.snapshot(), before);
    }

    struct FailingLocation(String);

    impl Location for FailingLocation {
        fn href(&self) -> String {
            self.0.clone()
        }

        fn replace(&mut self, _href: &str) -> Result<(), LocationError> {
            Err(LocationError("history unavailable".into()))
        }
    }

    #[test]
    fn failed_location_clear_leaves_record_untouched() {
        let mut store = RecordStore::default();
        let mut location = FailingLocation(format!("{PAGE}#givenName=Jane"));
        assert!(matches!(
            store.import_from_url(&mut location),
            Err(ImportError::Location(_))
        ));
        assert_eq!(store.snapshot(), PatientRecord::default());
    }

    // ── Encrypted URL ───────────────────────────────────────

    fn encrypted_link(password: &str) -> String {
        filled_store()
            .create_shareable_url(
                &MemoryLocation::new(PAGE),
                &ShareFormat::Encrypted {
                    password: password.into(),
                },
            )
            .unwrap()
    }

    #[test]
    fn encrypted_link_needs_password_then_imports() {
        let mut store = RecordStore::default();
        let mut location = MemoryLocation::new(encrypted_link("s3cret"));

        assert_eq!(store.import_from_url(&mut location).unwrap(), UrlImport::PasswordRequired);
        assert!(store.has_pending_token());
        assert_eq!(location.replacements(), 0);

        let err = store.decrypt_url_data("wrong", &mut location).unwrap_err();
        assert!(matches!(err, ImportError::Decryption(CryptoError::DecryptionFailed)));
        assert!(store.has_pending_token());
        assert_eq!(store.snapshot(), PatientRecord::default());

        store.decrypt_url_data("s3cret", &mut location).unwrap();
        assert!(!store.has_pending_token());
        assert_eq!(location.href(), PAGE);
        assert_eq!(store.snapshot(), filled_store().snapshot());
    }

    #[test]
    fn decrypt_without_pending_token() {
        let mut store = RecordStore::default();
        assert!(matches!(
            store.decrypt_url_data("pw", &mut MemoryLocation::new(PAGE)),
            Err(ImportError::NoPendingToken)
        ));
    }

    #[tokio::test]
    async fn async_decrypt_imports() {
        let mut store = RecordStore::default();
        let mut location = MemoryLocation::new(encrypted_link("pw"));
        store.import_from_url(&mut location).unwrap();
        store
            .decrypt_url_data_async("pw".into(), &mut location)
            .await
            .unwrap();
        assert_eq!(store.record().personal_info.first_name, "Jane");
    }

    #[test]
    fn reset_drops_pending_token() {
        let mut store = RecordStore::default();
        store
            .import_from_url(&mut MemoryLocation::new(encrypted_link("pw")))
            .unwrap();
        store.reset_to_default();
        assert!(!store.has_pending_token());
    }

    // ── File ────────────────────────────────────────────────

    #[test]
    fn file_import_replaces_whole_record() {
        let mut store = filled_store();
        store.import_from_file(br#"{"selectedPanels":["a","b"]}"#).unwrap();

        let mut expected = PatientRecord::default();
        expected.selected_panels = vec!["a".into(), "b".into()];
        assert_eq!(store.snapshot(), expected);
    }

    #[test]
    fn file_import_accepts_wrapper() {
        let mut store = RecordStore::default();
        store
            .import_from_file(br#"{"patientData":{"personalInfo":{"lastName":"Doe"},"category":"neuro"}}"#)
            .unwrap();
        assert_eq!(store.record().personal_info.last_name, "Doe");
        assert_eq!(store.record().category, "neuro");
    }

    #[test]
    fn file_import_tolerates_unrecognized_sex() {
        let mut store = filled_store();
        store
            .import_from_file(
                br#"{"personalInfo":{"firstName":"Anna","sex":"diverse"},"selectedPanels":["a"]}"#,
            )
            .unwrap();

        let record = store.snapshot();
        assert_eq!(record.personal_info.first_name, "Anna");
        assert_eq!(record.personal_info.sex, Sex::Unspecified);
        assert_eq!(record.selected_panels, vec!["a"]);
    }

    #[test]
    fn file_import_rejects_unrecognized_shapes() {
        let mut store = filled_store();
        let before = store.snapshot();

        let cases: [&[u8]; 5] = [
            br#"{"category":"x"}"#,
            br#"{"unexpected":true,"selectedPanels":[]}"#,
            br#"[1,2,3]"#,
            br#"{"selectedPanels":"#,
            &[0xff, 0xfe],
        ];
        for bytes in cases {
            assert!(matches!(
                store.import_from_file(bytes),
                Err(ImportError::InvalidFormat(_))
            ));
        }
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn file_import_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        std::fs::write(&path, r#"{"phenotypeData":[{"id":"HP:0000077","present":true}]}"#).unwrap();

        let mut store = RecordStore::default();
        store.import_from_file(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(store.record().phenotype_data, vec![PhenotypeEntry::present("HP:0000077")]);
    }

    #[test]
    fn export_then_import_is_identity() {
        let mut store = filled_store();
        store.update(|r| {
            r.consent.extended.signer_name = "J. Doe".into();
            r.consent.extended.questions.insert("recontact".into(), false);
        });
        let saved = store.export_json().unwrap();
        let before = store.snapshot();

        store.reset_to_default();
        store.import_from_file(saved.as_bytes()).unwrap();
        assert_eq!(store.snapshot(), before);
    }

    // ── Paste ───────────────────────────────────────────────

    #[test]
    fn pasted_lines_merge_into_record() {
        let mut store = filled_store();
        let format = store
            .import_from_pasted_text("First Name: John\nLast Name: Doe")
            .unwrap();
        assert_eq!(format, PasteFormat::Lines);

        let record = store.snapshot();
        assert_eq!(record.personal_info.first_name, "John");
        assert_eq!(record.personal_info.last_name, "Doe");
        assert_eq!(record.category, "nephrology");
    }

    #[test]
    fn pasted_json_replaces_record() {
        let mut store = filled_store();
        let format = store
            .import_from_pasted_text("  {\"personalInfo\":{\"firstName\":\"Max\"}}\n")
            .unwrap();
        assert_eq!(format, PasteFormat::Json);
        assert_eq!(store.record().personal_info.first_name, "Max");
        assert_eq!(store.record().category, "");
    }

    #[test]
    fn pasted_json_tolerates_unrecognized_sex() {
        let mut store = RecordStore::default();
        let format = store
            .import_from_pasted_text(r#"{"personalInfo":{"lastName":"Doe","sex":"x"}}"#)
            .unwrap();
        assert_eq!(format, PasteFormat::Json);
        assert_eq!(store.record().personal_info.last_name, "Doe");
        assert_eq!(store.record().personal_info.sex, Sex::Unspecified);
    }

    #[test]
    fn pasted_json_with_wrong_shape_is_invalid() {
        let mut store = filled_store();
        assert!(matches!(
            store.import_from_pasted_text(r#"{"category":"x"}"#),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn unrecognized_paste_leaves_record_untouched() {
        let mut store = filled_store();
        let before = store.snapshot();
        assert!(matches!(
            store.import_from_pasted_text("lorem ipsum dolor"),
            Err(ImportError::UnrecognizedFormat)
        ));
        assert_eq!(store.snapshot(), before);
    }

    struct PanelListParser;

    impl LineParser for PanelListParser {
        fn parse(&self, text: &str) -> Option<PartialPatientRecord> {
            let panels: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            (!panels.is_empty()).then(|| PartialPatientRecord {
                selected_panels: Some(panels),
                ..Default::default()
            })
        }
    }

    #[test]
    fn custom_line_parser() {
        let mut store = RecordStore::default().with_line_parser(PanelListParser);
        store.import_from_pasted_text("a b c").unwrap();
        assert_eq!(store.record().selected_panels, vec!["a", "b", "c"]);
    }

    // ── Edits, reset, observation ───────────────────────────

    #[test]
    fn apply_edit_is_non_destructive() {
        let mut store = filled_store();
        let before = store.snapshot();
        store.apply_edit(&PartialPatientRecord::default());
        assert_eq!(store.snapshot(), before);

        store.apply_edit(&PartialPatientRecord {
            category: Some("cardiology".into()),
            ..Default::default()
        });
        assert_eq!(store.record().category, "cardiology");
    }

    #[test]
    fn reset_is_idempotent() {
        let mut store = filled_store();
        store.reset_to_default();
        let first = store.snapshot();
        store.reset_to_default();
        assert_eq!(store.snapshot(), first);
        assert_eq!(first, PatientRecord::default());
    }

    #[test]
    fn subscribers_see_committed_imports() {
        let mut store = RecordStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store
            .import_from_url(&mut MemoryLocation::new(format!("{PAGE}#givenName=Jane")))
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().personal_info.first_name, "Jane");

        assert!(store.import_from_pasted_text("nothing here").is_err());
        assert!(!rx.has_changed().unwrap());
    }

    // ── Sharing ─────────────────────────────────────────────

    #[test]
    fn shareable_url_round_trips_through_import() {
        let source = filled_store();
        let mut clipboard = MemoryClipboard::default();
        let url = source
            .copy_shareable_url(
                &MemoryLocation::new(format!("{PAGE}#stale=1")),
                &mut clipboard,
                &ShareFormat::Compact,
            )
            .unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some(url.as_str()));
        assert!(!url.contains("stale"));

        let mut target = RecordStore::default();
        target.import_from_url(&mut MemoryLocation::new(url)).unwrap();
        assert_eq!(target.snapshot(), source.snapshot());
    }

    #[test]
    fn export_plain_matches_record() {
        let store = filled_store();
        let value = store.export_plain().unwrap();
        assert_eq!(value["personalInfo"]["firstName"], "Jane");
        assert_eq!(value["selectedPanels"][0], "nephronophthise");
    }
}
