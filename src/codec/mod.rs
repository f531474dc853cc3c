//! Share-link codec.
//!
//! Three link shapes, all read by [`decode_url`]:
//! - compact: `#data=<percent-encoded JSON>`
//! - legacy: `#givenName=...&panels=a,b&hpo=...` (also accepted in the query)
//! - encrypted: `?encrypted=<base64url token>`, opened with [`decode_encrypted`]
//!
//! Legacy parameters are applied after the compact document so a producer
//! can patch single fields into an otherwise complete link.

pub mod compact;
mod legacy;
mod params;

pub use compact::{decode_document, encode_document, strip_empty};
pub use params::strip_url;

use thiserror::Error;

use crate::config::{ShareConfig, DATA_PARAM, ENCRYPTED_PARAM};
use crate::crypto::{self, CryptoError};
use crate::models::{PartialPatientRecord, PatientRecord};
use params::{split_url, ParamMap};

/// A parameter that was present but unusable. Never fatal: the parameter
/// is treated as absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecWarning {
    #[error("parameter '{param}' has malformed percent-encoding")]
    MalformedEncoding { param: String },

    #[error("parameter '{param}' does not hold a valid patient document")]
    MalformedDocument { param: String },

    #[error("parameter '{param}' has an unrecognized value")]
    InvalidValue { param: String },
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Everything a location carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedUrl {
    /// Plain data (compact then legacy), ready to merge.
    pub partial: PartialPatientRecord,
    /// Token of an encrypted link, still sealed.
    pub encrypted_token: Option<String>,
    pub warnings: Vec<CodecWarning>,
    /// Query or fragment held at least one parameter, usable or not.
    pub had_params: bool,
}

/// How a share link should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareFormat {
    Compact,
    Legacy,
    Encrypted { password: String },
}

impl ShareFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Legacy => "legacy",
            Self::Encrypted { .. } => "encrypted",
        }
    }
}

/// Fill in a category from the configured panel mapping when the decoded
/// data names none.
fn infer_category(partial: &mut PartialPatientRecord, config: &ShareConfig) {
    if partial.has_category() {
        return;
    }
    let panels = partial.selected_panels.as_deref().unwrap_or_default();
    if let Some(category) = config.infer_category(panels) {
        tracing::debug!(category, "Category inferred from selected panels");
        partial.category = Some(category.to_string());
    }
}

/// Decode a location's query and fragment. Never fails; unusable
/// parameters end up in `warnings`.
pub fn decode_url(href: &str, config: &ShareConfig) -> DecodedUrl {
    let parts = split_url(href);
    let mut warnings = Vec::new();
    let fragment = ParamMap::parse(parts.fragment, &mut warnings);
    let query = ParamMap::parse(parts.query, &mut warnings);
    let had_params = !fragment.is_empty() || !query.is_empty() || !warnings.is_empty();

    let encrypted_token = fragment
        .get(ENCRYPTED_PARAM)
        .or_else(|| query.get(ENCRYPTED_PARAM))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    let mut partial = match fragment.get(DATA_PARAM).or_else(|| query.get(DATA_PARAM)) {
        Some(json) => match compact::decode_document_checked(json) {
            Ok((partial, rejected)) => {
                warnings.extend(rejected.into_iter().map(|field| CodecWarning::InvalidValue {
                    param: format!("{DATA_PARAM}.{field}"),
                }));
                partial
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed data parameter");
                warnings.push(CodecWarning::MalformedDocument {
                    param: DATA_PARAM.to_string(),
                });
                PartialPatientRecord::default()
            }
        },
        None => PartialPatientRecord::default(),
    };
    partial.overlay(legacy::decode(&fragment, &query, &mut warnings));
    infer_category(&mut partial, config);

    DecodedUrl {
        partial,
        encrypted_token,
        warnings,
        had_params,
    }
}

/// Open an encrypted link token.
pub fn decode_encrypted(
    token: &str,
    password: &str,
    config: &ShareConfig,
) -> Result<PartialPatientRecord, CodecError> {
    let json = crypto::decrypt(token, password)?;
    decode_plaintext(&json, config)
}

/// Second half of [`decode_encrypted`], for callers that decrypted elsewhere.
pub fn decode_plaintext(json: &str, config: &ShareConfig) -> Result<PartialPatientRecord, CodecError> {
    let mut partial = decode_document(json)?;
    infer_category(&mut partial, config);
    Ok(partial)
}

/// Build a share link for `record` on top of `base` (any query or fragment
/// on `base` is discarded).
pub fn encode_share_url(
    base: &str,
    record: &PatientRecord,
    format: &ShareFormat,
) -> Result<String, CodecError> {
    let base = strip_url(base);
    let url = match format {
        ShareFormat::Compact => {
            let json = encode_document(record)?;
            format!("{base}#{DATA_PARAM}={}", params::encode_component(&json))
        }
        ShareFormat::Legacy => format!("{base}#{}", legacy::encode(record)),
        ShareFormat::Encrypted { password } => {
            let json = encode_document(record)?;
            let token = crypto::encrypt(&json, password)?;
            format!("{base}?{ENCRYPTED_PARAM}={token}")
        }
    };

    tracing::debug!(format = format.name(), length = url.len(), "Share URL created");
    Ok(url)
}
