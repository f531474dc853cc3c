//! URL splitting and strict parameter decoding.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use super::CodecWarning;

/// Characters left alone by JavaScript's `encodeURIComponent`.
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Query string and fragment of a location, without their `?`/`#` markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UrlParts<'a> {
    pub query: &'a str,
    pub fragment: &'a str,
}

pub(crate) fn split_url(href: &str) -> UrlParts<'_> {
    let (before_hash, fragment) = href.split_once('#').unwrap_or((href, ""));
    let query = before_hash.split_once('?').map_or("", |(_, q)| q);
    UrlParts { query, fragment }
}

/// `href` with query and fragment removed; used both to clear the address
/// bar after an import and as the base of generated share links.
pub fn strip_url(href: &str) -> String {
    match Url::parse(href) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.into()
        }
        Err(_) => {
            let end = href.find(['?', '#']).unwrap_or(href.len());
            href[..end].to_string()
        }
    }
}

/// Decode one form-encoded component. `None` for a stray `%`, a truncated
/// escape, or bytes that are not UTF-8.
pub(crate) fn decode_component(raw: &str) -> Option<String> {
    let well_formed = raw.split('%').skip(1).all(|chunk| {
        let bytes = chunk.as_bytes();
        bytes.len() >= 2 && bytes[0].is_ascii_hexdigit() && bytes[1].is_ascii_hexdigit()
    });
    if !well_formed {
        return None;
    }

    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Decoded `name=value` pairs of one URL section, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParamMap {
    pairs: Vec<(String, String)>,
}

impl ParamMap {
    /// Parse a query string or fragment. Pairs that fail to decode are
    /// skipped and reported as warnings.
    pub fn parse(raw: &str, warnings: &mut Vec<CodecWarning>) -> Self {
        let raw = raw.trim_start_matches(['?', '#']);
        let mut pairs = Vec::new();

        for segment in raw.split('&').filter(|s| !s.is_empty()) {
            let (raw_name, raw_value) = segment.split_once('=').unwrap_or((segment, ""));
            match (decode_component(raw_name), decode_component(raw_value)) {
                (Some(name), Some(value)) => pairs.push((name, value)),
                _ => {
                    tracing::debug!(param = %raw_name, "Skipping malformed URL parameter");
                    warnings.push(CodecWarning::MalformedEncoding {
                        param: raw_name.to_string(),
                    });
                }
            }
        }

        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value under any alias, aliases tried in order.
    pub fn get_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_url_separates_query_and_fragment() {
        let parts = split_url("https://host/form?encrypted=abc#givenName=Jane");
        assert_eq!(parts.query, "encrypted=abc");
        assert_eq!(parts.fragment, "givenName=Jane");

        let parts = split_url("https://host/form#a=1?b=2");
        assert_eq!(parts.query, "");
        assert_eq!(parts.fragment, "a=1?b=2");

        assert_eq!(split_url("https://host/"), UrlParts::default());
    }

    #[test]
    fn strip_url_removes_query_and_fragment() {
        assert_eq!(
            strip_url("https://host/app/?encrypted=abc#data=x"),
            "https://host/app/"
        );
        assert_eq!(strip_url("/relative?x=1#y"), "/relative");
    }

    #[test]
    fn decode_component_handles_plus_and_escapes() {
        assert_eq!(decode_component("Dr.+Smith").as_deref(), Some("Dr. Smith"));
        assert_eq!(decode_component("M%C3%BCller").as_deref(), Some("Müller"));
        assert_eq!(decode_component("HP%3A0000077").as_deref(), Some("HP:0000077"));
    }

    #[test]
    fn decode_component_rejects_malformed() {
        assert_eq!(decode_component("100%"), None);
        assert_eq!(decode_component("%zz"), None);
        assert_eq!(decode_component("%4"), None);
        assert_eq!(decode_component("%FF%FE"), None);
    }

    #[test]
    fn encode_component_matches_encode_uri_component() {
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("{\"x\":1}"), "%7B%22x%22%3A1%7D");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(decode_component(&encode_component("a+b ü")).as_deref(), Some("a+b ü"));
    }

    #[test]
    fn param_map_skips_malformed_pairs() {
        let mut warnings = Vec::new();
        let map = ParamMap::parse("#givenName=Jane&familyName=%E0%A4&panels=a,b", &mut warnings);
        assert_eq!(map.get("givenName"), Some("Jane"));
        assert_eq!(map.get("familyName"), None);
        assert_eq!(map.get("panels"), Some("a,b"));
        assert_eq!(
            warnings,
            vec![CodecWarning::MalformedEncoding {
                param: "familyName".into()
            }]
        );
    }

    #[test]
    fn param_map_aliases_in_order() {
        let mut warnings = Vec::new();
        let map = ParamMap::parse("firstName=B&givenName=A", &mut warnings);
        assert_eq!(map.get_any(&["givenName", "firstName"]), Some("A"));
        assert_eq!(map.get_any(&["nope"]), None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn param_map_value_less_and_empty_segments() {
        let mut warnings = Vec::new();
        let map = ParamMap::parse("&flag&&x=1", &mut warnings);
        assert_eq!(map.get("flag"), Some(""));
        assert_eq!(map.get("x"), Some("1"));
        assert!(ParamMap::parse("", &mut warnings).is_empty());
    }
}
