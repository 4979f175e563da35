use std::sync::LazyLock;

use regex::Regex;
use url::Url;

const DOCUMENT_BASE: &str = "https://docs.google.com/document/d/";

/// `/d/<id>` followed by `/` or end of input. Non-greedy so the first `/` ends the id.
static EXTERNAL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/d/(.*?)(?:/|$)").expect("external id pattern is valid")
});

/// Extracts the document identifier from a `/d/<identifier>/` path segment.
///
/// Returns `None` when the URL has no such segment or the identifier is empty.
pub fn extract_external_id(url: &str) -> Option<&str> {
    let captures = EXTERNAL_ID_RE.captures(url)?;
    let id = captures.get(1)?.as_str();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Canonical embeddable preview URL for an external identifier.
pub fn build_preview_url(external_id: &str) -> String {
    format!("{DOCUMENT_BASE}{external_id}/preview?embedded=true")
}

/// "Make a copy" URL for an external identifier.
pub fn build_copy_url(external_id: &str) -> String {
    format!("{DOCUMENT_BASE}{external_id}/copy")
}

/// Editor URL for an external identifier.
pub fn build_open_url(external_id: &str) -> String {
    format!("{DOCUMENT_BASE}{external_id}/edit")
}

/// Turns a document URL as returned by the roster endpoint into an embeddable preview URL.
///
/// An `/edit` path suffix becomes `/preview` (dropping the sharing query), and
/// `embedded=true` is appended unless already present.
pub fn embeddable_preview_url(raw: &str) -> String {
    let raw = raw.trim();
    let mut parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(_) => {
            return match extract_external_id(raw) {
                Some(id) => build_preview_url(id),
                None => raw.to_string(),
            };
        }
    };

    if let Some(prefix) = parsed.path().strip_suffix("/edit") {
        let path = format!("{prefix}/preview");
        parsed.set_path(&path);
        parsed.set_query(None);
        parsed.set_fragment(None);
    }

    let already_embedded = parsed
        .query_pairs()
        .any(|(key, value)| key == "embedded" && value == "true");
    if !already_embedded {
        parsed.query_pairs_mut().append_pair("embedded", "true");
    }

    parsed.to_string()
}
