//! Heuristic JAN/EAN code recovery from free-text listing fields.
//!
//! Marketplace search APIs rarely expose a product code directly, so the code
//! is scraped out of the title, caption, and URLs. The heuristic accepts
//! false positives (phone numbers, SKUs) that happen to satisfy the length
//! and checksum rules; grouping downstream is tuned to this exact behavior.

use std::sync::LazyLock;

use regex::Regex;

use crate::jan::is_valid_jan;

/// Bare 8- or 13-digit runs that are not part of a longer word. `\d` is any
/// Unicode decimal digit, so full-width runs (`４９０２…`) are candidates too.
static CANDIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{8}\b|\b\d{13}\b").expect("valid regex"));

/// An explicitly labelled code, e.g. `"JANコード：4902370550733。"`.
/// A trailing non-digit is required.
static LABELLED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"JAN\D*?(\d{8}|\d{13})\D").expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// When `true`, 8-digit candidates must pass the checksum after being
    /// zero-padded to 13 digits. When `false` they are accepted as-is.
    pub verify_short_codes: bool,
}

/// Returns the first acceptable product code found in `fields`.
///
/// Fields are scanned in priority order (typically name, description, page
/// URL, image URL). Bare digit runs in any field win over the `JAN`-labelled
/// fallback, which is only consulted once every field has been scanned for
/// bare candidates. Returns `None` when nothing matches.
#[must_use]
pub fn find_code(fields: &[&str], options: ExtractOptions) -> Option<String> {
    fields
        .iter()
        .find_map(|field| first_candidate(field, options))
        .or_else(|| fields.iter().find_map(|field| labelled_code(field)))
}

fn first_candidate(field: &str, options: ExtractOptions) -> Option<String> {
    CANDIDATE_RE
        .find_iter(field)
        .map(|m| m.as_str())
        .find(|candidate| accepts(candidate, options))
        .map(str::to_owned)
}

fn accepts(candidate: &str, options: ExtractOptions) -> bool {
    match candidate.chars().count() {
        13 => is_valid_jan(candidate),
        8 if options.verify_short_codes => is_valid_jan(&format!("{candidate:0>13}")),
        8 => true,
        _ => false,
    }
}

fn labelled_code(field: &str) -> Option<String> {
    LABELLED_RE
        .captures(field)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
