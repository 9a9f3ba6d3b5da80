/// Strips BOM/zero-width characters and collapses runs of whitespace.
/// Spreadsheet exports routinely smuggle both into name cells.
pub(crate) fn scrub(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form for email addresses: scrubbed and lowercased.
pub(crate) fn normalize_email(value: &str) -> String {
    scrub(value).to_ascii_lowercase()
}

#[cfg(test)]
pub(crate) fn scrub_for_tests(value: &str) -> String {
    scrub(value)
}

#[cfg(test)]
pub(crate) fn normalize_email_for_tests(value: &str) -> String {
    normalize_email(value)
}
