/// Collapses a header into the form used for keyword matching: invisible
/// characters removed, everything lowercased, whitespace and underscores
/// stripped. Never used for display.
pub(crate) fn normalize_header(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\u{feff}' | '\u{200b}'))
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
