use super::mapping::{CanonicalField, HeaderPlan};
use super::parser::RawTable;
use super::table::GuestTable;

/// String forms of "no data" produced by upstream spreadsheet tooling.
/// Matched against whole cells, never substrings.
pub const NULL_MARKERS: [&str; 3] = ["nan", "None", "NaN"];

/// Display form of one cell: null-like tokens become the empty string,
/// everything else is kept verbatim.
pub fn sanitize_cell(raw: &str) -> String {
    if NULL_MARKERS.contains(&raw) {
        String::new()
    } else {
        raw.to_string()
    }
}

/// Applies a header plan to a raw upload and produces the guest table:
/// claimed headers renamed, the synthesized `Name` column appended when
/// planned, every cell scrubbed, and blank-name rows dropped.
pub(crate) fn sanitize(raw: RawTable, plan: &HeaderPlan) -> GuestTable {
    let mut columns: Vec<String> = raw
        .headers
        .iter()
        .map(|header| match plan.canonical_for(header) {
            Some(field) => field.label().to_string(),
            None => header.clone(),
        })
        .collect();

    let synthesis_indices = plan.synthesis().and_then(|synthesis| {
        let position = |target: &str| raw.headers.iter().position(|h| h == target);
        Some((position(&synthesis.first)?, position(&synthesis.last)?))
    });
    if synthesis_indices.is_some() {
        columns.push(CanonicalField::Name.label().to_string());
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    for mut row in raw.rows {
        if let Some((first, last)) = synthesis_indices {
            row.push(synthesize_name(&row[first], &row[last]));
        }
        for cell in &mut row {
            if NULL_MARKERS.contains(&cell.as_str()) {
                cell.clear();
            }
        }
        rows.push(row);
    }

    let name_index = columns
        .iter()
        .position(|column| column == CanonicalField::Name.label());
    if let Some(index) = name_index {
        rows.retain(|row| !row[index].trim().is_empty());
    }

    GuestTable::new(columns, rows)
}

/// Joins sanitized first/last cells with a single space; a null-like or
/// blank component simply drops out.
fn synthesize_name(first: &str, last: &str) -> String {
    let first = sanitize_cell(first);
    let last = sanitize_cell(last);
    [first.trim(), last.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_cell_blanks_null_markers_only() {
        for marker in NULL_MARKERS {
            assert_eq!(sanitize_cell(marker), "");
        }
        assert_eq!(sanitize_cell("Nancy"), "Nancy");
        assert_eq!(sanitize_cell("nancy none"), "nancy none");
        assert_eq!(sanitize_cell(""), "");
    }

    #[test]
    fn synthesize_name_drops_null_components() {
        assert_eq!(synthesize_name("Ann", "Lee"), "Ann Lee");
        assert_eq!(synthesize_name("Ann", "nan"), "Ann");
        assert_eq!(synthesize_name("None", "Lee"), "Lee");
        assert_eq!(synthesize_name("NaN", "nan"), "");
    }
}
