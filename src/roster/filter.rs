use super::mapping::CanonicalField;
use super::table::GuestTable;
use serde::{Deserialize, Serialize};

/// Three independent, optional substring patterns. Blank components impose
/// no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub seat: String,
}

/// Whitespace-only text imposes no constraint; anything else is matched
/// literally, surrounding whitespace included. Used by both the blank
/// check and the filter.
fn is_constraining(pattern: &str) -> bool {
    !pattern.trim().is_empty()
}

impl FilterQuery {
    pub fn is_blank(&self) -> bool {
        !self
            .components()
            .iter()
            .any(|(_, pattern)| is_constraining(pattern))
    }

    fn components(&self) -> [(CanonicalField, &str); 3] {
        [
            (CanonicalField::Name, self.name.as_str()),
            (CanonicalField::Organization, self.organization.as_str()),
            (CanonicalField::SeatNumber, self.seat.as_str()),
        ]
    }
}

/// Ordered subset of `table` matching every provided query component,
/// case-insensitively. A component naming a field the upload never had is
/// satisfied vacuously rather than failing the whole query. The source
/// table is left untouched.
pub fn filter_table(table: &GuestTable, query: &FilterQuery) -> GuestTable {
    let mut constraints: Vec<(usize, String)> = Vec::new();
    for (field, pattern) in query.components() {
        if !is_constraining(pattern) {
            continue;
        }
        if let Some(index) = table.column_index(field) {
            constraints.push((index, pattern.to_lowercase()));
        }
    }

    if constraints.is_empty() {
        return table.clone();
    }

    let rows = table
        .rows()
        .iter()
        .filter(|row| {
            constraints.iter().all(|(index, needle)| {
                row.get(*index)
                    .map(|cell| cell.to_lowercase().contains(needle))
                    .unwrap_or(false)
            })
        })
        .cloned()
        .collect();

    GuestTable::new(table.columns().to_vec(), rows)
}
