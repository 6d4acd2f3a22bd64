use super::mapping::CanonicalField;
use serde::Serialize;

/// Sanitized guest list: display columns in upload order plus the
/// synthesized `Name` column when one was built. Replaced wholesale on a
/// new upload; filtering produces a derived copy, never a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuestTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl GuestTable {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a canonical field's column, when the upload had one.
    pub fn column_index(&self, field: CanonicalField) -> Option<usize> {
        self.columns.iter().position(|column| column == field.label())
    }

    pub fn has_field(&self, field: CanonicalField) -> bool {
        self.column_index(field).is_some()
    }

    /// Canonical fields actually present, in display order.
    pub fn canonical_fields(&self) -> Vec<CanonicalField> {
        [
            CanonicalField::Name,
            CanonicalField::Organization,
            CanonicalField::SeatNumber,
        ]
        .into_iter()
        .filter(|field| self.has_field(*field))
        .collect()
    }

    pub fn records(&self) -> impl Iterator<Item = GuestRecord<'_>> {
        self.rows.iter().map(|row| GuestRecord { table: self, row })
    }
}

/// Borrowed view of one row, resolved against the table's columns.
#[derive(Debug, Clone, Copy)]
pub struct GuestRecord<'a> {
    table: &'a GuestTable,
    row: &'a [String],
}

impl<'a> GuestRecord<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.table
            .columns
            .iter()
            .position(|candidate| candidate == column)
            .and_then(|index| self.row.get(index))
            .map(String::as_str)
    }

    pub fn field(&self, field: CanonicalField) -> Option<&'a str> {
        self.get(field.label())
    }

    pub fn cells(&self) -> &'a [String] {
        self.row
    }
}
