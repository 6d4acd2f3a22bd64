mod filter;
mod mapping;
mod normalizer;
mod parser;
mod sanitizer;
mod session;
mod table;

pub use filter::{filter_table, FilterQuery};
pub use mapping::{map_headers, CanonicalField, HeaderPlan, NameSynthesis};
pub use sanitizer::{sanitize_cell, NULL_MARKERS};
pub use session::{SessionError, SessionState};
pub use table::{GuestRecord, GuestTable};

use std::io::{Cursor, Read};
use std::path::Path;

#[derive(Debug)]
pub enum GuestListImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Workbook(calamine::XlsxError),
}

impl std::fmt::Display for GuestListImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuestListImportError::Io(err) => write!(f, "failed to read guest list: {}", err),
            GuestListImportError::Csv(err) => write!(f, "invalid guest list CSV: {}", err),
            GuestListImportError::Workbook(err) => {
                write!(f, "invalid guest list workbook: {}", err)
            }
        }
    }
}

impl std::error::Error for GuestListImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GuestListImportError::Io(err) => Some(err),
            GuestListImportError::Csv(err) => Some(err),
            GuestListImportError::Workbook(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for GuestListImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for GuestListImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<calamine::XlsxError> for GuestListImportError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::Workbook(err)
    }
}

/// Leading bytes of a zip archive, which is what an xlsx file is.
const XLSX_MAGIC: &[u8] = b"PK\x03\x04";

/// Runs the full pipeline on an upload: parse (CSV or xlsx, sniffed from
/// the leading bytes), canonicalize headers, sanitize records. Parse
/// failures surface verbatim; schema gaps do not.
pub struct GuestListImporter;

impl GuestListImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<GuestTable, GuestListImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<GuestTable, GuestListImportError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        let raw = if buffer.starts_with(XLSX_MAGIC) {
            parser::parse_workbook(Cursor::new(buffer))?
        } else {
            parser::parse_csv(Cursor::new(buffer))?
        };

        let plan = mapping::map_headers(&raw.headers);
        Ok(sanitizer::sanitize(raw, &plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn names(table: &GuestTable) -> Vec<&str> {
        table
            .records()
            .filter_map(|record| record.field(CanonicalField::Name))
            .collect()
    }

    #[test]
    fn synthesizes_name_from_first_and_last_columns() {
        let csv = "First_Name,Last_Name,Company\n\
Ann,Lee,Acme\n\
Ann,nan,Acme\n";
        let table = GuestListImporter::from_reader(Cursor::new(csv)).expect("import");

        assert!(table.has_field(CanonicalField::Name));
        assert_eq!(names(&table), vec!["Ann Lee", "Ann"]);
        // The source columns stay as passthrough.
        let record = table.records().next().expect("record");
        assert_eq!(record.get("First_Name"), Some("Ann"));
        assert_eq!(record.get("Last_Name"), Some("Lee"));
    }

    #[test]
    fn scrubs_null_markers_in_every_column() {
        let csv = "Guest Name,Org,Notes\nAnn Lee,NaN,nan\nBo Chen,Acme,None\n";
        let table = GuestListImporter::from_reader(Cursor::new(csv)).expect("import");

        let rows = table.rows();
        assert_eq!(rows[0], vec!["Ann Lee", "", ""]);
        assert_eq!(rows[1], vec!["Bo Chen", "Acme", ""]);
    }

    #[test]
    fn drops_rows_with_blank_or_whitespace_names() {
        let csv = "Name,Seat\nAnn Lee,12\n,7\n\"   \",3\nnan,4\nBo Chen,5\n";
        let table = GuestListImporter::from_reader(Cursor::new(csv)).expect("import");

        assert_eq!(names(&table), vec!["Ann Lee", "Bo Chen"]);
    }

    #[test]
    fn keeps_all_rows_when_no_name_column_exists() {
        let csv = "Org,Seat\nAcme,12\n,7\n";
        let table = GuestListImporter::from_reader(Cursor::new(csv)).expect("import");

        assert!(!table.has_field(CanonicalField::Name));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn canonical_upload_passes_through_unchanged() {
        let csv = "Name,Organization,Seat Number\nAnn Lee,Acme,12\n";
        let table = GuestListImporter::from_reader(Cursor::new(csv)).expect("import");

        assert_eq!(table.columns(), ["Name", "Organization", "Seat Number"]);
        assert_eq!(
            table.canonical_fields(),
            vec![
                CanonicalField::Name,
                CanonicalField::Organization,
                CanonicalField::SeatNumber
            ]
        );
    }

    #[test]
    fn renames_keyword_matched_headers() {
        let csv = "attendee,firm,chair_no\nAnn Lee,Acme,12\n";
        let table = GuestListImporter::from_reader(Cursor::new(csv)).expect("import");

        assert_eq!(table.columns(), ["Name", "Organization", "Seat Number"]);
    }

    #[test]
    fn zip_magic_routes_to_the_workbook_parser() {
        let error = GuestListImporter::from_reader(&b"PK\x03\x04not a real workbook"[..])
            .expect_err("expected workbook error");
        match error {
            GuestListImportError::Workbook(_) => {}
            other => panic!("expected workbook error, got {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = GuestListImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        match error {
            GuestListImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
