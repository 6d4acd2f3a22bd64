use calamine::{Data, Reader, Xlsx};
use std::io::{Read, Seek};

/// Upload exactly as parsed: ordered headers plus string rows. Consumed
/// once by the importer and discarded after sanitization.
#[derive(Debug, Clone)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        // Ragged rows are padded or truncated to the header width.
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Reads the first worksheet of an xlsx workbook; the top row is taken as
/// the header row, matching how spreadsheet exports lay out guest lists.
pub(crate) fn parse_workbook<R: Read + Seek>(reader: R) -> Result<RawTable, calamine::XlsxError> {
    let mut workbook = Xlsx::new(reader)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            return Ok(RawTable {
                headers: Vec::new(),
                rows: Vec::new(),
            })
        }
    };

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|row| {
            row.iter()
                .map(|cell| render_cell(cell).trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut rows = Vec::new();
    for row in sheet_rows {
        let mut cells: Vec<String> = row.iter().map(render_cell).collect();
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    Ok(RawTable { headers, rows })
}

/// Display form of a workbook cell. Integral floats print without a
/// trailing ".0" (`f64`'s `Display` renders 12.0 as "12"), so numeric seat
/// columns read back the way they were typed.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value.as_f64().to_string(),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
    }
}
