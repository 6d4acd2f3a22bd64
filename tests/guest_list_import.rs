use guest_search::roster::{CanonicalField, GuestListImportError, GuestListImporter, GuestTable};

fn names(table: &GuestTable) -> Vec<&str> {
    table
        .records()
        .filter_map(|record| record.field(CanonicalField::Name))
        .collect()
}

#[test]
fn importer_handles_full_guest_list_export() {
    let data = include_bytes!("../Summit_Gala_Guests.csv");
    let table = GuestListImporter::from_reader(&data[..]).expect("guest list imports");

    // First/last pairs synthesize Name; Company and "Seat No." map onto
    // the canonical schema; Dietary Notes passes through.
    assert_eq!(
        table.columns(),
        [
            "First_Name",
            "Last_Name",
            "Organization",
            "Seat Number",
            "Dietary Notes",
            "Name",
        ]
    );
    assert_eq!(
        table.canonical_fields(),
        vec![
            CanonicalField::Name,
            CanonicalField::Organization,
            CanonicalField::SeatNumber
        ]
    );

    // Two of the nine rows have no usable name.
    assert_eq!(
        names(&table),
        vec![
            "Ann Lee",
            "Rahul Mehta",
            "Mina Park",
            "Sofia",
            "Omar Haddad",
            "Li Wei",
            "Grace Okafor",
        ]
    );
}

#[test]
fn importer_scrubs_null_markers_from_passthrough_columns() {
    let data = include_bytes!("../Summit_Gala_Guests.csv");
    let table = GuestListImporter::from_reader(&data[..]).expect("guest list imports");

    let omar = table
        .records()
        .find(|record| record.field(CanonicalField::Name) == Some("Omar Haddad"))
        .expect("row present");
    assert_eq!(omar.field(CanonicalField::Organization), Some(""));
    assert_eq!(omar.get("Dietary Notes"), Some(""));
}

#[test]
fn importer_reads_xlsx_workbooks() {
    let data = include_bytes!("../Summit_Gala_Guests.xlsx");
    let table = GuestListImporter::from_reader(&data[..]).expect("workbook imports");

    assert_eq!(
        table.columns(),
        [
            "First Name",
            "Last Name",
            "Organization",
            "Seat Number",
            "Name",
        ]
    );
    assert_eq!(names(&table), vec!["Ann Lee", "Sofia", "Omar Haddad"]);

    // Numeric cells come out as plain integers, not "12.0".
    let ann = table
        .records()
        .find(|record| record.field(CanonicalField::Name) == Some("Ann Lee"))
        .expect("row present");
    assert_eq!(ann.field(CanonicalField::SeatNumber), Some("12"));
}

#[test]
fn importer_tolerates_lists_without_any_canonical_match() {
    let csv = "RSVP,Plus One\nyes,no\nno,no\n";
    let table = GuestListImporter::from_reader(csv.as_bytes()).expect("import succeeds");

    assert!(table.canonical_fields().is_empty());
    assert_eq!(table.len(), 2);
    assert_eq!(table.columns(), ["RSVP", "Plus One"]);
}

#[test]
fn importer_reports_unreadable_uploads() {
    let error = GuestListImporter::from_reader(&b"Name\n\xff\xfe\n"[..])
        .expect_err("expected csv error");
    match error {
        GuestListImportError::Csv(_) => {}
        other => panic!("expected csv error, got {other:?}"),
    }
}
