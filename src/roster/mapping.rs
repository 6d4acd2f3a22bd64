use super::normalizer::normalize_header;
use serde::Serialize;
use std::collections::HashSet;

/// Target column identities the canonicalizer tries to locate in an
/// arbitrary upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Name,
    Organization,
    SeatNumber,
}

impl CanonicalField {
    /// Fixed priority order for the keyword pass. A header claimed by an
    /// earlier field is ineligible for the ones after it.
    pub const fn priority() -> [Self; 3] {
        [Self::SeatNumber, Self::Organization, Self::Name]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Organization => "Organization",
            Self::SeatNumber => "Seat Number",
        }
    }

    const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::SeatNumber => &["seat", "seatnumber", "tableno", "chair"],
            Self::Organization => &["organization", "org", "company", "firm"],
            Self::Name => &["name", "guestname", "attendee", "fullname"],
        }
    }
}

/// Directive to build a `Name` column from a first/last header pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSynthesis {
    pub first: String,
    pub last: String,
}

/// Output of header canonicalization: which original headers get renamed
/// to which canonical field, plus an optional name-synthesis directive.
/// Headers mentioned nowhere in the plan pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct HeaderPlan {
    renames: Vec<(String, CanonicalField)>,
    synthesis: Option<NameSynthesis>,
}

impl HeaderPlan {
    pub fn canonical_for(&self, original: &str) -> Option<CanonicalField> {
        self.renames
            .iter()
            .find(|(header, _)| header == original)
            .map(|(_, field)| *field)
    }

    pub fn source_for(&self, field: CanonicalField) -> Option<&str> {
        self.renames
            .iter()
            .find(|(_, mapped)| *mapped == field)
            .map(|(header, _)| header.as_str())
    }

    pub fn synthesis(&self) -> Option<&NameSynthesis> {
        self.synthesis.as_ref()
    }
}

/// Maps uploaded headers onto the canonical schema.
///
/// Matching works on normalized forms (see `normalize_header`). When two
/// headers normalize identically the entry keeps the earlier header's
/// column position but the later header's text, mirroring the
/// dict-overwrite behavior of the original tooling; the inputs are
/// user-controlled single files, so the tie-break is acceptable.
pub fn map_headers(headers: &[String]) -> HeaderPlan {
    let mut normalized: Vec<(String, String)> = Vec::new();
    for header in headers {
        let norm = normalize_header(header);
        match normalized.iter_mut().find(|(existing, _)| *existing == norm) {
            Some(entry) => entry.1 = header.clone(),
            None => normalized.push((norm, header.clone())),
        }
    }

    let verbatim = |label: &str| headers.iter().any(|header| header == label);

    // Whole-token first/last detection; skipped when a literal Name column
    // already exists. The synthesized column counts as installed before
    // the keyword pass, so Name is not claimed twice.
    let synthesis = if verbatim(CanonicalField::Name.label()) {
        None
    } else {
        let original_of = |token: &str| {
            normalized
                .iter()
                .find(|(norm, _)| norm == token)
                .map(|(_, original)| original.clone())
        };
        match (original_of("firstname"), original_of("lastname")) {
            (Some(first), Some(last)) => Some(NameSynthesis { first, last }),
            _ => None,
        }
    };

    let mut claimed: HashSet<String> = HashSet::new();
    let mut renames = Vec::new();
    for field in CanonicalField::priority() {
        if verbatim(field.label()) {
            continue;
        }
        if field == CanonicalField::Name && synthesis.is_some() {
            continue;
        }
        let hit = normalized.iter().find(|(norm, original)| {
            !claimed.contains(original.as_str())
                && field.keywords().iter().any(|keyword| norm.contains(keyword))
        });
        if let Some((_, original)) = hit {
            claimed.insert(original.clone());
            renames.push((original.clone(), field));
        }
    }

    HeaderPlan { renames, synthesis }
}
