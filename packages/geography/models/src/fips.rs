//! US state FIPS code utilities.
//!
//! A single table maps two-digit FIPS codes, two-letter state
//! abbreviations, and full state names for the 50 US states + DC.
//! Lookups by abbreviation or name are case-insensitive.

use serde::Serialize;

/// One row of the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UsState {
    /// Two-digit FIPS code (e.g. `"51"`).
    pub fips: &'static str,
    /// Two-letter postal abbreviation (e.g. `"VA"`).
    pub abbr: &'static str,
    /// Full name (e.g. `"Virginia"`).
    pub name: &'static str,
}

const fn state(fips: &'static str, abbr: &'static str, name: &'static str) -> UsState {
    UsState { fips, abbr, name }
}

/// The 50 states + DC, ordered by FIPS code.
pub const STATES: &[UsState] = &[
    state("01", "AL", "Alabama"),
    state("02", "AK", "Alaska"),
    state("04", "AZ", "Arizona"),
    state("05", "AR", "Arkansas"),
    state("06", "CA", "California"),
    state("08", "CO", "Colorado"),
    state("09", "CT", "Connecticut"),
    state("10", "DE", "Delaware"),
    state("11", "DC", "District of Columbia"),
    state("12", "FL", "Florida"),
    state("13", "GA", "Georgia"),
    state("15", "HI", "Hawaii"),
    state("16", "ID", "Idaho"),
    state("17", "IL", "Illinois"),
    state("18", "IN", "Indiana"),
    state("19", "IA", "Iowa"),
    state("20", "KS", "Kansas"),
    state("21", "KY", "Kentucky"),
    state("22", "LA", "Louisiana"),
    state("23", "ME", "Maine"),
    state("24", "MD", "Maryland"),
    state("25", "MA", "Massachusetts"),
    state("26", "MI", "Michigan"),
    state("27", "MN", "Minnesota"),
    state("28", "MS", "Mississippi"),
    state("29", "MO", "Missouri"),
    state("30", "MT", "Montana"),
    state("31", "NE", "Nebraska"),
    state("32", "NV", "Nevada"),
    state("33", "NH", "New Hampshire"),
    state("34", "NJ", "New Jersey"),
    state("35", "NM", "New Mexico"),
    state("36", "NY", "New York"),
    state("37", "NC", "North Carolina"),
    state("38", "ND", "North Dakota"),
    state("39", "OH", "Ohio"),
    state("40", "OK", "Oklahoma"),
    state("41", "OR", "Oregon"),
    state("42", "PA", "Pennsylvania"),
    state("44", "RI", "Rhode Island"),
    state("45", "SC", "South Carolina"),
    state("46", "SD", "South Dakota"),
    state("47", "TN", "Tennessee"),
    state("48", "TX", "Texas"),
    state("49", "UT", "Utah"),
    state("50", "VT", "Vermont"),
    state("51", "VA", "Virginia"),
    state("53", "WA", "Washington"),
    state("54", "WV", "West Virginia"),
    state("55", "WI", "Wisconsin"),
    state("56", "WY", "Wyoming"),
];

/// Looks up a state by two-digit FIPS code.
#[must_use]
pub fn by_fips(fips: &str) -> Option<&'static UsState> {
    STATES.iter().find(|s| s.fips == fips.trim())
}

/// Looks up a state by two-letter abbreviation, case-insensitively.
#[must_use]
pub fn by_abbr(abbr: &str) -> Option<&'static UsState> {
    let abbr = abbr.trim();
    STATES.iter().find(|s| s.abbr.eq_ignore_ascii_case(abbr))
}

/// Looks up a state by full name, case-insensitively.
///
/// `"Washington DC"` and `"Washington, D.C."` are accepted for DC.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static UsState> {
    let name = name.trim();
    if let Some(found) = STATES.iter().find(|s| s.name.eq_ignore_ascii_case(name)) {
        return Some(found);
    }
    let squashed = name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_ascii_lowercase();
    match squashed.as_str() {
        "washingtondc" | "dc" => by_abbr("DC"),
        _ => None,
    }
}

/// Normalizes a full state name or an abbreviation to a table row.
#[must_use]
pub fn lookup(name_or_abbr: &str) -> Option<&'static UsState> {
    let value = name_or_abbr.trim();
    if value.len() == 2 {
        return by_abbr(value);
    }
    by_name(value)
}

/// Maps a two-letter abbreviation to its FIPS code.
#[must_use]
pub fn abbr_to_fips(abbr: &str) -> Option<&'static str> {
    by_abbr(abbr).map(|s| s.fips)
}
