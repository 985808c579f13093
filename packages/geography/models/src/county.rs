//! County name normalization and county-FIPS matching.
//!
//! Both functions are pure so they can be tested without a statistics
//! provider. Matching is a case-insensitive substring search of the
//! normalized candidate against each county's name within one state's
//! listing:
//!
//! - one hit resolves;
//! - several hits are ambiguous and stay unresolved, even when one of
//!   them equals the candidate exactly (`"york"` against "York County"
//!   and "New York County").

use serde::{Deserialize, Serialize};

/// Trailing designations removed during normalization, longest first so
/// `"City and Borough"` is stripped whole before `"Borough"`.
pub const COUNTY_SUFFIXES: &[&str] = &[
    "city and borough",
    "census area",
    "municipality",
    "borough",
    "parish",
    "county",
];

/// A county as listed by the statistics provider for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyListing {
    /// Listing name, usually `"<County>, <State>"`
    /// (e.g. `"Prince William County, Virginia"`).
    pub full_name: String,
    /// Two-digit state FIPS code.
    pub state_fips: String,
    /// Three-digit county FIPS code.
    pub county_fips: String,
}

impl CountyListing {
    /// The county part of the listing name (`"Prince William County"`).
    #[must_use]
    pub fn county_name(&self) -> &str {
        self.full_name
            .split_once(',')
            .map_or(self.full_name.as_str(), |(county, _)| county)
            .trim()
    }
}

/// Outcome of [`match_county`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountyMatch<'a> {
    /// Exactly one county matched.
    Resolved(&'a CountyListing),
    /// Several counties matched.
    Ambiguous(Vec<&'a CountyListing>),
    /// No county matched.
    NotFound,
}

/// Normalizes a raw county name for matching.
///
/// Lowercases, trims, and removes one trailing designation from
/// [`COUNTY_SUFFIXES`]. Returns `None` if nothing is left.
#[must_use]
pub fn normalize_county_name(raw: &str) -> Option<String> {
    let mut name = raw.trim().to_lowercase();

    for suffix in COUNTY_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            if stripped.is_empty() || stripped.ends_with(' ') {
                name = stripped.trim_end().to_string();
                break;
            }
        }
    }

    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Matches a normalized county name against one state's listing.
///
/// Deterministic: the same candidate and listing always produce the same
/// outcome.
#[must_use]
pub fn match_county<'a>(candidate: &str, listings: &'a [CountyListing]) -> CountyMatch<'a> {
    let candidate = candidate.trim().to_lowercase();
    if candidate.is_empty() {
        return CountyMatch::NotFound;
    }

    let hits: Vec<&CountyListing> = listings
        .iter()
        .filter(|c| c.county_name().to_lowercase().contains(&candidate))
        .collect();

    match hits.as_slice() {
        [] => CountyMatch::NotFound,
        [only] => CountyMatch::Resolved(only),
        _ => CountyMatch::Ambiguous(hits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(full_name: &str, county_fips: &str) -> CountyListing {
        CountyListing {
            full_name: full_name.to_string(),
            state_fips: "51".to_string(),
            county_fips: county_fips.to_string(),
        }
    }

    fn virginia() -> Vec<CountyListing> {
        vec![
            listing("Fairfax County, Virginia", "059"),
            listing("Fairfax city, Virginia", "600"),
            listing("Prince William County, Virginia", "153"),
            listing("Richmond County, Virginia", "159"),
            listing("Richmond city, Virginia", "760"),
            listing("Loudoun County, Virginia", "107"),
        ]
    }

    #[test]
    fn normalizes_designations() {
        assert_eq!(
            normalize_county_name("Prince William County").as_deref(),
            Some("prince william")
        );
        assert_eq!(
            normalize_county_name(" Orleans Parish ").as_deref(),
            Some("orleans")
        );
        assert_eq!(
            normalize_county_name("Bethel Census Area").as_deref(),
            Some("bethel")
        );
        assert_eq!(
            normalize_county_name("Juneau City and Borough").as_deref(),
            Some("juneau")
        );
        assert_eq!(
            normalize_county_name("Matanuska-Susitna Borough").as_deref(),
            Some("matanuska-susitna")
        );
        assert_eq!(
            normalize_county_name("Anchorage Municipality").as_deref(),
            Some("anchorage")
        );
    }

    #[test]
    fn only_trailing_designation_is_removed() {
        assert_eq!(
            normalize_county_name("County Line").as_deref(),
            Some("county line")
        );
        assert_eq!(
            normalize_county_name("Richmond City").as_deref(),
            Some("richmond city")
        );
        assert_eq!(normalize_county_name("County"), None);
        assert_eq!(normalize_county_name("   "), None);
    }

    #[test]
    fn resolves_single_substring_hit() {
        let counties = virginia();
        assert_eq!(
            match_county("prince william", &counties),
            CountyMatch::Resolved(&counties[2])
        );
    }

    #[test]
    fn exact_base_name_does_not_break_tie() {
        let counties = virginia();
        assert_eq!(
            match_county("richmond", &counties),
            CountyMatch::Ambiguous(vec![&counties[3], &counties[4]])
        );
        assert_eq!(
            match_county("richmond city", &counties),
            CountyMatch::Resolved(&counties[4])
        );
    }

    #[test]
    fn york_and_new_york_stay_ambiguous() {
        let counties = vec![
            listing("New York County, New York", "061"),
            listing("York County, Pennsylvania", "133"),
        ];
        assert_eq!(
            match_county("york", &counties),
            CountyMatch::Ambiguous(vec![&counties[0], &counties[1]])
        );
    }

    #[test]
    fn shared_base_name_is_ambiguous() {
        let counties = vec![
            listing("Washington County, Louisiana", "998"),
            listing("Washington Parish, Louisiana", "117"),
            listing("Orleans Parish, Louisiana", "071"),
        ];
        let outcome = match_county("washington", &counties);
        assert_eq!(
            outcome,
            CountyMatch::Ambiguous(vec![&counties[0], &counties[1]])
        );
        assert_eq!(match_county("washington", &counties), outcome);
    }

    #[test]
    fn state_name_in_listing_does_not_match() {
        let counties = virginia();
        assert_eq!(match_county("virginia", &counties), CountyMatch::NotFound);
    }

    #[test]
    fn blank_candidate_never_matches() {
        assert_eq!(match_county("  ", &virginia()), CountyMatch::NotFound);
    }

    #[test]
    fn listing_parts() {
        let county = listing("Prince William County, Virginia", "153");
        assert_eq!(county.county_name(), "Prince William County");
    }
}
