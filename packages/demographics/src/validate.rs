//! Turns one row of provider aggregates into a validated profile.
//!
//! A row is accepted whole or rejected whole: a single invalid core
//! field fails the tier.

use property_intel_demographics_models::{AcsAggregates, AcsGeography, DataTier, DemographicProfile};
use property_intel_models::{Tagged, clamp_percent, round1};

use crate::DemographicError;

/// Share of income assumed affordable for rent when the provider has no
/// median rent.
pub const RENT_INCOME_SHARE: f64 = 0.30;

/// Source label for a tier.
#[must_use]
pub const fn source_label(tier: DataTier) -> &'static str {
    match tier {
        DataTier::County => "US Census Bureau ACS 5-year (county level)",
        DataTier::State => "US Census Bureau ACS 5-year (state level)",
        DataTier::Estimate => property_intel_demographics_models::NATIONAL_ESTIMATE_SOURCE,
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Validates a row and computes the derived indicators.
///
/// # Errors
///
/// Returns [`DemographicError::Validation`] if population, median income,
/// or median home value is missing or not positive, or if the labor
/// force / unemployed pair is unusable.
#[allow(clippy::cast_precision_loss)] // populations are far below 2^52
pub fn build_profile(
    geography: &AcsGeography,
    row: &AcsAggregates,
) -> Result<DemographicProfile, DemographicError> {
    let invalid = |message: &str| DemographicError::Validation {
        geography: geography.to_string(),
        message: message.to_string(),
    };

    let population = row
        .population
        .filter(|p| *p > 0)
        .ok_or_else(|| invalid("population missing or not positive"))?;
    let median_income = positive(row.median_income)
        .ok_or_else(|| invalid("median income missing or not positive"))?;
    let median_home_value = positive(row.median_home_value)
        .ok_or_else(|| invalid("median home value missing or not positive"))?;

    let (labor_force, unemployed) = match (positive(row.labor_force), row.unemployed) {
        (Some(labor_force), Some(unemployed)) if unemployed >= 0.0 => (labor_force, unemployed),
        _ => return Err(invalid("labor force / unemployed pair missing")),
    };
    let employment_rate = round1(clamp_percent(
        (labor_force - unemployed) / labor_force * 100.0,
    ));

    let education_level = row
        .degree_holders()
        .map(|degrees| Tagged::derived(round1(clamp_percent(degrees / population as f64 * 100.0))));

    let median_rent = positive(row.median_rent).map_or_else(
        || Tagged::derived(round1(median_income * RENT_INCOME_SHARE / 12.0)),
        Tagged::verified,
    );

    let tier = geography.tier();
    Ok(DemographicProfile {
        population: Tagged::verified(population),
        median_income: Tagged::verified(median_income),
        median_home_value: Tagged::verified(median_home_value),
        median_rent,
        employment_rate: Tagged::derived(employment_rate),
        education_level,
        income_to_housing_ratio: Tagged::derived(round1(median_home_value / median_income)),
        data_tier: tier,
        geoid: geography.geoid(),
        source: source_label(tier).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use property_intel_models::Provenance;

    use super::*;

    fn county() -> AcsGeography {
        AcsGeography::County {
            state_fips: "51".to_string(),
            county_fips: "153".to_string(),
        }
    }

    fn prince_william() -> AcsAggregates {
        AcsAggregates {
            name: Some("Prince William County, Virginia".to_string()),
            population: Some(482_204),
            median_income: Some(123_193.0),
            median_home_value: Some(455_300.0),
            median_rent: Some(1_904.0),
            labor_force: Some(260_000.0),
            unemployed: Some(10_400.0),
            bachelors: Some(80_000.0),
            masters: Some(45_000.0),
            professional: Some(6_000.0),
            doctorate: Some(5_000.0),
        }
    }

    #[test]
    fn builds_county_profile() {
        let profile = build_profile(&county(), &prince_william()).unwrap();
        assert_eq!(profile.data_tier, DataTier::County);
        assert_eq!(profile.geoid, "51153");
        assert_eq!(profile.source, "US Census Bureau ACS 5-year (county level)");
        assert_eq!(profile.population, Tagged::verified(482_204));
        assert_eq!(profile.median_rent, Tagged::verified(1_904.0));
        assert_eq!(profile.employment_rate, Tagged::derived(96.0));
        assert_eq!(profile.education_level, Some(Tagged::derived(28.2)));
        assert_eq!(profile.income_to_housing_ratio, Tagged::derived(3.7));
    }

    #[test]
    fn zero_core_field_rejects_row() {
        for row in [
            AcsAggregates {
                population: Some(0),
                ..prince_william()
            },
            AcsAggregates {
                median_income: Some(0.0),
                ..prince_william()
            },
            AcsAggregates {
                median_home_value: None,
                ..prince_william()
            },
        ] {
            assert!(matches!(
                build_profile(&county(), &row),
                Err(DemographicError::Validation { .. })
            ));
        }
    }

    #[test]
    fn missing_labor_pair_rejects_row() {
        let row = AcsAggregates {
            unemployed: None,
            ..prince_william()
        };
        assert!(matches!(
            build_profile(&county(), &row),
            Err(DemographicError::Validation { .. })
        ));
    }

    #[test]
    fn education_is_clamped() {
        let row = AcsAggregates {
            population: Some(1_000),
            bachelors: Some(900.0),
            masters: Some(900.0),
            ..prince_william()
        };
        let profile = build_profile(&county(), &row).unwrap();
        assert_eq!(profile.education_level, Some(Tagged::derived(100.0)));
    }

    #[test]
    fn missing_degree_counts_leave_education_absent() {
        let row = AcsAggregates {
            bachelors: None,
            masters: None,
            professional: None,
            doctorate: None,
            ..prince_william()
        };
        let profile = build_profile(&county(), &row).unwrap();
        assert_eq!(profile.education_level, None);
    }

    #[test]
    fn employment_is_clamped() {
        let row = AcsAggregates {
            labor_force: Some(100.0),
            unemployed: Some(250.0),
            ..prince_william()
        };
        let profile = build_profile(&county(), &row).unwrap();
        assert!((profile.employment_rate.value - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_rent_is_derived_from_income() {
        let row = AcsAggregates {
            median_income: Some(75_000.0),
            median_rent: None,
            ..prince_william()
        };
        let profile = build_profile(&county(), &row).unwrap();
        assert_eq!(profile.median_rent.value, 1_875.0);
        assert_eq!(profile.median_rent.provenance, Provenance::Derived);
    }
}
