#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US Census Bureau ACS 5-year API client.
//!
//! Serves two consumers:
//!
//! - [`CountyDirectory`]: the `NAME` of every county in a state, used to
//!   resolve county FIPS codes.
//! - [`StatisticsProvider`]: one row of aggregates for a county or a
//!   state.
//!
//! The API answers with a JSON array of string arrays, header row first:
//!
//! ```text
//! [["NAME","B01003_001E",...,"state","county"],
//!  ["Prince William County, Virginia","482204",...,"51","153"]]
//! ```
//!
//! Requests need `CENSUS_API_KEY`; without it every call fails with
//! [`ProviderError::MissingCredentials`] before touching the network.

use async_trait::async_trait;
use property_intel_demographics::StatisticsProvider;
use property_intel_demographics_models::{AcsAggregates, AcsGeography};
use property_intel_geography::CountyDirectory;
use property_intel_geography_models::county::CountyListing;
use property_intel_provider::registry::{self, ProviderConfig, ServiceKind};
use property_intel_provider::{ProviderError, http};

/// ACS variables requested for an aggregate row, in request order.
pub const AGGREGATE_VARIABLES: &[&str] = &[
    POPULATION,
    MEDIAN_INCOME,
    MEDIAN_HOME_VALUE,
    MEDIAN_RENT,
    LABOR_FORCE,
    UNEMPLOYED,
    BACHELORS,
    MASTERS,
    PROFESSIONAL,
    DOCTORATE,
];

const POPULATION: &str = "B01003_001E";
const MEDIAN_INCOME: &str = "B19013_001E";
const MEDIAN_HOME_VALUE: &str = "B25077_001E";
const MEDIAN_RENT: &str = "B25064_001E";
const LABOR_FORCE: &str = "B23025_002E";
const UNEMPLOYED: &str = "B23025_005E";
const BACHELORS: &str = "B15003_022E";
const MASTERS: &str = "B15003_023E";
const PROFESSIONAL: &str = "B15003_024E";
const DOCTORATE: &str = "B15003_025E";

/// ACS API client for one dataset (e.g. `2022/acs/acs5`).
#[derive(Clone)]
pub struct AcsClient {
    client: reqwest::Client,
    service_id: String,
    endpoint: String,
    key_env: String,
    api_key: Option<String>,
}

impl AcsClient {
    /// Creates a client for `{base_url}/{dataset}`.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        dataset: &str,
        key_env: &str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            service_id: "census".to_string(),
            endpoint: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                dataset.trim_matches('/')
            ),
            key_env: key_env.to_string(),
            api_key,
        }
    }

    /// Builds a client from the first enabled statistics service.
    ///
    /// A missing API key is not an error here; it surfaces on each call.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] if no enabled ACS service
    /// is registered.
    pub fn from_registry(client: &reqwest::Client) -> Result<Self, ProviderError> {
        registry::enabled_of_kind(ServiceKind::Statistics)
            .into_iter()
            .find_map(|service| match &service.provider {
                ProviderConfig::CensusAcs {
                    base_url,
                    dataset,
                    key_env,
                } => {
                    let mut acs = Self::new(
                        client.clone(),
                        base_url,
                        dataset,
                        key_env,
                        service.api_key(),
                    );
                    acs.service_id.clone_from(&service.id);
                    Some(acs)
                }
                _ => None,
            })
            .ok_or_else(|| ProviderError::NotConfigured {
                kind: ServiceKind::Statistics.to_string(),
            })
    }

    /// The dataset endpoint, e.g. `https://api.census.gov/data/2022/acs/acs5`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredentials {
                service: self.service_id.clone(),
                env_var: self.key_env.clone(),
            })
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<serde_json::Value, ProviderError> {
        let key = self.api_key()?;
        http::send_json(
            self.client
                .get(&self.endpoint)
                .query(params)
                .query(&[("key", key)]),
        )
        .await
    }

    /// Lists every county of a state.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the key is missing, the request fails,
    /// or the response is not a county table.
    pub async fn list_counties(
        &self,
        state_fips: &str,
    ) -> Result<Vec<CountyListing>, ProviderError> {
        let within = format!("state:{state_fips}");
        let body = self
            .query(&[("get", "NAME"), ("for", "county:*"), ("in", within.as_str())])
            .await?;
        let counties = parse_county_listing(&body)?;
        log::debug!("State {state_fips}: {} counties listed", counties.len());
        Ok(counties)
    }

    /// Fetches one aggregate row.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the key is missing, the request fails,
    /// or the response has no data row.
    pub async fn fetch_aggregates(
        &self,
        geography: &AcsGeography,
    ) -> Result<AcsAggregates, ProviderError> {
        let get = format!("NAME,{}", AGGREGATE_VARIABLES.join(","));
        let body = match geography {
            AcsGeography::County {
                state_fips,
                county_fips,
            } => {
                let target = format!("county:{county_fips}");
                let within = format!("state:{state_fips}");
                self.query(&[
                    ("get", get.as_str()),
                    ("for", target.as_str()),
                    ("in", within.as_str()),
                ])
                .await?
            }
            AcsGeography::State { state_fips } => {
                let target = format!("state:{state_fips}");
                self.query(&[("get", get.as_str()), ("for", target.as_str())]).await?
            }
        };
        parse_aggregates(&body)
    }
}

#[async_trait]
impl CountyDirectory for AcsClient {
    async fn list_counties(&self, state_fips: &str) -> Result<Vec<CountyListing>, ProviderError> {
        Self::list_counties(self, state_fips).await
    }
}

#[async_trait]
impl StatisticsProvider for AcsClient {
    async fn fetch_aggregates(
        &self,
        geography: &AcsGeography,
    ) -> Result<AcsAggregates, ProviderError> {
        Self::fetch_aggregates(self, geography).await
    }
}

/// Splits an ACS response into its header and data rows.
fn table(body: &serde_json::Value) -> Result<(Vec<&str>, &[serde_json::Value]), ProviderError> {
    let rows = body
        .as_array()
        .ok_or_else(|| ProviderError::malformed("ACS response is not an array"))?;
    let (header, data) = rows
        .split_first()
        .ok_or_else(|| ProviderError::malformed("ACS response is empty"))?;
    let header = header
        .as_array()
        .ok_or_else(|| ProviderError::malformed("ACS header row is not an array"))?
        .iter()
        .map(|h| h.as_str().unwrap_or_default())
        .collect();
    Ok((header, data))
}

fn column(header: &[&str], name: &str) -> Result<usize, ProviderError> {
    header
        .iter()
        .position(|h| *h == name)
        .ok_or_else(|| ProviderError::malformed(format!("ACS response has no '{name}' column")))
}

fn text_cell<'a>(row: &'a serde_json::Value, index: usize) -> Option<&'a str> {
    row.get(index)?.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a non-negative number. ACS encodes "not available" as large
/// negative sentinels (e.g. `-666666666`) or `null`.
fn number_cell(row: &serde_json::Value, index: usize) -> Option<f64> {
    let cell = row.get(index)?;
    cell.as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| cell.as_f64())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn count_cell(row: &serde_json::Value, index: usize) -> Option<u64> {
    let cell = row.get(index)?;
    cell.as_str()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .or_else(|| cell.as_u64())
}

/// Parses a `get=NAME&for=county:*` response.
///
/// # Errors
///
/// Returns [`ProviderError::Malformed`] if the table shape is wrong.
pub fn parse_county_listing(body: &serde_json::Value) -> Result<Vec<CountyListing>, ProviderError> {
    let (header, data) = table(body)?;
    let name = column(&header, "NAME")?;
    let state = column(&header, "state")?;
    let county = column(&header, "county")?;

    Ok(data
        .iter()
        .filter_map(|row| {
            Some(CountyListing {
                full_name: text_cell(row, name)?.to_string(),
                state_fips: text_cell(row, state)?.to_string(),
                county_fips: text_cell(row, county)?.to_string(),
            })
        })
        .collect())
}

/// Parses an aggregate response. Only the first data row is used.
///
/// # Errors
///
/// Returns [`ProviderError::Malformed`] if there is no data row or a
/// requested variable column is missing.
pub fn parse_aggregates(body: &serde_json::Value) -> Result<AcsAggregates, ProviderError> {
    let (header, data) = table(body)?;
    let Some(row) = data.first() else {
        return Err(ProviderError::malformed("ACS response has no data rows"));
    };

    let number = |variable: &str| -> Result<Option<f64>, ProviderError> {
        Ok(number_cell(row, column(&header, variable)?))
    };

    Ok(AcsAggregates {
        name: header
            .iter()
            .position(|h| *h == "NAME")
            .and_then(|i| text_cell(row, i))
            .map(String::from),
        population: count_cell(row, column(&header, POPULATION)?),
        median_income: number(MEDIAN_INCOME)?,
        median_home_value: number(MEDIAN_HOME_VALUE)?,
        median_rent: number(MEDIAN_RENT)?,
        labor_force: number(LABOR_FORCE)?,
        unemployed: number(UNEMPLOYED)?,
        bachelors: number(BACHELORS)?,
        masters: number(MASTERS)?,
        professional: number(PROFESSIONAL)?,
        doctorate: number(DOCTORATE)?,
    })
}
