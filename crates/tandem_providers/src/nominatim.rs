use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::distance_provider::{Geocoder, ProviderError};

pub const NOMINATIM_SEARCH_API_PATH: &str = "/search";
pub const PUBLIC_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim serializes coordinates as strings
#[derive(Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

pub struct NominatimClientParams {
    pub nominatim_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for NominatimClientParams {
    fn default() -> Self {
        Self {
            nominatim_url: PUBLIC_NOMINATIM_URL.to_owned(),
            user_agent: "tandem_planner".to_owned(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct NominatimClient {
    params: NominatimClientParams,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(params: NominatimClientParams) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(params.user_agent.clone())
            .timeout(params.request_timeout)
            .build()?;

        Ok(Self { params, client })
    }
}

fn parse_search_results(
    query: &str,
    results: Vec<SearchResult>,
) -> Result<geo_types::Point, ProviderError> {
    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::AddressNotFound {
            query: query.to_owned(),
        })?;

    let lat: f64 = result
        .lat
        .parse()
        .map_err(|_| ProviderError::MalformedCoordinate(result.lat.clone()))?;
    let lon: f64 = result
        .lon
        .parse()
        .map_err(|_| ProviderError::MalformedCoordinate(result.lon.clone()))?;

    Ok(geo_types::Point::new(lon, lat))
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<geo_types::Point, ProviderError> {
        let mut url = self.params.nominatim_url.clone();
        url.push_str(NOMINATIM_SEARCH_API_PATH);

        debug!(address, "Nominatim: geocoding address");

        let response = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let results: Vec<SearchResult> = response.json().await?;

        parse_search_results(address, results)
    }
}
