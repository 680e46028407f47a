use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::distance_provider::{DistanceProvider, ProviderError, WalkingDistance};

pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/foot/";
pub const PUBLIC_OSRM_URL: &str = "http://router.project-osrm.org";

#[derive(Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    /// Route length in meters
    distance: f64,
    geometry: Option<RouteGeometry>,
}

/// GeoJSON LineString, coordinates as [lon, lat] pairs
#[derive(Deserialize)]
struct RouteGeometry {
    coordinates: Vec<[f64; 2]>,
}

pub struct OsrmClientParams {
    pub osrm_url: String,
    pub request_timeout: Duration,
}

impl Default for OsrmClientParams {
    fn default() -> Self {
        Self {
            osrm_url: PUBLIC_OSRM_URL.to_owned(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct OsrmClient {
    params: OsrmClientParams,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(params: OsrmClientParams) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(params.request_timeout)
            .build()?;

        Ok(Self { params, client })
    }

    fn route_url(&self, from: geo_types::Point, to: geo_types::Point) -> String {
        let mut url = self.params.osrm_url.clone();
        url.push_str(OSRM_ROUTE_API_PATH);
        url.push_str(&format!(
            "{},{};{},{}",
            from.x(),
            from.y(),
            to.x(),
            to.y()
        ));
        url
    }
}

fn parse_route(response: RouteResponse) -> Result<WalkingDistance, ProviderError> {
    if response.code != "Ok" {
        return Err(ProviderError::NoRoute);
    }

    let route = response.routes.into_iter().next().ok_or(ProviderError::NoRoute)?;

    let geometry = route.geometry.map(|geometry| {
        geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| geo_types::Point::new(lon, lat))
            .collect()
    });

    Ok(WalkingDistance {
        meters: route.distance,
        geometry,
    })
}

impl DistanceProvider for OsrmClient {
    async fn walking_distance(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<WalkingDistance, ProviderError> {
        let url = self.route_url(from, to);

        debug!(%url, "OSRM: requesting walking route");

        let response = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let route_response: RouteResponse = response.json().await?;

        parse_route(route_response)
    }
}
