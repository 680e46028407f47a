use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("no address match for '{query}'")]
    AddressNotFound { query: String },

    #[error("no walking route between the given points")]
    NoRoute,

    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("malformed coordinate '{0}' in geocoder response")]
    MalformedCoordinate(String),
}

/// A walking distance between two points, as reported by a routing backend.
/// Geometry is the route polyline when the backend returns one.
#[derive(Debug, Clone)]
pub struct WalkingDistance {
    pub meters: f64,
    pub geometry: Option<Vec<geo_types::Point>>,
}

/// Pairwise walking-distance lookup against a routing backend.
pub trait DistanceProvider {
    async fn walking_distance(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<WalkingDistance, ProviderError>;
}

/// Free-text address resolution.
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> Result<geo_types::Point, ProviderError>;
}
