use geo::{Distance, Haversine};

use crate::distance_provider::{DistanceProvider, ProviderError, WalkingDistance};

/// Straight-line fallback provider. Useful offline and in tests, where a
/// routing backend is unavailable or nondeterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrowFliesProvider;

impl DistanceProvider for CrowFliesProvider {
    async fn walking_distance(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<WalkingDistance, ProviderError> {
        let meters = Haversine.distance(from, to);

        Ok(WalkingDistance {
            meters,
            geometry: Some(vec![from, to]),
        })
    }
}
