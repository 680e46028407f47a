use fxhash::FxHashMap;
use parking_lot::Mutex;

use crate::distance_provider::{DistanceProvider, ProviderError, WalkingDistance};

/// Key on the exact coordinate bit patterns, ordered. Routing backends do
/// not guarantee symmetric distances, so (from, to) and (to, from) are
/// separate entries.
type PairKey = [u64; 4];

fn pair_key(from: geo_types::Point, to: geo_types::Point) -> PairKey {
    [
        from.x().to_bits(),
        from.y().to_bits(),
        to.x().to_bits(),
        to.y().to_bits(),
    ]
}

/// Memoizing wrapper around a distance provider. Repeated lookups for the
/// same coordinate pair hit the in-memory map instead of the backend.
pub struct CachingProvider<D> {
    inner: D,
    entries: Mutex<FxHashMap<PairKey, WalkingDistance>>,
}

impl<D> CachingProvider<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            entries: Mutex::new(FxHashMap::default()),
        }
    }
}

impl<D: DistanceProvider> DistanceProvider for CachingProvider<D> {
    async fn walking_distance(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<WalkingDistance, ProviderError> {
        let key = pair_key(from, to);

        if let Some(hit) = self.entries.lock().get(&key) {
            return Ok(hit.clone());
        }

        let distance = self.inner.walking_distance(from, to).await?;
        self.entries.lock().insert(key, distance.clone());

        Ok(distance)
    }
}
