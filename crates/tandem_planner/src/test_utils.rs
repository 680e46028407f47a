use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fxhash::FxHashMap;

use tandem_providers::distance_provider::{
    DistanceProvider, Geocoder, ProviderError, WalkingDistance,
};

use crate::graph::Graph;

pub(crate) fn graph_from_edges(nodes: &[&str], edges: &[(&str, &str, f64)]) -> Graph {
    let mut graph = Graph::with_nodes(nodes.iter().copied());

    for &(u, v, meters) in edges {
        let u = graph.node_id(u).unwrap();
        let v = graph.node_id(v).unwrap();
        graph.add_edge(u, v, meters);
    }

    graph
}

/// Geocoder backed by a fixed address table.
pub(crate) struct StaticGeocoder {
    coords: FxHashMap<String, geo_types::Point>,
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<geo_types::Point, ProviderError> {
        self.coords
            .get(address)
            .copied()
            .ok_or_else(|| ProviderError::AddressNotFound {
                query: address.to_owned(),
            })
    }
}

/// Distance provider backed by a fixed pair table, counting every lookup.
/// Pairs absent from the table fail with NoRoute.
pub(crate) struct StaticDistances {
    meters: FxHashMap<(u64, u64), f64>,
    pub(crate) calls: Arc<AtomicUsize>,
}

impl DistanceProvider for StaticDistances {
    async fn walking_distance(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<WalkingDistance, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.meters
            .get(&(from.x().to_bits(), to.x().to_bits()))
            .copied()
            .map(|meters| WalkingDistance {
                meters,
                geometry: None,
            })
            .ok_or(ProviderError::NoRoute)
    }
}

/// Builds a location mapping plus matching mock geocoder and provider from
/// a label/distance table. Label number `i` resolves to the point (i, 0);
/// distances are keyed on the x coordinates in both directions.
pub(crate) fn static_scenario(
    labels: &[&str],
    distances: &[(&str, &str, f64)],
) -> (BTreeMap<String, String>, StaticGeocoder, StaticDistances) {
    let mut locations = BTreeMap::new();
    let mut coords = FxHashMap::default();
    let mut xs = FxHashMap::default();

    for (i, label) in labels.iter().enumerate() {
        let address = format!("{label} Street, Davis, CA");
        let x = i as f64;

        locations.insert(label.to_string(), address.clone());
        coords.insert(address, geo_types::Point::new(x, 0.0));
        xs.insert(label.to_string(), x);
    }

    let mut meters = FxHashMap::default();
    for &(u, v, m) in distances {
        let ux = xs[u].to_bits();
        let vx = xs[v].to_bits();
        meters.insert((ux, vx), m);
        meters.insert((vx, ux), m);
    }

    (
        locations,
        StaticGeocoder { coords },
        StaticDistances {
            meters,
            calls: Arc::new(AtomicUsize::new(0)),
        },
    )
}
