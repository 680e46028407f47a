use std::collections::BTreeMap;

use futures::stream::{self, StreamExt, TryStreamExt};
use fxhash::FxHashMap;
use tracing::{debug, info};

use tandem_providers::distance_provider::{DistanceProvider, Geocoder};

use crate::error::PlanError;
use crate::graph::Graph;

pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 4;

pub struct GraphBuilderParams {
    /// Upper bound on in-flight provider lookups. Keeps the O(n²) pair
    /// queries from hammering a rate-limited backend.
    pub lookup_concurrency: usize,

    /// Pairs farther apart than this get no edge, leaving the graph
    /// sparse. None builds the complete graph.
    pub max_edge_meters: Option<f64>,
}

impl Default for GraphBuilderParams {
    fn default() -> Self {
        Self {
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            max_edge_meters: None,
        }
    }
}

/// Builds a walking graph over labeled locations: geocodes every address,
/// then queries the distance provider once per unordered pair.
pub struct GraphBuilder<G, D> {
    geocoder: G,
    provider: D,
    params: GraphBuilderParams,
}

impl<G: Geocoder, D: DistanceProvider> GraphBuilder<G, D> {
    pub fn new(geocoder: G, provider: D) -> Self {
        Self::with_params(geocoder, provider, GraphBuilderParams::default())
    }

    pub fn with_params(geocoder: G, provider: D, params: GraphBuilderParams) -> Self {
        Self {
            geocoder,
            provider,
            params,
        }
    }

    /// Any single geocode or distance failure aborts the whole build; a
    /// partial graph is never returned.
    pub async fn build(&self, locations: &BTreeMap<String, String>) -> Result<Graph, PlanError> {
        if locations.len() < 2 {
            return Err(PlanError::NotEnoughLocations(locations.len()));
        }

        let mut graph = Graph::with_nodes(locations.keys().cloned());

        let coords = self.geocode_all(locations).await?;

        let pairs: Vec<(usize, usize)> = (0..graph.node_count())
            .flat_map(|u| ((u + 1)..graph.node_count()).map(move |v| (u, v)))
            .collect();

        debug!(
            nodes = graph.node_count(),
            pairs = pairs.len(),
            "querying pairwise walking distances"
        );

        // Lookups run concurrently; results are aggregated here, in one
        // owner, before any edge is written
        let edges: Vec<(usize, usize, f64)> = stream::iter(pairs)
            .map(|(u, v)| {
                let from_label = graph.label(u);
                let to_label = graph.label(v);
                let from = coords[from_label];
                let to = coords[to_label];

                async move {
                    debug!(from = from_label, to = to_label, "walking distance lookup");
                    let distance = self
                        .provider
                        .walking_distance(from, to)
                        .await
                        .map_err(|source| PlanError::LocationResolution {
                            labels: vec![from_label.to_owned(), to_label.to_owned()],
                            source,
                        })?;

                    Ok::<_, PlanError>((u, v, distance.meters))
                }
            })
            .buffer_unordered(self.params.lookup_concurrency)
            .try_collect()
            .await?;

        for (u, v, meters) in edges {
            if !meters.is_finite() || meters < 0.0 {
                return Err(PlanError::InvalidWeight {
                    from: graph.label(u).to_owned(),
                    to: graph.label(v).to_owned(),
                    weight: meters,
                });
            }

            match self.params.max_edge_meters {
                Some(max) if meters > max => {
                    debug!(
                        from = graph.label(u),
                        to = graph.label(v),
                        meters,
                        "dropping edge beyond the distance cutoff"
                    );
                }
                _ => graph.add_edge(u, v, meters),
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "walking graph built"
        );

        Ok(graph)
    }

    async fn geocode_all(
        &self,
        locations: &BTreeMap<String, String>,
    ) -> Result<FxHashMap<String, geo_types::Point>, PlanError> {
        stream::iter(locations.iter())
            .map(|(label, address)| async move {
                debug!(label = label.as_str(), address = address.as_str(), "geocoding location");
                let point = self.geocoder.geocode(address).await.map_err(|source| {
                    PlanError::LocationResolution {
                        labels: vec![label.clone()],
                        source,
                    }
                })?;

                Ok::<_, PlanError>((label.clone(), point))
            })
            .buffer_unordered(self.params.lookup_concurrency)
            .try_collect()
            .await
    }
}
