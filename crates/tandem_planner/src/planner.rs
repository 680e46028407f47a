use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use tandem_providers::distance_provider::{DistanceProvider, Geocoder};

use crate::builder::GraphBuilder;
use crate::dijkstra;
use crate::error::{PlanError, Walker};
use crate::graph::Graph;
use crate::path::Path;

/// Edges already walked by Walker A keep half their weight for Walker B.
pub const SHARED_EDGE_DISCOUNT: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct WalkerRequest {
    pub start: String,
    pub end: String,
}

impl WalkerRequest {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Walker A's cost is against the base graph, Walker B's against the
/// discounted graph; the two totals are not directly comparable.
#[derive(Debug, Clone, Serialize)]
pub struct SharedPlan {
    pub path_a: Path,
    pub path_b: Path,
}

/// The two-pass protocol: route Walker A on the base graph, halve the
/// weight of every edge A traverses, route Walker B on the result.
pub fn plan(graph: &Graph, a: &WalkerRequest, b: &WalkerRequest) -> Result<SharedPlan, PlanError> {
    let path_a = dijkstra::shortest_path(graph, &a.start, &a.end)
        .map_err(|source| PlanError::for_walker(Walker::A, source))?;
    debug!(
        meters = path_a.total_meters(),
        stops = path_a.nodes().len(),
        "walker A routed"
    );

    let discounted = discounted_graph(graph, &path_a);

    let path_b = dijkstra::shortest_path(&discounted, &b.start, &b.end)
        .map_err(|source| PlanError::for_walker(Walker::B, source))?;
    debug!(
        meters = path_b.total_meters(),
        stops = path_b.nodes().len(),
        "walker B routed"
    );

    Ok(SharedPlan { path_a, path_b })
}

/// Deep copy of the base graph with every edge on `shared` at half weight.
/// Only edges Walker A actually traverses are discounted; the bias nudges
/// Walker B toward them without forcing the overlap.
fn discounted_graph(graph: &Graph, shared: &Path) -> Graph {
    let mut discounted = graph.clone();

    for (u, v) in shared.edges() {
        let u = discounted
            .node_id(u)
            .expect("path node is in the graph it was computed on");
        let v = discounted
            .node_id(v)
            .expect("path node is in the graph it was computed on");
        discounted.scale_edge(u, v, SHARED_EDGE_DISCOUNT);
    }

    discounted
}

/// Whole-request pipeline: validate the four label references against the
/// location mapping, build the graph, then run the two-pass plan.
pub async fn plan_walk<G, D>(
    builder: &GraphBuilder<G, D>,
    locations: &BTreeMap<String, String>,
    a: &WalkerRequest,
    b: &WalkerRequest,
) -> Result<SharedPlan, PlanError>
where
    G: Geocoder,
    D: DistanceProvider,
{
    // Reject bad label references before spending any provider traffic
    for label in [&a.start, &a.end, &b.start, &b.end] {
        if !locations.contains_key(label.as_str()) {
            return Err(PlanError::UnknownLocation {
                label: label.clone(),
            });
        }
    }

    let graph = builder.build(locations).await?;

    plan(&graph, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{graph_from_edges, static_scenario};

    #[test]
    fn three_node_scenario_routes_both_walkers() {
        let graph = graph_from_edges(
            &["A", "B", "C"],
            &[("A", "B", 10.0), ("B", "C", 10.0), ("A", "C", 25.0)],
        );

        let shared = plan(
            &graph,
            &WalkerRequest::new("A", "C"),
            &WalkerRequest::new("C", "A"),
        )
        .unwrap();

        // The detour through B beats the direct 25 m edge
        assert_eq!(shared.path_a.nodes(), &["A", "B", "C"]);
        assert_eq!(shared.path_a.total_meters(), 20.0);

        // On the discounted graph the same corridor costs 5 + 5
        assert_eq!(shared.path_b.nodes(), &["C", "B", "A"]);
        assert_eq!(shared.path_b.total_meters(), 10.0);
    }

    #[test]
    fn discount_halves_exactly_the_traversed_edges() {
        let graph = graph_from_edges(
            &["A", "B", "C", "D"],
            &[
                ("A", "B", 10.0),
                ("B", "C", 10.0),
                ("A", "C", 25.0),
                ("C", "D", 7.0),
                ("B", "D", 20.0),
            ],
        );

        let path_a = dijkstra::shortest_path(&graph, "A", "C").unwrap();
        assert_eq!(path_a.nodes(), &["A", "B", "C"]);

        let discounted = discounted_graph(&graph, &path_a);

        let id = |label| graph.node_id(label).unwrap();
        assert_eq!(discounted.weight(id("A"), id("B")), Some(5.0));
        assert_eq!(discounted.weight(id("B"), id("C")), Some(5.0));
        assert_eq!(discounted.weight(id("A"), id("C")), Some(25.0));
        assert_eq!(discounted.weight(id("C"), id("D")), Some(7.0));
        assert_eq!(discounted.weight(id("B"), id("D")), Some(20.0));

        // The base graph itself is untouched
        assert_eq!(graph.weight(id("A"), id("B")), Some(10.0));
    }

    #[test]
    fn discount_pulls_walker_b_onto_walker_a_edges() {
        // Walker A goes P-Q-R. Walker B's direct S-T edge (20 m) beats
        // the corridor at base weights (24 m) but loses to the
        // discounted corridor (14 m)
        let graph = graph_from_edges(
            &["P", "Q", "R", "S", "T"],
            &[
                ("P", "Q", 10.0),
                ("Q", "R", 10.0),
                ("P", "R", 30.0),
                ("S", "P", 2.0),
                ("T", "R", 2.0),
                ("S", "T", 20.0),
            ],
        );

        let undiscounted = dijkstra::shortest_path(&graph, "S", "T").unwrap();
        assert_eq!(undiscounted.nodes(), &["S", "T"]);

        let shared = plan(
            &graph,
            &WalkerRequest::new("P", "R"),
            &WalkerRequest::new("S", "T"),
        )
        .unwrap();

        assert_eq!(shared.path_a.nodes(), &["P", "Q", "R"]);
        assert_eq!(shared.path_b.nodes(), &["S", "P", "Q", "R", "T"]);
        assert_eq!(shared.path_b.total_meters(), 14.0);
        assert!(shared.path_b.contains_edge("P", "Q"));
        assert!(shared.path_b.contains_edge("Q", "R"));
    }

    #[test]
    fn walker_a_failure_is_tagged_and_aborts() {
        let graph = graph_from_edges(&["A", "B"], &[("A", "B", 5.0)]);

        let err = plan(
            &graph,
            &WalkerRequest::new("Z", "B"),
            &WalkerRequest::new("A", "B"),
        )
        .unwrap_err();

        match err {
            PlanError::Walker { walker, source } => {
                assert_eq!(walker, Walker::A);
                assert!(matches!(*source, PlanError::UnknownLocation { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn walker_b_failure_is_tagged_distinctly() {
        let graph = graph_from_edges(&["A", "B"], &[("A", "B", 5.0)]);

        let err = plan(
            &graph,
            &WalkerRequest::new("A", "B"),
            &WalkerRequest::new("A", "Z"),
        )
        .unwrap_err();

        assert_eq!(err.walker(), Some(Walker::B));
    }

    #[tokio::test]
    async fn plan_walk_runs_the_whole_pipeline() {
        let (locations, geocoder, provider) = static_scenario(
            &["A", "B", "C"],
            &[("A", "B", 10.0), ("B", "C", 10.0), ("A", "C", 25.0)],
        );
        let builder = GraphBuilder::new(geocoder, provider);

        let shared = plan_walk(
            &builder,
            &locations,
            &WalkerRequest::new("A", "C"),
            &WalkerRequest::new("C", "A"),
        )
        .await
        .unwrap();

        assert_eq!(shared.path_a.nodes(), &["A", "B", "C"]);
        assert_eq!(shared.path_b.nodes(), &["C", "B", "A"]);
    }

    #[tokio::test]
    async fn unknown_labels_fail_before_any_provider_call() {
        use std::sync::Arc;
        use std::sync::atomic::Ordering;

        let (locations, geocoder, provider) = static_scenario(
            &["A", "B", "C"],
            &[("A", "B", 10.0), ("B", "C", 10.0), ("A", "C", 25.0)],
        );
        let calls = Arc::clone(&provider.calls);
        let builder = GraphBuilder::new(geocoder, provider);

        let err = plan_walk(
            &builder,
            &locations,
            &WalkerRequest::new("Z", "C"),
            &WalkerRequest::new("C", "A"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PlanError::UnknownLocation { label } if label == "Z"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
