use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::PlanError;
use crate::graph::{Graph, NodeId};
use crate::path::Path;

#[derive(Copy, Clone, Debug)]
struct HeapItem {
    cost: f64,
    node: NodeId,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip cost to make this a min-heap; equal costs pop the lowest
        // node id first, which keeps results reproducible under ties
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Every weight must be finite and non-negative before the relaxation loop
/// runs; Dijkstra silently produces wrong answers otherwise.
fn validate_weights(graph: &Graph) -> Result<(), PlanError> {
    for node in 0..graph.node_count() {
        for &(next, meters) in graph.neighbors(node) {
            if !meters.is_finite() || meters < 0.0 {
                return Err(PlanError::InvalidWeight {
                    from: graph.label(node).to_owned(),
                    to: graph.label(next).to_owned(),
                    weight: meters,
                });
            }
        }
    }

    Ok(())
}

/// Single-source Dijkstra from `start` to `end` over the given graph.
///
/// The returned path is cost-minimal under the graph's weights. When
/// several nodes share the minimum tentative distance the lowest node id
/// wins, so repeated runs on the same graph return the identical path.
pub fn shortest_path(graph: &Graph, start: &str, end: &str) -> Result<Path, PlanError> {
    let start_id = graph
        .node_id(start)
        .ok_or_else(|| PlanError::UnknownLocation {
            label: start.to_owned(),
        })?;
    let end_id = graph.node_id(end).ok_or_else(|| PlanError::UnknownLocation {
        label: end.to_owned(),
    })?;

    validate_weights(graph)?;

    if start_id == end_id {
        return Ok(Path::new(vec![graph.label(start_id).to_owned()], 0.0));
    }

    let node_count = graph.node_count();
    let mut distances = vec![f64::INFINITY; node_count];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; node_count];
    let mut settled = vec![false; node_count];
    let mut heap = BinaryHeap::with_capacity(node_count);

    distances[start_id] = 0.0;
    heap.push(HeapItem {
        cost: 0.0,
        node: start_id,
    });

    while let Some(HeapItem { cost, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        if node == end_id {
            break;
        }

        for &(next, meters) in graph.neighbors(node) {
            if settled[next] {
                continue;
            }

            let next_cost = cost + meters;
            if next_cost < distances[next] {
                distances[next] = next_cost;
                predecessors[next] = Some(node);
                heap.push(HeapItem {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    if !settled[end_id] {
        return Err(PlanError::Unreachable {
            start: start.to_owned(),
            end: end.to_owned(),
        });
    }

    // Walk predecessors backward from the end, then reverse
    let mut ids = vec![end_id];
    let mut current = end_id;
    while let Some(prev) = predecessors[current] {
        ids.push(prev);
        current = prev;
    }
    ids.reverse();
    debug_assert_eq!(ids[0], start_id);

    let nodes = ids.iter().map(|&id| graph.label(id).to_owned()).collect();

    Ok(Path::new(nodes, distances[end_id]))
}
