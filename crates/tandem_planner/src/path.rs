use serde::Serialize;

/// A walking route: the visited location labels in order, plus the total
/// cost under the graph the route was computed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    nodes: Vec<String>,
    total_meters: f64,
}

impl Path {
    pub(crate) fn new(nodes: Vec<String>, total_meters: f64) -> Self {
        Self {
            nodes,
            total_meters,
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn total_meters(&self) -> f64 {
        self.total_meters
    }

    /// Consecutive label pairs along the route.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    pub fn contains_edge(&self, u: &str, v: &str) -> bool {
        self.edges()
            .any(|(from, to)| (from == u && to == v) || (from == v && to == u))
    }
}
