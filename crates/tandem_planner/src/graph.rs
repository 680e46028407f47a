use fxhash::FxHashMap;

pub type NodeId = usize;

/// Undirected weighted graph over labeled locations. Nodes live in an
/// arena; ids are indices into it, assigned in sorted-label order so that
/// id order equals lexicographic label order.
#[derive(Debug, Clone)]
pub struct Graph {
    labels: Vec<String>,
    ids: FxHashMap<String, NodeId>,
    adjacency: Vec<Vec<(NodeId, f64)>>,
}

impl Graph {
    pub fn with_nodes(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        labels.dedup();

        let ids = labels
            .iter()
            .enumerate()
            .map(|(id, label)| (label.clone(), id))
            .collect();
        let adjacency = vec![Vec::new(); labels.len()];

        Self {
            labels,
            ids,
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.labels[id]
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.ids.get(label).copied()
    }

    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, f64)] {
        &self.adjacency[id]
    }

    /// Inserts both directional entries for the undirected edge (u, v).
    /// Inserting an existing edge overwrites its weight.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, meters: f64) {
        assert_ne!(u, v, "self-edges are not allowed");

        for (from, to) in [(u, v), (v, u)] {
            match self.adjacency[from].iter_mut().find(|(next, _)| *next == to) {
                Some(entry) => entry.1 = meters,
                None => self.adjacency[from].push((to, meters)),
            }
        }
    }

    pub fn weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.adjacency[u]
            .iter()
            .find(|(next, _)| *next == v)
            .map(|(_, meters)| *meters)
    }

    /// Multiplies both directional entries of the edge (u, v) by `factor`.
    pub(crate) fn scale_edge(&mut self, u: NodeId, v: NodeId, factor: f64) {
        for (from, to) in [(u, v), (v, u)] {
            if let Some(entry) = self.adjacency[from].iter_mut().find(|(next, _)| *next == to) {
                entry.1 *= factor;
            }
        }
    }

    /// Sum of edge weights along a label sequence, or None if any
    /// consecutive pair is not connected or any label is unknown.
    pub fn path_cost(&self, labels: &[String]) -> Option<f64> {
        let ids: Vec<NodeId> = labels
            .iter()
            .map(|label| self.node_id(label))
            .collect::<Option<_>>()?;

        ids.windows(2)
            .map(|pair| self.weight(pair[0], pair[1]))
            .sum()
    }
}
