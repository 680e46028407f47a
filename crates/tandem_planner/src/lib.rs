pub mod builder;
pub mod dijkstra;
pub mod error;
pub mod graph;
pub mod path;
pub mod planner;

#[cfg(test)]
pub(crate) mod test_utils;
