use std::fmt::Display;

use thiserror::Error;

use tandem_providers::distance_provider::ProviderError;

/// Which walker's route computation a planner error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walker {
    A,
    B,
}

impl Display for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Walker::A => write!(f, "A"),
            Walker::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("need at least 2 locations, got {0}")]
    NotEnoughLocations(usize),

    #[error("could not resolve location(s) {labels:?}: {source}")]
    LocationResolution {
        labels: Vec<String>,
        #[source]
        source: ProviderError,
    },

    #[error("unknown location label '{label}'")]
    UnknownLocation { label: String },

    #[error("invalid edge weight {weight} between '{from}' and '{to}'")]
    InvalidWeight {
        from: String,
        to: String,
        weight: f64,
    },

    #[error("no walking route from '{start}' to '{end}'")]
    Unreachable { start: String, end: String },

    #[error("walker {walker}'s route failed: {source}")]
    Walker {
        walker: Walker,
        #[source]
        source: Box<PlanError>,
    },
}

impl PlanError {
    pub(crate) fn for_walker(walker: Walker, source: PlanError) -> Self {
        PlanError::Walker {
            walker,
            source: Box::new(source),
        }
    }

    /// The walker stage this error was raised in, if any.
    pub fn walker(&self) -> Option<Walker> {
        match self {
            PlanError::Walker { walker, .. } => Some(*walker),
            _ => None,
        }
    }
}
