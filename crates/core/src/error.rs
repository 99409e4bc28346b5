//! Error types for the simulation core
//!
//! Graph construction, configuration, and the tick loop each report their own
//! error enum. Recoverable problems (a malformed line in an edge list, a
//! disconnected graph) are not errors: the loader returns warnings and the
//! topology answers connectivity as a boolean.

use crate::core_types::{AgentId, NodeId};
use std::path::PathBuf;

/// Errors raised while building or loading a [`Topology`](crate::graph::Topology).
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The edge set cannot form a consistent undirected simple graph.
    #[error("malformed topology input: {reason}")]
    MalformedInput { reason: String },

    /// An edge list file could not be read.
    #[error("failed to read edge list {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A configuration value outside its legal domain.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{parameter} = {value} is out of range (expected {expected})")]
    OutOfRange {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("cannot place {requested} firefighters on a graph of {nodes} nodes")]
    TooManyFirefighters { requested: usize, nodes: usize },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn out_of_range(
        parameter: &'static str,
        value: impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        Self::OutOfRange {
            parameter,
            value: value.to_string(),
            expected,
        }
    }
}

/// Errors raised by setup or by a simulation step.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("cannot simulate on an empty topology")]
    EmptyTopology,

    /// A firefighter stands on a node with no neighbors and had to move.
    #[error("firefighter {agent} is stranded on isolated node {node}")]
    NoReachableNeighbor { agent: AgentId, node: NodeId },

    /// A parcel or firefighter referenced a node the topology does not contain.
    #[error("node {0} is not part of the topology")]
    UnknownNode(NodeId),

    #[error("node {0} has no parcel")]
    MissingParcel(NodeId),

    #[error("firefighter {0} does not exist")]
    UnknownFirefighter(AgentId),
}

/// Errors from saving or loading run reports.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize run report: {0}")]
    Json(#[from] serde_json::Error),
}
