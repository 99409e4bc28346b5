//! Graph topology, edge list loading, and layout generation

pub mod edge_list;
pub mod layout;
pub mod topology;

pub use edge_list::{load_edge_list, parse_edge_list, EdgeList, ParseWarning};
pub use layout::{GeneratedTopology, Layout, TopologyGenerator, TriangulatedGrid};
pub use topology::Topology;
