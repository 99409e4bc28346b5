//! Topology store: nodes, undirected edges, and adjacency
//!
//! Built once from an edge list and then only read by the tick loop. Node
//! iteration is always in ascending [`NodeId`] order so that a seeded run
//! visits parcels identically every time. Neighbor lists keep the order in
//! which edges were added, which is the order firefighters scan them in.

use crate::core_types::NodeId;
use crate::error::TopologyError;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Undirected simple graph over [`NodeId`]s.
///
/// Invariants:
/// - adjacency is symmetric: `b ∈ neighbors(a) ⇔ a ∈ neighbors(b)`
/// - no self-loops, no repeated neighbor entries
/// - `nodes` is sorted ascending and duplicate-free
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    adjacency: FxHashMap<NodeId, Vec<NodeId>>,
}

impl Topology {
    /// Build a topology whose node set is the union of all edge endpoints.
    ///
    /// Repeated edges (in either orientation) are ignored.
    ///
    /// # Errors
    /// Returns [`TopologyError::MalformedInput`] if any edge is a self-loop.
    pub fn build<I>(edges: I) -> Result<Self, TopologyError>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut topology = Topology::default();
        for (a, b) in edges {
            topology.add_edge(a, b)?;
        }
        Ok(topology)
    }

    /// Build a topology from an explicit node set plus edges.
    ///
    /// Unlike [`Topology::build`], nodes without any edge are kept. This is
    /// the shape a layout generator hands over: every positioned node, then
    /// the edges between them.
    ///
    /// # Errors
    /// Returns [`TopologyError::MalformedInput`] for self-loops or for edges
    /// that reference a node missing from `nodes`.
    pub fn from_parts<N, E>(nodes: N, edges: E) -> Result<Self, TopologyError>
    where
        N: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut topology = Topology::default();
        for node in nodes {
            topology.insert_node(node);
        }
        for (a, b) in edges {
            for endpoint in [a, b] {
                if !topology.contains(endpoint) {
                    return Err(TopologyError::MalformedInput {
                        reason: format!("edge ({a}, {b}) references unknown node {endpoint}"),
                    });
                }
            }
            topology.add_edge(a, b)?;
        }
        Ok(topology)
    }

    /// Add an undirected edge, registering either endpoint if it is new.
    ///
    /// Returns `false` if the edge already existed.
    ///
    /// # Errors
    /// Returns [`TopologyError::MalformedInput`] if `a == b`.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, TopologyError> {
        if a == b {
            return Err(TopologyError::MalformedInput {
                reason: format!("self-loop on node {a}"),
            });
        }
        self.insert_node(a);
        self.insert_node(b);

        let from_a = self.adjacency.entry(a).or_default();
        if from_a.contains(&b) {
            return Ok(false);
        }
        from_a.push(b);
        self.adjacency.entry(b).or_default().push(a);
        self.edges.push((a.min(b), a.max(b)));
        Ok(true)
    }

    fn insert_node(&mut self, node: NodeId) {
        if let Err(pos) = self.nodes.binary_search(&node) {
            self.nodes.insert(pos, node);
        }
    }

    /// All nodes, ascending.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// All edges as `(smaller, larger)` pairs, in insertion order.
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    /// Neighbors of `node` in edge insertion order; empty if it has none.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map_or(&[], Vec::as_slice)
    }

    #[inline]
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// True iff a breadth-first search from the first node reaches every node.
    ///
    /// The empty graph is connected. Disconnected input is reported, never
    /// repaired; joining components is the job of whoever built the edges.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.nodes.first() else {
            return true;
        };

        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(node) = queue.pop_front() {
            for &neighbor in self.neighbors(node) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited.len() == self.nodes.len()
    }

    /// Euler bound `E <= 3V - 6`, a necessary condition for planarity.
    ///
    /// `false` proves the graph is not planar; `true` does not prove that it
    /// is. Graphs with fewer than three nodes are always planar.
    #[must_use]
    pub fn satisfies_planar_edge_bound(&self) -> bool {
        let v = self.node_count();
        v < 3 || self.edge_count() <= 3 * v - 6
    }
}
