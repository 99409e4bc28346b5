//! Node layout and topology generation
//!
//! The simulation only needs edges. Positions exist for whoever draws the
//! graph, so they are produced alongside the edges by a
//! [`TopologyGenerator`] and passed through untouched.
//!
//! [`TriangulatedGrid`] is the built-in generator: a jittered square lattice
//! with one diagonal per cell. It is planar and connected by construction,
//! which is all the headless runner needs from a partitioned landscape.

use crate::core_types::{NodeId, Vec2};
use crate::error::TopologyError;
use crate::graph::Topology;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node id → 2D position. Opaque to the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    positions: BTreeMap<NodeId, Vec2>,
}

impl Layout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, position: Vec2) {
        self.positions.insert(node, position);
    }

    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<Vec2> {
        self.positions.get(&node).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Place nodes evenly on a unit circle, in ascending id order.
    ///
    /// Fallback for graphs loaded from a file, which carry no coordinates.
    #[must_use]
    pub fn circle(topology: &Topology) -> Self {
        let n = topology.node_count().max(1) as f32;
        let positions = topology
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                let angle = std::f32::consts::TAU * i as f32 / n;
                (node, Vec2::new(angle.cos(), angle.sin()))
            })
            .collect();
        Self { positions }
    }
}

/// Edges plus positions, as produced by a generator.
#[derive(Debug, Clone, Default)]
pub struct GeneratedTopology {
    pub edges: Vec<(NodeId, NodeId)>,
    pub layout: Layout,
}

impl GeneratedTopology {
    /// Build the topology over every positioned node.
    ///
    /// # Errors
    /// Propagates [`TopologyError::MalformedInput`] from
    /// [`Topology::from_parts`].
    pub fn to_topology(&self) -> Result<Topology, TopologyError> {
        Topology::from_parts(self.layout.nodes(), self.edges.iter().copied())
    }
}

/// Produces a graph of roughly `target_nodes` nodes.
pub trait TopologyGenerator {
    /// # Errors
    /// Returns [`TopologyError::MalformedInput`] if the generator cannot
    /// produce a graph of the requested size.
    fn generate(
        &self,
        target_nodes: usize,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedTopology, TopologyError>;
}

/// Square lattice with right-down diagonals and jittered positions.
///
/// The node count is rounded up to fill the last row, so the result has at
/// least `target_nodes` nodes and fewer than `target_nodes + columns`.
#[derive(Debug, Clone, Copy)]
pub struct TriangulatedGrid {
    /// Maximum displacement of a node from its lattice point, as a fraction
    /// of the lattice spacing. Kept below 0.25 so triangles cannot fold over.
    pub jitter: f32,
    /// Lattice spacing in layout units.
    pub spacing: f32,
}

impl Default for TriangulatedGrid {
    fn default() -> Self {
        Self {
            jitter: 0.2,
            spacing: 1.0,
        }
    }
}

impl TriangulatedGrid {
    /// Smallest lattice with at least `target_nodes` nodes: (rows, columns).
    #[must_use]
    pub fn dimensions(target_nodes: usize) -> (usize, usize) {
        let columns = (target_nodes as f64).sqrt().ceil().max(1.0) as usize;
        let rows = target_nodes.div_ceil(columns);
        (rows, columns)
    }
}

impl TopologyGenerator for TriangulatedGrid {
    fn generate(
        &self,
        target_nodes: usize,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedTopology, TopologyError> {
        if target_nodes < 2 {
            return Err(TopologyError::MalformedInput {
                reason: format!("cannot generate a graph with {target_nodes} nodes"),
            });
        }
        if !(0.0..0.25).contains(&self.jitter) {
            return Err(TopologyError::MalformedInput {
                reason: format!("lattice jitter {} must be in [0, 0.25)", self.jitter),
            });
        }

        let (rows, columns) = Self::dimensions(target_nodes);
        let id = |r: usize, c: usize| NodeId((r * columns + c) as u32);

        let mut generated = GeneratedTopology::default();
        for r in 0..rows {
            for c in 0..columns {
                let dx = if self.jitter > 0.0 {
                    rng.random_range(-self.jitter..self.jitter)
                } else {
                    0.0
                };
                let dy = if self.jitter > 0.0 {
                    rng.random_range(-self.jitter..self.jitter)
                } else {
                    0.0
                };
                generated.layout.insert(
                    id(r, c),
                    Vec2::new(
                        (c as f32 + dx) * self.spacing,
                        (r as f32 + dy) * self.spacing,
                    ),
                );

                if c + 1 < columns {
                    generated.edges.push((id(r, c), id(r, c + 1)));
                }
                if r + 1 < rows {
                    generated.edges.push((id(r, c), id(r + 1, c)));
                    if c + 1 < columns {
                        generated.edges.push((id(r, c), id(r + 1, c + 1)));
                    }
                }
            }
        }

        Ok(generated)
    }
}
