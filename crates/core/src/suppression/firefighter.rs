//! Firefighter agents and their movement heuristic
//!
//! A firefighter holds a node and a fixed skill. Once per tick, after every
//! parcel has transitioned, it decides one of:
//!
//! 1. **Suppress**: it stands on a burning tree, so it marks the tree as
//!    suppressed and stays put.
//! 2. **Advance**: the first neighbor (in adjacency order) that is a burning,
//!    unsuppressed tree. First match wins; there is no ranking of candidates.
//! 3. **Wander**: a uniformly random neighbor.
//!
//! The heuristic is deliberately myopic. Agents do not coordinate, and two of
//! them may chase the same fire.

use crate::core_types::{AgentId, NodeId, ParcelMap, Skill};
use crate::graph::Topology;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A mobile suppression agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firefighter {
    pub(crate) id: AgentId,
    pub(crate) position: NodeId,
    pub(crate) skill: Skill,
}

impl Firefighter {
    #[must_use]
    pub fn new(id: AgentId, position: NodeId, skill: Skill) -> Self {
        Self {
            id,
            position,
            skill,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> NodeId {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn skill(&self) -> Skill {
        self.skill
    }
}

/// Outcome of the movement heuristic for one agent and one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDecision {
    /// Stay and fight the fire underfoot.
    Suppress,
    /// Move onto an adjacent unclaimed fire.
    Advance(NodeId),
    /// No adjacent fire; random step.
    Wander(NodeId),
    /// No neighbors at all.
    Stranded,
}

impl MoveDecision {
    /// Node the agent ends up on, given where it started.
    #[must_use]
    pub fn destination(self, from: NodeId) -> NodeId {
        match self {
            MoveDecision::Advance(to) | MoveDecision::Wander(to) => to,
            MoveDecision::Suppress | MoveDecision::Stranded => from,
        }
    }
}

/// Run the movement heuristic for an agent standing on `position`.
///
/// Reads parcel state only; the caller applies the decision.
pub fn decide_move<R: Rng + ?Sized>(
    position: NodeId,
    topology: &Topology,
    parcels: &ParcelMap,
    rng: &mut R,
) -> MoveDecision {
    if parcels.get(&position).is_some_and(|p| p.is_burning()) {
        return MoveDecision::Suppress;
    }

    let neighbors = topology.neighbors(position);
    if let Some(&target) = neighbors
        .iter()
        .find(|&&n| parcels.get(&n).is_some_and(|p| p.needs_firefighter()))
    {
        return MoveDecision::Advance(target);
    }

    match neighbors.choose(rng) {
        Some(&next) => MoveDecision::Wander(next),
        None => MoveDecision::Stranded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{LandParcel, TreeState};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn topology(pairs: &[(u32, u32)]) -> Topology {
        Topology::build(pairs.iter().map(|&(a, b)| (NodeId(a), NodeId(b)))).unwrap()
    }

    fn parcels(entries: &[(u32, LandParcel)]) -> ParcelMap {
        entries
            .iter()
            .map(|(n, p)| (NodeId(*n), p.clone()))
            .collect()
    }

    #[test]
    fn test_suppress_when_standing_on_fire() {
        let topo = topology(&[(0, 1)]);
        let map = parcels(&[
            (0, LandParcel::Tree(TreeState::new(80.0).ignited())),
            (1, LandParcel::Tree(TreeState::new(80.0).ignited())),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            decide_move(NodeId(0), &topo, &map, &mut rng),
            MoveDecision::Suppress
        );
    }

    #[test]
    fn test_prefers_burning_tree_over_rock() {
        let topo = topology(&[(0, 1), (0, 2)]);
        let map = parcels(&[
            (0, LandParcel::Tree(TreeState::new(100.0))),
            (1, LandParcel::Rock),
            (2, LandParcel::Tree(TreeState::new(100.0).ignited())),
        ]);
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(
                decide_move(NodeId(0), &topo, &map, &mut rng),
                MoveDecision::Advance(NodeId(2))
            );
        }
    }

    #[test]
    fn test_first_unclaimed_fire_wins() {
        let topo = topology(&[(0, 1), (0, 2), (0, 3)]);
        let map = parcels(&[
            (0, LandParcel::Rock),
            (1, LandParcel::Tree(TreeState::new(90.0).ignited().with_suppression())),
            (2, LandParcel::Tree(TreeState::new(90.0).ignited())),
            (3, LandParcel::Tree(TreeState::new(90.0).ignited())),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            decide_move(NodeId(0), &topo, &map, &mut rng),
            MoveDecision::Advance(NodeId(2))
        );
    }

    #[test]
    fn test_wanders_to_a_neighbor_without_fire() {
        let topo = topology(&[(0, 1), (0, 2)]);
        let map = parcels(&[
            (0, LandParcel::Rock),
            (1, LandParcel::Rock),
            (2, LandParcel::Tree(TreeState::new(100.0))),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        match decide_move(NodeId(0), &topo, &map, &mut rng) {
            MoveDecision::Wander(n) => assert!(n == NodeId(1) || n == NodeId(2)),
            other => panic!("expected wander, got {other:?}"),
        }
    }

    #[test]
    fn test_isolated_node_is_stranded() {
        let topo = Topology::from_parts([NodeId(0), NodeId(1), NodeId(2)], [(NodeId(1), NodeId(2))])
            .unwrap();
        let map = parcels(&[(0, LandParcel::Rock)]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let decision = decide_move(NodeId(0), &topo, &map, &mut rng);
        assert_eq!(decision, MoveDecision::Stranded);
        assert_eq!(decision.destination(NodeId(0)), NodeId(0));
    }
}
