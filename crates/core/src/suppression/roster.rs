//! Reverse index from node to the firefighters standing on it
//!
//! A suppressed tree binds "the first firefighter on this node". Scanning every
//! agent for that costs O(agents) per burning parcel per tick; the roster
//! answers it from a per-node list that is updated on every move.
//!
//! Per-node lists are kept sorted by [`AgentId`], so "first" means the
//! lowest id, which is the agent an ascending scan would have found.

use crate::core_types::{AgentId, NodeId};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_node: FxHashMap<NodeId, Vec<AgentId>>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `agent` as standing on `node`.
    pub fn insert(&mut self, agent: AgentId, node: NodeId) {
        let agents = self.by_node.entry(node).or_default();
        if let Err(pos) = agents.binary_search(&agent) {
            agents.insert(pos, agent);
        }
    }

    /// Remove `agent` from `node`. Returns `false` if it was not there.
    pub fn remove(&mut self, agent: AgentId, node: NodeId) -> bool {
        let Some(agents) = self.by_node.get_mut(&node) else {
            return false;
        };
        let Ok(pos) = agents.binary_search(&agent) else {
            return false;
        };
        agents.remove(pos);
        if agents.is_empty() {
            self.by_node.remove(&node);
        }
        true
    }

    /// Move `agent` between nodes. A no-op when `from == to`.
    pub fn relocate(&mut self, agent: AgentId, from: NodeId, to: NodeId) {
        if from != to {
            self.remove(agent, from);
            self.insert(agent, to);
        }
    }

    /// Agents on `node`, ascending.
    #[must_use]
    pub fn agents_at(&self, node: NodeId) -> &[AgentId] {
        self.by_node.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Lowest-id agent on `node`, if any.
    #[must_use]
    pub fn first_at(&self, node: NodeId) -> Option<AgentId> {
        self.agents_at(node).first().copied()
    }

    /// Total number of agents indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_node.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}
