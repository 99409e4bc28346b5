//! Identifiers for graph nodes and firefighters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key of a graph node, stable for the lifetime of a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        NodeId(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Firefighter identifier, assigned `0..n` in creation order.
///
/// Agents are always visited in ascending id order, which also decides which
/// agent gets bound when several stand on the same burning parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        AgentId(raw)
    }

    /// Index into the engine's firefighter vector.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_order_numerically() {
        let mut ids = vec![NodeId(10), NodeId(2), NodeId(7)];
        ids.sort();
        assert_eq!(ids, vec![NodeId(2), NodeId(7), NodeId(10)]);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&NodeId(42)).unwrap();
        assert_eq!(json, "42");
        let agent: AgentId = serde_json::from_str("3").unwrap();
        assert_eq!(agent.index(), 3);
    }
}
