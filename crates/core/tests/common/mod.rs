//! Shared fixtures for integration tests

#![allow(dead_code)]

use graph_fire_core::{
    LandParcel, NodeId, ParcelMap, ParcelRules, Probability, SimulationConfig, Skill, Topology,
    TreeState,
};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hub `0` joined to leaves `1..=leaves`.
pub fn star(leaves: u32) -> Topology {
    Topology::build((1..=leaves).map(|leaf| (NodeId(0), NodeId(leaf)))).unwrap()
}

/// `0 - 1 - ... - (n - 1)`.
pub fn path(n: u32) -> Topology {
    Topology::build((0..n - 1).map(|i| (NodeId(i), NodeId(i + 1)))).unwrap()
}

pub fn skill(value: f64) -> Skill {
    Skill::try_new(value).unwrap()
}

/// Every node a healthy tree at `vitality`.
pub fn forest(topology: &Topology, vitality: f64) -> ParcelMap {
    topology
        .nodes()
        .iter()
        .map(|&n| (n, LandParcel::Tree(TreeState::new(vitality))))
        .collect()
}

/// Every node rock.
pub fn barren(topology: &Topology) -> ParcelMap {
    topology
        .nodes()
        .iter()
        .map(|&n| (n, LandParcel::Rock))
        .collect()
}

/// Default config with no random spread or regrowth.
pub fn quiet_config() -> SimulationConfig {
    SimulationConfig {
        rules: ParcelRules {
            spread_probability: Probability::ZERO,
            regrow_probability: Probability::ZERO,
            ..ParcelRules::default()
        },
        ..SimulationConfig::default()
    }
}
