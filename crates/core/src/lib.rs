//! Graph Wildfire Simulation Core Library
//!
//! A stochastic wildfire model on an undirected graph. Each node holds a land
//! parcel that is either rock or a tree with vitality; fire spreads between
//! adjacent trees, burnt-out trees turn to rock, and rock slowly regrows.
//! Firefighters walk the graph toward fires and suppress them until they are
//! contained.
//!
//! ## Layout
//!
//! - [`graph`]: topology, edge-list loading, and planar topology generation
//! - [`core_types`]: ids, probabilities, skills, and the parcel state machine
//! - [`suppression`]: firefighters and their movement heuristic
//! - [`simulation`]: the tick engine, statistics, frames, persistence, and
//!   parallel ensembles
//!
//! ## Example
//!
//! ```no_run
//! use graph_fire_core::{
//!     Simulation, SimulationConfig, TopologyGenerator, TriangulatedGrid,
//! };
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = SimulationConfig::default();
//! let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
//! let generated = TriangulatedGrid::default()
//!     .generate(config.node_count, &mut rng)
//!     .unwrap();
//! let mut sim = Simulation::new(generated.to_topology().unwrap(), &config).unwrap();
//! let history = sim.run(config.ticks).unwrap();
//! println!("{}", history.to_csv());
//! ```

pub mod core_types;
pub mod error;
pub mod graph;
pub mod simulation;
pub mod suppression;

pub use core_types::{
    AgentId, LandParcel, NodeId, ParcelCategory, ParcelMap, ParcelRules, Probability, Skill,
    TreeState, Vec2,
};
pub use error::{ConfigError, PersistenceError, SimulationError, TopologyError};
pub use graph::{
    load_edge_list, parse_edge_list, EdgeList, GeneratedTopology, Layout, ParseWarning,
    Topology, TopologyGenerator, TriangulatedGrid,
};
pub use simulation::{
    run_ensemble, Census, EnsembleSummary, FrameRecorder, FrameSink, History, MeanRecord,
    NullSink, RunReport, Simulation, SimulationConfig, SkillRange, StrandedPolicy, TickRecord,
    TickSummary, UpdatePolicy, VisualFrame,
};
pub use suppression::{Firefighter, MoveDecision};
