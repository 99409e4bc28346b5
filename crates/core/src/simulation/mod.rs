//! Tick-driven wildfire simulation on a graph
//!
//! [`Simulation`] owns the topology, the parcel of every node, the firefighter
//! roster, and a seeded RNG. Each [`Simulation::step`]:
//!
//! 1. transitions every parcel in ascending node order (growth, burning,
//!    spread, suppression, burnout, regrowth)
//! 2. appends a [`TickRecord`] to the history
//! 3. moves every firefighter in ascending agent order
//! 4. builds a [`VisualFrame`] and delivers it to the caller's [`FrameSink`]
//!
//! Every random draw comes from one `ChaCha8Rng`, so a seed and a topology
//! fully determine a run.

pub mod config;
pub mod ensemble;
pub mod frame;
pub mod persistence;
pub mod stats;

pub use config::{SimulationConfig, SkillRange, StrandedPolicy, UpdatePolicy};
pub use ensemble::{run_ensemble, EnsembleSummary, MeanRecord};
pub use frame::{FrameRecorder, FrameSink, NullSink, VisualFrame};
pub use persistence::RunReport;
pub use stats::{Census, History, TickRecord};

use crate::core_types::{AgentId, LandParcel, NodeId, ParcelMap, ParcelRules, Skill};
use crate::error::{ConfigError, SimulationError};
use crate::graph::Topology;
use crate::suppression::{decide_move, Firefighter, MoveDecision, Roster};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

/// What happened during one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Counts appended to the history for this tick.
    pub record: TickRecord,
    /// Trees set alight by spread.
    pub ignitions: usize,
    /// Burning trees that fell to zero vitality and became rock.
    pub burnouts: usize,
    /// Rocks that regrew into trees.
    pub regrowths: usize,
    /// Suppressed fires that were put out.
    pub containments: usize,
    /// Agents that could not move, under [`StrandedPolicy::StayInPlace`].
    pub stranded: Vec<AgentId>,
}

/// A running wildfire simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    topology: Topology,
    pub(crate) parcels: ParcelMap,
    firefighters: Vec<Firefighter>,
    roster: Roster,
    rules: ParcelRules,
    update_policy: UpdatePolicy,
    stranded_policy: StrandedPolicy,
    rng: ChaCha8Rng,
    history: History,
    tick: u32,
    positions: Vec<NodeId>,
}

impl Simulation {
    /// Draw an initial forest and firefighter placement on `topology`.
    ///
    /// Draw order is fixed so a seed reproduces the same setup: one
    /// tree-or-rock draw per node in ascending order, then distinct start
    /// nodes for the firefighters, then one skill per firefighter, then one
    /// ignition draw per starting tree in ascending order.
    ///
    /// # Errors
    /// - [`SimulationError::Config`] if `config` fails validation or asks for
    ///   more firefighters than there are nodes
    /// - [`SimulationError::EmptyTopology`] if `topology` has no nodes
    pub fn new(topology: Topology, config: &SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        if topology.is_empty() {
            return Err(SimulationError::EmptyTopology);
        }
        let node_count = topology.node_count();
        if config.firefighter_count > node_count {
            return Err(ConfigError::TooManyFirefighters {
                requested: config.firefighter_count,
                nodes: node_count,
            }
            .into());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let rules = config.rules;

        let mut parcels = ParcelMap::default();
        for &node in topology.nodes() {
            let parcel = if rng.random_bool(config.tree_probability.value()) {
                LandParcel::sapling(&rules)
            } else {
                LandParcel::Rock
            };
            parcels.insert(node, parcel);
        }

        let starts: Vec<NodeId> = index::sample(&mut rng, node_count, config.firefighter_count)
            .iter()
            .map(|i| topology.nodes()[i])
            .collect();
        let (lower, upper) = (
            config.skill_range.lower.value(),
            config.skill_range.upper.value(),
        );
        let mut firefighters = Vec::with_capacity(starts.len());
        for (i, position) in starts.into_iter().enumerate() {
            let skill = Skill::try_new(rng.random_range(lower..=upper))?;
            firefighters.push(Firefighter::new(AgentId::new(i as u32), position, skill));
        }

        let mut ignited = 0;
        for node in topology.nodes() {
            if let Some(tree) = parcels.get_mut(node).and_then(LandParcel::as_tree_mut) {
                if rng.random_bool(config.ignition_probability.value()) {
                    tree.on_fire = true;
                    ignited += 1;
                }
            }
        }

        info!(
            nodes = node_count,
            edges = topology.edge_count(),
            connected = topology.is_connected(),
            firefighters = firefighters.len(),
            ignited,
            seed = config.seed,
            "Simulation initialized"
        );

        Ok(Self::assemble(
            topology,
            parcels,
            firefighters,
            rules,
            config.update_policy,
            config.stranded_policy,
            rng,
        ))
    }

    /// Build a simulation from a hand-made initial state.
    ///
    /// Firefighters get ids in the order given. Counts, probabilities and the
    /// skill range in `config` are ignored; its rules, policies and seed apply.
    /// Any firefighter binding stored in `parcels` is cleared, since binding
    /// happens during the step.
    ///
    /// # Errors
    /// - [`SimulationError::EmptyTopology`] if `topology` has no nodes
    /// - [`SimulationError::MissingParcel`] if a node has no parcel
    /// - [`SimulationError::UnknownNode`] if a parcel or firefighter refers to
    ///   a node outside the topology
    /// - [`SimulationError::Config`] if the rules are invalid
    pub fn from_parts<I>(
        topology: Topology,
        mut parcels: ParcelMap,
        firefighters: I,
        config: &SimulationConfig,
    ) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = (NodeId, Skill)>,
    {
        config.rules.validate()?;
        if topology.is_empty() {
            return Err(SimulationError::EmptyTopology);
        }
        if let Some(&node) = parcels.keys().find(|n| !topology.contains(**n)) {
            return Err(SimulationError::UnknownNode(node));
        }
        if let Some(&node) = topology.nodes().iter().find(|n| !parcels.contains_key(*n)) {
            return Err(SimulationError::MissingParcel(node));
        }
        for tree in parcels.values_mut().filter_map(LandParcel::as_tree_mut) {
            tree.assigned_firefighter = None;
        }

        let mut agents = Vec::new();
        for (i, (position, skill)) in firefighters.into_iter().enumerate() {
            if !topology.contains(position) {
                return Err(SimulationError::UnknownNode(position));
            }
            agents.push(Firefighter::new(AgentId::new(i as u32), position, skill));
        }

        Ok(Self::assemble(
            topology,
            parcels,
            agents,
            config.rules,
            config.update_policy,
            config.stranded_policy,
            ChaCha8Rng::seed_from_u64(config.seed),
        ))
    }

    fn assemble(
        topology: Topology,
        parcels: ParcelMap,
        firefighters: Vec<Firefighter>,
        rules: ParcelRules,
        update_policy: UpdatePolicy,
        stranded_policy: StrandedPolicy,
        rng: ChaCha8Rng,
    ) -> Self {
        let mut roster = Roster::new();
        for f in &firefighters {
            roster.insert(f.id, f.position);
        }
        let positions = firefighters.iter().map(Firefighter::position).collect();
        let mut sim = Self {
            topology,
            parcels,
            firefighters,
            roster,
            rules,
            update_policy,
            stranded_policy,
            rng,
            history: History::new(),
            tick: 0,
            positions,
        };
        let record = TickRecord::new(0, sim.census());
        sim.history.push(record);
        sim
    }

    // ========================================================================
    // STEPPING
    // ========================================================================

    /// Advance one tick and deliver the resulting frame to `sink`.
    ///
    /// # Errors
    /// Returns [`SimulationError::NoReachableNeighbor`] when a firefighter on
    /// an isolated node must move and the stranded policy is
    /// [`StrandedPolicy::Fail`]. Parcel transitions and the history record for
    /// the tick have already been applied at that point, and agents before
    /// the stranded one have moved; the simulation should not be stepped
    /// further.
    pub fn step(&mut self, sink: &mut dyn FrameSink) -> Result<TickSummary, SimulationError> {
        self.tick += 1;
        let mut summary = TickSummary::default();

        let mut pending = Vec::new();
        for i in 0..self.topology.node_count() {
            let node = self.topology.nodes()[i];
            self.transition_parcel(node, &mut pending, &mut summary);
        }
        for node in pending {
            if let Some(tree) = self.parcels.get_mut(&node).and_then(LandParcel::as_tree_mut) {
                if !tree.on_fire {
                    tree.on_fire = true;
                    summary.ignitions += 1;
                }
            }
        }

        let record = TickRecord::new(self.tick, self.census());
        self.history.push(record);
        summary.record = record;

        for i in 0..self.firefighters.len() {
            self.move_firefighter(i, &mut summary)?;
        }
        self.positions.clear();
        self.positions
            .extend(self.firefighters.iter().map(Firefighter::position));

        let frame = self.frame();
        sink.deliver(&frame);

        debug!(
            tick = self.tick,
            trees = record.trees,
            rocks = record.rocks,
            burning = record.burning,
            ignitions = summary.ignitions,
            burnouts = summary.burnouts,
            containments = summary.containments,
            "Tick complete"
        );
        Ok(summary)
    }

    /// Run `ticks` steps, discarding frames.
    ///
    /// # Errors
    /// Stops at the first failing step; see [`Simulation::step`].
    pub fn run(&mut self, ticks: u32) -> Result<&History, SimulationError> {
        self.run_with_sink(ticks, &mut NullSink)
    }

    /// Run `ticks` steps, delivering every frame to `sink`.
    ///
    /// # Errors
    /// Stops at the first failing step; see [`Simulation::step`].
    pub fn run_with_sink(
        &mut self,
        ticks: u32,
        sink: &mut dyn FrameSink,
    ) -> Result<&History, SimulationError> {
        for _ in 0..ticks {
            self.step(sink)?;
        }
        Ok(&self.history)
    }

    fn transition_parcel(
        &mut self,
        node: NodeId,
        pending: &mut Vec<NodeId>,
        summary: &mut TickSummary,
    ) {
        let rules = self.rules;
        let Some(parcel) = self.parcels.get_mut(&node) else {
            return;
        };

        if parcel.is_rock() {
            if self.rng.random_bool(rules.regrow_probability.value()) {
                *parcel = LandParcel::sapling(&rules);
                summary.regrowths += 1;
                trace!(%node, "Rock regrew into tree");
            }
            return;
        }
        let LandParcel::Tree(tree) = parcel else {
            return;
        };

        let mut spreads = false;
        if !tree.on_fire {
            tree.grow(&rules);
        } else if !tree.suppressed {
            tree.burn(&rules);
            spreads = true;
        } else {
            if tree.assigned_firefighter.is_none() {
                tree.assigned_firefighter = self.roster.first_at(node);
            }
            if let Some(agent) = tree.assigned_firefighter {
                let skill = self.firefighters[agent.index()].skill.value();
                if tree.suppress(skill, &rules) {
                    summary.containments += 1;
                    trace!(%node, %agent, "Fire contained");
                }
            }
        }
        let burnt_out = tree.is_burnt_out();

        if spreads {
            self.spread_fire(node, pending, summary);
        }
        if burnt_out {
            self.parcels.insert(node, LandParcel::Rock);
            summary.burnouts += 1;
            trace!(%node, "Tree burnt out");
        }
    }

    fn spread_fire(&mut self, from: NodeId, pending: &mut Vec<NodeId>, summary: &mut TickSummary) {
        let chance = self.rules.spread_probability.value();
        for &neighbor in self.topology.neighbors(from) {
            let Some(tree) = self
                .parcels
                .get_mut(&neighbor)
                .and_then(LandParcel::as_tree_mut)
            else {
                continue;
            };
            if tree.on_fire || !self.rng.random_bool(chance) {
                continue;
            }
            match self.update_policy {
                UpdatePolicy::InPlace => {
                    tree.on_fire = true;
                    summary.ignitions += 1;
                }
                UpdatePolicy::Synchronous => pending.push(neighbor),
            }
            trace!(%from, to = %neighbor, "Fire spread");
        }
    }

    fn move_firefighter(
        &mut self,
        index: usize,
        summary: &mut TickSummary,
    ) -> Result<(), SimulationError> {
        let agent = self.firefighters[index].id;
        let from = self.firefighters[index].position;
        match decide_move(from, &self.topology, &self.parcels, &mut self.rng) {
            MoveDecision::Suppress => {
                if let Some(tree) = self.parcels.get_mut(&from).and_then(LandParcel::as_tree_mut) {
                    tree.suppressed = true;
                }
            }
            MoveDecision::Advance(to) | MoveDecision::Wander(to) => {
                self.firefighters[index].position = to;
                self.roster.relocate(agent, from, to);
                trace!(%agent, %from, %to, "Firefighter moved");
            }
            MoveDecision::Stranded => match self.stranded_policy {
                StrandedPolicy::Fail => {
                    return Err(SimulationError::NoReachableNeighbor { agent, node: from });
                }
                StrandedPolicy::StayInPlace => {
                    warn!(%agent, node = %from, "Firefighter has no neighbor to move to");
                    summary.stranded.push(agent);
                }
            },
        }
        Ok(())
    }

    fn frame(&self) -> VisualFrame {
        let intensities: BTreeMap<NodeId, f64> = self
            .topology
            .nodes()
            .iter()
            .filter_map(|n| {
                self.parcels
                    .get(n)
                    .and_then(|p| p.intensity(&self.rules))
                    .map(|v| (*n, v))
            })
            .collect();
        VisualFrame {
            tick: self.tick,
            intensities,
            firefighter_positions: self.positions.clone(),
        }
    }

    // ========================================================================
    // EXTERNAL INTERVENTIONS
    // ========================================================================

    /// Set a tree on fire. Returns `false` if the node is rock or already
    /// burning.
    ///
    /// # Errors
    /// [`SimulationError::UnknownNode`] if the node is not in the topology.
    pub fn ignite(&mut self, node: NodeId) -> Result<bool, SimulationError> {
        let parcel = self
            .parcels
            .get_mut(&node)
            .ok_or(SimulationError::UnknownNode(node))?;
        match parcel.as_tree_mut() {
            Some(tree) if !tree.on_fire => {
                tree.on_fire = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Put out a fire without suppression. Returns `false` if nothing was
    /// burning.
    ///
    /// # Errors
    /// [`SimulationError::UnknownNode`] if the node is not in the topology.
    pub fn extinguish(&mut self, node: NodeId) -> Result<bool, SimulationError> {
        let parcel = self
            .parcels
            .get_mut(&node)
            .ok_or(SimulationError::UnknownNode(node))?;
        match parcel.as_tree_mut() {
            Some(tree) if tree.on_fire => {
                tree.on_fire = false;
                tree.suppressed = false;
                tree.assigned_firefighter = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Teleport a firefighter. A tree it was bound to loses the binding and
    /// rebinds to another agent on that node during the next step.
    ///
    /// # Errors
    /// [`SimulationError::UnknownFirefighter`] or
    /// [`SimulationError::UnknownNode`].
    pub fn place_firefighter(&mut self, agent: AgentId, node: NodeId) -> Result<(), SimulationError> {
        if !self.topology.contains(node) {
            return Err(SimulationError::UnknownNode(node));
        }
        let firefighter = self
            .firefighters
            .get_mut(agent.index())
            .ok_or(SimulationError::UnknownFirefighter(agent))?;
        let from = firefighter.position;
        firefighter.position = node;
        self.roster.relocate(agent, from, node);
        self.positions[agent.index()] = node;

        if from != node {
            if let Some(tree) = self.parcels.get_mut(&from).and_then(LandParcel::as_tree_mut) {
                if tree.assigned_firefighter == Some(agent) {
                    tree.assigned_firefighter = None;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn parcel(&self, node: NodeId) -> Option<&LandParcel> {
        self.parcels.get(&node)
    }

    #[must_use]
    pub fn parcels(&self) -> &ParcelMap {
        &self.parcels
    }

    #[must_use]
    pub fn firefighters(&self) -> &[Firefighter] {
        &self.firefighters
    }

    #[must_use]
    pub fn firefighter(&self, agent: AgentId) -> Option<&Firefighter> {
        self.firefighters.get(agent.index())
    }

    /// Position of each firefighter as of the end of the last step.
    #[must_use]
    pub fn firefighter_positions(&self) -> &[NodeId] {
        &self.positions
    }

    /// Agents currently standing on `node`, ascending.
    #[must_use]
    pub fn firefighters_at(&self, node: NodeId) -> &[AgentId] {
        self.roster.agents_at(node)
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn into_history(self) -> History {
        self.history
    }

    /// Number of completed steps.
    #[inline]
    #[must_use]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[must_use]
    pub fn rules(&self) -> &ParcelRules {
        &self.rules
    }

    /// Counts of the current parcel state.
    #[must_use]
    pub fn census(&self) -> Census {
        Census::of(self.parcels.values())
    }

    /// Snapshot of the current state as a frame.
    #[must_use]
    pub fn current_frame(&self) -> VisualFrame {
        self.frame()
    }
}
