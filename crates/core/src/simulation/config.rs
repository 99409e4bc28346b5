//! Simulation configuration
//!
//! Everything the engine reads at setup: how many nodes to ask the generator
//! for, how the initial forest is drawn, how many firefighters to place, and
//! how long to run. Hard bounds are enforced by [`SimulationConfig::validate`];
//! whether to warn about merely unusual values is left to the caller.

use crate::core_types::{ParcelRules, Probability, Skill};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// Legal node counts for generated graphs.
pub const NODE_COUNT_RANGE: RangeInclusive<usize> = 4..=300;

/// Legal number of firefighters.
pub const FIREFIGHTER_RANGE: RangeInclusive<usize> = 1..=50;

/// Legal number of ticks per run.
pub const TICK_RANGE: RangeInclusive<u32> = 2..=1000;

/// When parcel changes made during a sweep become visible to later parcels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Changes apply immediately while sweeping nodes in ascending order.
    /// Fire ignited early in the sweep can burn and spread again later in the
    /// same tick, so a cascade may cross several hops per tick.
    #[default]
    InPlace,
    /// Ignitions are collected during the sweep and applied after it, so fire
    /// advances at most one hop per tick.
    Synchronous,
}

/// What to do when a firefighter has no neighbor to move to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrandedPolicy {
    /// Abort the step with [`SimulationError::NoReachableNeighbor`](crate::SimulationError::NoReachableNeighbor).
    #[default]
    Fail,
    /// Keep the agent where it is and report it in the tick summary.
    StayInPlace,
}

/// Inclusive range firefighter skills are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRange {
    pub lower: Skill,
    pub upper: Skill,
}

impl SkillRange {
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] if either bound is outside `(0, 1)`
    /// or `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, ConfigError> {
        let range = Self {
            lower: Skill::try_new(lower)?,
            upper: Skill::try_new(upper)?,
        };
        range.validate()?;
        Ok(range)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if *self.lower > *self.upper {
            return Err(ConfigError::out_of_range(
                "skill_range.lower",
                self.lower,
                "<= skill_range.upper",
            ));
        }
        Ok(())
    }
}

impl Default for SkillRange {
    fn default() -> Self {
        // 0.4 and 0.6 are inside (0, 1)
        Self {
            lower: Skill::try_new(0.4).unwrap_or_else(|_| unreachable!()),
            upper: Skill::try_new(0.6).unwrap_or_else(|_| unreachable!()),
        }
    }
}

/// Setup parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Target node count handed to the topology generator.
    pub node_count: usize,
    /// Chance that a node starts as a tree rather than rock.
    pub tree_probability: Probability,
    /// Chance that a starting tree is already burning.
    pub ignition_probability: Probability,
    pub firefighter_count: usize,
    pub skill_range: SkillRange,
    /// Number of ticks a run advances.
    pub ticks: u32,
    /// Seed for every random draw of the run.
    pub seed: u64,
    pub rules: ParcelRules,
    pub update_policy: UpdatePolicy,
    pub stranded_policy: StrandedPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_count: 100,
            tree_probability: Probability::new(0.8),
            ignition_probability: Probability::new(0.1),
            firefighter_count: 5,
            skill_range: SkillRange::default(),
            ticks: 100,
            seed: 0,
            rules: ParcelRules::default(),
            update_policy: UpdatePolicy::default(),
            stranded_policy: StrandedPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every parameter against its hard bounds.
    ///
    /// Probabilities and skills are already range-checked by their types; this
    /// covers counts, the skill ordering, and the parcel rule constants.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !NODE_COUNT_RANGE.contains(&self.node_count) {
            return Err(ConfigError::out_of_range(
                "node_count",
                self.node_count,
                "4..=300",
            ));
        }
        if !FIREFIGHTER_RANGE.contains(&self.firefighter_count) {
            return Err(ConfigError::out_of_range(
                "firefighter_count",
                self.firefighter_count,
                "1..=50",
            ));
        }
        if !TICK_RANGE.contains(&self.ticks) {
            return Err(ConfigError::out_of_range("ticks", self.ticks, "2..=1000"));
        }
        self.skill_range.validate()?;
        self.rules.validate()
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] or [`ConfigError::Json`]; out-of-range
    /// probabilities and skills fail during parsing. The result is not
    /// otherwise validated.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
