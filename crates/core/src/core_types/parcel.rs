//! Land parcels: the per-node state of the forest
//!
//! Every node carries exactly one [`LandParcel`]. A parcel is either inert
//! [`LandParcel::Rock`] or a [`LandParcel::Tree`] with vitality and fire flags.
//! Tree ↔ Rock conversion replaces the value stored for the node; nothing
//! outside the parcel map holds on to a `TreeState`, so a converted parcel is
//! always re-resolved through its node id.
//!
//! The numeric rules that drive the state machine live in [`ParcelRules`].
//! Neighbor-dependent steps (fire spread, binding a firefighter) need the
//! topology and the agent roster and are orchestrated by the simulation
//! engine; the per-parcel arithmetic is here.

use crate::core_types::ids::{AgentId, NodeId};
use crate::core_types::units::Probability;
use crate::error::ConfigError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Current parcel of every node. Owned by the simulation engine.
pub type ParcelMap = FxHashMap<NodeId, LandParcel>;

// ============================================================================
// RULE CONSTANTS
// ============================================================================

/// Numeric constants of the parcel state machine.
///
/// The values are illustrative, not calibrated fire physics. `growth_ceiling`
/// and `fire_color_offset` share the value 256 by default but are unrelated;
/// changing one never implies changing the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParcelRules {
    /// Vitality of a freshly created tree (initial draw and regrowth).
    pub baseline_vitality: f64,
    /// Vitality gained per tick by a tree that is not burning.
    pub growth_increment: f64,
    /// Upper bound of undisturbed growth.
    pub growth_ceiling: f64,
    /// Vitality lost per tick by a burning, unsuppressed tree.
    pub burn_decrement: f64,
    /// Per-neighbor chance that a burning tree ignites a healthy neighbor tree.
    pub spread_probability: Probability,
    /// Per-tick chance that a rock turns back into a tree.
    pub regrow_probability: Probability,
    /// Vitality at which a suppressed fire is declared out.
    pub containment_threshold: f64,
    /// Multiplier applied to a firefighter's skill when restoring vitality.
    pub suppression_factor: f64,
    /// Offset subtracted from a burning tree's vitality in the render signal.
    pub fire_color_offset: f64,
}

impl Default for ParcelRules {
    fn default() -> Self {
        Self {
            baseline_vitality: 100.0,
            growth_increment: 10.0,
            growth_ceiling: 256.0,
            burn_decrement: 20.0,
            spread_probability: Probability::new(0.30),
            regrow_probability: Probability::new(0.01),
            containment_threshold: 150.0,
            suppression_factor: 100.0,
            fire_color_offset: 256.0,
        }
    }
}

impl ParcelRules {
    /// Check that every constant is finite and that increments are positive.
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("rules.baseline_vitality", self.baseline_vitality),
            ("rules.growth_increment", self.growth_increment),
            ("rules.growth_ceiling", self.growth_ceiling),
            ("rules.burn_decrement", self.burn_decrement),
            ("rules.containment_threshold", self.containment_threshold),
            ("rules.suppression_factor", self.suppression_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::out_of_range(name, value, "finite and > 0"));
            }
        }
        if !self.fire_color_offset.is_finite() {
            return Err(ConfigError::out_of_range(
                "rules.fire_color_offset",
                self.fire_color_offset,
                "finite",
            ));
        }
        if self.growth_increment > self.growth_ceiling {
            return Err(ConfigError::out_of_range(
                "rules.growth_increment",
                self.growth_increment,
                "<= rules.growth_ceiling",
            ));
        }
        Ok(())
    }

    /// Highest vitality at which the growth step still applies.
    #[inline]
    #[must_use]
    pub fn growth_limit(&self) -> f64 {
        self.growth_ceiling - self.growth_increment
    }
}

// ============================================================================
// TREE STATE
// ============================================================================

/// Tree-specific state. Lost entirely when the parcel burns out to rock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeState {
    pub(crate) vitality: f64,
    pub(crate) on_fire: bool,
    pub(crate) suppressed: bool,
    pub(crate) assigned_firefighter: Option<AgentId>,
}

impl TreeState {
    /// Healthy, unbound tree with the given vitality.
    #[must_use]
    pub fn new(vitality: f64) -> Self {
        Self {
            vitality,
            on_fire: false,
            suppressed: false,
            assigned_firefighter: None,
        }
    }

    /// Fresh tree at the configured baseline vitality.
    #[must_use]
    pub fn sapling(rules: &ParcelRules) -> Self {
        Self::new(rules.baseline_vitality)
    }

    /// Builder: the tree is burning.
    #[must_use]
    pub fn ignited(mut self) -> Self {
        self.on_fire = true;
        self
    }

    /// Builder: the tree is marked as being fought.
    #[must_use]
    pub fn with_suppression(mut self) -> Self {
        self.suppressed = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn vitality(&self) -> f64 {
        self.vitality
    }

    #[inline]
    #[must_use]
    pub fn is_on_fire(&self) -> bool {
        self.on_fire
    }

    #[inline]
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    #[inline]
    #[must_use]
    pub fn assigned_firefighter(&self) -> Option<AgentId> {
        self.assigned_firefighter
    }

    /// Undisturbed growth, capped at the ceiling.
    ///
    /// Applies only while `vitality <= ceiling - increment`; above that the
    /// step is skipped entirely rather than topping up to the ceiling.
    pub(crate) fn grow(&mut self, rules: &ParcelRules) {
        if self.vitality <= rules.growth_limit() {
            self.vitality = (self.vitality + rules.growth_increment).min(rules.growth_ceiling);
        }
    }

    pub(crate) fn burn(&mut self, rules: &ParcelRules) {
        self.vitality -= rules.burn_decrement;
    }

    /// Apply one tick of suppression from a firefighter with `skill`.
    ///
    /// Returns `true` when the fire was contained this tick, in which case the
    /// fire and suppression flags are cleared and the firefighter unbound.
    pub(crate) fn suppress(&mut self, skill: f64, rules: &ParcelRules) -> bool {
        self.vitality += skill * rules.suppression_factor;
        if self.vitality >= rules.containment_threshold {
            self.on_fire = false;
            self.suppressed = false;
            self.assigned_firefighter = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub(crate) fn is_burnt_out(&self) -> bool {
        self.vitality <= 0.0
    }
}

// ============================================================================
// LAND PARCEL
// ============================================================================

/// Aggregate category used by statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParcelCategory {
    Tree,
    BurningTree,
    Rock,
}

/// The state of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LandParcel {
    /// Inert ground. May regrow into a tree.
    Rock,
    /// Vegetation that grows, burns, and can be saved.
    Tree(TreeState),
}

impl LandParcel {
    /// Tree at baseline vitality.
    #[must_use]
    pub fn sapling(rules: &ParcelRules) -> Self {
        LandParcel::Tree(TreeState::sapling(rules))
    }

    #[inline]
    #[must_use]
    pub fn is_tree(&self) -> bool {
        matches!(self, LandParcel::Tree(_))
    }

    #[inline]
    #[must_use]
    pub fn is_rock(&self) -> bool {
        matches!(self, LandParcel::Rock)
    }

    #[inline]
    #[must_use]
    pub fn as_tree(&self) -> Option<&TreeState> {
        match self {
            LandParcel::Tree(tree) => Some(tree),
            LandParcel::Rock => None,
        }
    }

    #[inline]
    pub fn as_tree_mut(&mut self) -> Option<&mut TreeState> {
        match self {
            LandParcel::Tree(tree) => Some(tree),
            LandParcel::Rock => None,
        }
    }

    /// A tree that is currently on fire.
    #[inline]
    #[must_use]
    pub fn is_burning(&self) -> bool {
        self.as_tree().is_some_and(TreeState::is_on_fire)
    }

    /// A burning tree that no firefighter has claimed yet.
    #[inline]
    #[must_use]
    pub fn needs_firefighter(&self) -> bool {
        self.as_tree().is_some_and(|t| t.on_fire && !t.suppressed)
    }

    /// A tree that fire can still spread to.
    #[inline]
    #[must_use]
    pub fn is_flammable(&self) -> bool {
        self.as_tree().is_some_and(|t| !t.on_fire)
    }

    #[must_use]
    pub fn category(&self) -> ParcelCategory {
        match self {
            LandParcel::Rock => ParcelCategory::Rock,
            LandParcel::Tree(t) if t.on_fire => ParcelCategory::BurningTree,
            LandParcel::Tree(_) => ParcelCategory::Tree,
        }
    }

    /// Signed render intensity for this parcel.
    ///
    /// Healthy trees report their vitality; burning trees report
    /// `vitality - fire_color_offset`, which is never positive for vitality
    /// at or below the offset. Rock has no intensity.
    #[must_use]
    pub fn intensity(&self, rules: &ParcelRules) -> Option<f64> {
        match self {
            LandParcel::Rock => None,
            LandParcel::Tree(t) if t.on_fire => Some(t.vitality - rules.fire_color_offset),
            LandParcel::Tree(t) => Some(t.vitality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_below_limit() {
        let rules = ParcelRules::default();
        for v in [0.5, 100.0, 200.0, 246.0] {
            let mut tree = TreeState::new(v);
            tree.grow(&rules);
            assert_eq!(tree.vitality(), (v + 10.0).min(256.0));
        }
    }

    #[test]
    fn test_growth_skipped_above_limit() {
        let rules = ParcelRules::default();
        for v in [246.5, 250.0, 256.0] {
            let mut tree = TreeState::new(v);
            tree.grow(&rules);
            assert_eq!(tree.vitality(), v);
        }
    }

    #[test]
    fn test_suppress_contains_at_threshold() {
        let rules = ParcelRules::default();
        let mut tree = TreeState::new(100.0).ignited().with_suppression();
        tree.assigned_firefighter = Some(AgentId(0));

        assert!(!tree.suppress(0.4, &rules));
        assert_eq!(tree.vitality(), 140.0);
        assert!(tree.is_on_fire());

        assert!(tree.suppress(0.4, &rules));
        assert!(!tree.is_on_fire());
        assert!(!tree.is_suppressed());
        assert_eq!(tree.assigned_firefighter(), None);
    }

    #[test]
    fn test_intensity_signals() {
        let rules = ParcelRules::default();
        assert_eq!(LandParcel::Rock.intensity(&rules), None);
        assert_eq!(
            LandParcel::Tree(TreeState::new(120.0)).intensity(&rules),
            Some(120.0)
        );
        let burning = LandParcel::Tree(TreeState::new(256.0).ignited());
        assert_eq!(burning.intensity(&rules), Some(0.0));
    }

    #[test]
    fn test_categories() {
        assert_eq!(LandParcel::Rock.category(), ParcelCategory::Rock);
        assert_eq!(
            LandParcel::Tree(TreeState::new(1.0)).category(),
            ParcelCategory::Tree
        );
        assert_eq!(
            LandParcel::Tree(TreeState::new(1.0).ignited()).category(),
            ParcelCategory::BurningTree
        );
    }

    #[test]
    fn test_rules_validation() {
        assert!(ParcelRules::default().validate().is_ok());

        let bad = ParcelRules {
            growth_increment: -1.0,
            ..ParcelRules::default()
        };
        assert!(bad.validate().is_err());

        let inverted = ParcelRules {
            growth_increment: 300.0,
            ..ParcelRules::default()
        };
        assert!(inverted.validate().is_err());
    }
}
