//! Per-tick parcel counts
//!
//! The history holds one [`TickRecord`] for the initial state (tick 0) and one
//! per completed step, counted after parcel transitions and before agents
//! move. `trees` counts every tree including burning ones, so
//! `trees + rocks == node_count` on every record.

use crate::core_types::{LandParcel, ParcelCategory};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Parcel counts by category at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    /// All trees, burning or not.
    pub trees: usize,
    pub rocks: usize,
    /// Trees currently on fire.
    pub burning: usize,
}

impl Census {
    /// Count a set of parcels.
    pub fn of<'a, I>(parcels: I) -> Self
    where
        I: IntoIterator<Item = &'a LandParcel>,
    {
        let mut census = Census::default();
        for parcel in parcels {
            match parcel.category() {
                ParcelCategory::Rock => census.rocks += 1,
                ParcelCategory::Tree => census.trees += 1,
                ParcelCategory::BurningTree => {
                    census.trees += 1;
                    census.burning += 1;
                }
            }
        }
        census
    }

    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.trees + self.rocks
    }
}

/// Counts recorded for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u32,
    pub trees: usize,
    pub rocks: usize,
    pub burning: usize,
}

impl TickRecord {
    #[must_use]
    pub fn new(tick: u32, census: Census) -> Self {
        Self {
            tick,
            trees: census.trees,
            rocks: census.rocks,
            burning: census.burning,
        }
    }
}

/// Append-only series of tick records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: Vec<TickRecord>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Ticks must arrive in order without gaps.
    pub fn push(&mut self, record: TickRecord) {
        debug_assert_eq!(
            record.tick as usize,
            self.records.len(),
            "history ticks must be contiguous"
        );
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    #[must_use]
    pub fn latest(&self) -> Option<&TickRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn trees(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.trees).collect()
    }

    #[must_use]
    pub fn rocks(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.rocks).collect()
    }

    #[must_use]
    pub fn burning(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.burning).collect()
    }

    /// Record with the most burning trees; the earliest one on ties.
    #[must_use]
    pub fn peak_burning(&self) -> Option<&TickRecord> {
        self.records
            .iter()
            .reduce(|best, r| if r.burning > best.burning { r } else { best })
    }

    /// Render as CSV with a `tick,trees,rocks,burning` header.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::from("tick,trees,rocks,burning\n");
        for r in &self.records {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{},{},{},{}", r.tick, r.trees, r.rocks, r.burning);
        }
        out
    }
}
