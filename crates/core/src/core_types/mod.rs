//! Core types and utilities

pub mod ids;
pub mod parcel;
pub mod units;
pub mod vec2;

pub use ids::{AgentId, NodeId};
pub use parcel::{LandParcel, ParcelCategory, ParcelMap, ParcelRules, TreeState};
pub use units::{Probability, Skill};
pub use vec2::Vec2;
