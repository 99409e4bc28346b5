//! Firefighting agents
//!
//! - [`Firefighter`]: position, skill, and the per-tick movement heuristic
//! - [`Roster`]: which agents stand on which node, for binding a suppressor
//!   to a burning parcel without scanning every agent

pub mod firefighter;
pub mod roster;

pub use firefighter::{decide_move, Firefighter, MoveDecision};
pub use roster::Roster;
