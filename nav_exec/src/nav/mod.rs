//! # Navigation
//!
//! This module provides route planning over the map [`Graph`](crate::map::Graph).
//!
//! The [`path_planner`] finds the shortest node-to-node [`Path`] with an A* search, and
//! [`next_waypoint`] turns that path into the single node the robot should currently be driving
//! towards.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod path_planner;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use path_planner::{next_waypoint, plan, Path};
