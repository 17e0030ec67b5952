//! # Navigation library.
//!
//! This library contains the navigation core of the line following robot, and allows the
//! executable (and the benchmarks) to access it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Clock - monotonic time with per consumer cursors
pub mod clock;

/// Control panel - run flag and pose reset requests
pub mod control_panel;

/// Data store - cycle counters and archive records for the executable
pub mod data_store;

/// Decision engine - chooses the drive command each cycle
pub mod decision;

/// Equipment interfaces - seams to the sensors and actuators
pub mod eqpt;

/// Localisation module - provides the robot with an idea of where it is on the map
pub mod loc;

/// Map - the waypoint graph
pub mod map;

/// Navigation - path planning through the map
pub mod nav;

/// Navigator - runs one control cycle of the navigation core
pub mod navigator;

/// Executable parameters
pub mod params;

/// Simulator - stands in for the robot's hardware
pub mod sim;
