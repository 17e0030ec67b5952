//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Control panel commands (run, stop, reset)
pub mod tc;

/// Data exchanged with the robot's equipment (encoders, ultrasonic, wheels)
pub mod eqpt;
