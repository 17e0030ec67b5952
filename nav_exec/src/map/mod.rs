//! # Map
//!
//! This module implements the [`Graph`], the static map the robot navigates on. Nodes are the
//! line intersections (and line ends) of the track, each with a fixed position in the map frame,
//! and edges are the straight line segments joining them.
//!
//! A graph is built once at startup, either through a [`GraphBuilder`] or from a [`MapParams`]
//! file, and is immutable from then on. All validation happens at construction time so a built
//! graph is never inconsistent.

// ------------------------------------------------------------------------------------------------
// MODS
// ------------------------------------------------------------------------------------------------

/// Implements the [`Graph`] and [`GraphBuilder`] types
mod graph;

/// Map file parameters
mod params;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use graph::{project_onto_segment, Graph, GraphBuilder, NodeId};
pub use params::{MapParams, NodeParams};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised while constructing a [`Graph`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GraphError {
    #[error("Node {0} is already in the map")]
    DuplicateNode(NodeId),

    #[error("Node {0} has a non-finite position ({1}, {2})")]
    NonFinitePosition(NodeId, f64, f64),

    #[error("Edge ({0}, {1}) references node {2} which is not in the map")]
    UnknownNode(NodeId, NodeId, NodeId),

    #[error("Edge from node {0} to itself is not allowed")]
    SelfLoop(NodeId),
}
