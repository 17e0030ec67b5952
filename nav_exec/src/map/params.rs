//! # Map file parameters
//!
//! A map file lists the nodes with their ids and positions, then the edges as pairs of ids:
//!
//! ```toml
//! nodes = [
//!     { id = 0, x_cm = 0.0, y_cm = 0.0 },
//!     { id = 1, x_cm = 100.0, y_cm = 0.0 },
//! ]
//! edges = [[0, 1]]
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Point2;
use serde::Deserialize;

use super::{Graph, GraphError, NodeId};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MapParams {
    pub nodes: Vec<NodeParams>,

    #[serde(default)]
    pub edges: Vec<[u32; 2]>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NodeParams {
    pub id: u32,

    /// Units: centimeters
    pub x_cm: f64,

    /// Units: centimeters
    pub y_cm: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Graph {
    /// Build the graph described by a map file.
    pub fn from_params(params: &MapParams) -> Result<Self, GraphError> {
        let mut builder = Graph::builder();

        for node in params.nodes.iter() {
            builder.insert_node(NodeId(node.id), Point2::new(node.x_cm, node.y_cm))?;
        }

        for [a, b] in params.edges.iter() {
            builder.add_edge(NodeId(*a), NodeId(*b))?;
        }

        Ok(builder.build())
    }
}
