//! # Waypoint graph

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;
use std::fmt::Display;

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::GraphError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Identifier of a node, stable for the lifetime of the [`Graph`] it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Immutable map of waypoints and the undirected edges between them.
///
/// Nodes and adjacency lists are kept in id order, so every iteration over the graph (and so
/// every search through it) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node positions in the map frame.
    ///
    /// Units: centimeters
    nodes: BTreeMap<NodeId, Point2<f64>>,

    /// Neighbours of each node, sorted and without duplicates.
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

/// Builder for a [`Graph`].
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    nodes: BTreeMap<NodeId, Point2<f64>>,
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at the given position, returning the id assigned to it (one more than the
    /// largest id in the map so far).
    pub fn add_node(&mut self, position: Point2<f64>) -> Result<NodeId, GraphError> {
        let id = match self.nodes.keys().next_back() {
            Some(last) => NodeId(last.0 + 1),
            None => NodeId(0),
        };

        self.insert_node(id, position)?;

        Ok(id)
    }

    /// Add a node with an explicit id.
    pub fn insert_node(&mut self, id: NodeId, position: Point2<f64>) -> Result<(), GraphError> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(GraphError::NonFinitePosition(id, position.x, position.y));
        }

        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }

        self.nodes.insert(id, position);
        self.adjacency.insert(id, Vec::new());

        Ok(())
    }

    /// Add an undirected edge between two existing nodes. Adding the same edge twice is allowed
    /// and has no further effect.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError> {
        for n in [a, b].iter() {
            if !self.nodes.contains_key(n) {
                return Err(GraphError::UnknownNode(a, b, *n));
            }
        }

        if a == b {
            return Err(GraphError::SelfLoop(a));
        }

        for (from, to) in [(a, b), (b, a)].iter() {
            // Both entries were created in insert_node
            if let Some(neighbours) = self.adjacency.get_mut(from) {
                if let Err(idx) = neighbours.binary_search(to) {
                    neighbours.insert(idx, *to);
                }
            }
        }

        Ok(())
    }

    /// Finish construction.
    pub fn build(self) -> Graph {
        debug!(
            "Built map with {} nodes and {} edges",
            self.nodes.len(),
            self.adjacency.values().map(|n| n.len()).sum::<usize>() / 2
        );

        Graph {
            nodes: self.nodes,
            adjacency: self.adjacency,
        }
    }
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Position of the node, or `None` if it isn't in the map.
    pub fn position(&self, id: NodeId) -> Option<Point2<f64>> {
        self.nodes.get(&id).copied()
    }

    /// Neighbours of the node in ascending id order. Unknown nodes have no neighbours.
    pub fn neighbours(&self, id: NodeId) -> &[NodeId] {
        self.adjacency
            .get(&id)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// True if there is an edge between `a` and `b`.
    pub fn is_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbours(a).binary_search(&b).is_ok()
    }

    /// Iterate over all nodes and their positions in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, Point2<f64>)> + '_ {
        self.nodes.iter().map(|(id, p)| (*id, *p))
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Straight line distance between two nodes, or `None` if either isn't in the map.
    pub fn distance(&self, a: NodeId, b: NodeId) -> Option<f64> {
        Some((self.position(b)? - self.position(a)?).norm())
    }

    /// The lowest id node strictly closer than `threshold` to `position`, if any.
    pub fn node_near(&self, position: &Point2<f64>, threshold: f64) -> Option<NodeId> {
        self.nodes()
            .find(|(_, p)| (p - position).norm() < threshold)
            .map(|(id, _)| id)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Project `point` onto the line segment from `start` to `end`, clamping to the segment's ends.
///
/// Returns `None` for a zero length segment, which doesn't define a line.
pub fn project_onto_segment(
    point: &Point2<f64>,
    start: &Point2<f64>,
    end: &Point2<f64>,
) -> Option<Point2<f64>> {
    let seg = end - start;
    let len_sq = seg.norm_squared();

    if len_sq <= std::f64::EPSILON {
        return None;
    }

    let t = ((point - start).dot(&seg) / len_sq).max(0.0).min(1.0);

    Some(start + seg * t)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
