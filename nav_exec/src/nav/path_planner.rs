//! Plans minimum length paths through the map [`Graph`], using an A* algorithm.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::{BinaryHeap, HashMap, HashSet};

use log::{debug, trace, warn};
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::map::{Graph, NodeId};

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// An ordered sequence of nodes from the start to the destination, both included.
///
/// A path is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path(Vec<NodeId>);

/// An entry in the A* open set.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    id: NodeId,

    /// Length of the best known route from the start to this node.
    cost_so_far: f64,

    /// `cost_so_far` plus the straight line distance to the destination.
    estimate: OrderedFloat<f64>,
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Plan the shortest path from `from` to `to`.
///
/// Edge costs are the straight line distance between the two nodes, and the heuristic is the
/// straight line distance to `to`, which can never overestimate the remaining length. The open
/// node with the lowest estimated total is expanded first, ties going to the lowest node id, so
/// the result is deterministic.
///
/// Returns `None` if `to` can't be reached from `from`, or if either node isn't in the map.
pub fn plan(graph: &Graph, from: NodeId, to: NodeId) -> Option<Path> {
    let goal_pos = match (graph.position(from), graph.position(to)) {
        (Some(_), Some(g)) => g,
        _ => {
            warn!("Cannot plan from {} to {}, node not in the map", from, to);
            return None;
        }
    };

    if from == to {
        return Some(Path(vec![from]));
    }

    let heuristic = |id: NodeId| -> f64 {
        graph
            .position(id)
            .map(|p| (goal_pos - p).norm())
            .unwrap_or(std::f64::INFINITY)
    };

    // Create the priority queue (binary heap) for tracking nodes
    let mut open = BinaryHeap::new();
    open.push(Frontier {
        id: from,
        cost_so_far: 0.0,
        estimate: OrderedFloat(heuristic(from)),
    });

    let mut best_cost: HashMap<NodeId, f64> = HashMap::new();
    best_cost.insert(from, 0.0);

    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
    let mut closed: HashSet<NodeId> = HashSet::new();

    while let Some(current) = open.pop() {
        if current.id == to {
            let path = reconstruct(&came_from, from, to);
            debug!(
                "Planned path {} -> {}: {:?} ({:.1} cm)",
                from, to, path.0, current.cost_so_far
            );
            return Some(path);
        }

        // Stale heap entries for nodes already expanded by a cheaper route
        if !closed.insert(current.id) {
            continue;
        }

        trace!("Expanding {} (g = {:.1})", current.id, current.cost_so_far);

        for &next in graph.neighbours(current.id) {
            if closed.contains(&next) {
                continue;
            }

            let edge_cost = match graph.distance(current.id, next) {
                Some(c) => c,
                None => continue,
            };
            let cost = current.cost_so_far + edge_cost;

            let improved = best_cost.get(&next).map_or(true, |&c| cost < c);
            if improved {
                best_cost.insert(next, cost);
                came_from.insert(next, current.id);
                open.push(Frontier {
                    id: next,
                    cost_so_far: cost,
                    estimate: OrderedFloat(cost + heuristic(next)),
                });
            }
        }
    }

    debug!("No path from {} to {}", from, to);
    None
}

/// Choose the node to drive towards next when at `current` heading for `target`.
///
/// This is the second node of the planned path (the next hop), or `target` itself if the robot
/// is already there. If there is no path the robot holds `current`.
pub fn next_waypoint(graph: &Graph, current: NodeId, target: NodeId) -> NodeId {
    match plan(graph, current, target) {
        Some(path) => path.next_waypoint(),
        None => current,
    }
}

fn reconstruct(came_from: &HashMap<NodeId, NodeId>, from: NodeId, to: NodeId) -> Path {
    let mut nodes = vec![to];
    let mut current = to;

    while current != from {
        match came_from.get(&current) {
            Some(&prev) => {
                nodes.push(prev);
                current = prev;
            }
            None => unreachable!("Node {} was reached without a parent", current),
        }
    }

    nodes.reverse();
    Path(nodes)
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Path {
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    pub fn start(&self) -> NodeId {
        self.0[0]
    }

    pub fn end(&self) -> NodeId {
        self.0[self.0.len() - 1]
    }

    /// The node after the start, or the start itself for a single node path.
    pub fn next_waypoint(&self) -> NodeId {
        match self.0.get(1) {
            Some(&n) => n,
            None => self.start(),
        }
    }

    /// Total length of the path through the graph.
    ///
    /// Returns `None` if any consecutive pair of nodes isn't joined by an edge.
    pub fn length(&self, graph: &Graph) -> Option<f64> {
        self.0.windows(2).try_fold(0.0, |acc, w| {
            if graph.is_edge(w[0], w[1]) {
                graph.distance(w[0], w[1]).map(|d| acc + d)
            } else {
                None
            }
        })
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.estimate == other.estimate && self.id == other.id
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Note that we flip the order here so that the heap will be a min-heap, not a max-heap,
        // with the lowest id coming out first among equal estimates
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Point2;

    fn build(nodes: &[(f64, f64)], edges: &[(u32, u32)]) -> Graph {
        let mut b = Graph::builder();
        for (x, y) in nodes {
            b.add_node(Point2::new(*x, *y)).unwrap();
        }
        for (a, c) in edges {
            b.add_edge(NodeId(*a), NodeId(*c)).unwrap();
        }
        b.build()
    }

    #[test]
    fn test_abc_scenario() {
        let g = build(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)], &[(0, 1), (1, 2)]);
        let (a, b, c) = (NodeId(0), NodeId(1), NodeId(2));

        let path = plan(&g, a, c).unwrap();
        assert_eq!(path.nodes(), &[a, b, c]);
        assert_eq!(path.length(&g), Some(200.0));
        assert_eq!(next_waypoint(&g, a, c), b);

        // Already at the destination
        assert_eq!(plan(&g, c, c).unwrap().nodes(), &[c]);
        assert_eq!(next_waypoint(&g, c, c), c);
    }

    #[test]
    fn test_unreachable() {
        let g = build(&[(0.0, 0.0), (100.0, 0.0), (500.0, 0.0)], &[(0, 1)]);

        assert_eq!(plan(&g, NodeId(0), NodeId(2)), None);
        assert_eq!(next_waypoint(&g, NodeId(0), NodeId(2)), NodeId(0));
        assert_eq!(plan(&g, NodeId(0), NodeId(42)), None);
        assert_eq!(next_waypoint(&g, NodeId(1), NodeId(42)), NodeId(1));
    }

    #[test]
    fn test_shortest_not_fewest_hops() {
        // Direct edge 0-3 is longer than going round via 1 and 2
        let g = build(
            &[(0.0, 0.0), (10.0, 10.0), (20.0, 10.0), (30.0, 0.0), (15.0, -100.0)],
            &[(0, 1), (1, 2), (2, 3), (0, 4), (4, 3)],
        );
        let path = plan(&g, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(path.nodes(), &[NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_ties_go_to_lowest_id() {
        // A square, both ways round are the same length
        let g = build(
            &[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)],
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
        );

        for _ in 0..10 {
            let path = plan(&g, NodeId(0), NodeId(3)).unwrap();
            assert_eq!(path.nodes(), &[NodeId(0), NodeId(1), NodeId(3)]);
        }
    }

    /// Plans between every pair of nodes in a grid with some edges missing, checking each path
    /// against Floyd-Warshall shortest distances.
    #[test]
    fn test_grid_all_pairs() {
        const N: u32 = 5;
        let mut nodes = vec![];
        for j in 0..N {
            for i in 0..N {
                nodes.push((i as f64 * 50.0, j as f64 * 40.0));
            }
        }
        let mut edges = vec![];
        for j in 0..N {
            for i in 0..N {
                let id = j * N + i;
                // Knock out a deterministic subset of edges
                if i + 1 < N && (i * 7 + j * 3) % 5 != 0 {
                    edges.push((id, id + 1));
                }
                if j + 1 < N && (i * 2 + j * 5) % 7 != 3 {
                    edges.push((id, id + N));
                }
                if i + 1 < N && j + 1 < N && (i + j) % 3 == 0 {
                    edges.push((id, id + N + 1));
                }
            }
        }
        let g = build(&nodes, &edges);

        // Reference distances
        let n = (N * N) as usize;
        let mut dist = vec![vec![std::f64::INFINITY; n]; n];
        for k in 0..n {
            dist[k][k] = 0.0;
        }
        for (a, b) in edges.iter() {
            let d = g.distance(NodeId(*a), NodeId(*b)).unwrap();
            dist[*a as usize][*b as usize] = d;
            dist[*b as usize][*a as usize] = d;
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if dist[i][k] + dist[k][j] < dist[i][j] {
                        dist[i][j] = dist[i][k] + dist[k][j];
                    }
                }
            }
        }

        for a in 0..n {
            for b in 0..n {
                match plan(&g, NodeId(a as u32), NodeId(b as u32)) {
                    Some(path) => {
                        assert_eq!(path.start(), NodeId(a as u32));
                        assert_eq!(path.end(), NodeId(b as u32));
                        let len = path.length(&g).expect("Consecutive nodes must be edges");
                        assert!((len - dist[a][b]).abs() < 1e-6, "{} -> {}", a, b);
                    }
                    None => assert!(dist[a][b].is_infinite(), "{} -> {} is reachable", a, b),
                }
            }
        }
    }
}
