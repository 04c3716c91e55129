//! Induced-subgraph connectivity check.
//!
//! Builds an undirected petgraph view restricted to the input set (an edge to
//! an area outside the set is ignored) and runs a BFS from the first node,
//! counting reachable nodes. The graph is undirected, so the choice of start
//! node cannot change the boolean result; the first element is used for
//! reproducibility.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

use crate::store::models::AreaSnapshot;

/// Returns true iff the areas form a connected subgraph of the neighbor
/// graph, using only edges between members of the input set.
///
/// A set of size 0 or 1 is trivially connected. Duplicate ids in the input
/// are de-duplicated before traversal.
pub fn is_connected(areas: &[AreaSnapshot]) -> bool {
    let mut graph: UnGraph<Uuid, ()> = UnGraph::new_undirected();
    let mut index_of: HashMap<Uuid, NodeIndex> = HashMap::with_capacity(areas.len());

    for snapshot in areas {
        index_of
            .entry(snapshot.area.id)
            .or_insert_with(|| graph.add_node(snapshot.area.id));
    }

    if graph.node_count() <= 1 {
        return true;
    }

    // Induced edges only: both endpoints must be in the set
    for snapshot in areas {
        let a = index_of[&snapshot.area.id];
        for neighbor_id in &snapshot.neighbor_ids {
            if let Some(&b) = index_of.get(neighbor_id) {
                if a != b {
                    graph.update_edge(a, b, ());
                }
            }
        }
    }

    // BFS from the first node of the input set
    let start = index_of[&areas[0].area.id];
    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();
    visited[start.index()] = true;
    queue.push_back(start);
    let mut reachable = 1usize;

    while let Some(current) = queue.pop_front() {
        for neighbor in graph.neighbors(current) {
            if !visited[neighbor.index()] {
                visited[neighbor.index()] = true;
                reachable += 1;
                queue.push_back(neighbor);
            }
        }
    }

    reachable == graph.node_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::AreaNode;
    use chrono::Utc;

    fn area(id: Uuid, neighbors: &[Uuid]) -> AreaSnapshot {
        AreaSnapshot {
            area: AreaNode {
                id,
                name: format!("area-{}", id),
                location_description: String::new(),
                plant_id: Uuid::nil(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            neighbor_ids: neighbors.to_vec(),
        }
    }

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_empty_set_is_connected() {
        assert!(is_connected(&[]));
    }

    #[test]
    fn test_single_node_is_connected() {
        let id = Uuid::new_v4();
        assert!(is_connected(&[area(id, &[])]));
    }

    #[test]
    fn test_path_is_connected() {
        // A–B, B–C
        let v = ids(3);
        let set = vec![
            area(v[0], &[v[1]]),
            area(v[1], &[v[0], v[2]]),
            area(v[2], &[v[1]]),
        ];
        assert!(is_connected(&set));
    }

    #[test]
    fn test_endpoints_without_middle_are_disconnected() {
        // A–B, B–C but only {A, C} requested: the edge through B is outside
        // the set and must be ignored
        let v = ids(3);
        let set = vec![area(v[0], &[v[1]]), area(v[2], &[v[1]])];
        assert!(!is_connected(&set));
    }

    #[test]
    fn test_two_isolated_nodes_are_disconnected() {
        let v = ids(2);
        assert!(!is_connected(&[area(v[0], &[]), area(v[1], &[])]));
    }

    #[test]
    fn test_result_invariant_under_input_order() {
        let v = ids(4);
        // star centered on v[0]
        let mut set = vec![
            area(v[0], &[v[1], v[2], v[3]]),
            area(v[1], &[v[0]]),
            area(v[2], &[v[0]]),
            area(v[3], &[v[0]]),
        ];
        assert!(is_connected(&set));
        set.reverse();
        assert!(is_connected(&set));
        set.swap(0, 2);
        assert!(is_connected(&set));
    }

    #[test]
    fn test_duplicates_are_tolerated() {
        let v = ids(2);
        let set = vec![
            area(v[0], &[v[1]]),
            area(v[0], &[v[1]]),
            area(v[1], &[v[0]]),
        ];
        assert!(is_connected(&set));
    }

    #[test]
    fn test_edges_leaving_the_set_do_not_connect() {
        // A and B both neighbor an outside area X, but not each other
        let v = ids(3);
        let set = vec![area(v[0], &[v[2]]), area(v[1], &[v[2]])];
        assert!(!is_connected(&set));
    }

    #[test]
    fn test_one_sided_edge_still_connects() {
        // Snapshots are directional views; a half-loaded edge must still count
        // because the underlying graph is undirected
        let v = ids(2);
        let set = vec![area(v[0], &[v[1]]), area(v[1], &[])];
        assert!(is_connected(&set));
    }
}
