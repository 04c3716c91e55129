//! Neighbor edge-list set difference.
//!
//! A full-replacement area update ("set my neighbors to exactly this list")
//! decomposes into edges to add and edges to remove; both sides of every
//! touched edge must then be updated in the same batch save.

use std::collections::HashSet;
use uuid::Uuid;

/// The edge changes implied by replacing `current` with `requested`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborDiff {
    /// Requested neighbors not currently present
    pub to_add: Vec<Uuid>,
    /// Current neighbors not in the requested set
    pub to_remove: Vec<Uuid>,
}

/// Compute the edge diff between the current and the requested neighbor set.
/// Order within each output list follows the corresponding input list.
pub fn neighbor_diff(current: &[Uuid], requested: &[Uuid]) -> NeighborDiff {
    let current_set: HashSet<Uuid> = current.iter().copied().collect();
    let requested_set: HashSet<Uuid> = requested.iter().copied().collect();

    let mut seen = HashSet::new();
    let to_add = requested
        .iter()
        .filter(|id| !current_set.contains(id) && seen.insert(**id))
        .copied()
        .collect();

    let mut seen = HashSet::new();
    let to_remove = current
        .iter()
        .filter(|id| !requested_set.contains(id) && seen.insert(**id))
        .copied()
        .collect();

    NeighborDiff { to_add, to_remove }
}
