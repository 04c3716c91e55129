//! Topology graph algorithms.
//!
//! Pure functions over in-memory area snapshots — no persistence, no domain
//! errors. The services load the working set from the store, hand it to this
//! module, and persist whatever the result tells them to.
//!
//! - [`connectivity`] — induced-subgraph reachability check for equipment
//!   placement validation
//! - [`diff`] — neighbor edge-list set difference for full-replacement
//!   area updates

pub mod connectivity;
pub mod diff;

pub use connectivity::is_connected;
pub use diff::{neighbor_diff, NeighborDiff};
