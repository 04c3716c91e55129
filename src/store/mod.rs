//! Record store for the facility graph.

pub mod client;
pub mod models;
pub mod traits;

pub use client::Neo4jFacilityStore;
pub use models::*;
pub use traits::{FacilityStore, StoreError, StoreResult};

#[cfg(test)]
pub(crate) mod mock;
