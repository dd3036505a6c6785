//! Monitored regions and the region registry.
//!
//! A monitored region is a circular geographic area (center + radius) the
//! location provider watches for entry and exit crossings. The registry is
//! the in-memory source of truth for which regions are currently monitored:
//! a region is in the registry if and only if the provider accepted it.

mod registry;
mod types;

pub use registry::{RegionRegistry, RegistrationError};
pub use types::MonitoredRegion;
