//! In-memory registry of monitored regions.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::provider::{AuthorizationState, LocationProvider};

use super::MonitoredRegion;

/// Errors returned by region registration.
///
/// All variants except [`RegistrationError::ProviderRejected`] are local
/// validation failures detected before the provider is involved; none are
/// retried automatically.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistrationError {
    /// A region with this identifier is already registered.
    #[error("Region '{0}' is already registered")]
    DuplicateIdentifier(String),

    /// Registering would exceed the maximum simultaneously monitored regions.
    #[error("Region limit reached ({limit} regions)")]
    CapacityExceeded {
        /// The configured region limit.
        limit: usize,
    },

    /// The current permission level does not allow region monitoring.
    #[error("Region monitoring requires 'always' authorization (current: {0:?})")]
    AuthorizationDenied(AuthorizationState),

    /// The provider refused the region.
    #[error("Provider rejected region: {0}")]
    ProviderRejected(String),
}

/// Mapping from identifier to monitored region, kept in lockstep with the
/// provider: an entry exists if and only if the provider accepted it.
///
/// The registry enforces identifier uniqueness and the platform capacity
/// limit; authorization gating happens in the tracker before registration
/// reaches this type.
pub struct RegionRegistry {
    provider: Arc<dyn LocationProvider>,
    regions: HashMap<String, MonitoredRegion>,
    capacity: usize,
}

impl RegionRegistry {
    /// Create an empty registry backed by the given provider.
    pub fn new(provider: Arc<dyn LocationProvider>, capacity: usize) -> Self {
        Self {
            provider,
            regions: HashMap::new(),
            capacity,
        }
    }

    /// Register a region and start provider monitoring for it.
    ///
    /// On provider rejection nothing is retained (rollback); the caller is
    /// responsible for emitting the corresponding failure event.
    ///
    /// # Errors
    ///
    /// - `DuplicateIdentifier` if the identifier is already registered
    /// - `CapacityExceeded` if the registry is at its region limit
    /// - `ProviderRejected` if the provider refuses to monitor the region
    pub fn register(&mut self, region: MonitoredRegion) -> Result<(), RegistrationError> {
        if self.regions.contains_key(&region.identifier) {
            return Err(RegistrationError::DuplicateIdentifier(
                region.identifier.clone(),
            ));
        }
        if self.regions.len() >= self.capacity {
            return Err(RegistrationError::CapacityExceeded {
                limit: self.capacity,
            });
        }

        self.provider
            .start_monitoring(&region)
            .map_err(|e| RegistrationError::ProviderRejected(e.to_string()))?;

        debug!(identifier = %region.identifier, radius = region.radius_meters, "Region registered");
        self.regions.insert(region.identifier.clone(), region);
        Ok(())
    }

    /// Remove a region, stopping provider monitoring for it.
    ///
    /// Returns the removed region, or `None` if the identifier is unknown.
    /// A provider error while stopping is logged but does not keep the
    /// entry alive; the registry entry is deleted regardless.
    pub fn remove(&mut self, identifier: &str) -> Option<MonitoredRegion> {
        let region = self.regions.remove(identifier)?;

        if let Err(e) = self.provider.stop_monitoring(&region) {
            warn!(identifier = %region.identifier, error = %e, "Failed to stop monitoring");
        }

        debug!(identifier = %region.identifier, "Region removed");
        Some(region)
    }

    /// Remove every region through the same path as [`RegionRegistry::remove`].
    ///
    /// Best-effort: a provider error on one region does not stop removal of
    /// the rest. Returns the removed regions so the caller can emit one
    /// removal event per entry.
    pub fn remove_all(&mut self) -> Vec<MonitoredRegion> {
        let identifiers: Vec<String> = self.regions.keys().cloned().collect();
        identifiers
            .iter()
            .filter_map(|id| self.remove(id))
            .collect()
    }

    /// Look up a region by identifier.
    pub fn get(&self, identifier: &str) -> Option<&MonitoredRegion> {
        self.regions.get(identifier)
    }

    /// A detached snapshot of all registered regions.
    ///
    /// Later registry mutations do not affect the returned list.
    pub fn snapshot(&self) -> Vec<MonitoredRegion> {
        self.regions.values().cloned().collect()
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
