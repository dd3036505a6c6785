//! Location provider abstraction.
//!
//! The provider is the external location subsystem: it owns permission
//! prompts, raw position fixes, and the low-level region monitoring
//! primitives. The tracker only ever talks to it through the
//! [`LocationProvider`] trait, which allows dependency injection and mock
//! providers in tests.
//!
//! Raw provider callbacks are modeled as [`ProviderEvent`] values delivered
//! over a channel and consumed by the tracker's event loop; the provider
//! decides the thread they originate on, the tracker serializes them.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::Coordinate;
use crate::region::MonitoredRegion;

/// User-granted location permission level.
///
/// Owned by the authorization gate; only provider callbacks change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationState {
    /// The user has not yet been asked.
    NotDetermined,
    /// The user explicitly denied location access.
    Denied,
    /// Location access is restricted by system policy (e.g. parental
    /// controls); the user cannot change it.
    RestrictedUse,
    /// Background ("always") access granted - required for region monitoring.
    AuthorizedAlways,
    /// Foreground-only access granted.
    AuthorizedWhileInUse,
}

/// A raw position fix from the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    /// The position.
    pub coordinate: Coordinate,
    /// When the fix was produced.
    pub timestamp: Instant,
}

impl LocationFix {
    /// Create a fix timestamped now.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            timestamp: Instant::now(),
        }
    }

    /// Create a fix with an explicit timestamp.
    pub fn with_timestamp(coordinate: Coordinate, timestamp: Instant) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }
}

/// Errors reported synchronously by provider operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    /// The provider refused to start monitoring a region.
    #[error("Monitoring rejected for '{identifier}': {reason}")]
    MonitoringRejected {
        /// Identifier of the affected region.
        identifier: String,
        /// Provider-supplied reason.
        reason: String,
    },

    /// The provider is not available (e.g. location services disabled).
    #[error("Location provider unavailable: {0}")]
    Unavailable(String),
}

/// Raw asynchronous callback from the location provider.
///
/// These are the untranslated events the provider pushes at the tracker;
/// the event translator turns them into [`crate::events::GeofenceEvent`]
/// domain notifications (or drops them).
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// The permission level changed.
    AuthorizationChanged(AuthorizationState),
    /// A new raw position fix arrived.
    LocationUpdate(LocationFix),
    /// The device crossed into a monitored region.
    RegionEntered {
        /// Identifier of the region.
        identifier: String,
    },
    /// The device crossed out of a monitored region.
    RegionExited {
        /// Identifier of the region.
        identifier: String,
    },
    /// Monitoring failed after being accepted, or for no region at all.
    MonitoringFailed {
        /// Identifier of the affected region, if the failure is
        /// region-specific.
        identifier: Option<String>,
        /// Provider-supplied cause.
        cause: String,
    },
}

/// Trait for the underlying location subsystem.
///
/// Implementations wrap a platform location service. All methods are
/// synchronous from the caller's point of view; acceptance that the
/// platform later revokes is reported via [`ProviderEvent::MonitoringFailed`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the tracker shares the provider
/// across the public API and its event loop.
pub trait LocationProvider: Send + Sync {
    /// Prompt the user for "always" location permission.
    ///
    /// One-shot trigger; the outcome arrives later as
    /// [`ProviderEvent::AuthorizationChanged`].
    fn request_always_authorization(&self);

    /// Start monitoring a region for entry/exit crossings.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the provider rejects the region outright.
    fn start_monitoring(&self, region: &MonitoredRegion) -> Result<(), ProviderError>;

    /// Stop monitoring a previously registered region.
    fn stop_monitoring(&self, region: &MonitoredRegion) -> Result<(), ProviderError>;

    /// Enable or disable continuous location updates (geotracking).
    fn request_location_updates(&self, enabled: bool);

    /// Maximum radius in meters the provider supports for a single region.
    fn max_supported_radius(&self) -> f64;
}

/// Convenience constructor for a fix at the given coordinates.
pub fn fix_at(latitude: f64, longitude: f64) -> Result<LocationFix, crate::coord::CoordError> {
    Ok(LocationFix::new(Coordinate::new(latitude, longitude)?))
}
