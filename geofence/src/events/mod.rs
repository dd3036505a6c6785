//! Domain events and the raw-event translator.
//!
//! The translator consumes raw [`ProviderEvent`]s and produces
//! [`GeofenceEvent`] domain notifications, applying three policies on the
//! way:
//!
//! - **Jump filtering**: a new location fix is accepted only if it moved at
//!   least the configured threshold from the last accepted fix. This
//!   suppresses GPS jitter so the observer is not flooded with
//!   near-duplicate updates.
//! - **Flag suppression**: entry/exit crossings for regions whose
//!   `notify_on_entry`/`notify_on_exit` flag is off are dropped.
//! - **Stale-identifier drops**: crossings for identifiers no longer in the
//!   registry (a removal raced an in-flight callback) are dropped silently.

use tracing::debug;

use crate::auth::AuthorizationGate;
use crate::provider::{AuthorizationState, LocationFix, ProviderEvent};
use crate::region::{MonitoredRegion, RegionRegistry};

/// A domain-level notification delivered to the observer.
#[derive(Debug, Clone)]
pub enum GeofenceEvent {
    /// The permission level changed.
    AuthorizationChanged(AuthorizationState),
    /// A location fix passed the jump filter.
    LocationUpdated(LocationFix),
    /// The device entered a monitored region with entry notification on.
    RegionEntered(MonitoredRegion),
    /// The device left a monitored region with exit notification on.
    RegionExited(MonitoredRegion),
    /// A region was accepted by the provider and stored.
    RegionRegistered(MonitoredRegion),
    /// A region was removed from monitoring.
    RegionRemoved(MonitoredRegion),
    /// Registration failed, either synchronously or after acceptance.
    RegistrationFailed {
        /// The affected region, when the failure is attributable to one.
        region: Option<MonitoredRegion>,
        /// Provider-supplied cause.
        cause: String,
    },
}

/// Movement filter that drops fixes closer than a threshold to the last
/// accepted fix.
///
/// A threshold of zero disables filtering: every fix is accepted.
#[derive(Debug)]
pub struct JumpFilter {
    threshold_meters: f64,
    last_fix: Option<LocationFix>,
}

impl JumpFilter {
    /// Create a filter with the given threshold in meters.
    pub fn new(threshold_meters: f64) -> Self {
        Self {
            threshold_meters,
            last_fix: None,
        }
    }

    /// Offer a fix to the filter.
    ///
    /// Returns true if the fix was accepted (first fix ever, or moved at
    /// least the threshold distance); accepted fixes become the new
    /// reference point.
    pub fn accept(&mut self, fix: LocationFix) -> bool {
        let accepted = match &self.last_fix {
            None => true,
            Some(last) => {
                last.coordinate.distance_meters(&fix.coordinate) >= self.threshold_meters
            }
        };

        if accepted {
            self.last_fix = Some(fix);
        }
        accepted
    }

    /// The most recent accepted fix.
    pub fn last_fix(&self) -> Option<LocationFix> {
        self.last_fix
    }

    /// Change the threshold. Takes effect for the next fix.
    pub fn set_threshold(&mut self, threshold_meters: f64) {
        self.threshold_meters = threshold_meters;
    }

    /// Current threshold in meters.
    pub fn threshold(&self) -> f64 {
        self.threshold_meters
    }
}

/// Translates raw provider events into domain events.
///
/// Owns the jump filter (and with it the last accepted fix) and the
/// geotracking flag; consults the registry and drives the authorization
/// gate, both borrowed per call from the tracker's locked state.
#[derive(Debug)]
pub struct EventTranslator {
    filter: JumpFilter,
    geotracking_enabled: bool,
}

impl EventTranslator {
    /// Create a translator with the given jump threshold.
    ///
    /// Geotracking starts disabled until `configure` turns it on.
    pub fn new(jump_threshold_meters: f64) -> Self {
        Self {
            filter: JumpFilter::new(jump_threshold_meters),
            geotracking_enabled: false,
        }
    }

    /// Translate one raw event, or drop it.
    pub fn translate(
        &mut self,
        event: ProviderEvent,
        registry: &RegionRegistry,
        gate: &mut AuthorizationGate,
    ) -> Option<GeofenceEvent> {
        match event {
            ProviderEvent::AuthorizationChanged(state) => {
                gate.update(state);
                Some(GeofenceEvent::AuthorizationChanged(state))
            }
            ProviderEvent::LocationUpdate(fix) => {
                if !self.geotracking_enabled {
                    debug!("Location fix dropped: geotracking disabled");
                    return None;
                }
                if self.filter.accept(fix) {
                    Some(GeofenceEvent::LocationUpdated(fix))
                } else {
                    debug!(
                        threshold = self.filter.threshold(),
                        "Location fix dropped by jump filter"
                    );
                    None
                }
            }
            ProviderEvent::RegionEntered { identifier } => {
                let region = registry.get(&identifier)?;
                if !region.notify_on_entry {
                    debug!(identifier = %identifier, "Entry event suppressed by region flag");
                    return None;
                }
                Some(GeofenceEvent::RegionEntered(region.clone()))
            }
            ProviderEvent::RegionExited { identifier } => {
                let region = registry.get(&identifier)?;
                if !region.notify_on_exit {
                    debug!(identifier = %identifier, "Exit event suppressed by region flag");
                    return None;
                }
                Some(GeofenceEvent::RegionExited(region.clone()))
            }
            ProviderEvent::MonitoringFailed { identifier, cause } => {
                // The provider has already discarded the region; the
                // registry is left untouched.
                let region = identifier
                    .as_deref()
                    .and_then(|id| registry.get(id))
                    .cloned();
                Some(GeofenceEvent::RegistrationFailed { region, cause })
            }
        }
    }

    /// The most recent accepted fix.
    pub fn last_fix(&self) -> Option<LocationFix> {
        self.filter.last_fix()
    }

    /// Update the jump threshold.
    pub fn set_jump_threshold(&mut self, threshold_meters: f64) {
        self.filter.set_threshold(threshold_meters);
    }

    /// Enable or disable geotracking (location update translation).
    pub fn set_geotracking_enabled(&mut self, enabled: bool) {
        self.geotracking_enabled = enabled;
    }

    /// Whether geotracking is enabled.
    pub fn geotracking_enabled(&self) -> bool {
        self.geotracking_enabled
    }
}
