//! The geofence tracker orchestrator.
//!
//! `GeofenceTracker` composes the region registry, authorization gate,
//! event translator, and observer dispatcher behind a single lock, and
//! exposes the public operation surface. The embedding application creates
//! exactly one tracker, wraps it in an `Arc`, and hands it to every call
//! site; tests create fresh instances freely.
//!
//! # Event delivery
//!
//! Raw provider callbacks arrive as [`ProviderEvent`] values, either pushed
//! directly through [`GeofenceTracker::handle_provider_event`] or over a
//! channel consumed by the loop spawned by [`GeofenceTracker::start`].
//! Public API calls and provider callbacks serialize on the same internal
//! lock, so they never interleave destructively, regardless of which thread
//! the provider delivers on.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use geofence::{Coordinate, GeofenceTracker, TrackerConfig};
//!
//! let tracker = Arc::new(GeofenceTracker::new(provider, TrackerConfig::default()));
//! tracker.configure(Arc::downgrade(&observer) as _, true);
//! tracker.request_permission();
//!
//! // After the provider reports AuthorizedAlways:
//! let center = Coordinate::new(53.5511, 9.9937)?;
//! tracker.register_region(center, 150.0, "office", true, true)?;
//! ```

mod config;

pub use config::{
    TrackerConfig, DEFAULT_JUMP_THRESHOLD_METERS, DEFAULT_MAX_MONITORED_REGIONS,
    DEFAULT_MAX_RADIUS_METERS,
};

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::auth::AuthorizationGate;
use crate::coord::Coordinate;
use crate::events::{EventTranslator, GeofenceEvent};
use crate::observer::{GeofenceObserver, ObserverDispatcher};
use crate::provider::{LocationFix, LocationProvider, ProviderEvent};
use crate::region::{MonitoredRegion, RegionRegistry, RegistrationError};

/// Mutable tracker state guarded by a single lock.
struct TrackerState {
    registry: RegionRegistry,
    gate: AuthorizationGate,
    translator: EventTranslator,
    max_radius_meters: f64,
}

/// Orchestrator for geofence tracking.
///
/// Owns the registry, gate, and translator; mediates every provider call;
/// and reports domain events to the registered observer. `Send + Sync`,
/// intended to be shared as `Arc<GeofenceTracker>`.
pub struct GeofenceTracker {
    provider: Arc<dyn LocationProvider>,
    state: Mutex<TrackerState>,
    // Kept outside the state lock so observer callbacks run without
    // tracker state locked; reentrant calls from handlers cannot deadlock.
    dispatcher: Mutex<ObserverDispatcher>,
}

impl GeofenceTracker {
    /// Create a tracker backed by the given provider.
    pub fn new(provider: Arc<dyn LocationProvider>, config: TrackerConfig) -> Self {
        let registry = RegionRegistry::new(provider.clone(), config.max_monitored_regions);
        let mut translator = EventTranslator::new(config.jump_threshold_meters);
        translator.set_geotracking_enabled(config.geotracking_enabled);

        Self {
            provider,
            state: Mutex::new(TrackerState {
                registry,
                gate: AuthorizationGate::new(),
                translator,
                max_radius_meters: config.max_radius_meters,
            }),
            dispatcher: Mutex::new(ObserverDispatcher::new()),
        }
    }

    /// Register the observer and set the geotracking mode.
    ///
    /// Idempotent: calling again replaces the observer (without notifying
    /// the previous one) and re-applies the geotracking flag to the
    /// provider.
    pub fn configure(&self, observer: Weak<dyn GeofenceObserver>, enable_geotracking: bool) {
        self.dispatcher.lock().set_observer(observer);
        self.state
            .lock()
            .translator
            .set_geotracking_enabled(enable_geotracking);
        self.provider.request_location_updates(enable_geotracking);
        info!(geotracking = enable_geotracking, "Tracker configured");
    }

    /// Prompt the user for "always" location permission.
    ///
    /// The outcome arrives later as an authorization-changed provider
    /// callback; this call itself changes no tracker state.
    pub fn request_permission(&self) {
        self.provider.request_always_authorization();
    }

    /// Register a circular region for monitoring.
    ///
    /// The radius is clamped to the smaller of the configured maximum and
    /// the provider's supported maximum. On success the observer receives a
    /// region-registered event; on provider rejection the region is not
    /// retained and the observer receives a registration-failed event in
    /// addition to the returned error.
    ///
    /// # Errors
    ///
    /// - `AuthorizationDenied` unless the current permission level is
    ///   "always"
    /// - `DuplicateIdentifier` if the identifier is already registered
    /// - `CapacityExceeded` at the region limit
    /// - `ProviderRejected` if the provider refuses the region
    pub fn register_region(
        &self,
        center: Coordinate,
        radius_meters: f64,
        identifier: impl Into<String>,
        notify_on_entry: bool,
        notify_on_exit: bool,
    ) -> Result<(), RegistrationError> {
        let identifier = identifier.into();

        let (result, event) = {
            let mut state = self.state.lock();

            if !state.gate.can_monitor_regions() {
                return Err(RegistrationError::AuthorizationDenied(state.gate.state()));
            }

            let max_radius = state
                .max_radius_meters
                .min(self.provider.max_supported_radius());
            let radius = radius_meters.min(max_radius);
            if radius < radius_meters {
                debug!(
                    identifier = %identifier,
                    requested = radius_meters,
                    clamped = radius,
                    "Region radius clamped to provider maximum"
                );
            }

            let region = MonitoredRegion::new(
                identifier,
                center,
                radius,
                notify_on_entry,
                notify_on_exit,
            );

            match state.registry.register(region.clone()) {
                Ok(()) => (Ok(()), Some(GeofenceEvent::RegionRegistered(region))),
                Err(err) => {
                    let event = match &err {
                        RegistrationError::ProviderRejected(cause) => {
                            Some(GeofenceEvent::RegistrationFailed {
                                region: Some(region),
                                cause: cause.clone(),
                            })
                        }
                        // Local validation failures are returned to the
                        // caller only, never broadcast.
                        _ => None,
                    };
                    (Err(err), event)
                }
            }
        };

        if let Some(event) = event {
            self.dispatch(event);
        }
        result
    }

    /// Stop monitoring a region.
    ///
    /// Returns false if the identifier is unknown; otherwise removes the
    /// region, stops provider monitoring, emits a region-removed event,
    /// and returns true.
    pub fn remove_region(&self, identifier: &str) -> bool {
        let removed = self.state.lock().registry.remove(identifier);

        match removed {
            Some(region) => {
                self.dispatch(GeofenceEvent::RegionRemoved(region));
                true
            }
            None => false,
        }
    }

    /// Remove every monitored region.
    ///
    /// Each region goes through the same path as [`remove_region`], so each
    /// produces its own removal event. Best-effort: a provider error on one
    /// region does not stop the rest.
    ///
    /// [`remove_region`]: GeofenceTracker::remove_region
    pub fn remove_all_regions(&self) {
        let removed = self.state.lock().registry.remove_all();
        for region in removed {
            self.dispatch(GeofenceEvent::RegionRemoved(region));
        }
    }

    /// A detached snapshot of the currently monitored regions.
    pub fn list_regions(&self) -> Vec<MonitoredRegion> {
        self.state.lock().registry.snapshot()
    }

    /// The most recent location fix that passed the jump filter.
    pub fn current_location(&self) -> Option<LocationFix> {
        self.state.lock().translator.last_fix()
    }

    /// Current permission level as last reported by the provider.
    pub fn authorization_state(&self) -> crate::provider::AuthorizationState {
        self.state.lock().gate.state()
    }

    /// Change the jump threshold. Takes effect for the next fix.
    pub fn set_jump_threshold(&self, meters: f64) {
        self.state.lock().translator.set_jump_threshold(meters);
    }

    /// Feed one raw provider event through the translator.
    ///
    /// This is the synchronous entry point; providers that deliver over a
    /// channel should use [`GeofenceTracker::start`] instead.
    pub fn handle_provider_event(&self, event: ProviderEvent) {
        let translated = {
            let mut state = self.state.lock();
            let TrackerState {
                registry,
                gate,
                translator,
                ..
            } = &mut *state;
            translator.translate(event, registry, gate)
        };

        if let Some(event) = translated {
            self.dispatch(event);
        }
    }

    /// Spawn the provider event loop.
    ///
    /// Consumes raw events from the channel until the sender side closes.
    /// Must be called from within a Tokio runtime.
    pub fn start(self: &Arc<Self>, mut rx: UnboundedReceiver<ProviderEvent>) -> JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracker.handle_provider_event(event);
            }
            debug!("Provider event channel closed, tracker loop exiting");
        })
    }

    /// Deliver an event to the observer, outside the state lock.
    fn dispatch(&self, event: GeofenceEvent) {
        let dispatcher = self.dispatcher.lock().clone();
        dispatcher.dispatch(&event);
    }
}
