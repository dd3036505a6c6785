//! Observer contract and event dispatch.
//!
//! At most one observer receives domain events. Every handler has an empty
//! default body, so implementors override only the events they care about;
//! the others are silent no-ops. The dispatcher holds a weak reference: it
//! never owns the observer's lifetime, and delivery to a dropped observer
//! is simply skipped.

use std::sync::Weak;

use tracing::debug;

use crate::events::GeofenceEvent;
use crate::provider::{AuthorizationState, LocationFix};
use crate::region::MonitoredRegion;

/// Receiver of geofence domain events.
///
/// All methods are optional; the default implementations do nothing.
/// Implementations must be `Send + Sync` because events may be delivered
/// from the tracker's event loop task.
pub trait GeofenceObserver: Send + Sync {
    /// The permission level changed.
    fn on_authorization_changed(&self, _state: AuthorizationState) {}

    /// The device entered a monitored region.
    fn on_region_entered(&self, _region: &MonitoredRegion) {}

    /// The device left a monitored region.
    fn on_region_exited(&self, _region: &MonitoredRegion) {}

    /// A region was registered and accepted by the provider.
    fn on_region_registered(&self, _region: &MonitoredRegion) {}

    /// A region was removed from monitoring.
    fn on_region_removed(&self, _region: &MonitoredRegion) {}

    /// A location fix passed the jump filter.
    fn on_location_updated(&self, _fix: &LocationFix) {}

    /// Registration failed, synchronously or after acceptance.
    fn on_registration_failed(&self, _region: Option<&MonitoredRegion>, _cause: &str) {}
}

/// Delivers domain events to the single registered observer.
///
/// Cloning is cheap (one `Weak`); the tracker clones the dispatcher out of
/// its lock before delivering, so observer callbacks never run while
/// tracker state is locked.
#[derive(Clone, Default)]
pub struct ObserverDispatcher {
    observer: Option<Weak<dyn GeofenceObserver>>,
}

impl ObserverDispatcher {
    /// Create a dispatcher with no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer, replacing any previous one.
    ///
    /// The previous observer is not notified of its replacement.
    pub fn set_observer(&mut self, observer: Weak<dyn GeofenceObserver>) {
        self.observer = Some(observer);
    }

    /// Remove the current observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Deliver an event to the observer.
    ///
    /// Returns true if an observer was alive to receive it. An absent or
    /// already-dropped observer is a no-op, never an error.
    pub fn dispatch(&self, event: &GeofenceEvent) -> bool {
        let observer = match self.observer.as_ref().and_then(Weak::upgrade) {
            Some(observer) => observer,
            None => {
                debug!(?event, "Event dropped: no live observer");
                return false;
            }
        };

        match event {
            GeofenceEvent::AuthorizationChanged(state) => {
                observer.on_authorization_changed(*state)
            }
            GeofenceEvent::LocationUpdated(fix) => observer.on_location_updated(fix),
            GeofenceEvent::RegionEntered(region) => observer.on_region_entered(region),
            GeofenceEvent::RegionExited(region) => observer.on_region_exited(region),
            GeofenceEvent::RegionRegistered(region) => observer.on_region_registered(region),
            GeofenceEvent::RegionRemoved(region) => observer.on_region_removed(region),
            GeofenceEvent::RegistrationFailed { region, cause } => {
                observer.on_registration_failed(region.as_ref(), cause)
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Observer overriding a single handler, counting deliveries.
    #[derive(Default)]
    struct EntryCounter {
        entries: AtomicU32,
    }

    impl GeofenceObserver for EntryCounter {
        fn on_region_entered(&self, _region: &MonitoredRegion) {
            self.entries.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn make_region() -> MonitoredRegion {
        MonitoredRegion::new(
            "office",
            crate::coord::Coordinate::new(53.5511, 9.9937).unwrap(),
            100.0,
            true,
            true,
        )
    }

    #[test]
    fn test_dispatch_without_observer_is_noop() {
        let dispatcher = ObserverDispatcher::new();
        assert!(!dispatcher.dispatch(&GeofenceEvent::RegionEntered(make_region())));
    }

    #[test]
    fn test_dispatch_calls_overridden_handler() {
        let observer = Arc::new(EntryCounter::default());
        let mut dispatcher = ObserverDispatcher::new();
        dispatcher.set_observer(Arc::downgrade(&observer) as Weak<dyn GeofenceObserver>);

        assert!(dispatcher.dispatch(&GeofenceEvent::RegionEntered(make_region())));
        assert_eq!(observer.entries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_handlers_are_noops() {
        // EntryCounter only overrides on_region_entered; every other event
        // should be absorbed by the default bodies.
        let observer = Arc::new(EntryCounter::default());
        let mut dispatcher = ObserverDispatcher::new();
        dispatcher.set_observer(Arc::downgrade(&observer) as Weak<dyn GeofenceObserver>);

        assert!(dispatcher.dispatch(&GeofenceEvent::RegionRemoved(make_region())));
        assert!(dispatcher.dispatch(&GeofenceEvent::AuthorizationChanged(
            AuthorizationState::Denied
        )));
        assert_eq!(observer.entries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dropped_observer_is_skipped() {
        let mut dispatcher = ObserverDispatcher::new();
        {
            let observer = Arc::new(EntryCounter::default());
            dispatcher.set_observer(Arc::downgrade(&observer) as Weak<dyn GeofenceObserver>);
            // Observer drops here
        }

        assert!(!dispatcher.dispatch(&GeofenceEvent::RegionEntered(make_region())));
    }

    #[test]
    fn test_replacing_observer_stops_old_deliveries() {
        let first = Arc::new(EntryCounter::default());
        let second = Arc::new(EntryCounter::default());

        let mut dispatcher = ObserverDispatcher::new();
        dispatcher.set_observer(Arc::downgrade(&first) as Weak<dyn GeofenceObserver>);
        dispatcher.set_observer(Arc::downgrade(&second) as Weak<dyn GeofenceObserver>);

        dispatcher.dispatch(&GeofenceEvent::RegionEntered(make_region()));

        assert_eq!(first.entries.load(Ordering::SeqCst), 0);
        assert_eq!(second.entries.load(Ordering::SeqCst), 1);
    }
}
