//! Geofence - circular region tracking over a pluggable location provider.
//!
//! This library registers circular geographic regions with an underlying
//! location subsystem, keeps its registry in lockstep with that provider,
//! and reports entry/exit/authorization/error events to a single registered
//! observer. Raw provider noise (GPS jitter, stale callbacks, suppressed
//! notification flags) is filtered before anything reaches the observer.
//!
//! # Architecture
//!
//! ```text
//! LocationProvider ──ProviderEvent──► EventTranslator ──GeofenceEvent──► ObserverDispatcher
//!        ▲                                │ ▲
//!        │ start/stop monitoring          │ │ lookup / gate
//!        └──────── RegionRegistry ◄───────┘ AuthorizationGate
//!                        ▲
//!                 GeofenceTracker (public API, single lock)
//! ```

pub mod auth;
pub mod coord;
pub mod events;
pub mod observer;
pub mod provider;
pub mod region;
pub mod tracker;

pub use auth::AuthorizationGate;
pub use coord::{Coordinate, CoordError};
pub use events::{EventTranslator, GeofenceEvent, JumpFilter};
pub use observer::{GeofenceObserver, ObserverDispatcher};
pub use provider::{
    AuthorizationState, LocationFix, LocationProvider, ProviderError, ProviderEvent,
};
pub use region::{MonitoredRegion, RegionRegistry, RegistrationError};
pub use tracker::{GeofenceTracker, TrackerConfig};
