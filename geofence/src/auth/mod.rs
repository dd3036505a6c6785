//! Authorization gate for location permissions.
//!
//! Tracks the user-granted permission level and gates region registration
//! on it. The gate never self-transitions: every state change originates
//! from a provider callback, including the one that follows
//! `request_always_authorization`. Denied and restricted states block
//! registration until the user changes the OS-level permission and a new
//! callback arrives.

use tracing::info;

use crate::provider::AuthorizationState;

/// Permission state machine driven by provider callbacks.
#[derive(Debug)]
pub struct AuthorizationGate {
    state: AuthorizationState,
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationGate {
    /// Create a gate in the initial `NotDetermined` state.
    pub fn new() -> Self {
        Self {
            state: AuthorizationState::NotDetermined,
        }
    }

    /// Current permission level.
    pub fn state(&self) -> AuthorizationState {
        self.state
    }

    /// Apply a state change reported by the provider.
    ///
    /// Returns true if the state actually changed.
    pub fn update(&mut self, state: AuthorizationState) -> bool {
        if self.state == state {
            return false;
        }
        info!(from = ?self.state, to = ?state, "Authorization state changed");
        self.state = state;
        true
    }

    /// Whether region monitoring is currently allowed.
    ///
    /// Region monitoring runs in the background, so only the "always"
    /// permission level qualifies; while-in-use is not enough.
    pub fn can_monitor_regions(&self) -> bool {
        self.state == AuthorizationState::AuthorizedAlways
    }
}
