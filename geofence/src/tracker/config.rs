//! Tracker configuration.

/// Default jump threshold in meters.
///
/// Movement below this distance is treated as GPS jitter and not reported.
pub const DEFAULT_JUMP_THRESHOLD_METERS: f64 = 100.0;

/// Default maximum number of simultaneously monitored regions.
///
/// Matches the Core Location limit of 20 regions per app, which the
/// platform enforces but never exposes as a constant.
pub const DEFAULT_MAX_MONITORED_REGIONS: usize = 20;

/// Default maximum region radius in meters.
pub const DEFAULT_MAX_RADIUS_METERS: f64 = 100_000.0;

/// Configuration for the geofence tracker.
///
/// Makes explicit the platform constants the underlying provider enforces
/// implicitly (region count limit, maximum radius), so callers targeting a
/// different provider can adjust them.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Whether location fixes are translated into observer updates.
    /// `configure` overrides this at runtime.
    pub geotracking_enabled: bool,

    /// Minimum movement in meters before a new fix is reported.
    /// Zero disables filtering.
    pub jump_threshold_meters: f64,

    /// Maximum simultaneously monitored regions.
    pub max_monitored_regions: usize,

    /// Maximum region radius in meters; larger radii are clamped.
    pub max_radius_meters: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            geotracking_enabled: false,
            jump_threshold_meters: DEFAULT_JUMP_THRESHOLD_METERS,
            max_monitored_regions: DEFAULT_MAX_MONITORED_REGIONS,
            max_radius_meters: DEFAULT_MAX_RADIUS_METERS,
        }
    }
}

impl TrackerConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the jump threshold.
    pub fn with_jump_threshold(mut self, meters: f64) -> Self {
        self.jump_threshold_meters = meters;
        self
    }

    /// Set the region limit.
    pub fn with_max_regions(mut self, limit: usize) -> Self {
        self.max_monitored_regions = limit;
        self
    }

    /// Set the maximum region radius.
    pub fn with_max_radius(mut self, meters: f64) -> Self {
        self.max_radius_meters = meters;
        self
    }

    /// Enable geotracking from the start.
    pub fn with_geotracking(mut self, enabled: bool) -> Self {
        self.geotracking_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert!(!config.geotracking_enabled);
        assert!((config.jump_threshold_meters - DEFAULT_JUMP_THRESHOLD_METERS).abs() < f64::EPSILON);
        assert_eq!(config.max_monitored_regions, DEFAULT_MAX_MONITORED_REGIONS);
    }

    #[test]
    fn test_builder_setters() {
        let config = TrackerConfig::new()
            .with_jump_threshold(25.0)
            .with_max_regions(5)
            .with_max_radius(1_000.0)
            .with_geotracking(true);

        assert!((config.jump_threshold_meters - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.max_monitored_regions, 5);
        assert!((config.max_radius_meters - 1_000.0).abs() < f64::EPSILON);
        assert!(config.geotracking_enabled);
    }
}
