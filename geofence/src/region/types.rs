//! The monitored region value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// A circular geographic region registered for monitoring.
///
/// Regions are immutable once stored; to change one, remove it and register
/// a replacement under the same identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredRegion {
    /// Unique identifier within the registry.
    pub identifier: String,
    /// Center of the circular region.
    pub center: Coordinate,
    /// Radius in meters. Already clamped to the provider's maximum at
    /// registration time.
    pub radius_meters: f64,
    /// Whether entering the region produces an observer notification.
    pub notify_on_entry: bool,
    /// Whether leaving the region produces an observer notification.
    pub notify_on_exit: bool,
}

impl MonitoredRegion {
    /// Create a new monitored region.
    pub fn new(
        identifier: impl Into<String>,
        center: Coordinate,
        radius_meters: f64,
        notify_on_entry: bool,
        notify_on_exit: bool,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            center,
            radius_meters,
            notify_on_entry,
            notify_on_exit,
        }
    }

    /// Whether a coordinate falls within this region.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.center.distance_meters(coordinate) <= self.radius_meters
    }
}

impl fmt::Display for MonitoredRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' @ {} r={:.0}m",
            self.identifier, self.center, self.radius_meters
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hamburg() -> Coordinate {
        Coordinate::new(53.5511, 9.9937).unwrap()
    }

    #[test]
    fn test_new_region() {
        let region = MonitoredRegion::new("office", hamburg(), 150.0, true, false);
        assert_eq!(region.identifier, "office");
        assert!((region.radius_meters - 150.0).abs() < f64::EPSILON);
        assert!(region.notify_on_entry);
        assert!(!region.notify_on_exit);
    }

    #[test]
    fn test_contains_center() {
        let region = MonitoredRegion::new("office", hamburg(), 100.0, true, true);
        assert!(region.contains(&hamburg()));
    }

    #[test]
    fn test_contains_rejects_distant_point() {
        let region = MonitoredRegion::new("office", hamburg(), 100.0, true, true);
        let london = Coordinate::new(51.5074, -0.1278).unwrap();
        assert!(!region.contains(&london));
    }

    #[test]
    fn test_contains_boundary() {
        // A point ~50m away is inside a 100m region but outside a 30m one
        let nearby = Coordinate::new(53.5511 + 0.00045, 9.9937).unwrap();

        let wide = MonitoredRegion::new("wide", hamburg(), 100.0, true, true);
        let narrow = MonitoredRegion::new("narrow", hamburg(), 30.0, true, true);

        assert!(wide.contains(&nearby));
        assert!(!narrow.contains(&nearby));
    }

    #[test]
    fn test_display() {
        let region = MonitoredRegion::new("office", hamburg(), 150.0, true, false);
        let rendered = format!("{}", region);
        assert!(rendered.contains("office"));
        assert!(rendered.contains("150m"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let region = MonitoredRegion::new("office", hamburg(), 150.0, true, false);
        let json = serde_json::to_string(&region).unwrap();
        let parsed: MonitoredRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, region);
    }
}
