//! Geographic coordinate type and great-circle distance.
//!
//! Provides the validated latitude/longitude pair used for geofence centers
//! and location fixes, plus the haversine distance calculation the jump
//! filter relies on.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in meters (IUGG value).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Errors produced when constructing a coordinate from invalid input.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CoordError {
    /// Latitude outside [-90, 90] degrees.
    #[error("Invalid latitude: {0} (expected -90 to 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("Invalid longitude: {0} (expected -180 to 180)")]
    InvalidLongitude(f64),
}

/// A geographic coordinate in WGS84 degrees.
///
/// Construction through [`Coordinate::new`] guarantees both components are
/// finite and within valid geographic bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns `CoordError` if either component is non-finite or out of
    /// geographic bounds.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to another coordinate, in meters.
    ///
    /// Uses the haversine formula on a spherical Earth model, which is
    /// accurate to well under 0.5% for geofence-scale distances.
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude * PI / 180.0;
        let lat2 = other.latitude * PI / 180.0;
        let dlat = (other.latitude - self.latitude) * PI / 180.0;
        let dlon = (other.longitude - self.longitude) * PI / 180.0;

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_METERS * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One degree of latitude in meters on the spherical model.
    const LAT_DEGREE_METERS: f64 = EARTH_RADIUS_METERS * PI / 180.0;

    #[test]
    fn test_new_valid_coordinate() {
        let coord = Coordinate::new(53.5511, 9.9937).unwrap();
        assert!((coord.latitude - 53.5511).abs() < f64::EPSILON);
        assert!((coord.longitude - 9.9937).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        let result = Coordinate::new(90.1, 0.0);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = Coordinate::new(0.0, -180.5);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let coord = Coordinate::new(40.7128, -74.0060).unwrap();
        assert!(coord.distance_meters(&coord) < 1e-9);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is ~111.2km everywhere on the sphere
        let a = Coordinate::new(53.0, 10.0).unwrap();
        let b = Coordinate::new(54.0, 10.0).unwrap();

        let distance = a.distance_meters(&b);
        assert!(
            (distance - LAT_DEGREE_METERS).abs() < 100.0,
            "Expected ~{:.0}m, got {:.0}m",
            LAT_DEGREE_METERS,
            distance
        );
    }

    #[test]
    fn test_distance_new_york_to_london() {
        // NYC to London is approximately 5,570 km
        let nyc = Coordinate::new(40.7128, -74.0060).unwrap();
        let london = Coordinate::new(51.5074, -0.1278).unwrap();

        let distance = nyc.distance_meters(&london);
        assert!(
            (distance - 5_570_000.0).abs() < 20_000.0,
            "Expected ~5570km, got {:.0}km",
            distance / 1000.0
        );
    }

    #[test]
    fn test_distance_short_range() {
        // ~50m north of the starting point
        let base = Coordinate::new(53.5511, 9.9937).unwrap();
        let moved = Coordinate::new(53.5511 + 50.0 / LAT_DEGREE_METERS, 9.9937).unwrap();

        let distance = base.distance_meters(&moved);
        assert!(
            (distance - 50.0).abs() < 0.1,
            "Expected ~50m, got {:.2}m",
            distance
        );
    }

    #[test]
    fn test_display() {
        let coord = Coordinate::new(53.5511, 9.9937).unwrap();
        assert_eq!(format!("{}", coord), "(53.551100, 9.993700)");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_symmetric(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat1, lon1).unwrap();
                let b = Coordinate::new(lat2, lon2).unwrap();

                let ab = a.distance_meters(&b);
                let ba = b.distance_meters(&a);

                prop_assert!(
                    (ab - ba).abs() < 1e-6,
                    "Distance not symmetric: {} vs {}",
                    ab, ba
                );
            }

            #[test]
            fn test_distance_non_negative(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat1, lon1).unwrap();
                let b = Coordinate::new(lat2, lon2).unwrap();

                prop_assert!(a.distance_meters(&b) >= 0.0);
            }

            #[test]
            fn test_distance_bounded_by_half_circumference(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                // No two points on a sphere are farther apart than half the
                // circumference (~20,015 km)
                let a = Coordinate::new(lat1, lon1).unwrap();
                let b = Coordinate::new(lat2, lon2).unwrap();

                let max = EARTH_RADIUS_METERS * PI;
                prop_assert!(
                    a.distance_meters(&b) <= max + 1.0,
                    "Distance {} exceeds half circumference {}",
                    a.distance_meters(&b), max
                );
            }

            #[test]
            fn test_reject_out_of_range_latitude(
                lat in 90.01..1000.0_f64,
                lon in -180.0..180.0_f64
            ) {
                let result = Coordinate::new(lat, lon);
                prop_assert!(result.is_err());
                prop_assert!(matches!(result.unwrap_err(), CoordError::InvalidLatitude(_)));
            }
        }
    }
}
