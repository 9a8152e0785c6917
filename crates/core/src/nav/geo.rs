//! Great-circle navigation math
//!
//! Stateless functions over latitude/longitude pairs in degrees.
//! NaN or otherwise degenerate input propagates NaN; sanitizing sensor
//! data is the position provider's job, not ours.

use libm::{atan2, cos, sin, sqrt};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Forward azimuth from point A to point B, degrees in `[0, 360)`.
///
/// `bearing_deg(0,0, 0,1)` is due east (90), `bearing_deg(0,0, 1,0)` is
/// due north (0).
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = cos(lat2_rad) * sin(delta_lon);
    let x = cos(lat1_rad) * sin(lat2_rad) - sin(lat1_rad) * cos(lat2_rad) * cos(delta_lon);

    let bearing = atan2(y, x).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Haversine distance from point A to point B in meters.
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1_rad) * cos(lat2_rad) * sin_dlon * sin_dlon;
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

    EARTH_RADIUS_M * c
}

/// Destination point given a start, an initial bearing (degrees) and a
/// distance (meters). Used by hold-position logic and tests.
pub fn offset_position(lat: f64, lon: f64, bearing: f64, distance: f64) -> (f64, f64) {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let brg_rad = bearing.to_radians();
    let angular = distance / EARTH_RADIUS_M;

    let dest_lat = libm::asin(
        sin(lat_rad) * cos(angular) + cos(lat_rad) * sin(angular) * cos(brg_rad),
    );
    let dest_lon = lon_rad
        + atan2(
            sin(brg_rad) * sin(angular) * cos(lat_rad),
            cos(angular) - sin(lat_rad) * sin(dest_lat),
        );

    (dest_lat.to_degrees(), dest_lon.to_degrees())
}

/// Normalize an angle to `(-180, 180]` degrees.
pub fn wrap_180(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

/// Normalize an angle to `[0, 360)` degrees.
pub fn wrap_360(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point() {
        assert_eq!(distance_m(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_one_degree_meridian() {
        // One degree of latitude along a meridian is ~111.2 km.
        let d = distance_m(0.0, 0.0, 1.0, 0.0);
        let expected = 111_195.0;
        assert!(
            (d - expected).abs() / expected < 0.005,
            "expected ~{expected} m, got {d}"
        );
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        assert!((bearing_deg(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-9, "east");
        assert!(bearing_deg(0.0, 0.0, 1.0, 0.0).abs() < 1e-9, "north");
        assert!((bearing_deg(0.0, 0.0, -1.0, 0.0) - 180.0).abs() < 1e-9, "south");
        assert!((bearing_deg(0.0, 0.0, 0.0, -1.0) - 270.0).abs() < 1e-9, "west");
    }

    #[test]
    fn test_bearing_range() {
        let cases = [
            (35.6762, 139.6503, 34.6937, 135.5023),
            (51.5, -0.1, 48.8, 2.3),
            (-33.9, 151.2, -37.8, 144.9),
        ];
        for (lat1, lon1, lat2, lon2) in cases {
            let b = bearing_deg(lat1, lon1, lat2, lon2);
            assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
        }
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance_m(f64::NAN, 0.0, 1.0, 0.0).is_nan());
        assert!(bearing_deg(0.0, f64::NAN, 1.0, 0.0).is_nan());
    }

    #[test]
    fn test_offset_position_roundtrip() {
        let (lat, lon) = (35.0, 139.0);
        let (dlat, dlon) = offset_position(lat, lon, 45.0, 1000.0);

        let d = distance_m(lat, lon, dlat, dlon);
        assert!((d - 1000.0).abs() < 1.0, "distance {d}");
        let b = bearing_deg(lat, lon, dlat, dlon);
        assert!((b - 45.0).abs() < 0.5, "bearing {b}");
    }

    #[test]
    fn test_wrap_180() {
        assert_eq!(wrap_180(0.0), 0.0);
        assert_eq!(wrap_180(180.0), 180.0);
        assert_eq!(wrap_180(270.0), -90.0);
        assert_eq!(wrap_180(-270.0), 90.0);
        assert_eq!(wrap_180(450.0), 90.0);
    }

    #[test]
    fn test_wrap_360() {
        assert_eq!(wrap_360(0.0), 0.0);
        assert_eq!(wrap_360(-90.0), 270.0);
        assert_eq!(wrap_360(360.0), 0.0);
        assert_eq!(wrap_360(725.0), 5.0);
    }
}
