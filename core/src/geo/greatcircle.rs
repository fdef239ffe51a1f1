/// Mean Earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Kilometres to nautical miles.
pub const KM_TO_NM: f64 = 0.539957;

/// Great-circle distance (nautical miles) and initial bearing (degrees,
/// normalized to `[0, 360)`) from `(lat1, lon1)` to `(lat2, lon2)` via the
/// haversine formula.
///
/// Non-finite inputs propagate as NaN; callers validate beforehand.
pub fn distance_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlam = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
    let distance_km = 2.0 * a.sqrt().asin() * EARTH_RADIUS_KM;
    let distance_nm = distance_km * KM_TO_NM;

    let y = dlam.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlam.cos();
    let bearing = (y.atan2(x).to_degrees() + 360.0) % 360.0;

    (distance_nm, bearing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let (distance, bearing) = distance_bearing(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 60.04).abs() < 0.05, "distance was {distance}");
        assert!((bearing - 90.0).abs() < 1e-9, "bearing was {bearing}");
    }

    #[test]
    fn due_north_bearing_is_zero() {
        let (_, bearing) = distance_bearing(0.0, 0.0, 1.0, 0.0);
        assert!(bearing.abs() < 1e-9, "bearing was {bearing}");
    }

    #[test]
    fn reciprocal_pair_has_equal_distance() {
        let (forward, _) = distance_bearing(-27.47, 153.02, -33.94, 151.18);
        let (back, _) = distance_bearing(-33.94, 151.18, -27.47, 153.02);
        assert!((forward - back).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_yield_zero_distance() {
        let (distance, _) = distance_bearing(10.0, 20.0, 10.0, 20.0);
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn non_finite_input_propagates_nan() {
        let (distance, _) = distance_bearing(f64::NAN, 0.0, 0.0, 1.0);
        assert!(distance.is_nan());
    }
}
