use ndarray::{Array1, Zip};

use crate::geo::greatcircle::{EARTH_RADIUS_KM, KM_TO_NM};

/// Vectorized equivalent of repeated [`distance_bearing`] calls over the same
/// origin. Exists purely as a throughput optimization for large sweeps; the
/// formula is identical to the scalar path and the results agree within
/// floating-point tolerance.
///
/// [`distance_bearing`]: crate::geo::greatcircle::distance_bearing
pub fn batch_distance_bearing(origin: (f64, f64), points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if points.is_empty() {
        return Vec::new();
    }

    let phi1 = origin.0.to_radians();
    let lam1 = origin.1.to_radians();

    let lats = Array1::from_vec(points.iter().map(|p| p.0.to_radians()).collect());
    let lons = Array1::from_vec(points.iter().map(|p| p.1.to_radians()).collect());
    let cos_lats = lats.mapv(f64::cos);

    let dphi = &lats - phi1;
    let dlam = &lons - lam1;

    let a = dphi.mapv(|v| (v / 2.0).sin().powi(2))
        + cos_lats.mapv(|c| c * phi1.cos()) * dlam.mapv(|v| (v / 2.0).sin().powi(2));
    let distances = a.mapv(|v| 2.0 * v.sqrt().asin() * EARTH_RADIUS_KM * KM_TO_NM);

    let y = dlam.mapv(f64::sin) * &cos_lats;
    let x = lats.mapv(|v| v.sin() * phi1.cos()) - cos_lats * dlam.mapv(|v| v.cos() * phi1.sin());

    let mut out = Vec::with_capacity(points.len());
    Zip::from(&distances).and(&y).and(&x).for_each(|d, yy, xx| {
        let bearing = (yy.atan2(*xx).to_degrees() + 360.0) % 360.0;
        out.push((*d, bearing));
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::greatcircle::distance_bearing;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(batch_distance_bearing((0.0, 0.0), &[]).is_empty());
    }

    #[test]
    fn batch_matches_scalar_path() {
        let origin = (-27.47, 153.02);
        let points = [
            (-27.38, 153.12),
            (-28.00, 152.70),
            (-26.90, 153.40),
            (0.0, 1.0),
            (-27.47, 153.02),
        ];

        let batched = batch_distance_bearing(origin, &points);
        assert_eq!(batched.len(), points.len());

        for (point, (batch_nm, batch_deg)) in points.iter().zip(batched) {
            let (scalar_nm, scalar_deg) = distance_bearing(origin.0, origin.1, point.0, point.1);
            let nm_tolerance = 1e-6 * scalar_nm.abs().max(1.0);
            let deg_tolerance = 1e-6 * scalar_deg.abs().max(1.0);
            assert!((batch_nm - scalar_nm).abs() < nm_tolerance);
            assert!((batch_deg - scalar_deg).abs() < deg_tolerance);
        }
    }
}
