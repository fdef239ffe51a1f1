/// Integer pixel position inside the scope circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPos {
    pub x: i32,
    pub y: i32,
}

/// Kilometres per degree of latitude (and of longitude at the equator).
const KM_PER_DEGREE: f64 = 111.0;
const NM_TO_KM: f64 = 1.852;

/// Equirectangular projection local to the configured origin.
///
/// One degree of latitude is ~111 km; longitude shrinks by the cosine of the
/// origin latitude, precomputed once at construction. Good enough at scope
/// ranges, and far cheaper than a proper geodesic inverse per frame.
#[derive(Debug, Clone)]
pub struct LocalProjection {
    origin_lat: f64,
    origin_lon: f64,
    lat_cos: f64,
    range_km: f64,
}

impl LocalProjection {
    pub fn new(origin_lat: f64, origin_lon: f64, radius_nm: f64) -> Self {
        let lat_cos = if origin_lat != 0.0 {
            origin_lat.to_radians().cos()
        } else {
            1.0
        };
        Self {
            origin_lat,
            origin_lon,
            lat_cos,
            range_km: radius_nm * NM_TO_KM,
        }
    }

    /// Projects a coordinate onto the scope. `None` when the point falls
    /// outside the display circle; that is not an error.
    pub fn project(
        &self,
        lat: f64,
        lon: f64,
        center_x: i32,
        center_y: i32,
        radius_px: i32,
    ) -> Option<ScreenPos> {
        let lat_km = (lat - self.origin_lat) * KM_PER_DEGREE;
        let lon_km = (lon - self.origin_lon) * KM_PER_DEGREE * self.lat_cos;

        let x = center_x as f64 + (lon_km / self.range_km) * radius_px as f64;
        let y = center_y as f64 - (lat_km / self.range_km) * radius_px as f64;

        let dx = x - center_x as f64;
        let dy = y - center_y as f64;
        let radius = radius_px as f64;
        if dx * dx + dy * dy <= radius * radius {
            Some(ScreenPos {
                x: x as i32,
                y: y as i32,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_center() {
        let projection = LocalProjection::new(-27.5, 153.0, 60.0);
        let pos = projection.project(-27.5, 153.0, 480, 270, 200).unwrap();
        assert_eq!(pos, ScreenPos { x: 480, y: 270 });
    }

    #[test]
    fn north_of_origin_moves_up() {
        let projection = LocalProjection::new(0.0, 0.0, 60.0);
        let pos = projection.project(0.5, 0.0, 480, 270, 200).unwrap();
        assert_eq!(pos.x, 480);
        assert!(pos.y < 270);
    }

    #[test]
    fn point_beyond_display_circle_is_off_scope() {
        let projection = LocalProjection::new(0.0, 0.0, 60.0);
        // ~2 degrees of latitude is ~120 NM, double the configured range.
        assert!(projection.project(2.0, 0.0, 480, 270, 200).is_none());
    }

    #[test]
    fn longitude_scale_shrinks_away_from_equator() {
        let equatorial = LocalProjection::new(0.0, 0.0, 60.0);
        let temperate = LocalProjection::new(60.0, 0.0, 60.0);
        let at_equator = equatorial.project(0.0, 0.4, 480, 270, 200).unwrap();
        let at_sixty = temperate.project(60.0, 0.4, 480, 270, 200).unwrap();
        let equator_dx = (at_equator.x - 480).abs();
        let sixty_dx = (at_sixty.x - 480).abs();
        assert!(sixty_dx < equator_dx);
    }
}
