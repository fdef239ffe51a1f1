/// Scope placement a static layer was built for. A change in any field means
/// the cached artifact no longer matches the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerGeometry {
    pub center_x: i32,
    pub center_y: i32,
    pub radius_px: i32,
}

/// Cache of the rarely-changing static layer (range rings, crosshairs, outer
/// boundary). Rebuilt only on an explicit [`invalidate`] or when the scope
/// geometry itself changes, never on a timer. Disabled, it degrades to
/// invoking the build closure every call with identical visual output.
///
/// [`invalidate`]: BackgroundCache::invalidate
pub struct BackgroundCache<S: Clone> {
    enabled: bool,
    cached: Option<(LayerGeometry, S)>,
    needs_rebuild: bool,
}

impl<S: Clone> BackgroundCache<S> {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            cached: None,
            needs_rebuild: true,
        }
    }

    /// Flags the cached layer for rebuild on the next request (display
    /// resize and similar geometry changes).
    pub fn invalidate(&mut self) {
        self.needs_rebuild = true;
    }

    /// Returns the static layer, rebuilding through `build` when required.
    pub fn layer(&mut self, geometry: LayerGeometry, build: impl FnOnce(LayerGeometry) -> S) -> S {
        if !self.enabled {
            return build(geometry);
        }

        match &self.cached {
            Some((cached_geometry, layer)) if !self.needs_rebuild && *cached_geometry == geometry => {
                layer.clone()
            }
            _ => {
                let layer = build(geometry);
                self.cached = Some((geometry, layer.clone()));
                self.needs_rebuild = false;
                layer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const GEOMETRY: LayerGeometry = LayerGeometry {
        center_x: 240,
        center_y: 300,
        radius_px: 200,
    };

    fn counting_layer(builds: &Cell<usize>) -> impl Fn(LayerGeometry) -> u32 + '_ {
        move |geometry| {
            builds.set(builds.get() + 1);
            geometry.radius_px as u32
        }
    }

    #[test]
    fn unchanged_geometry_builds_once() {
        let builds = Cell::new(0);
        let mut cache = BackgroundCache::new(true);

        assert_eq!(cache.layer(GEOMETRY, counting_layer(&builds)), 200);
        assert_eq!(cache.layer(GEOMETRY, counting_layer(&builds)), 200);
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn invalidate_forces_one_rebuild() {
        let builds = Cell::new(0);
        let mut cache = BackgroundCache::new(true);

        cache.layer(GEOMETRY, counting_layer(&builds));
        cache.invalidate();
        cache.layer(GEOMETRY, counting_layer(&builds));
        cache.layer(GEOMETRY, counting_layer(&builds));
        assert_eq!(builds.get(), 2);
    }

    #[test]
    fn changed_geometry_rebuilds() {
        let builds = Cell::new(0);
        let mut cache = BackgroundCache::new(true);

        cache.layer(GEOMETRY, counting_layer(&builds));
        let resized = LayerGeometry {
            radius_px: 180,
            ..GEOMETRY
        };
        assert_eq!(cache.layer(resized, counting_layer(&builds)), 180);
        assert_eq!(builds.get(), 2);
    }

    #[test]
    fn disabled_cache_builds_every_call() {
        let builds = Cell::new(0);
        let mut cache = BackgroundCache::new(false);

        cache.layer(GEOMETRY, counting_layer(&builds));
        cache.layer(GEOMETRY, counting_layer(&builds));
        assert_eq!(builds.get(), 2);
    }
}
