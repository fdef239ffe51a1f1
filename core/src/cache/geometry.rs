use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::geo::projection::{LocalProjection, ScreenPos};

/// Time-bounded memo of per-contact screen positions.
///
/// A hit inside the TTL is returned as-is even when the caller's lat/lon has
/// drifted since the entry was computed; positions move slowly relative to
/// the TTL, and skipping the projection is the point of the cache. Entries
/// expire lazily on the next lookup; identities that left the live set linger
/// until then, which is fine because keys are bounded by recent sweep sizes.
pub struct GeometryCache {
    projection: LocalProjection,
    enabled: bool,
    ttl: Duration,
    entries: HashMap<String, CachedPos>,
}

struct CachedPos {
    pos: Option<ScreenPos>,
    computed_at: Instant,
}

impl GeometryCache {
    pub fn new(projection: LocalProjection, enabled: bool, ttl: Duration) -> Self {
        Self {
            projection,
            enabled,
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Screen position for one contact, `None` when it projects outside the
    /// display circle. With caching disabled every call recomputes directly.
    #[allow(clippy::too_many_arguments)]
    pub fn screen_pos(
        &mut self,
        hex: &str,
        lat: f64,
        lon: f64,
        center_x: i32,
        center_y: i32,
        radius_px: i32,
        now: Instant,
    ) -> Option<ScreenPos> {
        if !self.enabled {
            return self.projection.project(lat, lon, center_x, center_y, radius_px);
        }

        if let Some(entry) = self.entries.get(hex) {
            if now.duration_since(entry.computed_at) < self.ttl {
                return entry.pos;
            }
        }

        let pos = self.projection.project(lat, lon, center_x, center_y, radius_px);
        self.entries.insert(
            hex.to_string(),
            CachedPos {
                pos,
                computed_at: now,
            },
        );
        pos
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(enabled: bool) -> GeometryCache {
        GeometryCache::new(
            LocalProjection::new(0.0, 0.0, 60.0),
            enabled,
            Duration::from_secs(1),
        )
    }

    #[test]
    fn hit_within_ttl_ignores_changed_coordinates() {
        let mut cache = cache(true);
        let t0 = Instant::now();

        let first = cache.screen_pos("abc123", 0.2, 0.0, 480, 270, 200, t0);
        // Same identity, different position, still inside the TTL.
        let second = cache.screen_pos("abc123", 0.4, 0.2, 480, 270, 200, t0 + Duration::from_millis(500));
        assert_eq!(first, second);
    }

    #[test]
    fn expired_entry_recomputes() {
        let mut cache = cache(true);
        let t0 = Instant::now();

        let first = cache.screen_pos("abc123", 0.2, 0.0, 480, 270, 200, t0);
        let second = cache.screen_pos("abc123", 0.4, 0.2, 480, 270, 200, t0 + Duration::from_secs(2));
        assert_ne!(first, second);
    }

    #[test]
    fn off_display_result_is_cached_too() {
        let mut cache = cache(true);
        let t0 = Instant::now();

        assert!(cache.screen_pos("abc123", 5.0, 5.0, 480, 270, 200, t0).is_none());
        // A now-visible position still reads the cached off-display sentinel.
        let hit = cache.screen_pos("abc123", 0.1, 0.1, 480, 270, 200, t0 + Duration::from_millis(100));
        assert!(hit.is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn disabled_cache_always_recomputes() {
        let mut cache = cache(false);
        let t0 = Instant::now();

        let first = cache.screen_pos("abc123", 0.2, 0.0, 480, 270, 200, t0);
        let second = cache.screen_pos("abc123", 0.4, 0.2, 480, 270, 200, t0);
        assert_ne!(first, second);
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_are_keyed_by_identity() {
        let mut cache = cache(true);
        let t0 = Instant::now();

        let a = cache.screen_pos("abc123", 0.2, 0.0, 480, 270, 200, t0);
        let b = cache.screen_pos("def456", 0.4, 0.2, 480, 270, 200, t0);
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }
}
