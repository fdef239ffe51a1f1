use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

/// Collaborator that turns text into a renderable artifact. Rasterization is
/// assumed moderately expensive, which is what makes the cache worthwhile.
pub trait GlyphRasterizer {
    type Glyph: Clone;

    fn rasterize(&self, text: &str, color: [u8; 3], size_px: u32) -> Self::Glyph;
}

/// Content-addressed key: identical label, color and size share one glyph no
/// matter how many contacts carry it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub text: String,
    pub color: [u8; 3],
    pub size_px: u32,
}

const COMPACT_INTERVAL: Duration = Duration::from_secs(300);
const COMPACT_KEEP: usize = 100;

/// Bounded cache of rendered text with least-recently-*accessed* eviction.
///
/// Every hit refreshes the key's recency before any eviction decision, and an
/// overflowing insert evicts exactly one entry. [`compact`] is a separate
/// time-driven shrink that bounds memory even when the primary capacity is
/// configured far above the soft cap.
///
/// [`compact`]: GlyphCache::compact
pub struct GlyphCache<R: GlyphRasterizer> {
    rasterizer: R,
    enabled: bool,
    capacity: usize,
    entries: HashMap<GlyphKey, R::Glyph>,
    access_order: Vec<GlyphKey>,
    last_compaction: Instant,
}

impl<R: GlyphRasterizer> GlyphCache<R> {
    pub fn new(rasterizer: R, enabled: bool, capacity: usize, now: Instant) -> Self {
        Self {
            rasterizer,
            enabled,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            access_order: Vec::new(),
            last_compaction: now,
        }
    }

    /// Renders through the cache. When caching is disabled every call
    /// rasterizes fresh with no bookkeeping.
    pub fn render(&mut self, text: &str, color: [u8; 3], size_px: u32) -> R::Glyph {
        if !self.enabled {
            return self.rasterizer.rasterize(text, color, size_px);
        }

        let key = GlyphKey {
            text: text.to_string(),
            color,
            size_px,
        };

        if let Some(glyph) = self.entries.get(&key) {
            let glyph = glyph.clone();
            self.touch(&key);
            return glyph;
        }

        let glyph = self.rasterizer.rasterize(text, color, size_px);
        self.entries.insert(key.clone(), glyph.clone());
        self.access_order.push(key);

        if self.entries.len() > self.capacity {
            let oldest = self.access_order.remove(0);
            self.entries.remove(&oldest);
        }

        glyph
    }

    fn touch(&mut self, key: &GlyphKey) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            let key = self.access_order.remove(pos);
            self.access_order.push(key);
        }
    }

    /// Time-driven shrink, independent of the per-insert eviction: once five
    /// minutes have passed since the previous pass, keep only the 100 most
    /// recently used entries, preserving their relative recency order.
    pub fn compact(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }
        if now.duration_since(self.last_compaction) <= COMPACT_INTERVAL {
            return;
        }
        if self.entries.len() > COMPACT_KEEP {
            let keep = self.access_order.split_off(self.access_order.len() - COMPACT_KEEP);
            self.entries.retain(|key, _| keep.contains(key));
            self.access_order = keep;
            debug!("glyph cache compacted to {} entries", self.entries.len());
        }
        self.last_compaction = now;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
