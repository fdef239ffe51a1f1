pub mod background;
pub mod geometry;
pub mod glyph;

pub use background::{BackgroundCache, LayerGeometry};
pub use geometry::GeometryCache;
pub use glyph::{GlyphCache, GlyphKey, GlyphRasterizer};
