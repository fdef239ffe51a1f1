use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Immutable application configuration, constructed once at startup and
/// passed by reference to every component. Sections mirror the on-disk file;
/// unspecified keys take the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub general: GeneralConfig,
    pub location: LocationConfig,
    pub performance: PerformanceConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Seconds between sweep ticks.
    pub fetch_interval_secs: u64,
    /// Hex-code prefixes marking military contacts.
    pub mil_prefixes: Vec<String>,
    /// tar1090-compatible upstream feed address.
    pub feed_url: String,
    pub blink_military: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fetch_interval_secs: 10,
            mil_prefixes: vec!["7CF".to_string()],
            feed_url: "http://localhost/data/aircraft.json".to_string(),
            blink_military: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub lat: f64,
    pub lon: f64,
    pub area_name: String,
    /// Contacts beyond this range never enter the live set.
    pub radius_nm: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            area_name: "UNKNOWN".to_string(),
            radius_nm: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Frames between scanline overlay passes.
    pub static_redraw_interval: u64,
    pub fps: u32,
    pub enable_glyph_cache: bool,
    pub enable_geometry_cache: bool,
    pub enable_background_cache: bool,
    pub glyph_cache_capacity: usize,
    pub geometry_cache_ttl_secs: f64,
    /// Hysteresis for the distance-ordered view: shared contacts must move
    /// more than this many NM before a re-sort is considered necessary.
    pub resort_threshold_nm: f64,
    /// Route per-sweep distance/bearing work through the vectorized path.
    pub batch_math: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            static_redraw_interval: 5,
            fps: 6,
            enable_glyph_cache: true,
            enable_geometry_cache: true,
            enable_background_cache: true,
            glyph_cache_capacity: 1000,
            geometry_cache_ttl_secs: 1.0,
            resort_threshold_nm: 0.5,
            batch_math: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub max_table_rows: usize,
    /// TTF to load at startup; the renderer falls back to its builtin
    /// monospace face when absent or unreadable.
    pub font_path: Option<PathBuf>,
    /// Family name the loaded font registers under.
    pub font_family: Option<String>,
    pub header_font_size: u32,
    pub radar_font_size: u32,
    pub table_font_size: u32,
    pub instruction_font_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_width: 960,
            screen_height: 540,
            max_table_rows: 10,
            font_path: None,
            font_family: None,
            header_font_size: 32,
            radar_font_size: 22,
            table_font_size: 22,
            instruction_font_size: 12,
        }
    }
}
