use crate::config::ScopeConfig;
use crate::feed::record::{FeedDocument, RawAircraft, RawAltitude, TrackRecord};
use crate::geo::{batch_distance_bearing, distance_bearing};

/// Shown for aircraft that have not reported a callsign.
pub const CALLSIGN_PLACEHOLDER: &str = "UNKNOWN";
const CALLSIGN_MAX_CHARS: usize = 8;

/// Parse inputs precomputed once per configuration: origin, range filter and
/// the lowercased military prefix list.
#[derive(Debug, Clone)]
pub struct ParseContext {
    origin: (f64, f64),
    radius_nm: f64,
    mil_prefixes: Vec<String>,
    batch_math: bool,
}

impl ParseContext {
    pub fn new(config: &ScopeConfig) -> Self {
        Self {
            origin: (config.location.lat, config.location.lon),
            radius_nm: config.location.radius_nm,
            mil_prefixes: config
                .general
                .mil_prefixes
                .iter()
                .map(|prefix| prefix.to_lowercase())
                .collect(),
            batch_math: config.performance.batch_math,
        }
    }

    fn classify(&self, hex: &str) -> bool {
        self.mil_prefixes
            .iter()
            .any(|prefix| hex.starts_with(prefix.as_str()))
    }
}

/// Converts one raw record into a validated [`TrackRecord`].
///
/// Records without a position and records beyond the configured radius
/// produce `None`; they are undisplayable or out of range, not errors.
pub fn parse_record(raw: &RawAircraft, ctx: &ParseContext) -> Option<TrackRecord> {
    let lat = raw.lat?;
    let lon = raw.lon?;
    let (distance_nm, bearing_deg) = distance_bearing(ctx.origin.0, ctx.origin.1, lat, lon);
    finish_record(raw, ctx, lat, lon, distance_nm, bearing_deg)
}

/// Parses a whole feed document, silently dropping undisplayable records.
/// With batch math enabled, the distance/bearing pass runs vectorized over
/// every positioned record before per-record validation.
pub fn parse_document(doc: &FeedDocument, ctx: &ParseContext) -> Vec<TrackRecord> {
    if !ctx.batch_math {
        return doc
            .aircraft
            .iter()
            .filter_map(|raw| parse_record(raw, ctx))
            .collect();
    }

    let positioned: Vec<(&RawAircraft, f64, f64)> = doc
        .aircraft
        .iter()
        .filter_map(|raw| match (raw.lat, raw.lon) {
            (Some(lat), Some(lon)) => Some((raw, lat, lon)),
            _ => None,
        })
        .collect();
    let points: Vec<(f64, f64)> = positioned.iter().map(|&(_, lat, lon)| (lat, lon)).collect();
    let solved = batch_distance_bearing(ctx.origin, &points);

    positioned
        .iter()
        .zip(solved)
        .filter_map(|(&(raw, lat, lon), (distance_nm, bearing_deg))| {
            finish_record(raw, ctx, lat, lon, distance_nm, bearing_deg)
        })
        .collect()
}

fn finish_record(
    raw: &RawAircraft,
    ctx: &ParseContext,
    lat: f64,
    lon: f64,
    distance_nm: f64,
    bearing_deg: f64,
) -> Option<TrackRecord> {
    // NaN distances fail this comparison and drop with the out-of-range ones.
    if !(distance_nm <= ctx.radius_nm) {
        return None;
    }

    let hex = raw.hex.as_deref()?.trim().to_lowercase();
    if hex.is_empty() {
        return None;
    }

    let callsign: String = raw
        .flight
        .as_deref()
        .map(str::trim)
        .filter(|flight| !flight.is_empty())
        .unwrap_or(CALLSIGN_PLACEHOLDER)
        .chars()
        .take(CALLSIGN_MAX_CHARS)
        .collect();

    Some(TrackRecord {
        military: ctx.classify(&hex),
        hex,
        callsign,
        lat,
        lon,
        altitude_ft: raw.alt_baro.as_ref().map(RawAltitude::feet).unwrap_or(0),
        ground_speed_kt: raw.gs.filter(|gs| gs.is_finite()).unwrap_or(0.0) as i32,
        track_deg: raw.track.filter(|track| track.is_finite()).unwrap_or(0.0),
        distance_nm,
        bearing_deg,
    })
}
