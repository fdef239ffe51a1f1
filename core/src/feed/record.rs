use serde::{Deserialize, Serialize};

/// Top-level shape of a tar1090 `aircraft.json` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub aircraft: Vec<RawAircraft>,
}

/// One loosely-typed record as it appears on the wire. Everything is optional
/// here; [`parse_record`] is the boundary that produces strict records and
/// nothing past it carries optional fields.
///
/// [`parse_record`]: crate::feed::parser::parse_record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAircraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_baro: Option<RawAltitude>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<f64>,
}

/// Barometric altitude on the wire: a number of feet, or the literal string
/// `"ground"` for aircraft on the surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAltitude {
    Feet(f64),
    Text(String),
}

impl RawAltitude {
    /// Whole feet; surface markers and non-finite values read as 0.
    pub fn feet(&self) -> i32 {
        match self {
            RawAltitude::Feet(value) if value.is_finite() => *value as i32,
            _ => 0,
        }
    }
}

/// One validated aircraft observation from a single sweep.
///
/// Constructed fresh every sweep; the whole set is replaced, never merged, so
/// no record outlives the sweep that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Stable lowercase ICAO hex code, unique within a sweep.
    pub hex: String,
    pub callsign: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_ft: i32,
    pub ground_speed_kt: i32,
    /// Degrees; 0 means no heading reported.
    pub track_deg: f64,
    pub distance_nm: f64,
    pub bearing_deg: f64,
    pub military: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_decodes_tar1090_shape() {
        let doc: FeedDocument = serde_json::from_str(
            r#"{"now": 1700000000.0, "aircraft": [
                {"hex": "7cf9b2", "flight": "QFA123  ", "lat": -27.38, "lon": 153.12,
                 "alt_baro": 37000, "gs": 447.2, "track": 152.8},
                {"hex": "7c0de1", "alt_baro": "ground"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(doc.aircraft.len(), 2);
        assert_eq!(doc.aircraft[0].alt_baro.as_ref().unwrap().feet(), 37000);
        assert_eq!(doc.aircraft[1].alt_baro.as_ref().unwrap().feet(), 0);
        assert!(doc.aircraft[1].lat.is_none());
    }

    #[test]
    fn missing_aircraft_array_decodes_to_empty() {
        let doc: FeedDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.aircraft.is_empty());
    }
}
