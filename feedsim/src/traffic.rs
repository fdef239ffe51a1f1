use rand::{rngs::StdRng, Rng, SeedableRng};
use scopecore::feed::record::{FeedDocument, RawAircraft, RawAltitude};
use scopecore::geo::distance_bearing;
use std::time::Duration;

use crate::scenario::ScenarioConfig;

const KM_PER_DEGREE: f64 = 111.0;
const NM_TO_KM: f64 = 1.852;

const AIRLINE_CODES: [&str; 5] = ["QFA", "VOZ", "JST", "RXA", "UTY"];

/// Deterministic fleet of synthetic aircraft wandering inside the scenario
/// radius. Seeded generation keeps every run of a scenario identical.
pub struct TrafficModel {
    rng: StdRng,
    scenario: ScenarioConfig,
    fleet: Vec<SimAircraft>,
}

struct SimAircraft {
    hex: String,
    callsign: String,
    lat: f64,
    lon: f64,
    altitude_ft: f64,
    speed_kt: f64,
    track_deg: f64,
}

impl TrafficModel {
    pub fn new(scenario: &ScenarioConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(scenario.seed);
        let military_count =
            (scenario.aircraft as f64 * scenario.military_share).round() as usize;
        let fleet = (0..scenario.aircraft)
            .map(|index| spawn_aircraft(&mut rng, scenario, index < military_count))
            .collect();
        Self {
            rng,
            scenario: scenario.clone(),
            fleet,
        }
    }

    /// Moves every aircraft along its track by the elapsed time, with a
    /// little heading jitter. Aircraft straying past the scenario radius are
    /// turned back toward the origin.
    pub fn advance(&mut self, dt: Duration) {
        let hours = dt.as_secs_f64() / 3600.0;
        let origin = (self.scenario.origin_lat, self.scenario.origin_lon);
        let lon_scale = origin.0.to_radians().cos().abs().max(1e-6);

        for aircraft in &mut self.fleet {
            let distance_km = aircraft.speed_kt * hours * NM_TO_KM;
            let track_rad = aircraft.track_deg.to_radians();
            aircraft.lat += distance_km * track_rad.cos() / KM_PER_DEGREE;
            aircraft.lon += distance_km * track_rad.sin() / (KM_PER_DEGREE * lon_scale);
            aircraft.track_deg =
                (aircraft.track_deg + self.rng.gen_range(-2.0..2.0)).rem_euclid(360.0);

            let (distance_nm, _) =
                distance_bearing(origin.0, origin.1, aircraft.lat, aircraft.lon);
            if distance_nm > self.scenario.radius_nm {
                let (_, bearing_home) =
                    distance_bearing(aircraft.lat, aircraft.lon, origin.0, origin.1);
                aircraft.track_deg = bearing_home;
            }
        }
    }

    /// Current fleet state in tar1090 wire shape.
    pub fn document(&self) -> FeedDocument {
        FeedDocument {
            aircraft: self
                .fleet
                .iter()
                .map(|aircraft| RawAircraft {
                    hex: Some(aircraft.hex.clone()),
                    flight: Some(aircraft.callsign.clone()),
                    lat: Some(aircraft.lat),
                    lon: Some(aircraft.lon),
                    alt_baro: Some(RawAltitude::Feet(aircraft.altitude_ft)),
                    gs: Some(aircraft.speed_kt),
                    track: Some(aircraft.track_deg),
                })
                .collect(),
        }
    }
}

fn spawn_aircraft(rng: &mut StdRng, scenario: &ScenarioConfig, military: bool) -> SimAircraft {
    let bearing_rad = rng.gen_range(0.0..360.0_f64).to_radians();
    let range_km = rng.gen_range(2.0..scenario.radius_nm * 0.9) * NM_TO_KM;
    let lon_scale = scenario.origin_lat.to_radians().cos().abs().max(1e-6);

    let lat = scenario.origin_lat + range_km * bearing_rad.cos() / KM_PER_DEGREE;
    let lon = scenario.origin_lon + range_km * bearing_rad.sin() / (KM_PER_DEGREE * lon_scale);

    let (hex, callsign) = if military {
        (
            format!("7cf{:03x}", rng.gen_range(0x000..0xfff)),
            format!("ASY{:03}", rng.gen_range(100..700)),
        )
    } else {
        (
            format!("{:06x}", rng.gen_range(0x7c0000..0x7cf000)),
            format!(
                "{}{}",
                AIRLINE_CODES[rng.gen_range(0..AIRLINE_CODES.len())],
                rng.gen_range(100..999)
            ),
        )
    };

    SimAircraft {
        hex,
        callsign,
        lat,
        lon,
        altitude_ft: f64::from(rng.gen_range(20..400) * 100),
        speed_kt: rng.gen_range(120.0..480.0),
        track_deg: rng.gen_range(0.0..360.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopecore::config::ScopeConfig;
    use scopecore::feed::parser::{parse_document, ParseContext};

    fn scenario() -> ScenarioConfig {
        ScenarioConfig {
            aircraft: 16,
            seed: 99,
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn same_seed_generates_identical_documents() {
        let a = TrafficModel::new(&scenario()).document();
        let b = TrafficModel::new(&scenario()).document();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn fleet_spawns_inside_scenario_radius() {
        let scenario = scenario();
        let doc = TrafficModel::new(&scenario).document();
        for raw in &doc.aircraft {
            let (distance_nm, _) = distance_bearing(
                scenario.origin_lat,
                scenario.origin_lon,
                raw.lat.unwrap(),
                raw.lon.unwrap(),
            );
            assert!(distance_nm <= scenario.radius_nm, "spawned at {distance_nm} NM");
        }
    }

    #[test]
    fn military_share_is_reflected_in_hex_prefixes() {
        let doc = TrafficModel::new(&scenario()).document();
        let military = doc
            .aircraft
            .iter()
            .filter(|raw| raw.hex.as_deref().unwrap().starts_with("7cf"))
            .count();
        assert_eq!(military, 2, "16 aircraft at 15% rounds to 2");
    }

    #[test]
    fn generated_document_parses_through_the_core_parser() {
        let scenario = scenario();
        let mut config = ScopeConfig::default();
        config.location.lat = scenario.origin_lat;
        config.location.lon = scenario.origin_lon;
        config.location.radius_nm = scenario.radius_nm;

        let doc = TrafficModel::new(&scenario).document();
        let records = parse_document(&doc, &ParseContext::new(&config));
        assert_eq!(records.len(), scenario.aircraft);
        assert_eq!(records.iter().filter(|r| r.military).count(), 2);
    }

    #[test]
    fn advance_moves_the_fleet() {
        let mut model = TrafficModel::new(&scenario());
        let before = model.document();
        model.advance(Duration::from_secs(30));
        let after = model.document();

        let moved = before
            .aircraft
            .iter()
            .zip(&after.aircraft)
            .any(|(a, b)| a.lat != b.lat || a.lon != b.lon);
        assert!(moved);
    }
}
