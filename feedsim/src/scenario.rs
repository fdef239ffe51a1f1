use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters for a synthetic traffic scenario. Loadable from YAML so a
/// scenario can be replayed exactly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub radius_nm: f64,
    pub aircraft: usize,
    /// Fraction of the fleet carrying a military hex prefix.
    pub military_share: f64,
    pub seed: u64,
    pub update_interval_secs: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        // Matches the scope's own location defaults so an unconfigured
        // display pointed at an unconfigured simulator shows traffic.
        Self {
            origin_lat: 0.0,
            origin_lon: 0.0,
            radius_nm: 60.0,
            aircraft: 24,
            military_share: 0.15,
            seed: 7,
            update_interval_secs: 1,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(aircraft: usize, seed: u64) -> Self {
        Self {
            aircraft,
            seed,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_overrides_fleet_and_seed() {
        let config = ScenarioConfig::from_args(8, 42);
        assert_eq!(config.aircraft, 8);
        assert_eq!(config.seed, 42);
        assert_eq!(config.radius_nm, 60.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"origin_lat: 51.5\norigin_lon: -0.1\naircraft: 12\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = ScenarioConfig::load(&path).unwrap();
        assert_eq!(config.aircraft, 12);
        assert_eq!(config.origin_lat, 51.5);
        assert_eq!(config.seed, 7);
    }
}
