//! Climate scenario files.
//!
//! Each scenario is a [TimeSeries] snapshot stored in a file named `run_output_NN.csv`, where `NN`
//! is the temperature offset above pre-industrial levels in tenths of a degree.

use crate::error::DashboardError;
use crate::timeseries::TimeSeries;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

lazy_static! {
    static ref SCENARIO_FILE: Regex = Regex::new(r"^run_output_(\d{2})\.csv$").unwrap();
}

/// Returns the temperature offset encoded in a scenario file name, if it is one.
pub fn temperature_offset(file_name: &str) -> Option<f64> {
    let captures = SCENARIO_FILE.captures(file_name)?;
    let tenths: f64 = captures[1].parse().ok()?;
    Some(tenths / 10.0)
}

/// Returns the selector label for a scenario file name.
pub fn scenario_label(file_name: &str) -> Option<String> {
    temperature_offset(file_name)
        .map(|offset| format!("{offset:.1}\u{b0}C above pre-industrial levels"))
}

/// A loaded scenario.
#[derive(Debug)]
pub struct Scenario {
    /// File name, used as the selector value
    pub key: String,
    /// Human readable label
    pub label: String,
    /// Model output
    pub series: TimeSeries,
}

/// All scenarios found in a directory, sorted by file name.
#[derive(Debug)]
pub struct Scenarios {
    scenarios: Vec<Scenario>,
}

impl Scenarios {
    /// Build from already loaded scenarios. Sorts by key.
    pub fn new(mut scenarios: Vec<Scenario>) -> Self {
        scenarios.sort_by(|a, b| a.key.cmp(&b.key));
        Scenarios { scenarios }
    }

    /// Discover and load every scenario file in `dir`.
    ///
    /// At least one scenario file must be present.
    #[tracing::instrument(level = "DEBUG")]
    pub fn discover(dir: &Path) -> Result<Self, DashboardError> {
        let entries = std::fs::read_dir(dir).map_err(|source| DashboardError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut scenarios = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DashboardError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(label) = scenario_label(&file_name) else {
                continue;
            };
            let series = TimeSeries::load(&entry.path())?;
            scenarios.push(Scenario {
                key: file_name,
                label,
                series,
            });
        }
        if scenarios.is_empty() {
            return Err(DashboardError::data_file(
                dir,
                "no scenario files matching run_output_NN.csv",
            ));
        }
        tracing::info!("Found {} scenarios in {}", scenarios.len(), dir.display());
        Ok(Self::new(scenarios))
    }

    /// Returns all scenarios in selector order.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Returns the default selection.
    pub fn first(&self) -> Option<&Scenario> {
        self.scenarios.first()
    }

    /// Look up a scenario by key.
    pub fn get(&self, key: &str) -> Result<&Scenario, DashboardError> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.key == key)
            .ok_or_else(|| DashboardError::UnknownScenario {
                key: key.to_string(),
            })
    }
}

/// A selector value that may be a single value or a list of values.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A bare value
    One(String),
    /// A multi-selection
    Many(Vec<String>),
}

impl OneOrMany {
    /// Normalise into a list. An empty bare value is an empty selection.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) if value.is_empty() => vec![],
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn labels() {
        assert_eq!(Some(0.8), temperature_offset("run_output_08.csv"));
        assert_eq!(
            Some("1.5\u{b0}C above pre-industrial levels".to_string()),
            scenario_label("run_output_15.csv")
        );
        assert_eq!(
            Some("0.0\u{b0}C above pre-industrial levels".to_string()),
            scenario_label("run_output_00.csv")
        );
        assert_eq!(None, scenario_label("run_output_8.csv"));
        assert_eq!(None, scenario_label("run_output_080.csv"));
        assert_eq!(None, scenario_label("run_output_08.nc"));
        assert_eq!(None, scenario_label("glacier_characteristics.csv"));
    }

    #[test]
    fn discover_sorted() {
        let dir = test_utils::temp_dir();
        for name in ["run_output_15.csv", "run_output_00.csv", "run_output_08.csv"] {
            std::fs::write(dir.join(name), test_utils::SCENARIO_CSV).unwrap();
        }
        std::fs::write(dir.join("notes.csv"), "not a scenario").unwrap();
        let scenarios = Scenarios::discover(&dir).unwrap();
        let keys: Vec<&str> = scenarios.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            vec!["run_output_00.csv", "run_output_08.csv", "run_output_15.csv"],
            keys
        );
        assert_eq!("run_output_00.csv", scenarios.first().unwrap().key);
        assert_eq!(
            "0.8\u{b0}C above pre-industrial levels",
            scenarios.get("run_output_08.csv").unwrap().label
        );
        let err = scenarios.get("run_output_99.csv").unwrap_err();
        assert_eq!("unknown scenario run_output_99.csv", err.to_string());
    }

    #[test]
    fn discover_none() {
        let dir = test_utils::temp_dir();
        let err = Scenarios::discover(&dir).unwrap_err();
        assert!(err.to_string().contains("no scenario files"), "{err}");
    }

    #[test]
    fn discover_missing_dir() {
        let dir = test_utils::temp_dir().join("nope");
        let err = Scenarios::discover(&dir).unwrap_err();
        assert!(matches!(err, DashboardError::Io { .. }), "{err:?}");
    }

    #[test]
    fn one_or_many() {
        let one: OneOrMany = serde_json::from_str(r#""run_output_00.csv""#).unwrap();
        let many: OneOrMany = serde_json::from_str(r#"["run_output_00.csv"]"#).unwrap();
        assert_eq!(one.into_vec(), many.into_vec());
        let empty: OneOrMany = serde_json::from_str(r#""""#).unwrap();
        assert!(empty.into_vec().is_empty());
        let empty: OneOrMany = serde_json::from_str("[]").unwrap();
        assert!(empty.into_vec().is_empty());
    }
}
