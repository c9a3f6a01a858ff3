//! Simulated per-glacier time series.
//!
//! A [TimeSeries] is one immutable snapshot of model output: for every glacier and simulation
//! year, the value of each physical [Quantity]. Values are held in a 2D [ndarray] per quantity,
//! indexed by (glacier, year).

use crate::error::DashboardError;
use crate::loader;

use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use strum_macros::Display;

/// Physical quantities that may be plotted.
///
/// This is a closed set: requests naming anything else are rejected.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum Quantity {
    Length,
    Area,
    Volume,
    Temp,
    Prcp,
    PrcpSol,
    Ela,
}

impl Quantity {
    /// All quantities, in selector order.
    pub const ALL: [Quantity; 7] = [
        Quantity::Length,
        Quantity::Area,
        Quantity::Volume,
        Quantity::Temp,
        Quantity::Prcp,
        Quantity::PrcpSol,
        Quantity::Ela,
    ];

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Length => "Length",
            Self::Area => "Area",
            Self::Volume => "Volume",
            Self::Temp => "Temperature",
            Self::Prcp => "Precipitation",
            Self::PrcpSol => "Solid Precipitation",
            Self::Ela => "Equilibrium Line Altitude",
        }
    }

    /// Display units, after applying [Quantity::multiplier].
    pub fn units(self) -> &'static str {
        match self {
            Self::Length => "km",
            Self::Area => "km\u{b2}",
            Self::Volume => "km\u{b3}",
            Self::Temp => "\u{b0}C",
            Self::Prcp | Self::PrcpSol => "mm/year",
            Self::Ela => "m above sea level",
        }
    }

    /// Factor converting stored SI values into display units.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Length => 1e-3,
            Self::Area => 1e-6,
            Self::Volume => 1e-9,
            Self::Temp | Self::Prcp | Self::PrcpSol | Self::Ela => 1.0,
        }
    }

    /// Axis title, e.g. `Area (km²)`.
    pub fn axis_title(self) -> String {
        format!("{} ({})", self.name(), self.units())
    }
}

impl FromStr for Quantity {
    type Err = DashboardError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|quantity| quantity.to_string() == key)
            .ok_or_else(|| DashboardError::UnknownQuantity {
                key: key.to_string(),
            })
    }
}

/// The series of one quantity for one glacier, in display units.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Simulation years
    pub time: Vec<f64>,
    /// Values. NaN where the model produced no value.
    pub values: Vec<f64>,
}

/// One snapshot of model output for a set of glaciers.
#[derive(Debug)]
pub struct TimeSeries {
    /// Sorted, unique simulation years
    years: Vec<f64>,
    /// Row index of each glacier
    glaciers: HashMap<String, usize>,
    /// (glacier, year) values for each quantity present in the input
    values: HashMap<Quantity, Array2<f64>>,
}

impl TimeSeries {
    /// Load a long format CSV file.
    ///
    /// The file has columns `rgi_id`, `time` and any of the [Quantity] keys, one row per glacier
    /// and year. Quantity columns that are absent read as NaN.
    #[tracing::instrument(level = "DEBUG")]
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let mut reader = loader::open_reader(path)?;
        let headers = loader::headers(path, &mut reader)?;
        let id_column = loader::required_column(path, &headers, "rgi_id")?;
        let time_column = loader::required_column(path, &headers, "time")?;
        let columns: Vec<(Quantity, usize)> = Quantity::ALL
            .into_iter()
            .filter_map(|quantity| {
                let key = quantity.to_string();
                headers
                    .iter()
                    .position(|header| header == key)
                    .map(|column| (quantity, column))
            })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| DashboardError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let cell = |column: usize| record.get(column).unwrap_or_default();
            let time = loader::parse_value(path, cell(time_column))?;
            if !time.is_finite() {
                return Err(DashboardError::data_file(path, "time must be finite"));
            }
            let values = columns
                .iter()
                .map(|(_, column)| loader::parse_value(path, cell(*column)))
                .collect::<Result<Vec<f64>, _>>()?;
            rows.push((cell(id_column).to_string(), time, values));
        }

        let mut years: Vec<f64> = rows.iter().map(|(_, time, _)| *time).collect();
        years.sort_by(f64::total_cmp);
        years.dedup();

        let mut glaciers = HashMap::new();
        for (id, _, _) in &rows {
            let next = glaciers.len();
            glaciers.entry(id.clone()).or_insert(next);
        }

        let shape = (glaciers.len(), years.len());
        let mut values: HashMap<Quantity, Array2<f64>> = columns
            .iter()
            .map(|(quantity, _)| (*quantity, Array2::from_elem(shape, f64::NAN)))
            .collect();
        let mut seen = Array2::from_elem(shape, false);
        for (id, time, row) in &rows {
            let g = glaciers[id];
            let t = years
                .binary_search_by(|year| year.total_cmp(time))
                .map_err(|_| DashboardError::data_file(path, "inconsistent time axis"))?;
            if seen[[g, t]] {
                return Err(DashboardError::data_file(
                    path,
                    format!("duplicate entry for {id} at time {time}"),
                ));
            }
            seen[[g, t]] = true;
            for ((quantity, _), value) in columns.iter().zip(row) {
                if let Some(array) = values.get_mut(quantity) {
                    array[[g, t]] = *value;
                }
            }
        }

        tracing::info!(
            "Loaded {} glaciers over {} years from {}",
            shape.0,
            shape.1,
            path.display()
        );
        Ok(TimeSeries {
            years,
            glaciers,
            values,
        })
    }

    /// Returns the simulation years.
    pub fn years(&self) -> &[f64] {
        &self.years
    }

    /// Returns whether the snapshot holds data for a glacier.
    pub fn contains(&self, rgi_id: &str) -> bool {
        self.glaciers.contains_key(rgi_id)
    }

    /// Returns the series of `quantity` for a glacier in display units, or `None` if the glacier
    /// is not part of this snapshot.
    pub fn series(&self, rgi_id: &str, quantity: Quantity) -> Option<Series> {
        let g = *self.glaciers.get(rgi_id)?;
        let values = match self.values.get(&quantity) {
            Some(array) => array
                .row(g)
                .mapv(|value| value * quantity.multiplier())
                .to_vec(),
            None => vec![f64::NAN; self.years.len()],
        };
        Some(Series {
            time: self.years.clone(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    fn assert_close(expected: &[f64], actual: &[f64]) {
        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(actual) {
            assert!((e - a).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn quantity_from_str() {
        for quantity in Quantity::ALL {
            assert_eq!(quantity, quantity.to_string().parse::<Quantity>().unwrap());
        }
        assert_eq!(Quantity::PrcpSol, "prcp_sol".parse::<Quantity>().unwrap());
        let err = "mass".parse::<Quantity>().unwrap_err();
        assert_eq!("unknown quantity mass", err.to_string());
        assert!("Area".parse::<Quantity>().is_err());
    }

    #[test]
    fn quantity_axis_title() {
        assert_eq!("Area (km\u{b2})", Quantity::Area.axis_title());
        assert_eq!(
            "Equilibrium Line Altitude (m above sea level)",
            Quantity::Ela.axis_title()
        );
    }

    #[test]
    fn load_and_select() {
        let path = test_utils::write_temp_file("run_output_00.csv", test_utils::SCENARIO_CSV);
        let ts = TimeSeries::load(&path).unwrap();
        assert_eq!(&[2000.0, 2001.0, 2002.0], ts.years());
        assert!(ts.contains("RGI60-11.00001"));
        assert!(!ts.contains("RGI60-11.00003"));

        let series = ts.series("RGI60-11.00001", Quantity::Area).unwrap();
        assert_eq!(vec![2000.0, 2001.0, 2002.0], series.time);
        assert_close(&[1.0, 0.9, 0.8], &series.values);

        let series = ts.series("RGI60-11.00001", Quantity::Length).unwrap();
        assert_close(&[1.5, 1.4, 1.3], &series.values);

        // Missing year is a gap.
        let series = ts.series("RGI60-11.00002", Quantity::Area).unwrap();
        assert_close(&[5.0], &series.values[..1]);
        assert!(series.values[1].is_nan());
        assert_close(&[4.0], &series.values[2..]);

        // Absent quantity column.
        let series = ts.series("RGI60-11.00002", Quantity::Ela).unwrap();
        assert!(series.values.iter().all(|v| v.is_nan()));

        assert_eq!(None, ts.series("RGI60-11.00003", Quantity::Area));
    }

    #[test]
    fn load_requires_time() {
        let path = test_utils::write_temp_file("run_output_00.csv", "rgi_id,area\nA,1\n");
        let err = TimeSeries::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing column time"), "{err}");
    }

    #[test]
    fn load_rejects_duplicates() {
        let path =
            test_utils::write_temp_file("run_output_00.csv", "rgi_id,time,area\nA,1,1\nA,1,2\n");
        let err = TimeSeries::load(&path).unwrap_err();
        assert!(err.to_string().contains("duplicate entry for A"), "{err}");
    }
}
