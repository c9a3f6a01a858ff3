//! Glacier flowline geometry.
//!
//! Ice thickness along glacier flowlines, produced offline by the flowline model for a sequence
//! of simulation years. Stored as a 2D [ndarray] indexed by (point, year).

use crate::error::DashboardError;
use crate::loader;

use ndarray::{Array2, ArrayView1, Axis};
use std::path::Path;

/// Flowline points and their ice thickness over time.
#[derive(Debug)]
pub struct Flowlines {
    lon: Vec<f64>,
    lat: Vec<f64>,
    /// Sorted simulation years
    years: Vec<f64>,
    /// Thickness in m, (point, year)
    thickness: Array2<f64>,
}

impl Flowlines {
    /// Load a wide format CSV file with columns `lon`, `lat` and one column per simulation year.
    #[tracing::instrument(level = "DEBUG")]
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let mut reader = loader::open_reader(path)?;
        let headers = loader::headers(path, &mut reader)?;
        let lon_column = loader::required_column(path, &headers, "lon")?;
        let lat_column = loader::required_column(path, &headers, "lat")?;
        let mut year_columns = Vec::new();
        for (column, header) in headers.iter().enumerate() {
            if column == lon_column || column == lat_column {
                continue;
            }
            let year: f64 = header.parse().map_err(|_| {
                DashboardError::data_file(path, format!("column {header:?} is not a year"))
            })?;
            year_columns.push((year, column));
        }
        if year_columns.is_empty() {
            return Err(DashboardError::data_file(path, "no year columns"));
        }
        year_columns.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut lon = Vec::new();
        let mut lat = Vec::new();
        let mut data = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| DashboardError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let cell = |column: usize| record.get(column).unwrap_or_default();
            lon.push(loader::parse_value(path, cell(lon_column))?);
            lat.push(loader::parse_value(path, cell(lat_column))?);
            for (_, column) in &year_columns {
                data.push(loader::parse_value(path, cell(*column))?);
            }
        }
        let years: Vec<f64> = year_columns.iter().map(|(year, _)| *year).collect();
        let thickness = Array2::from_shape_vec((lon.len(), years.len()), data)?;
        tracing::info!(
            "Loaded {} flowline points over {} years from {}",
            lon.len(),
            years.len(),
            path.display()
        );
        Ok(Flowlines {
            lon,
            lat,
            years,
            thickness,
        })
    }

    /// Point longitudes.
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    /// Point latitudes.
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    /// Simulation years.
    pub fn years(&self) -> &[f64] {
        &self.years
    }

    /// Returns the index of the latest year not after `time`, or the first year if `time` precedes
    /// them all.
    pub fn year_index(&self, time: f64) -> usize {
        self.years
            .partition_point(|year| *year <= time)
            .saturating_sub(1)
    }

    /// Returns the year shown for `time` and the thickness of every point in that year.
    pub fn thickness_at(&self, time: f64) -> (f64, ArrayView1<f64>) {
        let index = self.year_index(time);
        (self.years[index], self.thickness.index_axis(Axis(1), index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    fn flowlines() -> Flowlines {
        let path = test_utils::write_temp_file("flowlines.csv", test_utils::FLOWLINES_CSV);
        Flowlines::load(&path).unwrap()
    }

    #[test]
    fn load() {
        let flowlines = flowlines();
        assert_eq!(&[10.80, 10.81, 10.82], flowlines.lon());
        assert_eq!(&[46.80, 46.81, 46.82], flowlines.lat());
        assert_eq!(&[0.0, 10.0, 20.0], flowlines.years());
    }

    #[test]
    fn year_lookup() {
        let flowlines = flowlines();
        assert_eq!(0, flowlines.year_index(-5.0));
        assert_eq!(0, flowlines.year_index(0.0));
        assert_eq!(0, flowlines.year_index(9.0));
        assert_eq!(1, flowlines.year_index(10.0));
        assert_eq!(2, flowlines.year_index(100.0));
    }

    #[test]
    fn thickness() {
        let flowlines = flowlines();
        let (year, thickness) = flowlines.thickness_at(15.0);
        assert_eq!(10.0, year);
        assert_eq!(vec![80.0, 0.0, 0.0], thickness.to_vec());
    }

    #[test]
    fn load_rejects_bad_year() {
        let path = test_utils::write_temp_file("flowlines.csv", "lon,lat,start\n1,2,3\n");
        let err = Flowlines::load(&path).unwrap_err();
        assert!(err.to_string().contains("\"start\" is not a year"), "{err}");
    }

    #[test]
    fn load_requires_years() {
        let path = test_utils::write_temp_file("flowlines.csv", "lon,lat\n1,2\n");
        let err = Flowlines::load(&path).unwrap_err();
        assert!(err.to_string().contains("no year columns"), "{err}");
    }
}
