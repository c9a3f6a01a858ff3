//! Glacier inventory
//!
//! One [GlacierRecord] per row of the inventory table. The collection is immutable after load and
//! shared read-only by every request.

use crate::error::DashboardError;
use crate::loader;

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// How the display label of each record is derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelStyle {
    /// `"{rgi_id}: {name}. Area: {area:.2}km2"`.
    Named,
    /// `"Id: {i} - Area: {area:.2} km2 - N Glaciers: {n}"`.
    ///
    /// Records are stably sorted by area before labelling, and `i` is the position after sorting.
    Aggregate,
}

/// A row of the inventory CSV file.
#[derive(Debug, Deserialize)]
struct InventoryRow {
    rgi_id: Option<String>,
    name: Option<String>,
    cenlon: f64,
    cenlat: f64,
    rgi_area_km2: f64,
    n_glaciers: Option<u64>,
    dem_mean_elev: Option<f64>,
    tstar_avg_prcp: Option<f64>,
    tstar_avg_temp_mean_elev: Option<f64>,
}

/// A single glacier (or aggregate of glaciers).
///
/// Climate statistics that are absent from the input are NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct GlacierRecord {
    /// Unique identifier
    pub id: String,
    /// Optional display name
    pub name: Option<String>,
    /// Centroid longitude
    pub lon: f64,
    /// Centroid latitude
    pub lat: f64,
    /// Area in km²
    pub area_km2: f64,
    /// Number of glaciers the record stands for
    pub n_glaciers: u64,
    /// Mean elevation in m
    pub mean_elev: f64,
    /// Mean annual precipitation in mm/yr
    pub prcp: f64,
    /// Mean annual temperature at mean elevation in °C
    pub temp: f64,
    /// Display label, also used as the join key for chart selections
    pub label: String,
}

impl GlacierRecord {
    /// Return a new record with no climate statistics and a [LabelStyle::Named] label.
    pub fn new(id: &str, name: Option<&str>, lon: f64, lat: f64, area_km2: f64) -> Self {
        let mut record = GlacierRecord {
            id: id.to_string(),
            name: name.map(str::to_string),
            lon,
            lat,
            area_km2,
            n_glaciers: 1,
            mean_elev: f64::NAN,
            prcp: f64::NAN,
            temp: f64::NAN,
            label: String::new(),
        };
        record.label = named_label(&record);
        record
    }
}

fn named_label(record: &GlacierRecord) -> String {
    format!(
        "{}: {}. Area: {:.2}km2",
        record.id,
        record.name.as_deref().unwrap_or_default(),
        record.area_km2
    )
}

fn aggregate_label(index: usize, record: &GlacierRecord) -> String {
    format!(
        "Id: {} - Area: {:.2} km2 - N Glaciers: {}",
        index, record.area_km2, record.n_glaciers
    )
}

/// Ordered, immutable collection of glacier records.
#[derive(Debug)]
pub struct Inventory {
    records: Vec<GlacierRecord>,
    labels: HashMap<String, usize>,
}

impl Inventory {
    /// Build an inventory from records, checking that identifiers and labels are unique.
    ///
    /// # Arguments
    ///
    /// * `source`: Where the records came from, for error reporting
    /// * `records`: Records in display order
    pub fn new(source: &Path, records: Vec<GlacierRecord>) -> Result<Self, DashboardError> {
        if records.is_empty() {
            return Err(DashboardError::data_file(source, "inventory contains no glaciers"));
        }
        let mut ids = HashMap::with_capacity(records.len());
        let mut labels = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if ids.insert(record.id.as_str(), index).is_some() {
                return Err(DashboardError::data_file(
                    source,
                    format!("duplicate glacier identifier {}", record.id),
                ));
            }
            if labels.insert(record.label.clone(), index).is_some() {
                return Err(DashboardError::data_file(
                    source,
                    format!("duplicate glacier label {}", record.label),
                ));
            }
        }
        Ok(Inventory { records, labels })
    }

    /// Load an inventory CSV file and derive the display labels.
    #[tracing::instrument(level = "DEBUG")]
    pub fn load(path: &Path, style: LabelStyle) -> Result<Self, DashboardError> {
        let rows: Vec<InventoryRow> = loader::read_rows(path)?;
        let mut records = Vec::with_capacity(rows.len());
        for (position, row) in rows.into_iter().enumerate() {
            let id = match (row.rgi_id, style) {
                (Some(id), _) => id,
                (None, LabelStyle::Aggregate) => position.to_string(),
                (None, LabelStyle::Named) => {
                    return Err(DashboardError::data_file(
                        path,
                        format!("row {position} has no rgi_id"),
                    ))
                }
            };
            records.push(GlacierRecord {
                id,
                name: row.name.filter(|name| !name.is_empty()),
                lon: row.cenlon,
                lat: row.cenlat,
                area_km2: row.rgi_area_km2,
                n_glaciers: row.n_glaciers.unwrap_or(1),
                mean_elev: row.dem_mean_elev.unwrap_or(f64::NAN),
                prcp: row.tstar_avg_prcp.unwrap_or(f64::NAN),
                temp: row.tstar_avg_temp_mean_elev.unwrap_or(f64::NAN),
                label: String::new(),
            });
        }
        match style {
            LabelStyle::Named => {
                for record in records.iter_mut() {
                    record.label = named_label(record);
                }
            }
            LabelStyle::Aggregate => {
                records.sort_by(|a, b| a.area_km2.total_cmp(&b.area_km2));
                for (index, record) in records.iter_mut().enumerate() {
                    record.label = aggregate_label(index, record);
                }
            }
        }
        let inventory = Self::new(path, records)?;
        tracing::info!(
            "Loaded {} glaciers from {}",
            inventory.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Returns all records in display order.
    pub fn records(&self) -> &[GlacierRecord] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the inventory is empty. Always false for a loaded inventory.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the first record in display order.
    pub fn first(&self) -> Option<&GlacierRecord> {
        self.records.first()
    }

    /// Look up a record by its display label.
    pub fn by_label(&self, label: &str) -> Option<&GlacierRecord> {
        self.labels.get(label).map(|index| &self.records[*index])
    }

    /// Select the record shown in a detail view.
    ///
    /// With no target this is the first record. A target matching no label selects nothing.
    pub fn select_one(&self, target: Option<&str>) -> Option<&GlacierRecord> {
        match target {
            None => self.first(),
            Some(label) => self.by_label(label),
        }
    }

    /// Returns `[floor(min area), ceil(max area)]`, ignoring non-finite areas.
    ///
    /// These are the bounds of the area range slider.
    pub fn area_range(&self) -> [f64; 2] {
        let areas: Array1<f64> = self
            .records
            .iter()
            .map(|record| {
                if record.area_km2.is_finite() {
                    record.area_km2
                } else {
                    f64::NAN
                }
            })
            .collect();
        let min = areas.min_skipnan().floor();
        let max = areas.max_skipnan().ceil();
        [min, max]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn named_label_format() {
        let record = GlacierRecord::new("RGI60-11.00897", Some("Hintereisferner"), 10.7, 46.8, 7.3);
        assert_eq!(
            "RGI60-11.00897: Hintereisferner. Area: 7.30km2",
            record.label
        );
        let record = GlacierRecord::new("RGI60-11.00001", None, 10.7, 46.8, 0.1);
        assert_eq!("RGI60-11.00001: . Area: 0.10km2", record.label);
    }

    #[test]
    fn load_named() {
        let path = test_utils::write_temp_file(
            "glacier_characteristics.csv",
            "rgi_id,name,cenlon,cenlat,rgi_area_km2\n\
             RGI60-11.00001,,10.1,46.1,1.0\n\
             RGI60-11.00002,Alpha,10.2,46.2,50.0\n\
             RGI60-11.00003,Beta,10.3,46.3,5.0\n",
        );
        let inventory = Inventory::load(&path, LabelStyle::Named).unwrap();
        assert_eq!(3, inventory.len());
        let ids: Vec<&str> = inventory.records().iter().map(|r| r.id.as_str()).collect();
        // File order is kept.
        assert_eq!(
            vec!["RGI60-11.00001", "RGI60-11.00002", "RGI60-11.00003"],
            ids
        );
        assert_eq!(None, inventory.records()[0].name);
        assert!(inventory.records()[0].prcp.is_nan());
        let record = inventory.by_label("RGI60-11.00003: Beta. Area: 5.00km2").unwrap();
        assert_eq!("RGI60-11.00003", record.id);
        assert_eq!([1.0, 50.0], inventory.area_range());
    }

    #[test]
    fn load_aggregate_sorts_by_area() {
        let path = test_utils::write_temp_file(
            "glacier_characteristics.csv",
            "cenlon,cenlat,rgi_area_km2,n_glaciers,dem_mean_elev,tstar_avg_prcp,tstar_avg_temp_mean_elev\n\
             -70.0,-33.0,12.5,4,3500,800,-5.5\n\
             86.9,27.9,0.5,1,5400,,nan\n\
             7.9,46.5,3.25,2,2900,2100,-1.0\n",
        );
        let inventory = Inventory::load(&path, LabelStyle::Aggregate).unwrap();
        let labels: Vec<&str> = inventory
            .records()
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(
            vec![
                "Id: 0 - Area: 0.50 km2 - N Glaciers: 1",
                "Id: 1 - Area: 3.25 km2 - N Glaciers: 2",
                "Id: 2 - Area: 12.50 km2 - N Glaciers: 4",
            ],
            labels
        );
        // Identifiers come from the row position in the file.
        assert_eq!("1", inventory.records()[0].id);
        assert!(inventory.records()[0].prcp.is_nan());
        assert!(inventory.records()[0].temp.is_nan());
        assert_eq!(2100.0, inventory.records()[1].prcp);
        assert_eq!([0.0, 13.0], inventory.area_range());
    }

    #[test]
    fn load_named_requires_rgi_id() {
        let path = test_utils::write_temp_file(
            "glacier_characteristics.csv",
            "name,cenlon,cenlat,rgi_area_km2\nAlpha,10.2,46.2,50.0\n",
        );
        let err = Inventory::load(&path, LabelStyle::Named).unwrap_err();
        assert!(err.to_string().contains("row 0 has no rgi_id"), "{err}");
    }

    #[test]
    fn load_duplicate_id() {
        let path = test_utils::write_temp_file(
            "glacier_characteristics.csv",
            "rgi_id,cenlon,cenlat,rgi_area_km2\nA,1,1,1\nA,2,2,2\n",
        );
        let err = Inventory::load(&path, LabelStyle::Named).unwrap_err();
        assert!(err.to_string().contains("duplicate glacier identifier A"), "{err}");
    }

    #[test]
    fn load_empty() {
        let path = test_utils::write_temp_file(
            "glacier_characteristics.csv",
            "rgi_id,cenlon,cenlat,rgi_area_km2\n",
        );
        let err = Inventory::load(&path, LabelStyle::Named).unwrap_err();
        assert!(err.to_string().contains("no glaciers"), "{err}");
    }

    #[test]
    fn select_one_defaults_to_first() {
        let inventory = test_utils::three_glacier_inventory();
        assert_eq!("RGI60-11.00001", inventory.select_one(None).unwrap().id);
        let record = inventory
            .select_one(Some("RGI60-11.00002: Alpha. Area: 5.00km2"))
            .unwrap();
        assert_eq!("RGI60-11.00002", record.id);
        assert_eq!(None, inventory.select_one(Some("RGI60-11.99999: . Area: 1.00km2")));
    }

    #[test]
    fn area_range_skips_non_finite() {
        let mut records = test_utils::three_glaciers();
        records[1].area_km2 = f64::INFINITY;
        let inventory = Inventory::new(Path::new("test"), records).unwrap();
        assert_eq!([1.0, 50.0], inventory.area_range());
    }
}
