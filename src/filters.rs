//! Filter reducers.
//!
//! A reducer maps the full record collection plus the currently active filters to the subset of
//! records matching all of them. Filters never mutate the collection; the result is a derived
//! view borrowing from it, in the collection's order.

use crate::inventory::GlacierRecord;

use std::collections::HashSet;
use strum_macros::Display;

/// Numeric fields of a [GlacierRecord] that may be range filtered.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    /// Area in km²
    Area,
    /// Centroid longitude
    Longitude,
    /// Centroid latitude
    Latitude,
    /// Mean elevation in m
    Elevation,
    /// Mean annual precipitation in mm/yr
    Precipitation,
    /// Mean annual temperature at mean elevation in °C
    Temperature,
}

impl Field {
    /// Returns the value of this field in `record`.
    pub fn value(self, record: &GlacierRecord) -> f64 {
        match self {
            Self::Area => record.area_km2,
            Self::Longitude => record.lon,
            Self::Latitude => record.lat,
            Self::Elevation => record.mean_elev,
            Self::Precipitation => record.prcp,
            Self::Temperature => record.temp,
        }
    }
}

/// An active filter.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Inclusive numeric range on a field. Records whose value is not finite never match.
    Range { field: Field, min: f64, max: f64 },
    /// Membership of the record's label in an explicit point set, e.g. from a box selection.
    Labels(HashSet<String>),
}

impl Filter {
    /// Return a new inclusive range filter.
    pub fn range(field: Field, min: f64, max: f64) -> Self {
        Filter::Range { field, min, max }
    }

    /// Return a new label membership filter.
    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Labels(labels.into_iter().map(Into::into).collect())
    }

    /// Returns whether `record` satisfies this filter.
    pub fn matches(&self, record: &GlacierRecord) -> bool {
        match self {
            Filter::Range { field, min, max } => {
                let value = field.value(record);
                value.is_finite() && *min <= value && value <= *max
            }
            Filter::Labels(labels) => labels.contains(&record.label),
        }
    }
}

/// Returns the records matching every filter, in collection order.
///
/// An empty filter list matches every record.
pub fn reduce<'a>(records: &'a [GlacierRecord], filters: &[Filter]) -> Vec<&'a GlacierRecord> {
    records
        .iter()
        .filter(|record| filters.iter().all(|filter| filter.matches(record)))
        .collect()
}

/// Status text showing the number of selected glaciers.
pub fn count_text(count: u64) -> String {
    format!("No of Glaciers: {count}")
}
