use crate::inventory::{GlacierRecord, Inventory};

use std::path::{Path, PathBuf};

/// Write `contents` to a uniquely named file in the temporary directory and return its path.
pub(crate) fn write_temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = temp_dir();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Create a new, empty, uniquely named temporary directory.
pub(crate) fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glacierview-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Three named glaciers with areas 1.0, 5.0 and 50.0 km².
pub(crate) fn three_glaciers() -> Vec<GlacierRecord> {
    vec![
        GlacierRecord::new("RGI60-11.00001", None, 10.1, 46.1, 1.0),
        GlacierRecord::new("RGI60-11.00002", Some("Alpha"), 10.2, 46.2, 5.0),
        GlacierRecord::new("RGI60-11.00003", Some("Beta"), 10.3, 46.3, 50.0),
    ]
}

/// Inventory of [three_glaciers].
pub(crate) fn three_glacier_inventory() -> Inventory {
    Inventory::new(Path::new("test"), three_glaciers()).unwrap()
}

/// Glaciers with climate statistics, in the style of the explore dashboard.
///
/// The last record has no precipitation or temperature.
pub(crate) fn climate_glaciers() -> Vec<GlacierRecord> {
    let stats = [
        // (area, n, elevation, precipitation, temperature)
        (0.5, 1, 5400.0, 450.0, -12.5),
        (2.0, 3, 2900.0, 1250.0, -3.5),
        (8.0, 2, 3500.0, 2150.0, -1.0),
        (40.0, 5, 4100.0, 3950.0, 2.0),
        (120.0, 1, 1200.0, f64::NAN, f64::NAN),
    ];
    stats
        .iter()
        .enumerate()
        .map(|(i, (area, n, elev, prcp, temp))| {
            let mut record =
                GlacierRecord::new(&i.to_string(), None, i as f64 * 10.0, i as f64 * 5.0, *area);
            record.n_glaciers = *n;
            record.mean_elev = *elev;
            record.prcp = *prcp;
            record.temp = *temp;
            record.label = format!(
                "Id: {} - Area: {:.2} km2 - N Glaciers: {}",
                i, record.area_km2, record.n_glaciers
            );
            record
        })
        .collect()
}

/// Inventory of [climate_glaciers].
pub(crate) fn climate_inventory() -> Inventory {
    Inventory::new(Path::new("test"), climate_glaciers()).unwrap()
}

/// Long format scenario time series for the first two of [three_glaciers].
pub(crate) const SCENARIO_CSV: &str = "rgi_id,time,area,length,volume\n\
     RGI60-11.00001,2000,1000000,1500,20000000\n\
     RGI60-11.00001,2001,900000,1400,18000000\n\
     RGI60-11.00001,2002,800000,1300,16000000\n\
     RGI60-11.00002,2000,5000000,4000,300000000\n\
     RGI60-11.00002,2002,4000000,3600,250000000\n";

/// Wide format flowline thickness: three points, years 0, 10 and 20.
pub(crate) const FLOWLINES_CSV: &str = "lon,lat,0,10,20\n\
     10.80,46.80,120.0,80.0,0.0\n\
     10.81,46.81,60.0,0.0,0.0\n\
     10.82,46.82,0.0,0.0,0.0\n";
