//! The mounted dashboards.
//!
//! * [explore::Explore]: world glacier inventory with linked box selections and climate
//!   histograms.
//! * [scenarios::ScenarioExplorer]: per-glacier model output under alternative climate scenarios.
//! * [geometry::Geometry]: ice thickness along glacier flowlines over simulation time.

pub mod explore;
pub mod geometry;
pub mod scenarios;

use crate::callback::SharedDashboard;
use crate::cli::AppName;
use crate::error::DashboardError;
use crate::figure::{Font, Layout, Legend, MapView, Mapbox, Margin};
use crate::layout::Component;

use serde_json::json;
use std::path::Path;
use std::sync::Arc;

const LOGO_URL: &str =
    "https://raw.githubusercontent.com/OGGM/oggm/master/docs/_static/logos/oggm_s_alpha.png";

/// Load a dashboard's data from its directory below `data_dir`.
///
/// # Arguments
///
/// * `app`: Which dashboard to load
/// * `data_dir`: Root of the input files. Each dashboard reads `{data_dir}/{app}/`.
/// * `mapbox_token`: Optional access token for map tiles
pub fn load(
    app: AppName,
    data_dir: &Path,
    mapbox_token: Option<&str>,
) -> Result<SharedDashboard, DashboardError> {
    let dir = data_dir.join(app.to_string());
    let dashboard: SharedDashboard = match app {
        AppName::Explore => Arc::new(explore::Explore::load(&dir)?),
        AppName::Scenarios => Arc::new(scenarios::ScenarioExplorer::load(&dir, mapbox_token)?),
        AppName::Geometry => Arc::new(geometry::Geometry::load(&dir, mapbox_token)?),
    };
    tracing::info!("Loaded dashboard {} from {}", app, dir.display());
    Ok(dashboard)
}

/// Page header row: title, logo and any `extra` components.
fn header(title: &str, extra: Vec<Component>) -> Component {
    let mut children = vec![
        Component::h1(title).class_name("eight columns"),
        Component::img(LOGO_URL).class_name("one columns").style(json!({
            "height": "100",
            "width": "225",
            "float": "right",
            "position": "relative",
        })),
    ];
    children.extend(extra);
    Component::div(children).class_name("row")
}

/// A graph placeholder in a grid column.
fn graph_column(id: &str, columns: &str) -> Component {
    Component::div(vec![Component::graph(id)])
        .class_name(columns)
        .style(json!({"margin-top": "20"}))
}

/// Layout of a satellite map of the given height centred on `view`.
fn map_layout(height: u32, view: MapView, mapbox_token: Option<&str>) -> Layout {
    Layout {
        autosize: Some(true),
        height: Some(height),
        margin: Some(Margin {
            l: 35,
            r: 35,
            b: 35,
            t: 45,
        }),
        hovermode: Some("closest".to_string()),
        legend: Some(Legend {
            font: Some(Font { size: 10 }),
            orientation: Some("h".to_string()),
            ..Default::default()
        }),
        title: Some("Map Overview".to_string()),
        mapbox: Some(Mapbox::satellite(view, mapbox_token)),
        ..Default::default()
    }
}
