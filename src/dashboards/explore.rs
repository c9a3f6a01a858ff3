//! World glaciers explorer.
//!
//! Four linked charts over an aggregated world inventory. A box selection on any chart filters
//! the records shown by the others: selections on the map and the latitude chart select points by
//! label, selections on the histograms select a range of the plotted field.

use crate::callback::{CallbackContext, Dashboard, Dependency, Output, Target};
use crate::error::DashboardError;
use crate::figure::{
    Axis, BarTrace, Figure, Geo, Layout, MapTrace, Marker, MarkerSize, ScatterTrace, Trace,
};
use crate::filters::{self, Field, Filter};
use crate::histogram;
use crate::inventory::{GlacierRecord, Inventory, LabelStyle};
use crate::layout::Component;
use crate::models::SelectedData;

use serde_json::json;
use std::path::Path;

const TEXT: &str = "glaciers_text";
const MAIN: &str = "main_graph";
const LAT: &str = "lat_graph";
const PRECIP: &str = "precip_graph";
const TEMP: &str = "temp_graph";
const SELECTED: &str = "selectedData";

const LAT_COLOR: &str = "#7d3c98";

/// Display of one histogram chart.
struct HistogramStyle {
    field: Field,
    edges: fn() -> Vec<f64>,
    all_color: &'static str,
    selection_color: &'static str,
    x_range: [f64; 2],
    title: &'static str,
}

const PRECIP_STYLE: HistogramStyle = HistogramStyle {
    field: Field::Precipitation,
    edges: precipitation_edges,
    all_color: "#85c1e9",
    selection_color: "#2e86c1",
    x_range: [0.0, 4100.0],
    title: "Annual precipitation (mm yr<sup>-1</sup>)",
};

const TEMP_STYLE: HistogramStyle = HistogramStyle {
    field: Field::Temperature,
    edges: temperature_edges,
    all_color: "#f1948a",
    selection_color: "#cb4335",
    x_range: [-27.0, 7.0],
    title: "Annual Temperature at avg. altitude (\u{b0}C)",
};

/// 0, 100, ..., 4000 mm/yr.
pub fn precipitation_edges() -> Vec<f64> {
    histogram::uniform_edges(0.0, 100.0, 41)
}

/// -27, -26, ..., 7 °C.
pub fn temperature_edges() -> Vec<f64> {
    histogram::uniform_edges(-27.0, 1.0, 35)
}

/// The explore dashboard.
pub struct Explore {
    inventory: Inventory,
    layout: Component,
    dependencies: Vec<Dependency>,
}

impl Explore {
    /// Load `glacier_characteristics.csv` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, DashboardError> {
        let inventory = Inventory::load(
            &dir.join("glacier_characteristics.csv"),
            LabelStyle::Aggregate,
        )?;
        Ok(Self::new(inventory))
    }

    /// Return a new Explore dashboard over `inventory`.
    pub fn new(inventory: Inventory) -> Self {
        let selected = |id: &str| Target::new(id, SELECTED);
        let all = || vec![selected(LAT), selected(MAIN), selected(PRECIP), selected(TEMP)];
        let dependencies = vec![
            Dependency::new(Target::new(TEXT, "children"), all()),
            Dependency::new(Target::new(MAIN, "figure"), all()),
            Dependency::new(
                Target::new(LAT, "figure"),
                vec![selected(MAIN), selected(PRECIP), selected(TEMP)],
            ),
            Dependency::new(Target::new(PRECIP, "figure"), all()),
            Dependency::new(Target::new(TEMP, "figure"), all()),
        ];
        Explore {
            inventory,
            layout: page(),
            dependencies,
        }
    }

    /// Returns the active filters.
    ///
    /// Only selections declared as inputs of the requested output are visible in `ctx`, so each
    /// output applies exactly the selections it depends on.
    fn filters(ctx: &CallbackContext) -> Result<Vec<Filter>, DashboardError> {
        let mut filters = Vec::new();
        for id in [LAT, MAIN, PRECIP, TEMP] {
            let Some(selected) = ctx.get::<SelectedData>(id, SELECTED)? else {
                continue;
            };
            let field = match id {
                PRECIP => Field::Precipitation,
                TEMP => Field::Temperature,
                _ => {
                    filters.push(Filter::labels(selected.labels()));
                    continue;
                }
            };
            if let Some((min, max)) = selected.x_range() {
                filters.push(Filter::range(field, min, max));
            }
        }
        Ok(filters)
    }

    fn selection(&self, ctx: &CallbackContext) -> Result<Vec<&GlacierRecord>, DashboardError> {
        Ok(filters::reduce(self.inventory.records(), &Self::filters(ctx)?))
    }

    fn histogram_figure(&self, selection: &[&GlacierRecord], style: &HistogramStyle) -> Figure {
        let dist = histogram::distributions(
            self.inventory.records(),
            selection,
            style.field,
            &(style.edges)(),
        );
        let bar = |y: Vec<f64>, name: &str, color: &str| {
            Trace::Bar(BarTrace {
                x: dist.centres.clone(),
                y,
                name: Some(name.to_string()),
                hoverinfo: Some("skip".to_string()),
                marker: Marker::colored(color),
            })
        };
        let data = vec![
            bar(dist.all.clone(), "All", style.all_color),
            bar(dist.selection.clone(), "Selection", style.selection_color),
        ];
        let layout = Layout {
            showlegend: Some(true),
            xaxis: Some(Axis::ranged(style.x_range[0], style.x_range[1], style.title)),
            yaxis: Some(Axis::titled("Frequency")),
            ..base_layout()
        };
        Figure::new(data, layout)
    }
}

impl Dashboard for Explore {
    fn name(&self) -> &'static str {
        "explore"
    }

    fn title(&self) -> &'static str {
        "World glaciers explorer"
    }

    fn layout(&self) -> &Component {
        &self.layout
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn update(&self, output: &Target, ctx: &CallbackContext) -> Result<Output, DashboardError> {
        let selection = self.selection(ctx)?;
        let output = match output.id.as_str() {
            TEXT => Output::Text(count_text(&selection)),
            MAIN => Output::Figure(main_figure(&selection)),
            LAT => Output::Figure(lat_figure(&selection)),
            PRECIP => Output::Figure(self.histogram_figure(&selection, &PRECIP_STYLE)),
            TEMP => Output::Figure(self.histogram_figure(&selection, &TEMP_STYLE)),
            _ => {
                return Err(DashboardError::UnknownOutput {
                    output: output.to_string(),
                })
            }
        };
        Ok(output)
    }

    fn placeholder(&self, output: &Target) -> Output {
        if output.id == TEXT {
            Output::Text("No data available".to_string())
        } else {
            Output::Figure(Figure::no_data(base_layout()))
        }
    }
}

/// Status text counting the glaciers behind the selected records.
pub fn count_text(selection: &[&GlacierRecord]) -> String {
    filters::count_text(selection.iter().map(|record| record.n_glaciers).sum())
}

fn base_layout() -> Layout {
    Layout {
        autosize: Some(true),
        height: Some(400),
        title: Some(String::new()),
        dragmode: Some("select".to_string()),
        ..Default::default()
    }
}

fn labels(selection: &[&GlacierRecord]) -> Vec<String> {
    selection.iter().map(|record| record.label.clone()).collect()
}

/// World map of the selection, coloured by area.
pub fn main_figure(selection: &[&GlacierRecord]) -> Figure {
    let marker = Marker {
        size: Some(MarkerSize::Fixed(4.0)),
        opacity: Some(0.8),
        ..Marker::viridis(
            selection.iter().map(|record| record.area_km2).collect(),
            0.0,
            3200.0,
            "Area (km<sup>2</sup>)",
        )
    };
    let trace = Trace::Scattergeo(MapTrace {
        lon: selection.iter().map(|record| record.lon).collect(),
        lat: selection.iter().map(|record| record.lat).collect(),
        text: Some(labels(selection)),
        name: None,
        mode: Some("markers".to_string()),
        marker,
    });
    let layout = Layout {
        geo: Some(Geo::world()),
        ..base_layout()
    };
    Figure::new(vec![trace], layout)
}

/// Mean elevation against latitude.
pub fn lat_figure(selection: &[&GlacierRecord]) -> Figure {
    let trace = Trace::Scatter(ScatterTrace {
        x: selection.iter().map(|record| record.mean_elev).collect(),
        y: selection.iter().map(|record| record.lat).collect(),
        mode: Some("markers".to_string()),
        text: Some(labels(selection)),
        hoverinfo: Some("skip".to_string()),
        marker: Marker::plain(4.0, 1.0, LAT_COLOR),
        ..Default::default()
    });
    let layout = Layout {
        showlegend: Some(false),
        xaxis: Some(Axis::ranged(0.0, 6200.0, "Altitude (m)")),
        yaxis: Some(Axis::ranged(-90.0, 90.0, "Latitude")),
        ..base_layout()
    };
    Figure::new(vec![trace], layout)
}

fn page() -> Component {
    let column = |id: &str| {
        Component::div(vec![Component::graph(id)])
            .class_name("four columns")
            .style(json!({"margin-top": "0"}))
    };
    Component::div(vec![
        super::header(
            "World glaciers explorer",
            vec![
                Component::p("Box-select on each plot, double click on the same plot to reset.")
                    .class_name("eight columns"),
                Component::h6("").id(TEXT),
            ],
        ),
        Component::div(vec![
            Component::div(vec![Component::p("")])
                .class_name("four columns")
                .style(json!({"float": "left", "position": "relative", "margin-top": "0"})),
            Component::div(vec![Component::graph(MAIN)])
                .class_name("eight columns")
                .style(json!({"margin-top": "0"})),
        ])
        .class_name("row"),
        Component::div(vec![column(LAT), column(TEMP), column(PRECIP)]).class_name("row"),
    ])
    .class_name("ten columns offset-by-one")
    .style(json!({"width": "1400px"}))
}
