//! Climate scenario explorer.
//!
//! A map of glaciers filtered by area, and the modelled evolution of the hovered glacier under
//! one or more temperature scenarios.

use crate::callback::{CallbackContext, Dashboard, Dependency, Output, Target};
use crate::error::DashboardError;
use crate::figure::{
    Axis, Center, Figure, Layout, Legend, Line, MapTrace, MapView, Marker, Margin, ScatterTrace,
    Trace,
};
use crate::filters::{self, Field, Filter};
use crate::inventory::{GlacierRecord, Inventory, LabelStyle};
use crate::layout::Component;
use crate::models::{HoverData, RelayoutData};
use crate::scenarios::{OneOrMany, Scenario, Scenarios};
use crate::timeseries::Quantity;

use serde_json::json;
use std::path::Path;

const TEXT: &str = "glaciers_text";
const AREA_SLIDER: &str = "area_slider";
const RUN_SELECTION: &str = "run_selection";
const PARAM_SELECTION: &str = "param_selection";
const MAIN: &str = "main_graph";
const INDIVIDUAL: &str = "individual_graph";

const DEFAULT_VIEW: MapView = MapView {
    center: Center {
        lon: 10.4,
        lat: 46.1,
    },
    zoom: 5.0,
};

/// The scenarios dashboard.
pub struct ScenarioExplorer {
    inventory: Inventory,
    scenarios: Scenarios,
    mapbox_token: Option<String>,
    layout: Component,
    dependencies: Vec<Dependency>,
}

impl ScenarioExplorer {
    /// Load `glacier_characteristics.csv` and every scenario file from `dir`.
    pub fn load(dir: &Path, mapbox_token: Option<&str>) -> Result<Self, DashboardError> {
        let inventory = Inventory::load(&dir.join("glacier_characteristics.csv"), LabelStyle::Named)?;
        let scenarios = Scenarios::discover(dir)?;
        Ok(Self::new(inventory, scenarios, mapbox_token))
    }

    /// Return a new ScenarioExplorer.
    pub fn new(inventory: Inventory, scenarios: Scenarios, mapbox_token: Option<&str>) -> Self {
        let area_slider = Target::new(AREA_SLIDER, "value");
        let dependencies = vec![
            Dependency::new(Target::new(TEXT, "children"), vec![area_slider.clone()]),
            Dependency::new(Target::new(MAIN, "figure"), vec![area_slider])
                .with_state(vec![Target::new(MAIN, "relayoutData")]),
            Dependency::new(
                Target::new(INDIVIDUAL, "figure"),
                vec![
                    Target::new(MAIN, "hoverData"),
                    Target::new(RUN_SELECTION, "value"),
                    Target::new(PARAM_SELECTION, "value"),
                ],
            ),
        ];
        let layout = page(&inventory, &scenarios);
        ScenarioExplorer {
            inventory,
            scenarios,
            mapbox_token: mapbox_token.map(str::to_string),
            layout,
            dependencies,
        }
    }

    /// Records within the area slider's range, which defaults to the full range.
    fn selection(&self, ctx: &CallbackContext) -> Result<Vec<&GlacierRecord>, DashboardError> {
        let [min, max] = ctx
            .get::<[f64; 2]>(AREA_SLIDER, "value")?
            .unwrap_or_else(|| self.inventory.area_range());
        let filters = [Filter::range(Field::Area, min, max)];
        Ok(filters::reduce(self.inventory.records(), &filters))
    }

    fn main_figure(&self, ctx: &CallbackContext) -> Result<Figure, DashboardError> {
        let selection = self.selection(ctx)?;
        let view = ctx
            .get::<RelayoutData>(MAIN, "relayoutData")?
            .unwrap_or_default()
            .map_view(DEFAULT_VIEW);
        let trace = Trace::Scattermapbox(MapTrace {
            lon: selection.iter().map(|record| record.lon).collect(),
            lat: selection.iter().map(|record| record.lat).collect(),
            text: Some(selection.iter().map(|record| record.label.clone()).collect()),
            name: None,
            mode: None,
            marker: Marker::plain(6.0, 1.0, "#FF0000"),
        });
        let layout = super::map_layout(500, view, self.mapbox_token.as_deref());
        Ok(Figure::new(vec![trace], layout))
    }

    fn individual_figure(&self, ctx: &CallbackContext) -> Result<Figure, DashboardError> {
        let hover = ctx.get::<HoverData>(MAIN, "hoverData")?;
        let quantity = match ctx.get::<String>(PARAM_SELECTION, "value")? {
            Some(key) => key.parse()?,
            None => Quantity::ALL[0],
        };
        let runs = ctx
            .get::<OneOrMany>(RUN_SELECTION, "value")?
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        let runs = runs
            .iter()
            .map(|key| self.scenarios.get(key))
            .collect::<Result<Vec<&Scenario>, _>>()?;
        let target = hover.as_ref().and_then(HoverData::label);
        Ok(individual_figure(
            self.inventory.select_one(target),
            &runs,
            quantity,
        ))
    }
}

impl Dashboard for ScenarioExplorer {
    fn name(&self) -> &'static str {
        "scenarios"
    }

    fn title(&self) -> &'static str {
        "OGGM Map demo"
    }

    fn layout(&self) -> &Component {
        &self.layout
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn update(&self, output: &Target, ctx: &CallbackContext) -> Result<Output, DashboardError> {
        match output.id.as_str() {
            TEXT => {
                let count = self.selection(ctx)?.len() as u64;
                Ok(Output::Text(filters::count_text(count)))
            }
            MAIN => Ok(Output::Figure(self.main_figure(ctx)?)),
            INDIVIDUAL => Ok(Output::Figure(self.individual_figure(ctx)?)),
            _ => Err(DashboardError::UnknownOutput {
                output: output.to_string(),
            }),
        }
    }

    fn placeholder(&self, output: &Target) -> Output {
        match output.id.as_str() {
            TEXT => Output::Text("No data available".to_string()),
            MAIN => Output::Figure(Figure::no_data(super::map_layout(
                500,
                DEFAULT_VIEW,
                self.mapbox_token.as_deref(),
            ))),
            _ => Output::Figure(Figure::no_data(individual_layout(None, None))),
        }
    }
}

fn individual_layout(title: Option<&str>, quantity: Option<Quantity>) -> Layout {
    Layout {
        title: title.map(str::to_string),
        xaxis: Some(Axis::titled("Time (years)")),
        yaxis: quantity.map(|quantity| Axis::titled(&quantity.axis_title())),
        showlegend: Some(true),
        legend: Some(Legend {
            x: Some(0.0),
            y: Some(1.0),
            ..Default::default()
        }),
        margin: Some(Margin {
            l: 40,
            r: 0,
            b: 30,
            t: 40,
        }),
        ..Default::default()
    }
}

/// Evolution of `quantity` for one glacier, one trace per scenario.
///
/// No glacier renders a "No data available" annotation. A glacier absent from every scenario
/// renders an empty chart with the usual title and axes.
pub fn individual_figure(
    record: Option<&GlacierRecord>,
    runs: &[&Scenario],
    quantity: Quantity,
) -> Figure {
    let Some(record) = record else {
        return Figure::no_data(individual_layout(None, Some(quantity)));
    };
    let data = runs
        .iter()
        .filter_map(|run| {
            let series = run.series.series(&record.id, quantity)?;
            Some(Trace::Scatter(ScatterTrace {
                x: series.time,
                y: series.values,
                mode: Some("lines+markers".to_string()),
                name: Some(run.label.clone()),
                line: Some(Line::spline()),
                marker: Marker {
                    symbol: Some("diamond-open".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            }))
        })
        .collect();
    Figure::new(data, individual_layout(Some(&record.id), Some(quantity)))
}

fn page(inventory: &Inventory, scenarios: &Scenarios) -> Component {
    let area_range = inventory.area_range();
    let run_options: Vec<(String, String)> = scenarios
        .iter()
        .map(|scenario| (scenario.key.clone(), scenario.label.clone()))
        .collect();
    let default_run = scenarios
        .first()
        .map(|scenario| json!(scenario.key))
        .unwrap_or_default();
    let param_options: Vec<(String, String)> = Quantity::ALL
        .iter()
        .map(|quantity| (quantity.to_string(), quantity.name().to_string()))
        .collect();
    let selector = |title: &str, dropdown: Component, columns: &str| {
        Component::div(vec![Component::h5(title), dropdown])
            .class_name(columns)
            .style(json!({"margin-top": "20"}))
    };

    Component::div(vec![
        super::header("OGGM Map demo", vec![]),
        Component::div(vec![Component::h5("").id(TEXT).class_name("two columns")])
            .class_name("row"),
        Component::div(vec![
            Component::p("Filter by area:"),
            Component::range_slider(AREA_SLIDER, area_range[0], area_range[1], area_range),
        ])
        .style(json!({"margin-top": "20"})),
        Component::div(vec![
            selector(
                "Select temperature",
                Component::dropdown(RUN_SELECTION, &run_options, default_run, true),
                "eight columns",
            ),
            selector(
                "Select plot",
                Component::dropdown(
                    PARAM_SELECTION,
                    &param_options,
                    json!(Quantity::ALL[0].to_string()),
                    false,
                ),
                "four columns",
            ),
        ])
        .class_name("row"),
        Component::div(vec![
            super::graph_column(MAIN, "four columns"),
            super::graph_column(INDIVIDUAL, "eight columns"),
        ])
        .class_name("row"),
    ])
    .class_name("ten columns offset-by-one")
}
