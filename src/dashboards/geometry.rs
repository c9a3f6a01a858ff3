//! Glacier geometry over simulation time.

use crate::callback::{CallbackContext, Dashboard, Dependency, Output, Target};
use crate::error::DashboardError;
use crate::figure::{Center, Figure, MapTrace, MapView, Marker, MarkerSize, Trace};
use crate::flowlines::Flowlines;
use crate::layout::Component;
use crate::models::RelayoutData;

use serde_json::json;
use std::path::Path;

const TIME_SLIDER: &str = "time_slider";
const MAIN: &str = "main_graph";

const DEFAULT_VIEW: MapView = MapView {
    center: Center {
        lon: 10.87,
        lat: 46.85,
    },
    zoom: 10.0,
};

/// The geometry dashboard.
pub struct Geometry {
    flowlines: Flowlines,
    mapbox_token: Option<String>,
    layout: Component,
    dependencies: Vec<Dependency>,
}

impl Geometry {
    /// Load `flowlines.csv` from `dir`.
    pub fn load(dir: &Path, mapbox_token: Option<&str>) -> Result<Self, DashboardError> {
        let flowlines = Flowlines::load(&dir.join("flowlines.csv"))?;
        Ok(Self::new(flowlines, mapbox_token))
    }

    pub fn new(flowlines: Flowlines, mapbox_token: Option<&str>) -> Self {
        let dependencies = vec![Dependency::new(
            Target::new(MAIN, "figure"),
            vec![Target::new(TIME_SLIDER, "value")],
        )
        .with_state(vec![Target::new(MAIN, "relayoutData")])];
        Geometry {
            flowlines,
            mapbox_token: mapbox_token.map(str::to_string),
            layout: page(),
            dependencies,
        }
    }

    fn main_figure(&self, ctx: &CallbackContext) -> Result<Figure, DashboardError> {
        let time = ctx.get::<f64>(TIME_SLIDER, "value")?.unwrap_or_default();
        let view = ctx
            .get::<RelayoutData>(MAIN, "relayoutData")?
            .unwrap_or_default()
            .map_view(DEFAULT_VIEW);
        let (year, thickness) = self.flowlines.thickness_at(time);
        tracing::debug!("time {} shows year {}", time, year);

        let sizes = thickness.mapv(|t| if t == 0.0 { 0.0 } else { 10.0 }).to_vec();
        let marker = Marker {
            size: Some(MarkerSize::PerPoint(sizes)),
            opacity: Some(0.8),
            ..Marker::viridis(thickness.to_vec(), 0.0, 200.0, "Thickness (m)")
        };
        let trace = Trace::Scattermapbox(MapTrace {
            lon: self.flowlines.lon().to_vec(),
            lat: self.flowlines.lat().to_vec(),
            text: None,
            name: Some("glacier geom".to_string()),
            mode: None,
            marker,
        });
        let layout = super::map_layout(700, view, self.mapbox_token.as_deref());
        Ok(Figure::new(vec![trace], layout))
    }
}

impl Dashboard for Geometry {
    fn name(&self) -> &'static str {
        "geometry"
    }

    fn title(&self) -> &'static str {
        "OGGM Glacier geometry demo"
    }

    fn layout(&self) -> &Component {
        &self.layout
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn update(&self, output: &Target, ctx: &CallbackContext) -> Result<Output, DashboardError> {
        match output.id.as_str() {
            MAIN => Ok(Output::Figure(self.main_figure(ctx)?)),
            _ => Err(DashboardError::UnknownOutput {
                output: output.to_string(),
            }),
        }
    }

    fn placeholder(&self, _output: &Target) -> Output {
        Output::Figure(Figure::no_data(super::map_layout(
            700,
            DEFAULT_VIEW,
            self.mapbox_token.as_deref(),
        )))
    }
}

fn page() -> Component {
    Component::div(vec![
        super::header("OGGM Glacier geometry demo", vec![]),
        Component::div(vec![
            Component::p("Time:"),
            Component::slider(TIME_SLIDER, 0, 100, 0, 10).prop("step", json!(1)),
            Component::div(vec![]).id("slider-output-container"),
        ])
        .style(json!({"margin-top": "20"})),
        Component::div(vec![super::graph_column(MAIN, "ten columns")]).class_name("row"),
    ])
    .class_name("ten columns offset-by-one")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::dispatch;
    use crate::models::{InputValue, UpdateRequest};
    use crate::test_utils;

    use serde_json::Value;

    fn geometry() -> Geometry {
        let path = test_utils::write_temp_file("flowlines.csv", test_utils::FLOWLINES_CSV);
        Geometry::new(Flowlines::load(&path).unwrap(), Some("token"))
    }

    fn figure(inputs: Vec<InputValue>, state: Vec<InputValue>) -> Value {
        let request = UpdateRequest {
            output: "main_graph.figure".to_string(),
            inputs,
            state,
        };
        let response = dispatch(&geometry(), &request).unwrap();
        serde_json::to_value(response).unwrap()["response"][MAIN]["figure"].clone()
    }

    fn time(value: Value) -> Vec<InputValue> {
        vec![InputValue::new(TIME_SLIDER, "value", value)]
    }

    #[test]
    fn initial_year() {
        let value = figure(time(json!(0)), vec![]);
        let trace = &value["data"][0];
        assert_eq!(json!("scattermapbox"), trace["type"]);
        assert_eq!(json!("glacier geom"), trace["name"]);
        assert_eq!(json!([120.0, 60.0, 0.0]), trace["marker"]["color"]);
        assert_eq!(json!([10.0, 10.0, 0.0]), trace["marker"]["size"]);
        assert_eq!(json!("Thickness (m)"), trace["marker"]["colorbar"]["title"]);
        assert_eq!(json!(700), value["layout"]["height"]);
        assert_eq!(json!({"lon": 10.87, "lat": 46.85}), value["layout"]["mapbox"]["center"]);
        assert_eq!(json!("token"), value["layout"]["mapbox"]["accesstoken"]);
    }

    #[test]
    fn latest_year_not_after_slider() {
        let value = figure(time(json!(15)), vec![]);
        assert_eq!(json!([80.0, 0.0, 0.0]), value["data"][0]["marker"]["color"]);
        assert_eq!(json!([10.0, 0.0, 0.0]), value["data"][0]["marker"]["size"]);
        let value = figure(time(json!(100)), vec![]);
        assert_eq!(json!([0.0, 0.0, 0.0]), value["data"][0]["marker"]["size"]);
    }

    #[test]
    fn missing_slider_is_start() {
        let value = figure(vec![], vec![]);
        assert_eq!(json!([120.0, 60.0, 0.0]), value["data"][0]["marker"]["color"]);
    }

    #[test]
    fn view_from_relayout() {
        let state = vec![InputValue::new(
            MAIN,
            "relayoutData",
            json!({"mapbox": {"center": {"lon": 10.9, "lat": 46.9}, "zoom": 12}}),
        )];
        let value = figure(time(json!(0)), state);
        assert_eq!(json!({"lon": 10.9, "lat": 46.9}), value["layout"]["mapbox"]["center"]);
        assert_eq!(json!(12.0), value["layout"]["mapbox"]["zoom"]);
    }

    #[test]
    fn views_do_not_leak_between_requests() {
        let geometry = geometry();
        let request = |state: Vec<InputValue>| UpdateRequest {
            output: "main_graph.figure".to_string(),
            inputs: time(json!(0)),
            state,
        };
        dispatch(
            &geometry,
            &request(vec![InputValue::new(
                MAIN,
                "relayoutData",
                json!({"mapbox.center": {"lon": 0.0, "lat": 0.0}}),
            )]),
        )
        .unwrap();
        let response = dispatch(&geometry, &request(vec![])).unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(
            json!({"lon": 10.87, "lat": 46.85}),
            value["response"][MAIN]["figure"]["layout"]["mapbox"]["center"]
        );
    }

    #[test]
    fn invalid_time_renders_placeholder() {
        let value = figure(time(json!("soon")), vec![]);
        assert_eq!(json!([]), value["data"]);
        assert_eq!(
            json!("No data available"),
            value["layout"]["annotations"][0]["text"]
        );
    }

    #[test]
    fn slider_layout() {
        let layout = serde_json::to_value(geometry().layout()).unwrap().to_string();
        assert!(layout.contains(r#""id":"time_slider""#), "{layout}");
        assert!(layout.contains(r#""step":1"#), "{layout}");
    }
}
