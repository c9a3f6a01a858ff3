//! Chart payloads.
//!
//! A [Figure] is a trace list plus a layout, serialised in the JSON shape consumed by Plotly.
//! Layouts are always built fresh from immutable defaults plus request specific overrides.

use serde::{Deserialize, Serialize};

/// A complete chart description.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
    /// Traces to plot
    pub data: Vec<Trace>,
    /// Layout and style
    pub layout: Layout,
}

impl Figure {
    /// Return a new Figure.
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Figure { data, layout }
    }

    /// An empty figure with a centred "No data available" annotation.
    pub fn no_data(layout: Layout) -> Self {
        Self::annotated(layout, "No data available")
    }

    /// An empty figure with a centred annotation.
    pub fn annotated(mut layout: Layout, text: &str) -> Self {
        layout.annotations = Some(vec![Annotation::centred(text)]);
        Figure { data: vec![], layout }
    }
}

/// A single trace.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Markers on a Mapbox map
    Scattermapbox(MapTrace),
    /// Markers on a geographic projection
    Scattergeo(MapTrace),
    /// Cartesian scatter or line
    Scatter(ScatterTrace),
    /// Bar chart
    Bar(BarTrace),
}

/// A trace of points at geographic coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MapTrace {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub marker: Marker,
}

/// A cartesian trace.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    pub marker: Marker,
}

/// A bar trace.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    pub marker: Marker,
}

/// Marker size, either shared or per point.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerSize {
    Fixed(f64),
    PerPoint(Vec<f64>),
}

/// Marker colour, either a named colour or values mapped through a colour scale.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Fixed(String),
    Values(Vec<f64>),
}

/// Marker style.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<MarkerSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Marker {
    /// A marker of fixed size, opacity and colour.
    pub fn plain(size: f64, opacity: f64, color: &str) -> Self {
        Marker {
            size: Some(MarkerSize::Fixed(size)),
            opacity: Some(opacity),
            color: Some(MarkerColor::Fixed(color.to_string())),
            ..Default::default()
        }
    }

    /// Only a fill colour.
    pub fn colored(color: &str) -> Self {
        Marker {
            color: Some(MarkerColor::Fixed(color.to_string())),
            ..Default::default()
        }
    }

    /// Colour values mapped through the Viridis colour scale over `[cmin, cmax]`.
    pub fn viridis(values: Vec<f64>, cmin: f64, cmax: f64, title: &str) -> Self {
        Marker {
            color: Some(MarkerColor::Values(values)),
            colorscale: Some("Viridis".to_string()),
            cmin: Some(cmin),
            cmax: Some(cmax),
            colorbar: Some(ColorBar {
                title: title.to_string(),
            }),
            ..Default::default()
        }
    }
}

/// Colour bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: String,
}

/// Line style.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Line {
    pub shape: String,
    pub smoothing: f64,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Line {
    /// Smoothed thin spline.
    pub fn spline() -> Self {
        Line {
            shape: "spline".to_string(),
            smoothing: 2.0,
            width: 1.0,
            color: None,
        }
    }
}

/// Chart layout. Unset fields are left to the renderer's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

/// Plot margins in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Margin {
    pub l: i32,
    pub r: i32,
    pub b: i32,
    pub t: i32,
}

/// Legend placement.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Font.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

/// Cartesian axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Axis {
    /// An axis with a title and automatic range.
    pub fn titled(title: &str) -> Self {
        Axis {
            range: None,
            title: Some(title.to_string()),
        }
    }

    /// An axis with a title and a fixed range.
    pub fn ranged(min: f64, max: f64, title: &str) -> Self {
        Axis {
            range: Some([min, max]),
            title: Some(title.to_string()),
        }
    }
}

/// Map view centre.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Center {
    pub lon: f64,
    pub lat: f64,
}

/// Map view: centre and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    pub center: Center,
    pub zoom: f64,
}

/// Mapbox settings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mapbox {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
    pub style: String,
    pub center: Center,
    pub zoom: f64,
}

impl Mapbox {
    /// Satellite imagery at the given view.
    pub fn satellite(view: MapView, token: Option<&str>) -> Self {
        Mapbox {
            accesstoken: token.map(str::to_string),
            style: "satellite".to_string(),
            center: view.center,
            zoom: view.zoom,
        }
    }
}

/// Geographic projection settings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Geo {
    pub scope: String,
    pub projection: Projection,
    pub showland: bool,
    pub landcolor: String,
    pub subunitcolor: String,
    pub countrycolor: String,
    pub countrywidth: f64,
    pub subunitwidth: f64,
}

impl Geo {
    /// The whole world in a natural earth projection.
    pub fn world() -> Self {
        Geo {
            scope: "world".to_string(),
            projection: Projection {
                kind: "natural earth".to_string(),
            },
            showland: true,
            landcolor: "rgb(250, 250, 250)".to_string(),
            subunitcolor: "rgb(217, 217, 217)".to_string(),
            countrycolor: "rgb(217, 217, 217)".to_string(),
            countrywidth: 0.5,
            subunitwidth: 0.5,
        }
    }
}

/// Map projection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: String,
}

/// A text annotation positioned in paper coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub align: String,
    pub showarrow: bool,
    pub xref: String,
    pub yref: String,
}

impl Annotation {
    /// Text centred on the plot area.
    pub fn centred(text: &str) -> Self {
        Annotation {
            text: text.to_string(),
            x: 0.5,
            y: 0.5,
            align: "center".to_string(),
            showarrow: false,
            xref: "paper".to_string(),
            yref: "paper".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn no_data_figure() {
        let figure = Figure::no_data(Layout {
            height: Some(500),
            ..Default::default()
        });
        assert!(figure.data.is_empty());
        assert_eq!(
            json!({
                "data": [],
                "layout": {
                    "height": 500,
                    "annotations": [{
                        "text": "No data available",
                        "x": 0.5,
                        "y": 0.5,
                        "align": "center",
                        "showarrow": false,
                        "xref": "paper",
                        "yref": "paper",
                    }],
                },
            }),
            serde_json::to_value(&figure).unwrap()
        );
    }

    #[test]
    fn trace_tagged_with_type() {
        let trace = Trace::Bar(BarTrace {
            x: vec![0.5],
            y: vec![1.0],
            name: Some("All".to_string()),
            hoverinfo: Some("skip".to_string()),
            marker: Marker::colored("#85c1e9"),
        });
        assert_eq!(
            json!({
                "type": "bar",
                "x": [0.5],
                "y": [1.0],
                "name": "All",
                "hoverinfo": "skip",
                "marker": {"color": "#85c1e9"},
            }),
            serde_json::to_value(&trace).unwrap()
        );
    }

    #[test]
    fn nan_serialises_as_null() {
        let trace = Trace::Scatter(ScatterTrace {
            x: vec![2000.0, 2001.0],
            y: vec![1.0, f64::NAN],
            ..Default::default()
        });
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(json!([1.0, null]), value["y"]);
        assert_eq!(json!("scatter"), value["type"]);
    }

    #[test]
    fn per_point_marker() {
        let marker = Marker {
            size: Some(MarkerSize::PerPoint(vec![0.0, 10.0])),
            ..Marker::viridis(vec![0.0, 5.0], 0.0, 200.0, "Thickness (m)")
        };
        assert_eq!(
            json!({
                "size": [0.0, 10.0],
                "color": [0.0, 5.0],
                "colorscale": "Viridis",
                "cmin": 0.0,
                "cmax": 200.0,
                "colorbar": {"title": "Thickness (m)"},
            }),
            serde_json::to_value(&marker).unwrap()
        );
    }

    #[test]
    fn geo_projection_type() {
        let value = serde_json::to_value(Geo::world()).unwrap();
        assert_eq!(json!("natural earth"), value["projection"]["type"]);
    }
}
