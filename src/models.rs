//! Request and response types of the update protocol, and the chart event payloads carried in
//! control values.

use crate::callback::{Output, Target};
use crate::figure::{Center, MapView};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

/// The current value of one control property.
#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct InputValue {
    /// Component id
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,
    /// Component property
    #[validate(length(min = 1, message = "property must not be empty"))]
    pub property: String,
    /// Property value. Absent and `null` both mean "no value".
    #[serde(default)]
    pub value: Value,
}

impl InputValue {
    /// Return a new InputValue.
    pub fn new(id: &str, property: &str, value: Value) -> Self {
        InputValue {
            id: id.to_string(),
            property: property.to_string(),
            value,
        }
    }
}

/// Request to recompute one output.
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequest {
    /// Output to recompute, as `"{id}.{property}"`
    #[validate(custom = "validate_output")]
    pub output: String,
    /// Values of the output's inputs
    #[serde(default)]
    #[validate]
    pub inputs: Vec<InputValue>,
    /// Values of the output's state
    #[serde(default)]
    #[validate]
    pub state: Vec<InputValue>,
}

/// Validate an output name
fn validate_output(output: &str) -> Result<(), ValidationError> {
    if output.parse::<Target>().is_err() {
        let mut error = ValidationError::new("output must be of the form <id>.<property>");
        error.add_param("output".into(), &output);
        return Err(error);
    }
    Ok(())
}

/// Response carrying the new value of an output.
///
/// Serialises as `{"response": {"<id>": {"<property>": <value>}}}`.
#[derive(Debug, PartialEq, Serialize)]
pub struct UpdateResponse {
    pub response: HashMap<String, HashMap<String, Output>>,
}

impl UpdateResponse {
    /// Return a new UpdateResponse.
    pub fn new(target: &Target, output: Output) -> Self {
        let properties = HashMap::from([(target.property.clone(), output)]);
        UpdateResponse {
            response: HashMap::from([(target.id.clone(), properties)]),
        }
    }
}

/// A point of a chart event.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Point {
    /// Hover text of the point, which is the record label
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Extent of a box selection.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SelectionRange {
    #[serde(default)]
    pub x: Option<[f64; 2]>,
    #[serde(default)]
    pub y: Option<[f64; 2]>,
}

/// Value of a chart's `selectedData` property.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SelectedData {
    #[serde(default)]
    pub points: Vec<Point>,
    /// Box extent. Absent for lasso selections.
    #[serde(default)]
    pub range: Option<SelectionRange>,
}

impl SelectedData {
    /// Returns the labels of the selected points.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().filter_map(|point| point.text.as_deref())
    }

    /// Returns the x extent of a box selection as `(min, max)`.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let [a, b] = self.range.as_ref()?.x?;
        Some((a.min(b), a.max(b)))
    }
}

/// Value of a chart's `hoverData` property.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct HoverData {
    #[serde(default)]
    pub points: Vec<Point>,
}

impl HoverData {
    /// Returns the label of the hovered point. No points means no hover target.
    pub fn label(&self) -> Option<&str> {
        self.points.first().and_then(|point| point.text.as_deref())
    }
}

/// Map view part of a chart's `relayoutData` property.
///
/// Zooming and panning reports either a nested `mapbox` object or flat `mapbox.center` and
/// `mapbox.zoom` keys. Anything else is ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RelayoutData {
    #[serde(default)]
    mapbox: Option<MapboxRelayout>,
    #[serde(rename = "mapbox.center", default)]
    center: Option<Center>,
    #[serde(rename = "mapbox.zoom", default)]
    zoom: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
struct MapboxRelayout {
    #[serde(default)]
    center: Option<Center>,
    #[serde(default)]
    zoom: Option<f64>,
}

impl RelayoutData {
    /// Returns the map view requested by the user, falling back to `default` per field.
    pub fn map_view(&self, default: MapView) -> MapView {
        let nested = self.mapbox.as_ref();
        let center = self
            .center
            .or_else(|| nested.and_then(|mapbox| mapbox.center))
            .unwrap_or(default.center);
        let zoom = self
            .zoom
            .or_else(|| nested.and_then(|mapbox| mapbox.zoom))
            .unwrap_or(default.zoom);
        MapView { center, zoom }
    }
}
