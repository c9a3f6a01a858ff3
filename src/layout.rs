//! UI layout tree.
//!
//! Each dashboard describes its page as a tree of [Component]s, built once at startup and served
//! unchanged. Components serialise as `{"type", "namespace", "props"}` objects.

use serde::Serialize;
use serde_json::{json, Map, Value};

const HTML: &str = "dash_html_components";
const CORE: &str = "dash_core_components";

/// A node of the layout tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Component {
    #[serde(rename = "type")]
    kind: &'static str,
    namespace: &'static str,
    props: Props,
}

/// Properties common to all components, plus control specific extras.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
struct Props {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Children>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Content of a container component.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Children {
    Text(String),
    Components(Vec<Component>),
}

impl Component {
    fn new(namespace: &'static str, kind: &'static str) -> Self {
        Component {
            kind,
            namespace,
            props: Props::default(),
        }
    }

    fn html(kind: &'static str, children: Children) -> Self {
        let mut component = Self::new(HTML, kind);
        component.props.children = Some(children);
        component
    }

    /// A container of other components.
    pub fn div(children: Vec<Component>) -> Self {
        Self::html("Div", Children::Components(children))
    }

    /// Level 1 heading.
    pub fn h1(text: &str) -> Self {
        Self::html("H1", Children::Text(text.to_string()))
    }

    /// Level 5 heading.
    pub fn h5(text: &str) -> Self {
        Self::html("H5", Children::Text(text.to_string()))
    }

    /// Level 6 heading.
    pub fn h6(text: &str) -> Self {
        Self::html("H6", Children::Text(text.to_string()))
    }

    /// Paragraph.
    pub fn p(text: &str) -> Self {
        Self::html("P", Children::Text(text.to_string()))
    }

    pub fn img(src: &str) -> Self {
        Self::new(HTML, "Img").prop("src", json!(src))
    }

    /// A chart placeholder. The figure is filled in by callbacks.
    pub fn graph(id: &str) -> Self {
        Self::new(CORE, "Graph").id(id)
    }

    /// Two handled slider selecting a range.
    pub fn range_slider(id: &str, min: f64, max: f64, value: [f64; 2]) -> Self {
        Self::new(CORE, "RangeSlider")
            .id(id)
            .prop("min", json!(min))
            .prop("max", json!(max))
            .prop("value", json!(value))
    }

    /// Single handled slider with a label every `mark_every` steps.
    pub fn slider(id: &str, min: i64, max: i64, value: i64, mark_every: usize) -> Self {
        let marks: Map<String, Value> = (min..=max)
            .step_by(mark_every.max(1))
            .map(|mark| (mark.to_string(), json!(mark.to_string())))
            .collect();
        Self::new(CORE, "Slider")
            .id(id)
            .prop("min", json!(min))
            .prop("max", json!(max))
            .prop("value", json!(value))
            .prop("marks", Value::Object(marks))
    }

    /// Selector over `(value, label)` options.
    pub fn dropdown(id: &str, options: &[(String, String)], value: Value, multi: bool) -> Self {
        let options: Vec<Value> = options
            .iter()
            .map(|(value, label)| json!({"label": label, "value": value}))
            .collect();
        Self::new(CORE, "Dropdown")
            .id(id)
            .prop("options", Value::Array(options))
            .prop("value", value)
            .prop("multi", json!(multi))
    }

    pub fn id(mut self, id: &str) -> Self {
        self.props.id = Some(id.to_string());
        self
    }

    pub fn class_name(mut self, class_name: &str) -> Self {
        self.props.class_name = Some(class_name.to_string());
        self
    }

    pub fn style(mut self, style: Value) -> Self {
        self.props.style = Some(style);
        self
    }

    /// Set a control specific property.
    pub fn prop(mut self, key: &str, value: Value) -> Self {
        self.props.extra.insert(key.to_string(), value);
        self
    }

    /// Returns the ids of this component and all of its descendants, depth first.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        if let Some(id) = &self.props.id {
            ids.push(id);
        }
        if let Some(Children::Components(children)) = &self.props.children {
            for child in children {
                child.collect_ids(ids);
            }
        }
    }
}
