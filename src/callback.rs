//! Reactive wiring.
//!
//! Every dashboard declares, once at startup, a [Dependency] per output: the ordered list of
//! control properties whose change recomputes the output, plus state properties that are read but
//! do not trigger recomputation. [dispatch] runs the callback behind one output for one request.

use crate::error::DashboardError;
use crate::figure::{Figure, Layout};
use crate::layout::Component;
use crate::metrics::{CALLBACK_INVOCATIONS, CALLBACK_PLACEHOLDERS};
use crate::models::{InputValue, UpdateRequest, UpdateResponse};

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A component property, written `"{id}.{property}"`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Target {
    pub id: String,
    pub property: String,
}

impl Target {
    /// Return a new Target.
    pub fn new(id: &str, property: &str) -> Self {
        Target {
            id: id.to_string(),
            property: property.to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.property)
    }
}

impl FromStr for Target {
    type Err = DashboardError;

    fn from_str(output: &str) -> Result<Self, Self::Err> {
        match output.rsplit_once('.') {
            Some((id, property)) if !id.is_empty() && !property.is_empty() => {
                Ok(Target::new(id, property))
            }
            _ => Err(DashboardError::UnknownOutput {
                output: output.to_string(),
            }),
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// The controls an output is computed from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dependency {
    #[serde(serialize_with = "serialize_display")]
    pub output: Target,
    /// Changes to these trigger recomputation
    pub inputs: Vec<Target>,
    /// Read, but never trigger recomputation
    pub state: Vec<Target>,
}

impl Dependency {
    /// Return a new Dependency with no state.
    pub fn new(output: Target, inputs: Vec<Target>) -> Self {
        Dependency {
            output,
            inputs,
            state: vec![],
        }
    }

    /// Add state targets.
    pub fn with_state(mut self, state: Vec<Target>) -> Self {
        self.state = state;
        self
    }

    fn declares(&self, target: &Target) -> bool {
        self.inputs.contains(target) || self.state.contains(target)
    }
}

/// Control values visible to one callback invocation.
///
/// Only values of targets declared in the output's [Dependency] are retained. Absent and `null`
/// values both read as `None`.
#[derive(Debug, Default)]
pub struct CallbackContext {
    values: HashMap<Target, Value>,
}

impl CallbackContext {
    /// Build the context for `dependency` from request values.
    pub fn new<'a, I>(dependency: &Dependency, values: I) -> Self
    where
        I: IntoIterator<Item = &'a InputValue>,
    {
        let values = values
            .into_iter()
            .map(|value| (Target::new(&value.id, &value.property), &value.value))
            .filter(|(target, value)| dependency.declares(target) && !value.is_null())
            .map(|(target, value)| (target, value.clone()))
            .collect();
        CallbackContext { values }
    }

    /// Returns the raw value of a control property, if set.
    pub fn value(&self, id: &str, property: &str) -> Option<&Value> {
        self.values.get(&Target::new(id, property))
    }

    /// Returns the typed value of a control property, if set.
    pub fn get<T: DeserializeOwned>(
        &self,
        id: &str,
        property: &str,
    ) -> Result<Option<T>, DashboardError> {
        self.value(id, property)
            .map(|value| {
                T::deserialize(value)
                    .map_err(|err| DashboardError::invalid_input(Target::new(id, property), err))
            })
            .transpose()
    }
}

/// New value of an output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Figure(Figure),
    Text(String),
}

/// A dashboard: a static layout, its wiring and the callbacks behind each output.
///
/// Callbacks are pure functions of the request's control values and the dashboard's immutable
/// data.
pub trait Dashboard: Send + Sync {
    /// URL path segment.
    fn name(&self) -> &'static str;

    /// Page title.
    fn title(&self) -> &'static str;

    /// Layout tree.
    fn layout(&self) -> &Component;

    /// One dependency per output.
    fn dependencies(&self) -> &[Dependency];

    /// Compute the new value of `output`.
    fn update(&self, output: &Target, ctx: &CallbackContext) -> Result<Output, DashboardError>;

    /// Value shown in place of `output` when its callback fails.
    fn placeholder(&self, output: &Target) -> Output {
        if output.property == "figure" {
            Output::Figure(Figure::no_data(Layout::default()))
        } else {
            Output::Text("No data available".to_string())
        }
    }
}

/// Dashboard shared between request handlers.
pub type SharedDashboard = Arc<dyn Dashboard>;

/// Run the callback behind the requested output.
///
/// Requests for undeclared outputs are rejected. Callback errors are never returned: the output
/// degrades to the dashboard's placeholder.
pub fn dispatch(
    dashboard: &dyn Dashboard,
    request: &UpdateRequest,
) -> Result<UpdateResponse, DashboardError> {
    let output: Target = request.output.parse()?;
    let dependency = dashboard
        .dependencies()
        .iter()
        .find(|dependency| dependency.output == output)
        .ok_or_else(|| DashboardError::UnknownOutput {
            output: request.output.clone(),
        })?;
    let ctx = CallbackContext::new(dependency, request.inputs.iter().chain(&request.state));

    CALLBACK_INVOCATIONS
        .with_label_values(&[dashboard.name(), request.output.as_str()])
        .inc();
    let value = match dashboard.update(&output, &ctx) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                "{} {} rendered placeholder: {}",
                dashboard.name(),
                output,
                err
            );
            CALLBACK_PLACEHOLDERS
                .with_label_values(&[dashboard.name(), request.output.as_str()])
                .inc();
            dashboard.placeholder(&output)
        }
    };
    Ok(UpdateResponse::new(&output, value))
}
