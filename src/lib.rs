//! This crate serves interactive dashboards over glacier data. Each dashboard is a tree of
//! components rendered in the browser by a Dash-compatible front end, plus a set of callbacks that
//! recompute a figure or a piece of text whenever an input component changes.
//!
//! Three dashboards are provided:
//!
//! * `explore`: a world glacier inventory with linked map, latitude/altitude scatter and
//!   precipitation and temperature histograms. Selecting points or ranges in any graph filters
//!   the others.
//! * `scenarios`: glaciers of a region under a set of climate scenario runs, with an area filter
//!   and per-glacier time series of volume, area or length.
//! * `geometry`: a glacier's flowline thickness along a time slider.
//!
//! The server is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team, on top of the [hyper] HTTP library.
//! * [Serde](serde) performs (de)serialisation of JSON layouts, figures and callback payloads.
//! * [csv] reads the glacier inventory, scenario runs and flowline data.
//! * [ndarray] and [ndarray_stats] provide the arrays and histograms behind the figures.
//! * [Rayon](rayon) optionally runs callbacks on a dedicated thread pool.

pub mod app;
pub mod app_state;
pub mod callback;
pub mod cli;
pub mod dashboards;
pub mod error;
pub mod figure;
pub mod filters;
pub mod flowlines;
pub mod histogram;
pub mod inventory;
pub mod layout;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod scenarios;
pub mod server;
#[cfg(test)]
pub mod test_utils;
pub mod timeseries;
pub mod tracing;
pub mod validated_json;
