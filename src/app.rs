//! Dashboard web server application.

use crate::app_state::{AppState, SharedAppState};
use crate::callback;
use crate::cli::CommandLineArgs;
use crate::error::DashboardError;
use crate::metrics;
use crate::models::{UpdateRequest, UpdateResponse};
use crate::validated_json::ValidatedJson;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::Layer;
use tower::ServiceBuilder;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// Dashboard service type
pub type Service = NormalizePath<Router>;

/// One-time initialisation before serving.
///
/// Builds the global Rayon thread pool used for callbacks when `--use-rayon` is set.
pub fn init(args: &CommandLineArgs) -> Result<(), DashboardError> {
    if args.use_rayon {
        let threads = args
            .thread_limit
            .unwrap_or_else(|| num_cpus::get().saturating_sub(1).max(1));
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        tracing::info!("Callbacks run on a Rayon pool of {} threads", threads);
    }
    Ok(())
}

/// Returns a [axum::Router] serving `state`.
pub fn router(state: SharedAppState) -> Router {
    fn apps() -> Router<SharedAppState> {
        Router::new()
            .route("/:app", get(dashboard_page))
            .route("/:app/_dash-layout", get(dashboard_layout))
            .route("/:app/_dash-dependencies", get(dashboard_dependencies))
            .route("/:app/_dash-update-component", post(update_component))
    }

    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics::metrics_handler))
        .nest("/apps", apps())
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .on_request(metrics::request_counter)
                    .on_response(metrics::record_response_metrics),
            ),
        )
        .with_state(state)
}

/// Returns a [Service] serving `state`, with trailing slashes trimmed from request paths.
pub fn service_with_state(state: SharedAppState) -> Service {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Load the configured dashboards and return a [Service] serving them.
pub fn service(args: &CommandLineArgs) -> Result<Service, DashboardError> {
    let state = AppState::new(args)?;
    Ok(service_with_state(Arc::new(state)))
}

/// Links to every mounted dashboard.
async fn index(State(state): State<SharedAppState>) -> Html<String> {
    let links: Vec<String> = state
        .dashboards
        .iter()
        .map(|dashboard| {
            format!(
                "<li><a href=\"/apps/{}\">{}</a></li>",
                dashboard.name(),
                dashboard.title()
            )
        })
        .collect();
    Html(format!(
        "<!DOCTYPE html>\n<html><head><title>Glacier dashboards</title></head>\
         <body><ul>{}</ul></body></html>\n",
        links.join("")
    ))
}

/// Page shell for one dashboard. The browser side renderer fetches the layout and dependencies
/// relative to `requests_pathname_prefix`.
async fn dashboard_page(
    State(state): State<SharedAppState>,
    Path(app): Path<String>,
) -> Result<Html<String>, DashboardError> {
    let dashboard = state.dashboard(&app)?;
    let config = serde_json::json!({
        "url_base_pathname": null,
        "requests_pathname_prefix": format!("/apps/{}/", dashboard.name()),
    });
    Ok(Html(format!(
        "<!DOCTYPE html>\n<html><head><title>{}</title></head><body>\
         <div id=\"react-entry-point\"></div>\
         <script id=\"_dash-config\" type=\"application/json\">{}</script>\
         </body></html>\n",
        dashboard.title(),
        config
    )))
}

async fn dashboard_layout(
    State(state): State<SharedAppState>,
    Path(app): Path<String>,
) -> Result<Response, DashboardError> {
    let dashboard = state.dashboard(&app)?;
    Ok(Json(dashboard.layout()).into_response())
}

async fn dashboard_dependencies(
    State(state): State<SharedAppState>,
    Path(app): Path<String>,
) -> Result<Response, DashboardError> {
    let dashboard = state.dashboard(&app)?;
    Ok(Json(dashboard.dependencies()).into_response())
}

/// Recompute one output.
///
/// The callback runs on the Rayon pool when `--use-rayon` is set, otherwise inline.
#[tracing::instrument(level = "DEBUG", skip(state))]
async fn update_component(
    State(state): State<SharedAppState>,
    Path(app): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRequest>,
) -> Result<Json<UpdateResponse>, DashboardError> {
    let dashboard = state.dashboard(&app)?.clone();
    let response = if state.args.use_rayon {
        tokio_rayon::spawn(move || callback::dispatch(dashboard.as_ref(), &request)).await?
    } else {
        callback::dispatch(dashboard.as_ref(), &request)?
    };
    Ok(Json(response))
}
