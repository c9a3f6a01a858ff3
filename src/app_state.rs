use crate::callback::SharedDashboard;
use crate::cli::CommandLineArgs;
use crate::dashboards;
use crate::error::DashboardError;

use expanduser::expanduser;
use std::sync::Arc;

/// Shared application state passed to each request handler.
pub struct AppState {
    /// Command line arguments.
    pub args: CommandLineArgs,

    /// Mounted dashboards, in mount order.
    pub dashboards: Vec<SharedDashboard>,
}

impl AppState {
    /// Load every requested dashboard and return an [AppState].
    ///
    /// Fails if any dashboard's data cannot be loaded.
    pub fn new(args: &CommandLineArgs) -> Result<Self, DashboardError> {
        let data_dir = expanduser(&args.data_dir).map_err(|source| DashboardError::Io {
            path: args.data_dir.clone().into(),
            source,
        })?;
        let dashboards = args
            .apps
            .iter()
            .map(|app| dashboards::load(*app, &data_dir, args.mapbox_token.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_dashboards(args, dashboards))
    }

    /// Return an [AppState] serving already loaded dashboards.
    pub fn with_dashboards(args: &CommandLineArgs, dashboards: Vec<SharedDashboard>) -> Self {
        Self {
            args: args.clone(),
            dashboards,
        }
    }

    /// Look up a mounted dashboard by name.
    pub fn dashboard(&self, name: &str) -> Result<&SharedDashboard, DashboardError> {
        self.dashboards
            .iter()
            .find(|dashboard| dashboard.name() == name)
            .ok_or_else(|| DashboardError::UnknownDashboard {
                name: name.to_string(),
            })
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
