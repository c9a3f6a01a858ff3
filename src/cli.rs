//! Command Line Interface (CLI) arguments.

use clap::{Parser, ValueEnum};
use strum_macros::Display;

/// Dashboards that may be mounted.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum AppName {
    /// World glaciers explorer
    Explore,
    /// Climate scenario explorer
    Scenarios,
    /// Glacier geometry over time
    Geometry,
}

/// Glacierview command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "GLACIERVIEW_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 8050, env = "GLACIERVIEW_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "GLACIERVIEW_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/glacierview/certs/cert.pem",
        env = "GLACIERVIEW_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/glacierview/certs/key.pem",
        env = "GLACIERVIEW_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for requests to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "GLACIERVIEW_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Whether to enable sending traces to Jaeger.
    #[arg(long, default_value_t = false, env = "GLACIERVIEW_ENABLE_JAEGER")]
    pub enable_jaeger: bool,
    /// Whether to use Rayon for execution of callbacks.
    #[arg(long, default_value_t = false, env = "GLACIERVIEW_USE_RAYON")]
    pub use_rayon: bool,
    /// Maximum number of threads in the Rayon pool. Defaults to the number of CPUs minus one.
    #[arg(long, env = "GLACIERVIEW_THREAD_LIMIT")]
    pub thread_limit: Option<usize>,
    /// Enable debug logging when RUST_LOG is not set.
    #[arg(long, default_value_t = false, env = "GLACIERVIEW_DEBUG")]
    pub debug: bool,
    /// Directory holding one data directory per dashboard
    #[arg(long, default_value = "./data", env = "GLACIERVIEW_DATA_DIR")]
    pub data_dir: String,
    /// Dashboards to mount
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [AppName::Explore, AppName::Scenarios, AppName::Geometry],
        env = "GLACIERVIEW_APPS"
    )]
    pub apps: Vec<AppName>,
    /// Access token for Mapbox map tiles
    #[arg(long, env = "GLACIERVIEW_MAPBOX_TOKEN")]
    pub mapbox_token: Option<String>,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CommandLineArgs::try_parse_from(["glacierview"]).unwrap();
        assert_eq!(8050, args.port);
        assert_eq!(
            vec![AppName::Explore, AppName::Scenarios, AppName::Geometry],
            args.apps
        );
        assert_eq!(None, args.thread_limit);
        assert_eq!(None, args.mapbox_token);
    }

    #[test]
    fn apps_list() {
        let args =
            CommandLineArgs::try_parse_from(["glacierview", "--apps", "geometry,explore"]).unwrap();
        assert_eq!(vec![AppName::Geometry, AppName::Explore], args.apps);
        assert!(CommandLineArgs::try_parse_from(["glacierview", "--apps", "nope"]).is_err());
    }

    #[test]
    fn app_name_display() {
        assert_eq!("scenarios", AppName::Scenarios.to_string());
    }
}
