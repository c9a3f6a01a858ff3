//! This file defines the glacierview binary entry point.

use glacierview::app;
use glacierview::cli;
use glacierview::metrics;
use glacierview::server;
use glacierview::tracing;

use std::error::Error;
use std::process::exit;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing(&args);
    ::tracing::debug!("{:?}", args);
    metrics::register_metrics();
    let service = match app::init(&args).and_then(|_| app::service(&args)) {
        Ok(service) => service,
        Err(error) => {
            ::tracing::error!("failed to start: {}", error);
            let mut source = error.source();
            while let Some(cause) = source {
                ::tracing::error!("caused by: {}", cause);
                source = cause.source();
            }
            tracing::shutdown_tracing();
            exit(1)
        }
    };
    server::serve(&args, service).await;
    tracing::shutdown_tracing();
}
