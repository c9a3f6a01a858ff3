//! Tracing (logging)

use crate::cli::CommandLineArgs;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initlialise tracing (logging)
///
/// Applies a filter based on the `RUST_LOG` environment variable, falling back to info logging
/// for this crate and tower_http if not set, or debug logging with `--debug`.
/// Spans are exported to a Jaeger agent when `--enable-jaeger` is set.
pub fn init_tracing(args: &CommandLineArgs) {
    let level = if args.debug { "debug" } else { "info" };
    let (jaeger_layer, jaeger_error) = if args.enable_jaeger {
        opentelemetry::global::set_text_map_propagator(opentelemetry_jaeger::Propagator::new());
        match opentelemetry_jaeger::new_agent_pipeline()
            .with_service_name("glacierview")
            .install_batch(opentelemetry::runtime::Tokio)
        {
            Ok(tracer) => (Some(tracing_opentelemetry::layer().with_tracer(tracer)), None),
            Err(error) => (None, Some(error)),
        }
    } else {
        (None, None)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("glacierview={level},tower_http={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(jaeger_layer)
        .init();
    if let Some(error) = jaeger_error {
        tracing::warn!("Jaeger tracing disabled: {}", error);
    }
}

/// Flush and shut down any span exporters.
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
}
