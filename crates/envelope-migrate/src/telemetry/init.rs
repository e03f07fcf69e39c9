use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace::Tracer, Resource};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE: &str = "envelope-migrate";

/// Initialise the global tracing subscriber.
///
/// Events go to stderr as JSON, filtered by `RUST_LOG` when set and by
/// `log_level` otherwise. With `otlp_endpoint` set, spans are also batched to
/// that collector.
///
/// # Errors
///
/// Returns an error if the OTLP pipeline cannot be installed or a subscriber
/// has already been set.
pub fn init(otlp_endpoint: Option<&str>, log_level: &str) -> Result<()> {
    let export = otlp_endpoint
        .map(otlp_tracer)
        .transpose()?
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let json_stderr = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_stderr)
        .with(export)
        .try_init()
        .context("failed to initialise envelope-migrate tracing subscriber")
}

/// Flush batched spans before exit. Harmless when export is disabled.
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}

fn otlp_tracer(endpoint: &str) -> Result<Tracer> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);
    let trace_config = opentelemetry_sdk::trace::Config::default().with_resource(resource());

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(trace_config)
        .install_batch(runtime::Tokio)
        .with_context(|| format!("failed to install OTLP span exporter for {endpoint}"))
}

fn resource() -> Resource {
    Resource::new([
        KeyValue::new(SERVICE_NAME, SERVICE),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::{Key, Value};

    #[test]
    fn resource_names_the_tool() {
        let resource = resource();
        assert_eq!(
            resource.get(Key::from_static_str(SERVICE_NAME)),
            Some(Value::from(SERVICE))
        );
        assert_eq!(
            resource.get(Key::from_static_str(SERVICE_VERSION)),
            Some(Value::from(env!("CARGO_PKG_VERSION")))
        );
    }
}
