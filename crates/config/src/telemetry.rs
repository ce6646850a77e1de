use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use opentelemetry::KeyValue;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{ExporterBuildError, LogExporter, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::{Resource, logs::SdkLoggerProvider};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum TelemetryError {
    #[error("failed to install the Prometheus exporter: {0}")]
    Metrics(#[from] BuildError),
    #[error("failed to build the OTLP log exporter: {0}")]
    Otlp(#[from] ExporterBuildError),
}

/// Telemetry-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct TelemetryOpts {
    /// Whether to use ANSI colors in the logs. Disable if you're piping logs to a file or using
    /// third party services to collect logs, like kubectl/cloudwatch/loki etc.
    #[clap(long = "telemetry.use-ansi", env = "SEQS_TELEMETRY_USE_ANSI", default_value_t = true)]
    pub use_ansi: bool,
    /// The OTLP HTTP endpoint logs are exported to. Export is disabled if unset.
    #[clap(long = "telemetry.otlp-endpoint", env = "SEQS_TELEMETRY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<Url>,
    /// Extra headers sent with every OTLP export request, as `key=value`.
    #[clap(
        long = "telemetry.otlp-header",
        env = "SEQS_TELEMETRY_OTLP_HEADERS",
        value_delimiter = ',',
        value_parser = parse_header
    )]
    pub otlp_headers: Vec<(String, String)>,
    /// The port to listen for Prometheus metrics. Default is `9090`.
    #[clap(long = "metrics.port", env = "SEQS_METRICS_PORT", default_value_t = 9090)]
    pub metrics_port: u16,
    /// Disable metrics collection. Default is `false`.
    #[clap(long = "metrics.disable", env = "SEQS_DISABLE_METRICS", default_value_t = false)]
    pub disable_metrics: bool,
}

/// A wrapper around the OpenTelemetry logger provider.
#[derive(Debug, Default)]
pub struct LogProvider {
    inner: Option<SdkLoggerProvider>,
}

impl LogProvider {
    /// Set the OpenTelemetry logger provider.
    pub fn set_provider(&mut self, provider: SdkLoggerProvider) {
        self.inner = Some(provider);
    }

    /// Shutdown the OpenTelemetry logger provider.
    pub fn shutdown(&self) {
        if let Some(provider) = self.inner.as_ref() {
            // We ignore the error because it's not critical
            let _ = provider.shutdown();
        }
    }
}

impl TelemetryOpts {
    /// Setup the telemetry stack.
    ///
    /// 1. Tracing to stdout, and to the OTLP endpoint if configured
    /// 2. Metrics collection with Prometheus (if enabled)
    pub fn setup(&self, instance_name: &str) -> Result<LogProvider, TelemetryError> {
        let mut global_provider = LogProvider::default();
        // Setup tracing with stdout by default
        let registry = tracing_subscriber::registry()
            .with(EnvFilter::from_env("RUST_LOG"))
            .with(tracing_subscriber::fmt::layer().with_ansi(self.use_ansi));

        if let Some(endpoint) = &self.otlp_endpoint {
            let provider = self.build_otlp_provider(endpoint, instance_name)?;
            let layer = OpenTelemetryTracingBridge::new(&provider);
            global_provider.set_provider(provider);
            registry.with(layer).init();
            info!(%endpoint, "OTLP logging enabled");
        } else {
            registry.init();
        }

        // Setup metrics collection with Prometheus
        if !self.disable_metrics {
            let prometheus_address = SocketAddr::from(([0, 0, 0, 0], self.metrics_port));

            PrometheusBuilder::new()
                .with_http_listener(prometheus_address)
                .add_global_label("instance", instance_name)
                .install()?;

            info!("Metrics enabled on {}", prometheus_address);
        }

        Ok(global_provider)
    }

    fn build_otlp_provider(
        &self,
        endpoint: &Url,
        name: &str,
    ) -> Result<SdkLoggerProvider, ExporterBuildError> {
        let exporter = LogExporter::builder()
            .with_http()
            .with_headers(self.otlp_headers.iter().cloned().collect())
            .with_endpoint(endpoint.as_str())
            .with_timeout(Duration::from_secs(5))
            .build()?;

        let provider = SdkLoggerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(
                Resource::builder()
                    // OTLP convention
                    .with_attribute(KeyValue::new("service.name", name.to_owned()))
                    .build(),
            )
            .build();

        Ok(provider)
    }
}

/// Parses a `key=value` header.
fn parse_header(s: &str) -> Result<(String, String), String> {
    let (key, value) =
        s.split_once('=').ok_or_else(|| format!("invalid header `{s}`, expected key=value"))?;
    Ok((key.trim().to_owned(), value.trim().to_owned()))
}
