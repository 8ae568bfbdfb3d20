//! Tracing subscriber setup.
//!
//! Command output and diagnostics share the terminal, so the filter sits
//! behind a `reload` layer: the interactive browser mutes it while it owns
//! the screen and restores it on exit.

use anyhow::{Context, Result};
use tracing_subscriber::Registry;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Handle for switching the active log filter at runtime.
#[derive(Debug, Clone)]
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
}

/// Restores the previous filter when dropped.
#[derive(Debug)]
pub struct MuteGuard {
    handle: reload::Handle<EnvFilter, Registry>,
    previous: String,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber: env filter, fmt output and, with the
/// `otel` feature and `OTEL_EXPORTER_OTLP_ENDPOINT` set, an OTLP span
/// exporter.
pub fn init() -> LogControl {
    let (filter, handle) = reload::Layer::new(env_filter());
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    #[cfg(feature = "otel")]
    {
        // Export spans only when an OTLP endpoint is configured
        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;
                let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();
                let tracer =
                    opentelemetry::trace::TracerProvider::tracer(&provider, env!("CARGO_PKG_NAME"));
                opentelemetry::global::set_tracer_provider(provider);
                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    #[cfg(not(feature = "otel"))]
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    LogControl { handle }
}

impl LogControl {
    /// Silences all events until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscriber holding the filter is gone.
    pub fn mute(&self) -> Result<MuteGuard> {
        let previous = self
            .handle
            .with_current(ToString::to_string)
            .context("failed to read log filter")?;
        self.handle
            .reload(EnvFilter::new("off"))
            .context("failed to mute log output")?;
        Ok(MuteGuard {
            handle: self.handle.clone(),
            previous,
        })
    }
}

impl Drop for MuteGuard {
    fn drop(&mut self) {
        let filter = EnvFilter::try_new(&self.previous).unwrap_or_else(|_| env_filter());
        // Nothing to restore into once the subscriber is gone
        let _ = self.handle.reload(filter);
    }
}
