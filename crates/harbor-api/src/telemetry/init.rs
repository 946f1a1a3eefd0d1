use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "harbor=debug,tower_http=debug";

/// Initialize tracing. Production emits JSON lines; elsewhere a compact
/// human-readable format is used.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_telemetry(environment: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let installed = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()
    };

    if installed.is_ok() {
        tracing::info!(environment = %environment, json, "Tracing initialized");
    }
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
