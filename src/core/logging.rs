// Start of file: /src/core/logging.rs

use tracing_subscriber::{fmt, EnvFilter};
use tracing_subscriber::fmt::format::FmtSpan;

const DEFAULT_FILTER: &str = "tenancy_api=info,tower_http=debug,axum=trace";

// Initialize the tracing subscriber; RUST_LOG overrides the default filter
pub fn init_tracing() {
    let env_filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

// End of file: /src/core/logging.rs
