use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::prelude::*;

/// Initialises tracing.
///
/// Events are written to stderr, so that stdout only contains the report.
pub fn init() -> Result {
    let format_filter = EnvFilter::try_from_env("FATAL_FACTORS_LOG")
        .or_else(|_| EnvFilter::try_new("fatal_factors=info"))?;
    let format_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(format_filter);

    tracing_subscriber::Registry::default()
        .with(format_layer)
        .try_init()
        .context("failed to initialise tracing")?;

    Ok(())
}

/// Formats the duration with millisecond precision.
pub fn format_duration(duration: StdDuration) -> String {
    let duration = StdDuration::from_millis(duration.as_millis() as u64);
    humantime::format_duration(duration).to_string()
}
