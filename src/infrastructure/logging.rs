use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber.
///
/// Logs go to stderr so `predict` and `inspect` output on stdout stays
/// machine readable. A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    }
}
