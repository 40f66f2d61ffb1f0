use std::sync::Once;

use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::error::{GameError, GameResult};
use crate::formatter::CustomFormatter;

static SUBSCRIBER_INIT: Once = Once::new();

/// Installs the global subscriber: the tick-aware formatter on stderr, an env filter
/// (`RUST_LOG` wins over the default), and an `ErrorLayer` for span traces.
///
/// Safe to call more than once; only the first call does anything.
pub fn setup_logging() -> GameResult<()> {
    let mut result = Ok(());
    SUBSCRIBER_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).event_format(CustomFormatter))
            .with(filter)
            .with(ErrorLayer::default());

        result = tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| GameError::InvalidState(format!("Failed to set tracing subscriber: {e}")));
    });
    result
}
