use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "quizcraft=info,services=info,storage=warn";

/// Install the global subscriber. Reads `QUIZCRAFT_LOG`; safe to call twice.
///
/// Events go to stderr so they never interleave with the quiz on stdout.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("QUIZCRAFT_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}
