use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Map `-v` occurrences to a default filter.
pub fn filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "weather_core=debug,weather_cli=debug,warn",
        _ => "trace",
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_from_verbosity(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
