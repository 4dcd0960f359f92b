use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "xrate";

/// Targets shown for a run. Quiet runs print nothing; `--verbose` shows resolver
/// decisions plus warnings from the HTTP client and the rate store.
fn app_targets(verbose: bool) -> Targets {
    if verbose {
        Targets::new()
            .with_target(APP_TARGET, LevelFilter::DEBUG)
            .with_target("reqwest", Level::WARN)
            .with_target("fjall", Level::WARN)
    } else {
        Targets::new().with_target(APP_TARGET, LevelFilter::OFF)
    }
}

/// Installs the global subscriber on stderr so command output stays clean.
/// `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "off" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_targets(verbose))
        .with(env_filter)
        .init();
}
