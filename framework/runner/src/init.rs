use crate::cli::GaugeScenarioCli;
use clap::Parser;

/// Initialise logging and parse the command line for a scenario binary.
///
/// Logs at `info` and above unless `RUST_LOG` says otherwise, so per-batch progress is visible.
pub fn init() -> GaugeScenarioCli {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    GaugeScenarioCli::parse()
}
