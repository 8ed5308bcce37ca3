use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::service::DEFAULT_PORT;

/// The Todo Manager jar, relative to the directory the scenario is run from.
pub const DEFAULT_JAR_PATH: &str = "part3/runTodoManagerRestAPI-1.5.5.jar";

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct GaugeScenarioCli {
    /// The `java` executable used to run the service. A bare name is looked up in the user's `PATH`
    #[clap(long, default_value = "java")]
    pub java: PathBuf,

    /// The Todo Manager REST API jar to launch
    #[clap(long, default_value = DEFAULT_JAR_PATH)]
    pub jar: PathBuf,

    /// The port the service is told to listen on
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// How to tell that the service has finished starting.
    ///
    /// `http` polls `GET /todos` until the service answers. `log-lines` waits for a number of
    /// lines on the service's stdout, see `--ready-lines`, which only works as long as the
    /// service's startup banner does not change.
    #[clap(long, value_enum, default_value_t = ReadinessOpt::Http)]
    pub readiness: ReadinessOpt,

    /// The number of stdout lines to wait for with `--readiness=log-lines`
    #[clap(long, default_value_t = 12)]
    pub ready_lines: usize,

    /// The number of seconds to wait for the service to be ready before giving up
    #[clap(long, default_value_t = 60)]
    pub startup_timeout: u64,

    /// The directory that charts are written to. It is created if it does not exist
    #[clap(long, default_value = "part3")]
    pub output_dir: PathBuf,

    /// Override the number of todos the scenario works through
    #[clap(long)]
    pub total: Option<u64>,

    /// Override the number of iterations between samples
    #[clap(long)]
    pub batch_size: Option<u64>,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOpt {
    Http,
    LogLines,
}
