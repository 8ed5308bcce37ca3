mod bin_path;
mod cli;
mod context;
mod definition;
mod executor;
mod init;
mod progress;
mod readiness;
mod run;
mod service;
mod types;

pub mod prelude {
    pub use crate::cli::{GaugeScenarioCli, ReadinessOpt, DEFAULT_JAR_PATH};
    pub use crate::context::RunContext;
    pub use crate::definition::{ScenarioDefinitionBuilder, Workload, WorkloadResult};
    pub use crate::executor::Executor;
    pub use crate::progress::PhaseProgress;
    pub use crate::readiness::{Readiness, SERVICE_LOG_TARGET, SERVICE_STDERR_LOG_TARGET};
    pub use crate::run::{report, run};
    pub use crate::service::{
        ServiceConfig, ServiceConfigBuilder, ServiceProcess, DEFAULT_PORT,
        DEFAULT_STARTUP_TIMEOUT,
    };
    pub use crate::types::GaugeResult;

    /// Re-exports so that scenarios only need to depend on the runner.
    pub use load_gauge_core::prelude::*;
    pub use load_gauge_instruments::{
        Baseline, CpuTimes, MetricRecorder, ProcessMonitor, ResourceProbe, SampleRow,
    };
    pub use load_gauge_report::{ChartRequest, RGBColor, BLUE, GREEN, RED};
    pub use todo_client::prelude::*;
}
