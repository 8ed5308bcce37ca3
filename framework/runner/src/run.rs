use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use load_gauge_instruments::{print_summary, ProcessMonitor};
use load_gauge_report::{render, ChartRequest};
use todo_client::prelude::TodoClient;

use crate::cli::{GaugeScenarioCli, ReadinessOpt};
use crate::context::RunContext;
use crate::definition::{ScenarioDefinition, ScenarioDefinitionBuilder, WorkloadResult};
use crate::executor::Executor;
use crate::readiness::Readiness;
use crate::service::{ServiceConfig, ServiceConfigBuilder, ServiceProcess};
use crate::types::GaugeResult;

/// Launch the service, run the scenario's workload against it, stop the service and then report.
///
/// The service is stopped whether or not the workload succeeds. Reporting only happens if the
/// workload succeeds.
pub fn run(definition: ScenarioDefinitionBuilder) -> GaugeResult<()> {
    let definition = definition.build()?;

    log::info!("Running scenario: {}", definition.name);

    let config = service_config(&definition.cli)?;
    let executor = Arc::new(Executor::new()?);
    let service = ServiceProcess::launch(executor, &config)?;

    let outcome = run_workload(&definition, &config, service.pid());

    match service.terminate() {
        Ok(status) => log::debug!("Service stopped with {status}"),
        Err(e) => log::error!("Failed to stop the service: {e:?}"),
    }

    let requests = outcome?;
    report(&requests, &definition.cli.output_dir)
}

fn run_workload(
    definition: &ScenarioDefinition,
    config: &ServiceConfig,
    pid: u32,
) -> WorkloadResult {
    let client = TodoClient::new(config.base_url())
        .with_context(|| format!("Failed to create client for '{}'", config.base_url()))?;
    let monitor = ProcessMonitor::new(pid);

    let cli = &definition.cli;
    let mut ctx = RunContext::new(
        client,
        monitor,
        cli.total,
        cli.batch_size,
        !cli.no_progress,
    );

    (definition.workload)(&mut ctx)
}

pub(crate) fn service_config(cli: &GaugeScenarioCli) -> GaugeResult<ServiceConfig> {
    let mut builder = ServiceConfigBuilder::new(&cli.jar);
    builder
        .with_java_path(&cli.java)
        .with_port(cli.port)
        .with_startup_timeout(Duration::from_secs(cli.startup_timeout));

    if cli.readiness == ReadinessOpt::LogLines {
        builder.with_readiness(Readiness::log_lines(cli.ready_lines));
    }

    builder.build()
}

/// Print a summary table for each chart request and render it into `output_dir`.
///
/// A chart that fails to render does not stop the others. An error is returned afterwards if any
/// of them failed.
pub fn report(requests: &[ChartRequest], output_dir: &Path) -> GaugeResult<()> {
    let mut failed = 0;
    for request in requests {
        print_summary(request.series());

        let path = output_dir.join(request.file_name());
        if let Err(e) = render(request, &path) {
            log::error!("Failed to render chart '{}': {e:?}", path.display());
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} charts could not be rendered", requests.len());
    }

    Ok(())
}
