use anyhow::Context;
use load_gauge_core::prelude::BatchPlan;
use load_gauge_instruments::ProcessMonitor;
use todo_client::prelude::TodoClient;

use crate::progress::PhaseProgress;
use crate::types::GaugeResult;

/// Everything a workload needs to drive the running service and measure it.
pub struct RunContext {
    client: TodoClient,
    monitor: ProcessMonitor,
    total: Option<u64>,
    batch_size: Option<u64>,
    show_progress: bool,
}

impl RunContext {
    pub(crate) fn new(
        client: TodoClient,
        monitor: ProcessMonitor,
        total: Option<u64>,
        batch_size: Option<u64>,
        show_progress: bool,
    ) -> Self {
        Self {
            client,
            monitor,
            total,
            batch_size,
            show_progress,
        }
    }

    /// The batch plan for this run. The scenario's defaults apply unless overridden on the
    /// command line.
    pub fn plan(&self, default_total: u64, default_batch_size: u64) -> GaugeResult<BatchPlan> {
        let total = self.total.unwrap_or(default_total);
        let batch_size = self.batch_size.unwrap_or(default_batch_size);

        let plan = BatchPlan::new(total, batch_size)
            .with_context(|| format!("Invalid plan of {total} todos in batches of {batch_size}"))?;
        log::info!(
            "Working through {} todos, sampling every {} ({} samples)",
            plan.total(),
            plan.batch_size(),
            plan.expected_samples()
        );

        Ok(plan)
    }

    /// A progress bar for one phase of the workload, hidden when running with `--no-progress`.
    pub fn progress(&self, len: u64, phase: &str) -> PhaseProgress {
        if self.show_progress {
            PhaseProgress::new(len, phase)
        } else {
            PhaseProgress::hidden()
        }
    }

    pub fn monitor(&mut self) -> &mut ProcessMonitor {
        &mut self.monitor
    }

    /// Borrow the client and the monitor at the same time.
    pub fn split(&mut self) -> (&mut TodoClient, &mut ProcessMonitor) {
        (&mut self.client, &mut self.monitor)
    }
}
