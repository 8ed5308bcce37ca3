use anyhow::bail;
use load_gauge_report::ChartRequest;

use crate::cli::GaugeScenarioCli;
use crate::context::RunContext;
use crate::types::GaugeResult;

/// What a workload hands back: one chart per measured phase.
pub type WorkloadResult = GaugeResult<Vec<ChartRequest>>;

pub type Workload = fn(&mut RunContext) -> WorkloadResult;

/// The builder for a scenario definition.
///
/// This must be used at the start of a scenario's `main` to define the scenario that you want to
/// run.
pub struct ScenarioDefinitionBuilder {
    /// The name of the scenario.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    /// This value is initialised for you by [ScenarioDefinitionBuilder::new_with_init].
    #[doc(hidden)]
    cli: GaugeScenarioCli,
    /// The workload that is run against the service once it is ready.
    workload: Option<Workload>,
}

pub(crate) struct ScenarioDefinition {
    pub name: String,
    pub cli: GaugeScenarioCli,
    pub workload: Workload,
}

impl ScenarioDefinitionBuilder {
    /// Initialise logging, parse the command line and start a new scenario definition.
    pub fn new_with_init(name: &str) -> Self {
        Self::new(name, crate::init::init())
    }

    /// Start a new scenario definition from command line arguments that have already been parsed.
    pub fn new(name: &str, cli: GaugeScenarioCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            workload: None,
        }
    }

    /// Set the [ScenarioDefinitionBuilder::workload] for this scenario.
    pub fn use_workload(mut self, workload: Workload) -> Self {
        self.workload = Some(workload);
        self
    }

    pub(crate) fn build(self) -> GaugeResult<ScenarioDefinition> {
        let Some(workload) = self.workload else {
            bail!("Scenario '{}' has no workload", self.name);
        };

        Ok(ScenarioDefinition {
            name: self.name,
            cli: self.cli,
            workload,
        })
    }
}
