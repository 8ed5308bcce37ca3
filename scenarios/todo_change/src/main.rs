use anyhow::Context;
use load_gauge_runner::prelude::*;

/// Todos created over the whole run.
const TOTAL: u64 = 10_000;
/// Every this many creates, all todos created so far are updated and a sample is taken.
const BATCH_SIZE: u64 = 1_000;

fn workload(ctx: &mut RunContext) -> WorkloadResult {
    let plan = ctx.plan(TOTAL, BATCH_SIZE)?;
    let progress = ctx.progress(plan.total(), "change");

    let (client, monitor) = ctx.split();
    let series = change_todos(client, monitor, &plan, &progress)?;
    progress.finish();

    Ok(vec![
        ChartRequest::new(series, "change_performance.png").with_cpu_colour(GREEN)
    ])
}

/// Create todos one at a time. At each sample point update every todo created so far and record
/// the cost of that sweep alone.
///
/// Stops at the first unexpected status and returns whatever was sampled up to then.
fn change_todos<A: TodoApi, P: ResourceProbe>(
    api: &mut A,
    probe: &mut P,
    plan: &BatchPlan,
    progress: &PhaseProgress,
) -> GaugeResult<ScenarioSeries> {
    let todo = Todo::filler(FILLER_FIELD_LEN);
    let mut recorder = MetricRecorder::new("change", "Changed");

    'create: for i in 1..=plan.total() {
        let status = api
            .create(&todo)
            .with_context(|| format!("Failed to create todo {i}"))?;
        progress.inc();
        if let Err(e) = check_status(Operation::Create, i, status) {
            progress.log(|| log::error!("{e}"));
            break;
        }

        if !plan.is_sample_point(i) {
            continue;
        }

        let baseline = Baseline::capture(probe)?;
        for id in 1..=i {
            let status = api
                .update(id, &todo)
                .with_context(|| format!("Failed to update todo {id}"))?;
            if let Err(e) = check_status(Operation::Update, id, status) {
                progress.log(|| log::error!("{e}"));
                break 'create;
            }
        }

        let row = recorder.record(i, probe, &baseline)?;
        progress.set_message(format!("{} samples", recorder.series().len()));
        progress.log(|| log::info!("Changed {i} todos: {row}"));
    }

    Ok(recorder.finish())
}

fn main() -> GaugeResult<()> {
    let builder =
        ScenarioDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME")).use_workload(workload);

    run(builder)?;

    Ok(())
}
